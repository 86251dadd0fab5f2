//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::identity::{RoleService, UserService};
use crate::infrastructure::database::repositories::{RoleRepository, UserRepository};

use super::modules::admin::{self, AdminState};
use super::modules::health::{self, HealthState};
use super::modules::request_id::request_id_middleware;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Admin
        admin::handlers::show_all_users,
        admin::handlers::user_profile,
        admin::handlers::edit_user,
        admin::handlers::update_user,
        admin::handlers::delete_user,
        admin::handlers::new_user_form,
        admin::handlers::create_user,
    ),
    tags(
        (name = "Admin", description = "User administration"),
        (name = "Health", description = "Service health"),
    )
)]
struct ApiDoc;

/// Admin route table: method + path → handler.
pub fn admin_routes(state: AdminState) -> Router {
    Router::new()
        .route("/admin", get(admin::handlers::show_all_users))
        .route(
            "/admin/user-profile/{id}",
            get(admin::handlers::user_profile),
        )
        .route("/admin/edit/{id}", get(admin::handlers::edit_user))
        .route("/admin/update/{id}", patch(admin::handlers::update_user))
        .route("/admin/delete/{id}", delete(admin::handlers::delete_user))
        .route("/admin/new", get(admin::handlers::new_user_form))
        .route("/admin/create", post(admin::handlers::create_user))
        .with_state(state)
}

/// Build the full application router.
pub fn create_api_router(
    user_service: Arc<UserService<UserRepository, RoleRepository>>,
    role_service: Arc<RoleService<RoleRepository>>,
    db: DatabaseConnection,
) -> Router {
    let admin_state = AdminState {
        user_service,
        role_service,
    };
    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let health_routes = Router::new()
        .route("/health", get(health::handlers::health_check))
        .with_state(health_state);

    Router::new()
        .merge(admin_routes(admin_state))
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
