//! Admin endpoint handlers
//!
//! CRUD over users and their role assignments under the `/admin` prefix.
//! Handlers are thin adapters: translate the request into a service call,
//! then select the response payload. Reads render view DTOs; mutations
//! redirect `302 Found` back to the list view.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{
    CreateUserRequest, EditUserView, NewUserForm, RoleDto, UpdateUserRequest, UserDto,
    UserProfileView,
};
use crate::application::identity::{RoleService, UserService};
use crate::domain::DomainError;
use crate::infrastructure::database::repositories::{RoleRepository, UserRepository};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};

/// Admin handler state — concrete over the SeaORM repositories for Axum
/// compatibility.
#[derive(Clone)]
pub struct AdminState {
    pub user_service: Arc<UserService<UserRepository, RoleRepository>>,
    pub role_service: Arc<RoleService<RoleRepository>>,
}

/// `302 Found` back to the list view after a mutation.
fn redirect_to_list() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/admin")]).into_response()
}

/// 404 body for an id that does not resolve to a user.
fn user_not_found(id: i64) -> (StatusCode, Json<ApiResponse<()>>) {
    let e = DomainError::NotFound {
        entity: "User",
        field: "id",
        value: id.to_string(),
    };
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(e.to_string())))
}

#[utoipa::path(
    get,
    path = "/admin",
    tag = "Admin",
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserDto>>),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn show_all_users(
    State(state): State<AdminState>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_service.list_users().await {
        Ok(users) => {
            let users: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
            Ok(Json(ApiResponse::success(users)))
        }
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/admin/user-profile/{id}",
    tag = "Admin",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User with its role set", body = ApiResponse<UserProfileView>),
        (status = 404, description = "Not found")
    )
)]
pub async fn user_profile(
    State(state): State<AdminState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<UserProfileView>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_service.find_user_by_id(id).await {
        Ok(Some(user)) => {
            let user = UserDto::from(user);
            let user_roles = user.roles.clone();
            Ok(Json(ApiResponse::success(UserProfileView {
                user,
                user_roles,
            })))
        }
        Ok(None) => Err(user_not_found(id)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/admin/edit/{id}",
    tag = "Admin",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User plus the role catalog", body = ApiResponse<EditUserView>),
        (status = 404, description = "Not found")
    )
)]
pub async fn edit_user(
    State(state): State<AdminState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<EditUserView>>, (StatusCode, Json<ApiResponse<()>>)> {
    let user = match state.user_service.find_user_by_id(id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(user_not_found(id)),
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            ))
        }
    };

    match state.role_service.find_all().await {
        Ok(roles) => Ok(Json(ApiResponse::success(EditUserView {
            user: UserDto::from(user),
            all_roles: roles.into_iter().map(RoleDto::from).collect(),
        }))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    patch,
    path = "/admin/update/{id}",
    tag = "Admin",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 302, description = "Updated; redirect to the list view"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_user(
    State(state): State<AdminState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_service.update_user(id, request.into()).await {
        Ok(Some(_)) => Ok(redirect_to_list()),
        Ok(None) => Err(user_not_found(id)),
        Err(e) => {
            let status = match &e {
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/admin/delete/{id}",
    tag = "Admin",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 302, description = "Deleted (or already absent); redirect to the list view"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn delete_user(
    State(state): State<AdminState>,
    Path(id): Path<i64>,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_service.delete_user(id).await {
        Ok(()) => Ok(redirect_to_list()),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/admin/new",
    tag = "Admin",
    responses(
        (status = 200, description = "Blank user form", body = ApiResponse<NewUserForm>)
    )
)]
pub async fn new_user_form() -> Json<ApiResponse<NewUserForm>> {
    Json(ApiResponse::success(NewUserForm::default()))
}

#[utoipa::path(
    post,
    path = "/admin/create",
    tag = "Admin",
    request_body = CreateUserRequest,
    responses(
        (status = 302, description = "Created; redirect to the list view"),
        (status = 409, description = "Username already taken"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<AdminState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    match state.user_service.create_user(request.into()).await {
        Ok(_) => Ok(redirect_to_list()),
        Err(e) => {
            let status = match &e {
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::interfaces::http::router::admin_routes;

    async fn test_app() -> Router {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let users = Arc::new(UserRepository::new(db.clone()));
        let roles = Arc::new(RoleRepository::new(db.clone()));
        admin_routes(AdminState {
            user_service: Arc::new(UserService::new(users, roles.clone())),
            role_service: Arc::new(RoleService::new(roles)),
        })
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn delete(uri: &str) -> Request<Body> {
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create_ann(app: &Router) -> i64 {
        let resp = app
            .clone()
            .oneshot(json(
                "POST",
                "/admin/create",
                serde_json::json!({
                    "name": "Ann",
                    "username": "ann@x.com",
                    "password": "long-enough-password"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/admin");

        let resp = app.clone().oneshot(get("/admin")).await.unwrap();
        let body = body_json(resp).await;
        body["data"][0]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn listing_starts_empty() {
        let app = test_app().await;

        let resp = app.oneshot(get("/admin")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn create_then_list_shows_user_with_assigned_id() {
        let app = test_app().await;
        let id = create_ann(&app).await;
        assert!(id > 0);

        let resp = app.clone().oneshot(get("/admin")).await.unwrap();
        let body = body_json(resp).await;
        let users = body["data"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["name"], "Ann");
        assert_eq!(users[0]["username"], "ann@x.com");
        // password never appears in a rendered view
        assert!(users[0].get("password").is_none());
        assert!(users[0].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn profile_returns_user_and_its_role_set() {
        let app = test_app().await;
        let id = create_ann(&app).await;

        let resp = app
            .oneshot(get(&format!("/admin/user-profile/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"]["user"]["id"].as_i64().unwrap(), id);
        assert_eq!(body["data"]["user"]["name"], "Ann");
        let roles = body["data"]["user_roles"].as_array().unwrap();
        assert_eq!(roles.len(), 1);
        assert_eq!(roles[0]["name"], "ROLE_USER");
    }

    #[tokio::test]
    async fn profile_of_unknown_id_is_not_found() {
        let app = test_app().await;

        let resp = app.oneshot(get("/admin/user-profile/4242")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn edit_form_carries_the_full_role_catalog() {
        let app = test_app().await;
        let id = create_ann(&app).await;

        let resp = app
            .oneshot(get(&format!("/admin/edit/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"]["user"]["id"].as_i64().unwrap(), id);
        let catalog = body["data"]["all_roles"].as_array().unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn update_then_profile_reflects_changes() {
        let app = test_app().await;
        let id = create_ann(&app).await;

        let resp = app
            .clone()
            .oneshot(json(
                "PATCH",
                &format!("/admin/update/{}", id),
                serde_json::json!({"name": "Anna", "username": "ann@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers()[header::LOCATION], "/admin");

        let resp = app
            .oneshot(get(&format!("/admin/user-profile/{}", id)))
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["user"]["name"], "Anna");
    }

    #[tokio::test]
    async fn update_of_unknown_id_is_not_found() {
        let app = test_app().await;

        let resp = app
            .oneshot(json(
                "PATCH",
                "/admin/update/4242",
                serde_json::json!({"name": "Ghost", "username": "ghost@x.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_then_profile_not_found_and_repeat_is_safe() {
        let app = test_app().await;
        let id = create_ann(&app).await;

        let resp = app
            .clone()
            .oneshot(delete(&format!("/admin/delete/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);

        let resp = app
            .clone()
            .oneshot(get(&format!("/admin/user-profile/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // deleting again must stay caller-visible-safe
        let resp = app
            .oneshot(delete(&format!("/admin/delete/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FOUND);
    }

    #[tokio::test]
    async fn create_with_invalid_payload_is_unprocessable() {
        let app = test_app().await;

        let resp = app
            .oneshot(json(
                "POST",
                "/admin/create",
                serde_json::json!({
                    "name": "",
                    "username": "not-an-email",
                    "password": "short"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let app = test_app().await;
        create_ann(&app).await;

        let resp = app
            .oneshot(json(
                "POST",
                "/admin/create",
                serde_json::json!({
                    "name": "Other Ann",
                    "username": "ann@x.com",
                    "password": "long-enough-password"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn new_user_form_is_blank() {
        let app = test_app().await;

        let resp = app.oneshot(get("/admin/new")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["data"]["name"], "");
        assert_eq!(body["data"]["username"], "");
        assert_eq!(body["data"]["role_ids"].as_array().unwrap().len(), 0);
    }
}
