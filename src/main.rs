//! Admin console entry point
//!
//! User-administration REST service. Reads configuration from a TOML file
//! (~/.config/admin-console/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use admin_console::application::identity::{RoleService, UserService};
use admin_console::config::AppConfig;
use admin_console::domain::{CreateUserDto, RoleRepositoryInterface};
use admin_console::infrastructure::database::migrator::Migrator;
use admin_console::infrastructure::database::repositories::{RoleRepository, UserRepository};
use admin_console::{create_api_router, default_config_path, init_database, DatabaseConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ADMIN_CONSOLE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting admin console...");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.connection_url(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories & services ────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db.clone()));
    let role_repo = Arc::new(RoleRepository::new(db.clone()));
    let user_service = Arc::new(UserService::new(user_repo, role_repo.clone()));
    let role_service = Arc::new(RoleService::new(role_repo.clone()));

    // Create default admin user if no users exist
    create_default_admin(&user_service, role_repo.as_ref(), &app_cfg).await;

    // ── HTTP server ────────────────────────────────────────────
    let router = create_api_router(user_service, role_service, db.clone());

    let api_addr = app_cfg.api_addr();
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("REST API server listening on http://{}", api_addr);
    info!("Swagger UI available at http://{}/docs/", api_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // ── Cleanup ────────────────────────────────────────────────
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Admin console shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Create default admin user if no users exist
async fn create_default_admin(
    user_service: &UserService<UserRepository, RoleRepository>,
    role_repo: &RoleRepository,
    app_cfg: &AppConfig,
) {
    let users = match user_service.list_users().await {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to check for existing users: {}", e);
            return;
        }
    };
    if !users.is_empty() {
        return;
    }

    info!("Creating default admin user...");

    let admin_role_ids = match role_repo.get_role_by_name("ROLE_ADMIN").await {
        Ok(Some(role)) => vec![role.id],
        Ok(None) => {
            error!("Role catalog is missing ROLE_ADMIN; skipping admin bootstrap");
            return;
        }
        Err(e) => {
            error!("Failed to resolve ROLE_ADMIN: {}", e);
            return;
        }
    };

    let dto = CreateUserDto {
        name: app_cfg.admin.name.clone(),
        username: app_cfg.admin.username.clone(),
        password: app_cfg.admin.password.clone(),
        role_ids: admin_role_ids,
    };

    match user_service.create_user(dto).await {
        Ok(user) => {
            info!("Default admin created: {}", user.username);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => {
            error!("Failed to create admin user: {}", e);
        }
    }
}
