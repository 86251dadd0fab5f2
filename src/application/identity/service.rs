//! User management service — application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Role, RoleRepositoryInterface, UpdateUserDto, User,
    UserRepositoryInterface,
};

/// Role assigned when a create/update submission carries no role selection.
pub const DEFAULT_ROLE: &str = "ROLE_USER";

/// User service — orchestrates the user-management use-cases.
///
/// Generic over the repository interfaces so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<U: UserRepositoryInterface, R: RoleRepositoryInterface> {
    users: Arc<U>,
    roles: Arc<R>,
}

impl<U: UserRepositoryInterface, R: RoleRepositoryInterface> UserService<U, R> {
    pub fn new(users: Arc<U>, roles: Arc<R>) -> Self {
        Self { users, roles }
    }

    // ── Queries ─────────────────────────────────────────────────

    /// List all users in storage order.
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.users.list_users().await
    }

    /// Get a single user by id.
    pub async fn find_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        self.users.get_user_by_id(id).await
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Create a new user.
    ///
    /// An empty role selection assigns [`DEFAULT_ROLE`], so every user holds
    /// at least one role from the moment it exists.
    pub async fn create_user(&self, mut dto: CreateUserDto) -> DomainResult<User> {
        validate_profile_fields(&dto.name, &dto.username)?;
        validate_password(&dto.password)?;

        if self.users.get_user_by_username(&dto.username).await?.is_some() {
            return Err(DomainError::Conflict("Username already exists".into()));
        }

        dto.role_ids = self.resolve_roles(dto.role_ids).await?;

        let user = self.users.create_user(dto).await?;

        info!(user_id = user.id, username = %user.username, "New user created");
        Ok(user)
    }

    /// Replace the mutable fields of an existing user.
    ///
    /// A `None` password keeps the stored hash. Returns `None` when the id
    /// does not resolve to an existing user.
    pub async fn update_user(&self, id: i64, mut dto: UpdateUserDto) -> DomainResult<Option<User>> {
        validate_profile_fields(&dto.name, &dto.username)?;

        // Blank submissions mean "keep the current password"
        dto.password = dto.password.filter(|p| !p.is_empty());
        if let Some(ref password) = dto.password {
            validate_password(password)?;
        }

        // The username must stay unique across all other users
        if let Some(other) = self.users.get_user_by_username(&dto.username).await? {
            if other.id != id {
                return Err(DomainError::Conflict("Username already exists".into()));
            }
        }

        dto.role_ids = self.resolve_roles(dto.role_ids).await?;

        let updated = self.users.update_user(id, dto).await?;
        if let Some(ref user) = updated {
            info!(user_id = user.id, username = %user.username, "User updated");
        }
        Ok(updated)
    }

    /// Delete a user by id. Deleting an unknown id is a no-op.
    pub async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let removed = self.users.delete_user(id).await?;
        if removed == 0 {
            warn!(user_id = id, "Delete requested for unknown user");
        } else {
            info!(user_id = id, "User deleted");
        }
        Ok(())
    }

    // ── Helpers ─────────────────────────────────────────────────

    /// Check every requested role id against the catalog; an empty selection
    /// falls back to the default role.
    async fn resolve_roles(&self, role_ids: Vec<i64>) -> DomainResult<Vec<i64>> {
        if role_ids.is_empty() {
            let default = self
                .roles
                .get_role_by_name(DEFAULT_ROLE)
                .await?
                .ok_or_else(|| {
                    DomainError::Storage(format!("Default role {} is not seeded", DEFAULT_ROLE))
                })?;
            return Ok(vec![default.id]);
        }

        let mut resolved = Vec::with_capacity(role_ids.len());
        for role_id in role_ids {
            if resolved.contains(&role_id) {
                continue;
            }
            self.roles
                .get_role_by_id(role_id)
                .await?
                .ok_or_else(|| DomainError::Validation(format!("Unknown role id: {}", role_id)))?;
            resolved.push(role_id);
        }
        Ok(resolved)
    }
}

/// Role service — read-only access to the role catalog.
pub struct RoleService<R: RoleRepositoryInterface> {
    roles: Arc<R>,
}

impl<R: RoleRepositoryInterface> RoleService<R> {
    pub fn new(roles: Arc<R>) -> Self {
        Self { roles }
    }

    pub async fn find_all(&self) -> DomainResult<Vec<Role>> {
        self.roles.list_roles().await
    }
}

fn validate_profile_fields(name: &str, username: &str) -> DomainResult<()> {
    if name.is_empty() || name.len() > 100 {
        return Err(DomainError::Validation("Name must be 1-100 characters".into()));
    }
    if username.len() < 3 || username.len() > 255 {
        return Err(DomainError::Validation(
            "Username must be 3-255 characters".into(),
        ));
    }
    if !username.contains('@') {
        return Err(DomainError::Validation("Invalid email address".into()));
    }
    Ok(())
}

fn validate_password(password: &str) -> DomainResult<()> {
    if password.len() < 8 {
        return Err(DomainError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{Database, DatabaseConnection};
    use sea_orm_migration::MigratorTrait;

    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::{RoleRepository, UserRepository};

    async fn test_services() -> (
        UserService<UserRepository, RoleRepository>,
        RoleService<RoleRepository>,
        DatabaseConnection,
    ) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let users = Arc::new(UserRepository::new(db.clone()));
        let roles = Arc::new(RoleRepository::new(db.clone()));
        (
            UserService::new(users, roles.clone()),
            RoleService::new(roles),
            db,
        )
    }

    fn create_dto(name: &str, username: &str, role_ids: Vec<i64>) -> CreateUserDto {
        CreateUserDto {
            name: name.to_string(),
            username: username.to_string(),
            password: "long-enough-password".to_string(),
            role_ids,
        }
    }

    #[tokio::test]
    async fn empty_role_selection_gets_the_default_role() {
        let (service, _, _db) = test_services().await;

        let user = service
            .create_user(create_dto("Ann", "ann@x.com", vec![]))
            .await
            .unwrap();

        assert_eq!(user.roles.len(), 1);
        assert_eq!(user.roles[0].name, DEFAULT_ROLE);
    }

    #[tokio::test]
    async fn unknown_role_id_is_rejected() {
        let (service, _, _db) = test_services().await;

        let err = service
            .create_user(create_dto("Ann", "ann@x.com", vec![999]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let (service, _, _db) = test_services().await;

        let mut dto = create_dto("Ann", "ann@x.com", vec![]);
        dto.password = "short".to_string();

        let err = service.create_user(dto).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn username_without_at_sign_is_rejected() {
        let (service, _, _db) = test_services().await;

        let err = service
            .create_user(create_dto("Ann", "not-an-email", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_before_storage() {
        let (service, _, _db) = test_services().await;

        service
            .create_user(create_dto("Ann", "ann@x.com", vec![]))
            .await
            .unwrap();
        let err = service
            .create_user(create_dto("Other", "ann@x.com", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeps_password_when_blank() {
        let (service, _, _db) = test_services().await;

        let created = service
            .create_user(create_dto("Ann", "ann@x.com", vec![]))
            .await
            .unwrap();

        let updated = service
            .update_user(
                created.id,
                UpdateUserDto {
                    name: "Anna".to_string(),
                    username: "ann@x.com".to_string(),
                    password: Some(String::new()),
                    role_ids: vec![],
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Anna");
        assert_eq!(updated.password_hash, created.password_hash);
    }

    #[tokio::test]
    async fn update_rejects_username_taken_by_another_user() {
        let (service, _, _db) = test_services().await;

        service
            .create_user(create_dto("Ann", "ann@x.com", vec![]))
            .await
            .unwrap();
        let bob = service
            .create_user(create_dto("Bob", "bob@x.com", vec![]))
            .await
            .unwrap();

        let err = service
            .update_user(
                bob.id,
                UpdateUserDto {
                    name: "Bob".to_string(),
                    username: "ann@x.com".to_string(),
                    password: None,
                    role_ids: vec![],
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (service, _, _db) = test_services().await;

        let created = service
            .create_user(create_dto("Ann", "ann@x.com", vec![]))
            .await
            .unwrap();

        service.delete_user(created.id).await.unwrap();
        // second delete of the same id must not surface an error
        service.delete_user(created.id).await.unwrap();

        assert!(service.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn role_catalog_is_exposed() {
        let (_, role_service, _db) = test_services().await;

        let roles = role_service.find_all().await.unwrap();
        let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ROLE_ADMIN", "ROLE_USER"]);
    }
}
