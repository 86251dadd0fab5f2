use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, Role, UpdateUserDto, User, UserRepositoryInterface,
};
use crate::infrastructure::crypto::password::hash_password;
use crate::infrastructure::database::entities::{role, user, user_role};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Replace the full role assignment set of a user.
    async fn assign_roles(&self, user_id: i64, role_ids: &[i64]) -> DomainResult<()> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if role_ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<user_role::ActiveModel> = role_ids
            .iter()
            .map(|role_id| user_role::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(*role_id),
            })
            .collect();

        user_role::Entity::insert_many(rows)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn role_model_to_domain(model: role::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
    }
}

fn user_model_to_domain(model: user::Model, roles: Vec<role::Model>) -> User {
    User {
        id: model.id,
        name: model.name,
        username: model.username,
        password_hash: model.password_hash,
        roles: roles.into_iter().map(role_model_to_domain).collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn unique_violation(e: sea_orm::DbErr) -> DomainError {
    if e.to_string().contains("UNIQUE") || e.to_string().contains("duplicate") {
        DomainError::Conflict("Username already exists".to_string())
    } else {
        db_err(e)
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for UserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();

        let password_hash = hash_password(&dto.password)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        let new_user = user::ActiveModel {
            name: Set(dto.name),
            username: Set(dto.username),
            password_hash: Set(password_hash),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = user::Entity::insert(new_user)
            .exec(&self.db)
            .await
            .map_err(unique_violation)?;
        let id = result.last_insert_id;

        self.assign_roles(id, &dto.role_ids).await?;

        self.get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::Storage("User created but could not be retrieved".into()))
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        // find_with_related orders by the users primary key, i.e. storage order
        let rows = user::Entity::find()
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(model, roles)| user_model_to_domain(model, roles))
            .collect())
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let mut rows = user::Entity::find_by_id(id)
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.pop().map(|(model, roles)| user_model_to_domain(model, roles)))
    }

    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let mut rows = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .find_with_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows.pop().map(|(model, roles)| user_model_to_domain(model, roles)))
    }

    async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<Option<User>> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(dto.name);
        active.username = Set(dto.username);
        if let Some(password) = dto.password {
            let password_hash = hash_password(&password)
                .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;
            active.password_hash = Set(password_hash);
        }
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(unique_violation)?;

        self.assign_roles(id, &dto.role_ids).await?;

        self.get_user_by_id(id).await
    }

    async fn delete_user(&self, id: i64) -> DomainResult<u64> {
        // Assignments are removed before the user row itself
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

// ── Tests ──────────────────────────────────────────────────────
