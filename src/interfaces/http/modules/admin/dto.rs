//! Admin view DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{CreateUserDto, Role, UpdateUserDto, User};

/// User representation rendered in views.
///
/// The password is write-only; it never round-trips through a response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub roles: Vec<RoleDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            username: u.username,
            roles: u.roles.into_iter().map(RoleDto::from).collect(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Role representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i64,
    pub name: String,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

/// Profile view: the user plus its current role set.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfileView {
    pub user: UserDto,
    pub user_roles: Vec<RoleDto>,
}

/// Edit-form view: the user plus the full role catalog for selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditUserView {
    pub user: UserDto,
    pub all_roles: Vec<RoleDto>,
}

/// Blank payload backing the "new user" form view.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct NewUserForm {
    pub name: String,
    pub username: String,
    pub password: String,
    pub role_ids: Vec<i64>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Role assignments by id; empty applies the default-role policy
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            name: r.name,
            username: r.username,
            password: r.password,
            role_ids: r.role_ids,
        }
    }
}

/// Update user request — a full replace of the mutable fields.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub username: String,
    /// Omit (or send blank) to keep the current password
    pub password: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

impl From<UpdateUserRequest> for UpdateUserDto {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            username: r.username,
            password: r.password,
            role_ids: r.role_ids,
        }
    }
}
