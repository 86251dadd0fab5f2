use async_trait::async_trait;

use super::{CreateUserDto, UpdateUserDto, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Persist a new user and return it with its assigned id and roles.
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User>;

    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> DomainResult<Option<User>>;

    /// Full replace of the mutable fields. Returns `None` when the id is unknown.
    async fn update_user(&self, id: i64, dto: UpdateUserDto) -> DomainResult<Option<User>>;

    /// Returns the number of rows removed (0 when the id was absent).
    async fn delete_user(&self, id: i64) -> DomainResult<u64>;
}
