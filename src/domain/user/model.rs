use chrono::{DateTime, Utc};

use crate::domain::role::Role;

/// User model
///
/// The id is system-assigned on creation and immutable afterwards.
/// `roles` is the full set of role assignments, unordered.
#[derive(Clone, Debug)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
