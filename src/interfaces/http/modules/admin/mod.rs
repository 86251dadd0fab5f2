//! Admin module — user management (CRUD over users and role assignments)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
