//! Role aggregate
//!
//! Reference data: a catalog of named roles users can be assigned to.

pub mod model;
pub mod repository;

pub use model::Role;
pub use repository::RoleRepositoryInterface;
