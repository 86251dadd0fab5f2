pub mod identity;

pub use identity::{RoleService, UserService};
