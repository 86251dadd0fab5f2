//! Identity module — user and role management orchestration

pub mod service;

pub use service::{RoleService, UserService, DEFAULT_ROLE};
