//! HTTP modules — one directory per resource

pub mod admin;
pub mod health;
pub mod request_id;
