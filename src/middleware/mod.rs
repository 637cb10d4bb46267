pub mod auth;
pub mod security;

pub use auth::{require_admin, AuthUser, Identity};
