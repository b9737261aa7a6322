//! API middleware components

pub mod admin_auth;
pub mod audit;

pub use admin_auth::{require_admin, RequireAdmin, API_KEY_HEADER};
pub use audit::{audit_middleware, client_ip};
