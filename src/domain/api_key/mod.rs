//! API Key domain

mod entity;

pub use entity::{redact_key, ApiKey};
