//! Audit logging of requests and their responses

mod logger;

pub use logger::{AuditLogger, OpenRecord};
