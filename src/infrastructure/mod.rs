//! Infrastructure layer - Storage, audit, authorization and runtime plumbing

pub mod audit;
pub mod auth;
pub mod logging;
pub mod observability;
pub mod resume;
pub mod storage;
