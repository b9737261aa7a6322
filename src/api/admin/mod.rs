//! Admin endpoints, guarded by `X-API-Key`

mod contacts;
mod stats;

pub use contacts::{list_contact_requests, list_contacts};
pub use stats::get_stats;
