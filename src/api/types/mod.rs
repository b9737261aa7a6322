//! API request and response types

mod envelope;
mod json;
mod query;

pub use envelope::Envelope;
pub use json::ValidatedJson;
pub use query::Query;
