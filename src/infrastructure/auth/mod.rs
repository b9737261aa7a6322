//! Admin API key authorization

mod authorizer;

pub use authorizer::{AuthorizationError, AuthorizedKey, Authorizer};
