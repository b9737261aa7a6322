//! Domain layer - Core entities, rules and the persistence port

pub mod api_key;
pub mod audit;
pub mod contact;
pub mod error;
pub mod id;
pub mod persistence;

pub use api_key::ApiKey;
pub use audit::{
    default_exemptions, is_exempt, Histogram, LoggedRequest, LoggedResponse, LoggingExemption,
    RequestStats,
};
pub use contact::{normalize_email, Contact, ContactRequest, NewContact, NewContactRequest};
pub use error::DomainError;
pub use id::new_record_id;
pub use persistence::Persistence;
