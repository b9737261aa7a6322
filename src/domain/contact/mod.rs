//! Contact domain

mod entity;

pub use entity::{normalize_email, Contact, ContactRequest, NewContact, NewContactRequest};
