//! Public endpoints, audited but not authorized

mod contacts;
mod health;
mod resume;
mod version;

pub use contacts::{submit_contact, ContactForm};
pub use health::health_check;
pub use resume::{get_resume, ResumeQuery};
pub use version::get_version;
