//! Resume documents served by the public API

mod store;

pub use store::{ResumeDocument, ResumeFormat, ResumeStore};
