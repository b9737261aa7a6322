//! Persistence port

mod repository;

#[cfg(test)]
pub use repository::MockPersistence;
pub use repository::Persistence;
