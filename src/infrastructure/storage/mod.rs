//! Storage infrastructure - Persistence implementations

mod in_memory;
pub mod migrations;
mod postgres;

pub use in_memory::InMemoryPersistence;
pub use migrations::{run_schema_migrations, Migration, PostgresMigrator};
pub use postgres::{PostgresConfig, PostgresPersistence};
