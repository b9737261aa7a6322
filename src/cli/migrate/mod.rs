//! Migrate command - applies the database schema and exits

use tracing::info;

use crate::infrastructure::storage::{run_schema_migrations, PostgresPersistence};

pub async fn run() -> anyhow::Result<()> {
    let config = super::init("migrate")?;

    let persistence = PostgresPersistence::connect(&config.postgres()).await?;
    run_schema_migrations(persistence.pool()).await?;

    info!("Migrations complete");
    Ok(())
}
