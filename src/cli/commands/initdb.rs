use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use model::entities::prelude::PovertyCount;
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::{debug, error, info, trace};

/// Connects to the database and applies pending migrations.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            debug!("Database connection established");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    info!("Running database migrations");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }
    debug!("All pending migrations have been applied");

    Ok(db)
}

pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");
    debug!("Database URL: {}", database_url);

    let db = connect_and_migrate(database_url).await?;
    let rows = PovertyCount::find().count(&db).await?;

    info!("Database initialization completed successfully, {} rows present", rows);
    Ok(())
}
