//! SQLite database for the CiviPort backend.

use std::path::Path;

use sqlx::{Pool, Sqlite};
use tracing::info;

use civiport_core::db::{DatabaseError, open_pool, open_pool_in_memory};

#[derive(Clone)]
pub struct PortalDatabase {
    pool: Pool<Sqlite>,
}

impl PortalDatabase {
    /// Open or create the portal database at the given path.
    pub async fn open(path: &Path) -> Result<Self, DatabaseError> {
        let pool = open_pool(path).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        let pool = open_pool_in_memory().await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        info!("Portal database migrations complete");
        Ok(())
    }

    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
