use std::time::Duration;

use sqlx::{PgPool, migrate::Migrator, postgres::PgPoolOptions};

use crate::model::error::DatabaseResult;

static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres pool, clones share the same connections.
#[derive(Debug, Clone)]
pub struct DbConnection {
    pool: PgPool,
}

impl DbConnection {
    /// Opens lazily, so a server can start before the database answers.
    pub fn connect(connection_str: &str) -> DatabaseResult<Self> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect_lazy(connection_str)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[tracing::instrument(skip_all)]
    pub async fn migrate(&self) -> DatabaseResult<()> {
        MIGRATOR.run(&self.pool).await?;
        tracing::info!(known = MIGRATOR.iter().count(), "schema up to date");
        Ok(())
    }
}
