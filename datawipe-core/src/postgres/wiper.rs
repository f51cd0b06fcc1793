//! The table wipe.
//!
//! Sequence, all inside one transaction on one connection:
//!
//! 1. suspend FK/trigger enforcement (`SET LOCAL session_replication_role = 'replica'`)
//! 2. enumerate `public` tables
//! 3. `DELETE FROM` every table except the migration-history table
//! 4. restore enforcement (`origin`)
//! 5. reseed the baseline record
//! 6. commit
//!
//! Any failure rolls the transaction back, which also undoes the `SET
//! LOCAL`, so a failed run neither commits a partial wipe nor leaves
//! enforcement off. The connection is closed on every path.

use super::catalog::{
    DEFAULT_MIGRATION_TABLE, TableInventory, list_public_tables, quote_identifier,
};
use super::connection::{ReplicationRole, close, connect, set_replication_role};
use super::seed::{BaselineSeeder, PublicCredentialSeeder, SeedOutcome};
use crate::Result;
use crate::config::PostgresConfig;
use crate::error::WipeError;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info, warn};

/// Progress notifications emitted while a wipe runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeEvent<'a> {
    /// About to delete every row of `table`
    Deleting {
        /// Table name as enumerated
        table: &'a str,
    },
    /// Rows of `table` deleted
    Deleted {
        /// Table name as enumerated
        table: &'a str,
        /// Rows removed
        rows: u64,
    },
    /// `table` is the migration-history table and was left alone
    Preserved {
        /// Table name as enumerated
        table: &'a str,
    },
    /// The baseline record was handled
    Seeded(SeedOutcome),
}

/// Rows removed from one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWipe {
    /// Table name
    pub table: String,
    /// Rows deleted
    pub rows_deleted: u64,
}

/// Summary of a committed wipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WipeReport {
    /// Tables emptied, in the order they were processed
    pub wiped: Vec<TableWipe>,
    /// Tables skipped because they hold migration history
    pub preserved: Vec<String>,
    /// Result of the reseed step
    pub seed: Option<SeedOutcome>,
}

impl WipeReport {
    /// Total rows deleted across all tables.
    pub fn rows_deleted(&self) -> u64 {
        self.wiped
            .iter()
            .fold(0u64, |total, wipe| total.saturating_add(wipe.rows_deleted))
    }
}

/// Clears all application data from the relational store.
pub struct TableWiper<'a> {
    config: &'a PostgresConfig,
    migration_table: String,
    seeder: Box<dyn BaselineSeeder>,
}

impl std::fmt::Debug for TableWiper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableWiper")
            .field("config", self.config)
            .field("migration_table", &self.migration_table)
            .finish_non_exhaustive()
    }
}

impl<'a> TableWiper<'a> {
    /// Creates a wiper that preserves `alembic_version` and reseeds the
    /// public credential.
    pub fn new(config: &'a PostgresConfig) -> Self {
        Self {
            config,
            migration_table: DEFAULT_MIGRATION_TABLE.to_string(),
            seeder: Box::new(PublicCredentialSeeder::default()),
        }
    }

    /// Builder method to set the preserved migration-history table.
    pub fn preserving(mut self, migration_table: impl Into<String>) -> Self {
        self.migration_table = migration_table.into();
        self
    }

    /// Builder method to replace the baseline seeder.
    pub fn with_seeder(mut self, seeder: impl BaselineSeeder + 'static) -> Self {
        self.seeder = Box::new(seeder);
        self
    }

    /// Name of the preserved table.
    pub fn migration_table(&self) -> &str {
        &self.migration_table
    }

    /// Connects, wipes, reseeds, commits and disconnects.
    ///
    /// # Errors
    /// Returns the first connection or statement failure. Nothing is
    /// committed in that case.
    pub async fn wipe(&self) -> Result<WipeReport> {
        self.wipe_with(|_| {}).await
    }

    /// Like [`TableWiper::wipe`], reporting progress to `observer` as each
    /// table is processed.
    ///
    /// # Errors
    /// Same as [`TableWiper::wipe`].
    pub async fn wipe_with<F>(&self, mut observer: F) -> Result<WipeReport>
    where
        F: FnMut(WipeEvent<'_>),
    {
        let mut conn = connect(self.config).await?;
        let outcome = self.wipe_on(&mut conn, &mut observer).await;
        close(conn).await;
        outcome
    }

    /// Runs the wipe on a caller-owned connection and leaves it open.
    ///
    /// On failure the transaction is rolled back before the error is
    /// returned, so the session is back in `origin` mode.
    ///
    /// # Errors
    /// Same as [`TableWiper::wipe`].
    pub async fn wipe_on<F>(&self, conn: &mut PgConnection, observer: &mut F) -> Result<WipeReport>
    where
        F: FnMut(WipeEvent<'_>),
    {
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| WipeError::statement_failed("BEGIN", e))?;

        match self.run(&mut tx, observer).await {
            Ok(report) => {
                tx.commit()
                    .await
                    .map_err(|e| WipeError::statement_failed("COMMIT", e))?;
                info!(
                    tables = report.wiped.len(),
                    rows = report.rows_deleted(),
                    "Wipe committed"
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback after failed wipe did not complete");
                }
                Err(e)
            }
        }
    }

    async fn run<F>(&self, conn: &mut PgConnection, observer: &mut F) -> Result<WipeReport>
    where
        F: FnMut(WipeEvent<'_>),
    {
        set_replication_role(conn, ReplicationRole::Replica).await?;

        let inventory = TableInventory::new(list_public_tables(conn).await?, &self.migration_table);
        debug!(tables = inventory.len(), "Enumerated public tables");

        let mut report = WipeReport::default();
        for (table, preserved) in inventory.entries() {
            if preserved {
                debug!(table, "Preserving migration history");
                observer(WipeEvent::Preserved { table });
                report.preserved.push(table.to_string());
                continue;
            }

            observer(WipeEvent::Deleting { table });
            let rows = delete_all_rows(conn, table).await?;
            observer(WipeEvent::Deleted { table, rows });
            report.wiped.push(TableWipe {
                table: table.to_string(),
                rows_deleted: rows,
            });
        }

        set_replication_role(conn, ReplicationRole::Origin).await?;

        let seed = self.seeder.seed(conn).await?;
        observer(WipeEvent::Seeded(seed));
        report.seed = Some(seed);

        Ok(report)
    }
}

/// Deletes every row of `table`.
async fn delete_all_rows(conn: &mut PgConnection, table: &str) -> Result<u64> {
    let statement = format!("DELETE FROM {}", quote_identifier(table));
    debug!(%statement, "Deleting rows");

    let result = sqlx::query(&statement)
        .execute(&mut *conn)
        .await
        .map_err(|e| WipeError::statement_failed(format!("deleting rows from {}", table), e))?;

    Ok(result.rows_affected())
}
