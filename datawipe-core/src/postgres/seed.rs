//! Baseline records restored after a wipe.
//!
//! The application expects one public credential (id 0, empty JSON, no
//! owner) so that connectors without extra authentication have something
//! to attach to. Seeding sits behind [`BaselineSeeder`] so the wiper never
//! builds application rows itself.

use super::catalog::quote_identifier;
use crate::Result;
use crate::error::WipeError;
use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::{debug, info};

/// Identifier of the public credential row.
pub const PUBLIC_CREDENTIAL_ID: i32 = 0;

/// Default table holding credentials.
pub const DEFAULT_CREDENTIAL_TABLE: &str = "credential";

/// What a seeding call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The baseline record was inserted
    Created,
    /// A valid baseline record already existed
    AlreadyPresent,
    /// Seeding is disabled
    Skipped,
}

/// Restores the minimal state the application needs after a wipe.
///
/// Implementations run on the caller's connection, inside the wipe
/// transaction, and must be idempotent: seeding twice leaves one record.
#[async_trait]
pub trait BaselineSeeder: Send + Sync {
    /// Ensures the baseline record exists.
    ///
    /// # Errors
    /// Returns an error if the record cannot be read or written, or exists
    /// in a shape the application would reject.
    async fn seed(&self, conn: &mut PgConnection) -> Result<SeedOutcome>;
}

/// Seeds the empty public credential.
#[derive(Debug, Clone)]
pub struct PublicCredentialSeeder {
    table: String,
}

impl Default for PublicCredentialSeeder {
    fn default() -> Self {
        Self::new(DEFAULT_CREDENTIAL_TABLE)
    }
}

impl PublicCredentialSeeder {
    /// Creates a seeder writing to `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Table the credential is written to.
    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl BaselineSeeder for PublicCredentialSeeder {
    async fn seed(&self, conn: &mut PgConnection) -> Result<SeedOutcome> {
        let table = quote_identifier(&self.table);

        let select = format!(
            "SELECT (credential_json::jsonb = '{{}}'::jsonb) AND public_doc AND user_id IS NULL \
             FROM {} WHERE id = $1",
            table
        );
        let existing: Option<Option<bool>> = sqlx::query_scalar(&select)
            .bind(PUBLIC_CREDENTIAL_ID)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                WipeError::statement_failed(format!("reading public credential from {}", table), e)
            })?;

        match existing {
            Some(Some(true)) => {
                debug!(table = %self.table, "Public credential already present");
                Ok(SeedOutcome::AlreadyPresent)
            }
            Some(_) => Err(WipeError::invalid_baseline(
                "DB is not in a valid initial state. There must exist an empty public \
                 credential for data connectors that do not require additional Auth.",
            )),
            None => {
                let insert = format!(
                    "INSERT INTO {} (id, credential_json, user_id, public_doc) \
                     VALUES ($1, '{{}}', NULL, true)",
                    table
                );
                sqlx::query(&insert)
                    .bind(PUBLIC_CREDENTIAL_ID)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| {
                        WipeError::statement_failed(
                            format!("inserting public credential into {}", table),
                            e,
                        )
                    })?;
                info!(table = %self.table, "Created public credential");
                Ok(SeedOutcome::Created)
            }
        }
    }
}

/// Seeder that leaves the database empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSeeder;

#[async_trait]
impl BaselineSeeder for NoopSeeder {
    async fn seed(&self, _conn: &mut PgConnection) -> Result<SeedOutcome> {
        Ok(SeedOutcome::Skipped)
    }
}
