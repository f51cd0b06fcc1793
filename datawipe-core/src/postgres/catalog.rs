//! Table enumeration and identifier handling.

use crate::Result;
use crate::error::WipeError;
use sqlx::PgConnection;

/// Table owned by the schema-migration tool. Never wiped.
pub const DEFAULT_MIGRATION_TABLE: &str = "alembic_version";

/// Quotes a table name as a PostgreSQL identifier.
///
/// Identifiers cannot be bound as query parameters, so they are quoted
/// instead: the name is wrapped in double quotes and embedded quotes are
/// doubled. Reserved words and mixed-case names survive unchanged.
///
/// ```rust
/// use datawipe_core::postgres::quote_identifier;
///
/// assert_eq!(quote_identifier("user"), "\"user\"");
/// assert_eq!(quote_identifier("Weird\"Name"), "\"Weird\"\"Name\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Lists every table in the `public` schema.
///
/// # Errors
/// Fails if `pg_tables` cannot be read.
pub async fn list_public_tables(conn: &mut PgConnection) -> Result<Vec<String>> {
    sqlx::query_scalar(
        "SELECT tablename FROM pg_catalog.pg_tables WHERE schemaname = 'public' ORDER BY tablename",
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| WipeError::statement_failed("listing tables in schema public", e))
}

/// Counts the rows of one table.
pub async fn count_rows(conn: &mut PgConnection, table: &str) -> Result<i64> {
    let statement = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
    sqlx::query_scalar(&statement)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| WipeError::statement_failed(format!("counting rows in {}", table), e))
}

/// Tables present at invocation time, split into wipe targets and the one
/// preserved migration-history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInventory {
    tables: Vec<String>,
    preserved: String,
}

impl TableInventory {
    /// Creates an inventory; `preserved` is matched exactly and
    /// case-sensitively.
    pub fn new(tables: Vec<String>, preserved: impl Into<String>) -> Self {
        Self {
            tables,
            preserved: preserved.into(),
        }
    }

    /// Whether `table` is the preserved migration-history table.
    pub fn is_preserved(&self, table: &str) -> bool {
        table == self.preserved
    }

    /// Every table in enumeration order, paired with its preserved flag.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.tables
            .iter()
            .map(|table| (table.as_str(), self.is_preserved(table)))
    }

    /// Tables that will be wiped.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries()
            .filter_map(|(table, preserved)| (!preserved).then_some(table))
    }

    /// Number of tables enumerated.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// True if the schema has no tables at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
