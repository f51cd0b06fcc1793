//! Command-line surface shared by `wipe-tables` and `wipe-index`.
//!
//! Every setting has a default and an environment variable, so both binaries
//! run with no flags inside the application's deployment environment.

use clap::{Args, Parser};
use datawipe_core::{
    IndexConfig, PostgresConfig, PublicCredentialSeeder, Result, TableWiper, WipeEvent,
    postgres::{DEFAULT_CREDENTIAL_TABLE, DEFAULT_MIGRATION_TABLE},
};
use std::time::Duration;
use url::Url;

/// Printed by `wipe-tables` before it touches the database.
pub const START_BANNER: &str = "Cleaning up all tables";

/// Printed by `wipe-tables` after the wipe has committed.
pub const FINISH_LINES: [&str; 3] = [
    "Finished wiping all rows.",
    "To keep data consistent, it's best to wipe the document index as well.",
    "To be safe, it's best to restart the application services (API server and background tasks).",
];

/// Operator-facing progress line for `event`, if it has one.
///
/// Only tables about to be emptied are announced.
pub fn progress_line(event: &WipeEvent<'_>) -> Option<String> {
    match event {
        WipeEvent::Deleting { table } => Some(format!("Deleting all rows from {}...", table)),
        WipeEvent::Deleted { .. } | WipeEvent::Preserved { .. } | WipeEvent::Seeded(_) => None,
    }
}

/// `wipe-tables` arguments
#[derive(Parser)]
#[command(name = "wipe-tables")]
#[command(about = "Delete all rows from every application table and reseed the public credential")]
#[command(version)]
#[command(long_about = "
Empties every table in the public schema except the migration-history table,
then recreates the public credential. Everything runs in one transaction:
either the whole wipe commits or nothing changes.

Stop the application services before running this, wipe the search index
as well, and restart the services afterwards.

EXAMPLES:
  wipe-tables
  POSTGRES_HOST=db.internal POSTGRES_PASSWORD=... wipe-tables
  wipe-tables --database-url postgres://postgres@localhost:5432/postgres
")]
pub struct WipeTablesCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub postgres: PostgresArgs,

    #[command(flatten)]
    pub tables: TableArgs,
}

/// `wipe-index` arguments
#[derive(Parser)]
#[command(name = "wipe-index")]
#[command(about = "Delete every document from the search index")]
#[command(version)]
pub struct WipeIndexCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub index: IndexArgs,
}

/// Verbosity flags common to both binaries
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Relational database connection settings
#[derive(Args)]
pub struct PostgresArgs {
    /// Database host
    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    /// Database port
    #[arg(long, env = "POSTGRES_PORT", default_value_t = 5432)]
    pub postgres_port: u16,

    /// Database name
    #[arg(long, env = "POSTGRES_DB", default_value = "postgres")]
    pub postgres_db: String,

    /// Login role
    #[arg(long, env = "POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    /// Login password
    #[arg(
        long,
        env = "POSTGRES_PASSWORD",
        default_value = "password",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub postgres_password: String,

    /// Full connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        hide_env_values = true,
        help = "Connection URL; overrides the individual POSTGRES_* settings"
    )]
    pub database_url: Option<String>,
}

impl PostgresArgs {
    /// Builds and validates the connection settings.
    ///
    /// A non-blank `DATABASE_URL` wins over the individual fields.
    ///
    /// # Errors
    /// Returns a configuration error if the URL or a field is invalid.
    pub fn to_config(&self) -> Result<PostgresConfig> {
        if let Some(url) = self
            .database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        {
            return PostgresConfig::from_url(url);
        }

        let config = PostgresConfig::new(self.postgres_host.clone())
            .with_port(self.postgres_port)
            .with_database(self.postgres_db.clone())
            .with_username(self.postgres_user.clone())
            .with_password(self.postgres_password.clone());
        config.validate()?;
        Ok(config)
    }
}

/// Which tables the wipe preserves and reseeds
#[derive(Debug, Args)]
pub struct TableArgs {
    /// Migration-history table left untouched
    #[arg(long, env = "WIPE_MIGRATION_TABLE", default_value = DEFAULT_MIGRATION_TABLE)]
    pub migration_table: String,

    /// Table that receives the public credential after the wipe
    #[arg(long, env = "WIPE_CREDENTIAL_TABLE", default_value = DEFAULT_CREDENTIAL_TABLE)]
    pub credential_table: String,
}

impl TableArgs {
    /// Builds a wiper for `config` using these table names.
    pub fn wiper<'a>(&self, config: &'a PostgresConfig) -> TableWiper<'a> {
        TableWiper::new(config)
            .preserving(self.migration_table.clone())
            .with_seeder(PublicCredentialSeeder::new(self.credential_table.clone()))
    }
}

/// Search-index settings
#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Index host
    #[arg(long, env = "VESPA_HOST", default_value = "localhost")]
    pub vespa_host: String,

    /// Index document API port
    #[arg(long, env = "VESPA_PORT", default_value_t = 8081)]
    pub vespa_port: u16,

    /// Index (cluster) name
    #[arg(long, env = "DOCUMENT_INDEX_NAME", default_value = IndexConfig::DEFAULT_INDEX_NAME)]
    pub index_name: String,

    /// Full document endpoint
    #[arg(
        long,
        env = "INDEX_DOCUMENT_ENDPOINT",
        help = "Document endpoint URL; overrides VESPA_HOST/VESPA_PORT"
    )]
    pub document_endpoint: Option<Url>,

    /// Request timeout in seconds
    #[arg(long, env = "INDEX_REQUEST_TIMEOUT_SECS", default_value_t = 60)]
    pub request_timeout_secs: u64,
}

impl IndexArgs {
    /// Builds and validates the index settings.
    ///
    /// # Errors
    /// Returns a configuration error if the endpoint, index name or timeout
    /// is invalid.
    pub fn to_config(&self) -> Result<IndexConfig> {
        let config = match &self.document_endpoint {
            Some(endpoint) => IndexConfig::new(endpoint.clone(), self.index_name.clone()),
            None => IndexConfig::for_host(&self.vespa_host, self.vespa_port, &self.index_name)?,
        }
        .with_request_timeout(Duration::from_secs(self.request_timeout_secs));

        config.validate()?;
        Ok(config)
    }
}
