//! Single-connection session management.
//!
//! The wipe runs on exactly one connection, never a pool. Enforcement of
//! foreign keys and triggers is toggled with `SET LOCAL`, so whatever the
//! transaction does, its end (commit or rollback) puts the session back to
//! `origin`.

use crate::Result;
use crate::config::PostgresConfig;
use crate::error::WipeError;
use sqlx::{Connection, Executor, PgConnection};
use tracing::{debug, info, warn};

/// Value of `session_replication_role` for the current transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplicationRole {
    /// Foreign-key and ordinary triggers do not fire
    Replica,
    /// Normal enforcement
    Origin,
}

impl ReplicationRole {
    /// The setting value as PostgreSQL spells it.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Replica => "replica",
            Self::Origin => "origin",
        }
    }

    fn set_local_statement(self) -> &'static str {
        match self {
            Self::Replica => "SET LOCAL session_replication_role = 'replica'",
            Self::Origin => "SET LOCAL session_replication_role = 'origin'",
        }
    }
}

/// Opens one connection to the configured database.
///
/// # Errors
/// Returns a configuration error if `config` is invalid, or a connection
/// error (host and database only, no credentials) if the server cannot be
/// reached or rejects the login.
pub async fn connect(config: &PostgresConfig) -> Result<PgConnection> {
    config.validate()?;
    info!(target_db = %config, "Connecting to database");

    PgConnection::connect_with(&config.connect_options())
        .await
        .map_err(|e| WipeError::connection_failed(format!("Failed to connect to {}", config), e))
}

/// Closes a connection, logging instead of failing if the goodbye is lost.
pub async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Database connection did not close cleanly");
    }
}

/// Sets `session_replication_role` for the rest of the current transaction.
///
/// Must run inside a transaction; outside one `SET LOCAL` has no effect.
///
/// # Errors
/// Fails with [`WipeError::InsufficientPrivileges`] if the role may not
/// change the setting.
pub async fn set_replication_role(conn: &mut PgConnection, role: ReplicationRole) -> Result<()> {
    debug!(role = role.as_str(), "Setting session_replication_role");
    conn.execute(role.set_local_statement())
        .await
        .map_err(|e| {
            WipeError::statement_failed(
                format!("setting session_replication_role to {}", role.as_str()),
                e,
            )
        })?;
    Ok(())
}

/// Reads the effective `session_replication_role`.
pub async fn current_replication_role(conn: &mut PgConnection) -> Result<String> {
    sqlx::query_scalar("SELECT current_setting('session_replication_role')")
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| WipeError::statement_failed("reading session_replication_role", e))
}
