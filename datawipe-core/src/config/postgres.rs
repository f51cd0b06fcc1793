//! PostgreSQL connection configuration.

use crate::error::{WipeError, redact_database_url};
use percent_encoding::percent_decode_str;
use sqlx::postgres::PgConnectOptions;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

/// PostgreSQL default port.
pub(crate) const DEFAULT_PORT: u16 = 5432;

/// Longest identifier PostgreSQL accepts without truncation.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Connection settings for the relational store.
///
/// The password lives in a `Zeroizing` buffer and is left out of both the
/// `Debug` and `Display` output.
///
/// # Example
/// ```rust
/// use datawipe_core::config::PostgresConfig;
///
/// let config = PostgresConfig::new("db.internal".to_string())
///     .with_port(5433)
///     .with_database("danswer".to_string())
///     .with_username("admin".to_string())
///     .with_password("hunter2".to_string());
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.to_string(), "db.internal:5433/danswer");
/// ```
#[derive(Clone)]
pub struct PostgresConfig {
    /// Database host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Database name
    pub database: String,
    /// Login role
    pub username: String,
    /// Login password, zeroed on drop
    pub password: Zeroizing<String>,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: "postgres".to_string(),
            username: "postgres".to_string(),
            password: Zeroizing::new("password".to_string()),
        }
    }
}

impl std::fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

impl std::fmt::Display for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Intentionally omit username and never include credentials
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

impl PostgresConfig {
    /// Creates a new config for `host` with default port, database and login.
    pub fn new(host: String) -> Self {
        Self {
            host,
            ..Default::default()
        }
    }

    /// Builder method to set port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set database.
    pub fn with_database(mut self, database: String) -> Self {
        self.database = database;
        self
    }

    /// Builder method to set username.
    pub fn with_username(mut self, username: String) -> Self {
        self.username = username;
        self
    }

    /// Builder method to set password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Zeroizing::new(password);
        self
    }

    /// Validates connection configuration parameters.
    ///
    /// # Errors
    /// Returns error if a required value is empty or out of range.
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.is_empty() {
            return Err(WipeError::configuration("host cannot be empty"));
        }

        if self.port == 0 {
            return Err(WipeError::configuration("port must be greater than 0"));
        }

        if self.database.is_empty() {
            return Err(WipeError::configuration("database name cannot be empty"));
        }

        if self.database.len() > MAX_IDENTIFIER_LEN {
            return Err(WipeError::configuration(
                "Database name too long: maximum 63 characters",
            ));
        }

        if self.username.is_empty() {
            return Err(WipeError::configuration("username cannot be empty"));
        }

        if self.username.len() > MAX_IDENTIFIER_LEN {
            return Err(WipeError::configuration(
                "Username too long: maximum 63 characters",
            ));
        }

        Ok(())
    }

    /// Parses a `postgres://` connection URL.
    ///
    /// Missing parts fall back to the defaults (port 5432, database and
    /// user `postgres`, empty password). Percent-encoded user names and
    /// passwords are decoded.
    ///
    /// # Errors
    /// Returns a configuration error if the URL is malformed, uses another
    /// scheme, has no host, or fails [`PostgresConfig::validate`]. A URL
    /// echoed in the message has its password masked.
    pub fn from_url(connection_string: &str) -> crate::Result<Self> {
        let url = Url::parse(connection_string).map_err(|e| {
            WipeError::configuration(format!(
                "Invalid PostgreSQL connection string format: {}",
                e
            ))
        })?;

        if !matches!(url.scheme(), "postgres" | "postgresql") {
            return Err(WipeError::configuration(format!(
                "Connection string must use postgres:// or postgresql:// scheme, got {}",
                redact_database_url(connection_string)
            )));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => {
                return Err(WipeError::configuration(format!(
                    "Connection string must specify a host: {}",
                    redact_database_url(connection_string)
                )));
            }
        };
        debug!(url = %redact_database_url(connection_string), "Parsed connection URL");

        let mut config = Self::new(host)
            .with_port(url.port().unwrap_or(DEFAULT_PORT))
            .with_password(String::new());

        let database = url.path().trim_start_matches('/');
        if !database.is_empty() {
            config = config.with_database(decode_component(database)?);
        }

        if !url.username().is_empty() {
            config = config.with_username(decode_component(url.username())?);
        }

        if let Some(password) = url.password() {
            config.password = Zeroizing::new(decode_component(password)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Builds driver connect options for this configuration.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.username)
            .password(&self.password)
            .application_name(concat!("datawipe-", env!("CARGO_PKG_VERSION")))
    }
}

/// Decodes `%XX` escapes in a URL component.
///
/// Every `%` must introduce exactly two hex digits; `percent_decode_str`
/// alone would pass a malformed escape through literally.
fn decode_component(raw: &str) -> crate::Result<String> {
    let invalid = || WipeError::configuration("Connection string contains an invalid % escape");

    let well_formed = raw.split('%').skip(1).all(|rest| {
        rest.as_bytes()
            .get(..2)
            .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit))
    });
    if !well_formed {
        return Err(invalid());
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| invalid())
}
