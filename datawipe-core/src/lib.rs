//! Core of the datawipe maintenance utilities.
//!
//! Two independent operations, each run by an operator while the
//! application is stopped:
//!
//! - [`IndexWiper`] deletes every document from one search-index cluster.
//! - [`TableWiper`] empties every table in the `public` schema except the
//!   migration-history table and reseeds the baseline credential, all in a
//!   single transaction.
//!
//! Neither coordinates with the other. Wiping only one side leaves the index
//! and the database out of sync.
//!
//! # Security Guarantees
//! - Database passwords are held in zeroizing buffers
//! - Passwords never appear in `Debug`/`Display` output, logs or errors
//! - Table identifiers are always quoted, never interpolated raw

pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod postgres;

// Re-export commonly used types
pub use config::{IndexConfig, PostgresConfig};
pub use error::{Result, WipeError};
pub use index::IndexWiper;
pub use logging::init_logging;
pub use postgres::{
    BaselineSeeder, PublicCredentialSeeder, SeedOutcome, TableWiper, WipeEvent, WipeReport,
};
