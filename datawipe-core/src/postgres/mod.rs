//! PostgreSQL table wipe.
//!
//! # Module Structure
//! - `connection`: single-connection session handling and the
//!   `session_replication_role` toggle
//! - `catalog`: table enumeration, identifier quoting, the table inventory
//! - `seed`: baseline records restored after the wipe
//! - `wiper`: the `TableWiper` sequence itself

mod catalog;
mod connection;
mod seed;
mod wiper;


pub use catalog::{
    DEFAULT_MIGRATION_TABLE, TableInventory, count_rows, list_public_tables, quote_identifier,
};
pub use connection::{
    ReplicationRole, close, connect, current_replication_role, set_replication_role,
};
pub use seed::{
    BaselineSeeder, DEFAULT_CREDENTIAL_TABLE, NoopSeeder, PUBLIC_CREDENTIAL_ID,
    PublicCredentialSeeder, SeedOutcome,
};
pub use wiper::{TableWipe, TableWiper, WipeEvent, WipeReport};
