//! Configuration for the wipe utilities.
//!
//! Both structs are built once at process start (the binaries fill them from
//! the environment) and passed by reference into the wipers.
//!
//! - `PostgresConfig`: where the relational store lives and how to log in
//! - `IndexConfig`: the search-index document endpoint and cluster name

mod index;
mod postgres;

pub use index::IndexConfig;
pub use postgres::PostgresConfig;
