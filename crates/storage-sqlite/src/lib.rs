//! SQLite storage implementation for the strandfolio projection.
//!
//! This crate is the only place where Diesel dependencies exist. It
//! provides:
//! - Connection pooling, pragmas and embedded migrations
//! - The single-writer actor that gives each strand batch its transaction
//! - Database row models for the projection tables
//! - The `PortfolioRepositoryTrait` implementation
//! - The listener facade the delivery mechanism pushes batches into

pub mod db;
pub mod errors;
pub mod listener;
pub mod projection;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool,
    WriteHandle,
};
pub use db::write_actor::spawn_writer;

pub use errors::{IntoCore, StorageError};
pub use listener::{ProjectionListener, StrandReceiverTrait};
pub use projection::PortfolioRepository;

// Re-export from strandfolio-core for convenience
pub use strandfolio_core::errors::{DatabaseError, Error, Result};
