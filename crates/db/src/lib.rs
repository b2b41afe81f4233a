//! Database layer for Innkeep.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - [`PgStore`], the Postgres implementation of the core store contract

pub mod entities;
pub mod migration;
mod store;

pub use store::{PgStore, PgTx, store_error};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

/// Establishes a connection pool to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .sqlx_logging(false);
    let db = Database::connect(options).await?;
    info!(max_connections, "database pool ready");
    Ok(db)
}
