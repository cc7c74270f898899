//! PostgreSQL integration for accounts and the friend graph.
//!
//! ## Connectivity
//!
//! - [`db()`] — Opens the shared client named by `DB_URL`
//! - [`prepare()`] — Creates a table and its indices from a [`Schema`]
//!
//! ## Failure Handling
//!
//! - [`StoreError`] — The one error every store implementation reports
//! - [`bounded()`] — Caps a store call at [`STORE_TIMEOUT`]
//!
//! ## Table Names
//!
//! Constants for all persistent entities: users, friend requests, and
//! friendships.
mod error;
mod schema;

pub use error::*;
pub use schema::*;

use std::sync::Arc;
use tandem_core::STORE_TIMEOUT;
use tokio_postgres::Client;

/// Opens the client every store call shares. The connection task is
/// spawned onto the runtime and logs when it dies.
///
/// # Panics
///
/// Panics if `DB_URL` is unset or the server refuses the connection.
pub async fn db() -> Arc<Client> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let ref url = std::env::var("DB_URL").expect("DB_URL must be set");
    let (client, connection) = tokio_postgres::connect(url, tls)
        .await
        .expect("database connection failed");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client
        .execute("SET client_min_messages TO WARNING", &[])
        .await
        .expect("set client_min_messages");
    Arc::new(client)
}

/// Creates the table described by `T` along with its indices.
pub async fn prepare<T: Schema>(client: &Client) -> Result<(), PgErr> {
    log::info!("preparing table ({})", T::name());
    client.batch_execute(T::creates()).await?;
    client.batch_execute(T::indices()).await
}

/// Runs a store call under [`STORE_TIMEOUT`].
///
/// A call still pending at the deadline is dropped and reported as
/// [`StoreError::Timeout`].
pub async fn bounded<T, F>(call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::time::timeout(STORE_TIMEOUT, call)
        .await
        .unwrap_or(Err(StoreError::Timeout(STORE_TIMEOUT)))
}

/// Driver error as reported by tokio-postgres.
pub type PgErr = tokio_postgres::Error;

/// Table for registered user accounts and their profiles.
#[rustfmt::skip]
pub const USERS:           &str = "users";
/// Table for directed friend request edges.
#[rustfmt::skip]
pub const FRIEND_REQUESTS: &str = "friend_requests";
/// Table for accepted friendships, one row per direction.
#[rustfmt::skip]
pub const FRIENDSHIPS:     &str = "friendships";
