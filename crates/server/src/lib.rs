//! HTTP server for tandem.
//!
//! Wires the credential store, session tokens, the relationship engine,
//! and the messaging provider into a single actix-web application.
//!
//! - [`Context`] — Shared state every worker clones into its app
//! - [`run()`] — Reads configuration, prepares storage, and serves
mod context;
mod handlers;

pub use context::*;
pub use handlers::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::http::header;
use actix_web::middleware::Logger;
use std::sync::Arc;

/// Picks the store from `DB_URL`: PostgreSQL when set, memory otherwise.
async fn context() -> Result<Context, std::io::Error> {
    let crypto = tandem_auth::Crypto::from_env();
    let chat = tandem_chat::from_env();
    match std::env::var("DB_URL") {
        Ok(_) => {
            let client = tandem_database::db().await;
            migrate(&client).await.map_err(std::io::Error::other)?;
            Ok(Context::new(client, crypto, chat))
        }
        Err(_) => {
            log::warn!("DB_URL not set, using volatile in-memory store");
            Ok(Context::new(Arc::new(tandem_memory::Memory::new()), crypto, chat))
        }
    }
}

/// Creates every table in foreign-key order.
async fn migrate(client: &tokio_postgres::Client) -> Result<(), tandem_database::PgErr> {
    tandem_database::prepare::<tandem_auth::Member>(client).await?;
    tandem_database::prepare::<tandem_social::FriendRequest>(client).await?;
    tandem_database::prepare::<tandem_social::Friendship>(client).await
}

/// Browser access with cookies, from `CORS_ORIGIN` or any origin.
fn cors() -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600);
    match std::env::var("CORS_ORIGIN") {
        Ok(origin) => cors.allowed_origin(&origin),
        Err(_) => cors.allow_any_origin(),
    }
}

#[rustfmt::skip]
pub async fn run() -> Result<(), std::io::Error> {
    let context = context().await?;
    log::info!("starting server");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(cors())
            .configure(|cfg| context.install(cfg))
    })
    .workers(6)
    .bind(std::env::var("BIND_ADDR").expect("BIND_ADDR must be set"))?
    .run()
    .await
}
