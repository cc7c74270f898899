//! Tandem Backend Binary
//!
//! Serves accounts, sessions, and the friend graph over HTTP.
//! Runs on BIND_ADDR (e.g. 0.0.0.0:3000).

#[tokio::main]
async fn main() {
    tandem_core::log();
    tandem_core::kys();
    tandem_server::run().await.expect("server failed");
}
