//! Language exchange backend.
//!
//! This facade crate re-exports all public tandem crates for convenient access.
//!
//! ## Crate Organization
//!
//! ### Core Types
//! - [`core`] — Typed identifiers, constants, and shared traits
//!
//! ### Infrastructure
//! - [`database`] — PostgreSQL connection, schema, and store errors
//! - [`memory`] — In-process store for tests and local runs
//! - [`chat`] — Messaging provider integration
//!
//! ### Domain Logic
//! - [`auth`] — Credentials, sessions, and the auth gate
//! - [`social`] — Friend requests, friendships, and recommendations
//!
//! ### Application
//! - [`server`] — HTTP server

pub use tandem_core     as core;
pub use tandem_database as database;
pub use tandem_memory   as memory;
pub use tandem_chat     as chat;
pub use tandem_auth     as auth;
pub use tandem_social   as social;
pub use tandem_server   as server;

// Re-export commonly used types at the root
pub use tandem_core::*;
