//! Credential store, session tokens, and the auth gate.
//!
//! JWT-based sessions carried in an HTTP-only cookie, with Argon2 password
//! hashing. Every protected route passes through the [`Auth`] extractor,
//! which is the only place a token becomes an identity.
//!
//! ## Identity Types
//!
//! - [`Member`] — Registered user with profile and friend references
//! - [`Profile`] — The user-editable part of a member
//! - [`Summary`] — Public view of a member shown to other users
//!
//! ## Credentials
//!
//! - [`Accounts`] — Persistence contract for user records
//! - [`credentials`] — Account creation, verification, and onboarding
//! - [`password`] — Argon2 hashing and verification
//!
//! ## Sessions
//!
//! - [`Crypto`] — JWT signing, verification, and the session cookie
//! - [`Claims`] — JWT payload structure
//! - [`Auth`] — Request extractor resolving the cookie to a [`Member`]
pub mod credentials;
pub mod password;

mod claims;
mod crypto;
mod dto;
mod error;
mod handlers;
mod member;
mod middleware;
mod repository;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use handlers::*;
pub use member::*;
pub use middleware::*;
pub use repository::*;
