//! Friend requests, friendships, and recommendations.
//!
//! ## Graph Types
//!
//! - [`FriendRequest`] — Directed edge from sender to recipient
//! - [`Status`] — Pending or accepted
//! - [`Populated`] — A request with both endpoints expanded to [`Summary`](tandem_auth::Summary)
//! - [`Friendship`] — Marker for the symmetric friendships table
//!
//! ## Persistence
//!
//! - [`Graph`] — Store contract; every mutating call is atomic
//! - [`Proposal`] — Outcome of inserting a request
//!
//! ## Engine
//!
//! - [`Relationships`] — Enforces the request and friendship rules
//! - [`SocialError`] — Rule violations and store failures as HTTP errors
mod engine;
mod error;
mod handlers;
mod repository;
mod request;

pub use engine::*;
pub use error::*;
pub use handlers::*;
pub use repository::*;
pub use request::*;
