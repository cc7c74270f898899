//! Messaging and video provider integration.
//!
//! Real-time delivery and video transport belong to an external provider.
//! This crate only keeps the provider's user directory in step with ours
//! and mints the tokens clients present to it.
//!
//! - [`Messenger`] — What the rest of the system needs from a provider
//! - [`Stream`] — The hosted provider, over its REST API
//! - [`Offline`] — Stand-in used when no credentials are configured
//! - [`sync()`] — Best-effort profile upsert that never fails its caller
mod messenger;
mod offline;
mod stream;

pub use messenger::*;
pub use offline::*;
pub use stream::*;

use std::sync::Arc;

/// Builds the provider from `STREAM_API_KEY` and `STREAM_API_SECRET`.
///
/// Missing credentials do not stop the server: chat is disabled and an
/// error is logged, so identity and relationship flows keep working.
pub fn from_env() -> Arc<dyn Messenger> {
    let key = std::env::var("STREAM_API_KEY").unwrap_or_default();
    let secret = std::env::var("STREAM_API_SECRET").unwrap_or_default();
    if key.is_empty() || secret.is_empty() {
        log::error!("stream api key or secret missing, chat disabled");
        Arc::new(Offline)
    } else {
        Arc::new(Stream::new(key, secret))
    }
}

/// Pushes a profile to the provider, logging and swallowing any failure.
///
/// A disabled provider was already reported at start-up, so its
/// failures only reach the debug log.
pub async fn sync(messenger: &dyn Messenger, user: &ChatUser) {
    match messenger.upsert(user).await {
        Ok(()) => log::info!("chat user upserted: {}", user.id),
        Err(e) if !messenger.enabled() => log::debug!("chat user {} not synced: {:#}", user.id, e),
        Err(e) => log::error!("chat user upsert failed for {}: {:#}", user.id, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sync_swallows_provider_failures() {
        let user = ChatUser::new("u1", "Ada", "https://example.com/a.png");
        sync(&Offline, &user).await;
    }

    #[test]
    fn only_the_stand_in_is_disabled() {
        assert!(!Offline.enabled());
        assert!(Stream::new("key".into(), "secret".into()).enabled());
    }
}
