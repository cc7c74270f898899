use serde::Serialize;

/// A user record as the messaging provider sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatUser {
    pub id: String,
    pub name: String,
    pub image: String,
}

impl ChatUser {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
        }
    }
}

/// External messaging/video provider.
///
/// Constructed once at start-up and injected; nothing in the core depends
/// on construction or calls succeeding.
#[async_trait::async_trait]
pub trait Messenger: Send + Sync {
    /// Creates or updates the provider's copy of a user profile.
    async fn upsert(&self, user: &ChatUser) -> anyhow::Result<()>;
    /// Mints the token a verified user presents to the provider.
    fn token(&self, user: &str) -> anyhow::Result<String>;
    /// False for stand-ins whose failures are expected.
    fn enabled(&self) -> bool {
        true
    }
}
