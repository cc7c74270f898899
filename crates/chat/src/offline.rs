use super::*;

/// Provider used when credentials are missing. Every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct Offline;

#[async_trait::async_trait]
impl Messenger for Offline {
    async fn upsert(&self, user: &ChatUser) -> anyhow::Result<()> {
        anyhow::bail!("chat provider not configured, cannot upsert {}", user.id)
    }
    fn token(&self, user: &str) -> anyhow::Result<String> {
        anyhow::bail!("chat provider not configured, cannot mint token for {}", user)
    }
    fn enabled(&self) -> bool {
        false
    }
}
