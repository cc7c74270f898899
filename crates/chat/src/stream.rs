use super::*;
use anyhow::Context;
use serde::Serialize;
use std::collections::HashMap;

const STREAM_URL: &str = "https://chat.stream-io-api.com";
const STREAM_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Hosted chat provider speaking Stream's REST API.
pub struct Stream {
    key: String,
    base: String,
    encoding: jsonwebtoken::EncodingKey,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct UserClaims<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Serialize)]
struct Upsert<'a> {
    users: HashMap<&'a str, &'a ChatUser>,
}

impl Stream {
    pub fn new(key: String, secret: String) -> Self {
        Self {
            key,
            base: STREAM_URL.to_string(),
            encoding: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
            http: reqwest::Client::builder()
                .timeout(STREAM_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
    /// Points the client at another API host.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = base.into();
        self
    }
    fn sign<C: Serialize>(&self, claims: &C) -> anyhow::Result<String> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
            .context("sign stream token")
    }
}

#[async_trait::async_trait]
impl Messenger for Stream {
    async fn upsert(&self, user: &ChatUser) -> anyhow::Result<()> {
        let body = Upsert {
            users: HashMap::from([(user.id.as_str(), user)]),
        };
        self.http
            .post(format!("{}/users?api_key={}", self.base, self.key))
            .header("Authorization", self.sign(&ServerClaims { server: true })?)
            .header("stream-auth-type", "jwt")
            .json(&body)
            .send()
            .await
            .context("reach stream")?
            .error_for_status()
            .context("stream rejected upsert")?;
        Ok(())
    }
    fn token(&self, user: &str) -> anyhow::Result<String> {
        self.sign(&UserClaims { user_id: user })
    }
}
