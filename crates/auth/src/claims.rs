use super::*;
use tandem_core::ID;
use tandem_core::SESSION_DURATION;

/// Session token payload: who, and until when.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user: ID<Member>) -> Self {
        Self::issued(user, std::time::SystemTime::now())
    }
    /// Claims for a token issued at `at`, expiring one session later.
    pub fn issued(user: ID<Member>, at: std::time::SystemTime) -> Self {
        let iat = tandem_core::unix(at) as i64;
        Self {
            sub: user.inner(),
            iat,
            exp: iat + SESSION_DURATION.as_secs() as i64,
        }
    }
    pub fn user(&self) -> ID<Member> {
        ID::from(self.sub)
    }
}
