use super::*;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;
use jsonwebtoken::errors::ErrorKind;
use tandem_core::ID;
use tandem_core::SESSION_COOKIE;
use tandem_core::SESSION_DURATION;

/// Why a session token was refused.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
}

/// Issues and verifies session tokens, and wraps them in cookies.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
    secure: bool,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
            secure: false,
        }
    }
    /// Reads `JWT_SECRET`, and `APP_ENV` for the cookie's `Secure` flag.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .expect("JWT_SECRET must be set");
        let production = std::env::var("APP_ENV").is_ok_and(|env| env == "production");
        Self::new(secret.as_bytes()).secure(production)
    }
    /// Sets the `Secure` attribute on issued cookies.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    /// Signs a token for `user` valid for one session from now.
    pub fn issue(&self, user: ID<Member>) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode(&Claims::new(user))
    }
    /// Checks signature, expiry, and subject, returning the token's owner.
    pub fn verify(&self, token: &str) -> Result<ID<Member>, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.user())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })
    }
    /// HTTP-only, same-site-strict cookie carrying `token` for one session.
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .max_age(actix_web::cookie::time::Duration::seconds(
                SESSION_DURATION.as_secs() as i64,
            ))
            .finish()
    }
    /// Cookie instructing the client to drop its session cookie.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }
}
