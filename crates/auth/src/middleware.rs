use super::*;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;
use tandem_core::SESSION_COOKIE;
use tandem_database::bounded;

/// Extractor for authenticated requests.
/// Verifies the session cookie and loads the member it names.
pub struct Auth(pub Member);

impl Auth {
    pub fn member(&self) -> &Member {
        &self.0
    }
    pub fn into_inner(self) -> Member {
        self.0
    }
}

impl FromRequest for Auth {
    type Error = AuthError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let crypto = req.app_data::<web::Data<Crypto>>().cloned();
        let accounts = req.app_data::<web::Data<dyn Accounts>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned());
        Box::pin(async move {
            let crypto = crypto
                .ok_or_else(|| AuthError::Internal("token service not configured".into()))?;
            let accounts = accounts
                .ok_or_else(|| AuthError::Internal("account store not configured".into()))?;
            authenticate(accounts.get_ref(), &crypto, token.as_deref())
                .await
                .map(Auth)
        })
    }
}

/// Resolves a session token into the member it belongs to.
///
/// A missing, expired, forged, or orphaned token all fail the same way;
/// only the debug log tells them apart.
pub async fn authenticate(
    accounts: &dyn Accounts,
    crypto: &Crypto,
    token: Option<&str>,
) -> Result<Member, AuthError> {
    let token = token.ok_or_else(|| {
        log::debug!("rejected request without session cookie");
        AuthError::Unauthorized
    })?;
    let user = crypto.verify(token).map_err(|e| {
        log::debug!("rejected session token: {}", e);
        AuthError::Unauthorized
    })?;
    bounded(accounts.find(user)).await?.ok_or_else(|| {
        log::debug!("rejected session token for missing user {}", user);
        AuthError::Unauthorized
    })
}
