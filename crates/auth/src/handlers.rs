use super::*;
use actix_web::HttpResponse;
use actix_web::web;
use tandem_chat::Messenger;
use tandem_core::Unique;

pub async fn signup(
    accounts: web::Data<dyn Accounts>,
    crypto: web::Data<Crypto>,
    chat: web::Data<dyn Messenger>,
    req: web::Json<SignupRequest>,
) -> Result<HttpResponse, AuthError> {
    let signup = req.into_inner().validate()?;
    let member = credentials::create(accounts.get_ref(), signup).await?;
    log::info!("registered user {}", member.id());
    tandem_chat::sync(chat.get_ref(), &member.chat_user()).await;
    let token = crypto.issue(member.id())?;
    Ok(HttpResponse::Created()
        .cookie(crypto.cookie(token))
        .json(AuthResponse::from(member)))
}

pub async fn login(
    accounts: web::Data<dyn Accounts>,
    crypto: web::Data<Crypto>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let (email, password) = req.into_inner().validate()?;
    let member = credentials::verify(accounts.get_ref(), &email, &password).await?;
    log::info!("user {} logged in", member.id());
    let token = crypto.issue(member.id())?;
    Ok(HttpResponse::Ok()
        .cookie(crypto.cookie(token))
        .json(AuthResponse::from(member)))
}

/// Sessions are stateless; logging out only tells the client to drop the cookie.
pub async fn logout(crypto: web::Data<Crypto>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(crypto.removal())
        .json(serde_json::json!({ "message": "Logged out successfully" }))
}

pub async fn me(auth: Auth) -> HttpResponse {
    HttpResponse::Ok().json(AuthResponse::from(auth.into_inner()))
}

pub async fn onboarding(
    auth: Auth,
    accounts: web::Data<dyn Accounts>,
    chat: web::Data<dyn Messenger>,
    req: web::Json<OnboardRequest>,
) -> Result<HttpResponse, AuthError> {
    let form = req.into_inner().validate()?;
    let member = credentials::onboard(accounts.get_ref(), auth.member().id(), &form).await?;
    log::info!("user {} onboarded", member.id());
    tandem_chat::sync(chat.get_ref(), &member.chat_user()).await;
    Ok(HttpResponse::Ok().json(AuthResponse::from(member)))
}
