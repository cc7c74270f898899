use actix_web::HttpResponse;
use actix_web::web;
use tandem_auth::Accounts;
use tandem_auth::Auth;
use tandem_chat::Messenger;
use tandem_core::Unique;
use tandem_database::bounded;

pub async fn health(accounts: web::Data<dyn Accounts>) -> HttpResponse {
    match bounded(accounts.ping()).await {
        Ok(()) => HttpResponse::Ok().body("ok"),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().body("store unavailable")
        }
    }
}

/// Token the client presents to the messaging provider.
pub async fn chat_token(auth: Auth, chat: web::Data<dyn Messenger>) -> HttpResponse {
    let user = auth.member().id().to_string();
    match chat.token(&user) {
        Ok(token) => HttpResponse::Ok().json(serde_json::json!({ "token": token })),
        Err(e) => {
            log::error!("chat token for {} failed: {:#}", user, e);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "message": "Internal server error" }))
        }
    }
}
