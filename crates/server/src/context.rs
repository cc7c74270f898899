use super::*;
use actix_web::HttpResponse;
use actix_web::error::InternalError;
use actix_web::web;
use tandem_auth::Accounts;
use tandem_auth::Crypto;
use tandem_chat::Messenger;
use tandem_social::Graph;
use tandem_social::Relationships;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct Context {
    accounts: web::Data<dyn Accounts>,
    crypto: web::Data<Crypto>,
    chat: web::Data<dyn Messenger>,
    relationships: web::Data<Relationships>,
}

impl Context {
    /// One store serves both accounts and the friend graph.
    pub fn new<S>(store: Arc<S>, crypto: Crypto, chat: Arc<dyn Messenger>) -> Self
    where
        S: Accounts + Graph + 'static,
    {
        let accounts: Arc<dyn Accounts> = store.clone();
        let graph: Arc<dyn Graph> = store;
        Self {
            accounts: web::Data::from(accounts),
            crypto: web::Data::new(crypto),
            chat: web::Data::from(chat),
            relationships: web::Data::new(Relationships::new(graph)),
        }
    }

    /// Registers state, extractor error handlers, and every route.
    #[rustfmt::skip]
    pub fn install(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.accounts.clone())
            .app_data(self.crypto.clone())
            .app_data(self.chat.clone())
            .app_data(self.relationships.clone())
            .app_data(web::JsonConfig::default().error_handler(|e, _| {
                let body = serde_json::json!({ "message": format!("Invalid request body: {}", e) });
                InternalError::from_response(e, HttpResponse::BadRequest().json(body)).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|e, _| {
                let body = serde_json::json!({ "message": "Invalid id" });
                InternalError::from_response(e, HttpResponse::BadRequest().json(body)).into()
            }))
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/auth")
                    .route("/signup",     web::post().to(tandem_auth::signup))
                    .route("/login",      web::post().to(tandem_auth::login))
                    .route("/logout",     web::post().to(tandem_auth::logout))
                    .route("/me",         web::get().to(tandem_auth::me))
                    .route("/onboarding", web::post().to(tandem_auth::onboarding)),
            )
            .service(
                web::scope("/users")
                    .route("",                                web::get().to(tandem_social::recommended))
                    .route("/friends",                        web::get().to(tandem_social::friends))
                    .route("/friend-request/{id}",            web::post().to(tandem_social::send_request))
                    .route("/friend-request/{id}/accept",     web::put().to(tandem_social::accept_request))
                    .route("/friend-requests",                web::get().to(tandem_social::friend_requests))
                    .route("/outgoing-friend-requests",       web::get().to(tandem_social::outgoing_requests)),
            )
            .service(
                web::scope("/chat")
                    .route("/token", web::get().to(handlers::chat_token)),
            );
    }
}
