use actix_web::HttpResponse;
use actix_web::ResponseError;
use actix_web::http::StatusCode;
use tandem_database::StoreError;

/// Relationship rule violations and store failures.
#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("You can't send a friend request to yourself")]
    SelfRequest,
    #[error("Recipient not found")]
    UserNotFound,
    #[error("You are already friends with this user")]
    AlreadyFriends,
    #[error("A friend request already exists between you and this user")]
    RequestExists,
    #[error("Friend request not found")]
    RequestNotFound,
    #[error("You are not authorized to accept this request")]
    Forbidden,
    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl SocialError {
    /// Stable machine-readable name sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SelfRequest => "SelfRequest",
            Self::UserNotFound => "UserNotFound",
            Self::AlreadyFriends => "AlreadyFriends",
            Self::RequestExists => "RequestExists",
            Self::RequestNotFound => "RequestNotFound",
            Self::Forbidden => "Forbidden",
            Self::Store(_) => "Internal",
        }
    }
}

impl ResponseError for SocialError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::SelfRequest | Self::AlreadyFriends | Self::RequestExists => {
                StatusCode::BAD_REQUEST
            }
            Self::UserNotFound | Self::RequestNotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Store(_) => {
                log::error!("{}", self);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "message": message,
            "error": self.code(),
        }))
    }
}
