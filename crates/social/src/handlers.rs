use super::*;
use actix_web::HttpResponse;
use actix_web::web;
use tandem_auth::Auth;
use tandem_core::ID;
use tandem_core::Unique;

pub async fn recommended(
    auth: Auth,
    graph: web::Data<Relationships>,
) -> Result<HttpResponse, SocialError> {
    let users = graph.recommend(auth.member().id()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "recommendedUsers": users })))
}

pub async fn friends(
    auth: Auth,
    graph: web::Data<Relationships>,
) -> Result<HttpResponse, SocialError> {
    let friends = graph.friends(auth.member().id()).await?;
    Ok(HttpResponse::Ok().json(friends))
}

pub async fn send_request(
    auth: Auth,
    graph: web::Data<Relationships>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, SocialError> {
    let recipient = ID::from(path.into_inner());
    let request = graph.send(auth.member(), recipient).await?;
    Ok(HttpResponse::Created().json(request))
}

pub async fn accept_request(
    auth: Auth,
    graph: web::Data<Relationships>,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, SocialError> {
    let id = ID::from(path.into_inner());
    graph.accept(id, auth.member().id()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Friend request accepted" })))
}

pub async fn friend_requests(
    auth: Auth,
    graph: web::Data<Relationships>,
) -> Result<HttpResponse, SocialError> {
    let user = auth.member().id();
    let incoming = graph.incoming(user).await?;
    let accepted = graph.accepted(user).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "incomingRequests": incoming,
        "acceptedRequests": accepted,
    })))
}

pub async fn outgoing_requests(
    auth: Auth,
    graph: web::Data<Relationships>,
) -> Result<HttpResponse, SocialError> {
    let outgoing = graph.outgoing(auth.member().id()).await?;
    Ok(HttpResponse::Ok().json(outgoing))
}
