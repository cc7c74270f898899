//! Rules for sending and accepting friend requests.
use super::*;
use std::sync::Arc;
use tandem_auth::Member;
use tandem_auth::Summary;
use tandem_core::ID;
use tandem_core::Unique;
use tandem_database::bounded;

/// The relationship engine. Holds no state of its own; every rule that
/// must hold under concurrency is delegated to an atomic [`Graph`] call.
#[derive(Clone)]
pub struct Relationships {
    graph: Arc<dyn Graph>,
}

impl Relationships {
    pub fn new(graph: Arc<dyn Graph>) -> Self {
        Self { graph }
    }

    /// Creates a pending request from `sender` to `recipient`.
    pub async fn send(
        &self,
        sender: &Member,
        recipient: ID<Member>,
    ) -> Result<FriendRequest, SocialError> {
        if sender.id() == recipient {
            return Err(SocialError::SelfRequest);
        }
        if !bounded(self.graph.exists(recipient)).await? {
            return Err(SocialError::UserNotFound);
        }
        if sender.is_friend(recipient) {
            return Err(SocialError::AlreadyFriends);
        }
        let request = FriendRequest::new(sender.id(), recipient);
        match bounded(self.graph.propose(&request)).await? {
            Proposal::Created => {
                log::info!("friend request {} -> {}", sender.id(), recipient);
                Ok(request)
            }
            Proposal::AlreadyFriends => Err(SocialError::AlreadyFriends),
            Proposal::Exists => Err(SocialError::RequestExists),
        }
    }

    /// Accepts a pending request addressed to `actor`.
    ///
    /// Status flip and both friendship entries land together or not at all.
    pub async fn accept(
        &self,
        id: ID<FriendRequest>,
        actor: ID<Member>,
    ) -> Result<FriendRequest, SocialError> {
        let request = bounded(self.graph.request(id))
            .await?
            .ok_or(SocialError::RequestNotFound)?;
        if request.recipient() != actor {
            return Err(SocialError::Forbidden);
        }
        match bounded(self.graph.accept(id)).await? {
            Some(accepted) => {
                log::info!("friendship {} <-> {}", accepted.sender(), accepted.recipient());
                Ok(accepted)
            }
            None => Err(SocialError::AlreadyFriends),
        }
    }

    pub async fn friends(&self, user: ID<Member>) -> Result<Vec<Summary>, SocialError> {
        Ok(bounded(self.graph.friends(user)).await?)
    }

    /// Pending requests awaiting `user`'s answer.
    pub async fn incoming(&self, user: ID<Member>) -> Result<Vec<Populated>, SocialError> {
        Ok(bounded(self.graph.requests(user, Side::Received, Status::Pending)).await?)
    }

    /// Requests `user` sent that have since been accepted.
    pub async fn accepted(&self, user: ID<Member>) -> Result<Vec<Populated>, SocialError> {
        Ok(bounded(self.graph.requests(user, Side::Sent, Status::Accepted)).await?)
    }

    /// Pending requests `user` sent.
    pub async fn outgoing(&self, user: ID<Member>) -> Result<Vec<Populated>, SocialError> {
        Ok(bounded(self.graph.requests(user, Side::Sent, Status::Pending)).await?)
    }

    /// Onboarded members `user` has no link to yet.
    pub async fn recommend(&self, user: ID<Member>) -> Result<Vec<Summary>, SocialError> {
        Ok(bounded(self.graph.strangers(user)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_auth::Profile;
    use tandem_database::StoreError;

    /// A graph holding one request and nothing else.
    struct Lone(FriendRequest);

    #[async_trait::async_trait]
    impl Graph for Lone {
        async fn exists(&self, _: ID<Member>) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn befriended(&self, _: ID<Member>, _: ID<Member>) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn propose(&self, _: &FriendRequest) -> Result<Proposal, StoreError> {
            Ok(Proposal::Exists)
        }
        async fn request(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError> {
            Ok(Some(self.0.clone()).filter(|r| r.id() == id))
        }
        async fn accept(&self, _: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError> {
            Ok(None)
        }
        async fn friends(&self, _: ID<Member>) -> Result<Vec<Summary>, StoreError> {
            Ok(vec![])
        }
        async fn requests(
            &self,
            _: ID<Member>,
            _: Side,
            _: Status,
        ) -> Result<Vec<Populated>, StoreError> {
            Ok(vec![])
        }
        async fn strangers(&self, _: ID<Member>) -> Result<Vec<Summary>, StoreError> {
            Ok(vec![])
        }
    }

    fn engine() -> (Relationships, FriendRequest) {
        let request = FriendRequest::new(ID::default(), ID::default());
        let graph = Arc::new(Lone(request.clone()));
        (Relationships::new(graph), request)
    }

    fn member() -> Member {
        Member::new(ID::default(), "a@example.com".into(), Profile::default())
    }

    #[tokio::test]
    async fn self_requests_are_rejected() {
        let (engine, _) = engine();
        let ada = member();
        assert!(matches!(
            engine.send(&ada, ada.id()).await,
            Err(SocialError::SelfRequest)
        ));
    }

    #[tokio::test]
    async fn unknown_recipients_are_not_found() {
        let (engine, _) = engine();
        assert!(matches!(
            engine.send(&member(), ID::default()).await,
            Err(SocialError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn only_the_recipient_may_accept() {
        let (engine, request) = engine();
        assert!(matches!(
            engine.accept(request.id(), request.sender()).await,
            Err(SocialError::Forbidden)
        ));
        assert!(matches!(
            engine.accept(ID::default(), request.recipient()).await,
            Err(SocialError::RequestNotFound)
        ));
        assert!(matches!(
            engine.accept(request.id(), request.recipient()).await,
            Err(SocialError::AlreadyFriends)
        ));
    }
}
