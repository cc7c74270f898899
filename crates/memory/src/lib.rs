//! In-process store backing both [`Accounts`] and [`Graph`].
//!
//! All tables sit behind one lock, so every mutating call is a single
//! critical section and the atomicity the traits promise holds trivially.
//! Used for tests and for running without `DB_URL`.
use std::collections::BTreeMap;
use std::collections::HashMap;
use tandem_auth::*;
use tandem_core::ID;
use tandem_core::Unique;
use tandem_database::StoreError;
use tandem_social::*;
use tokio::sync::RwLock;

type Pair = (ID<Member>, ID<Member>);

fn pair(a: ID<Member>, b: ID<Member>) -> Pair {
    (a.min(b), a.max(b))
}

#[derive(Default)]
struct Tables {
    members: BTreeMap<ID<Member>, (Member, String)>,
    emails: HashMap<String, ID<Member>>,
    requests: BTreeMap<ID<FriendRequest>, FriendRequest>,
    pairs: HashMap<Pair, ID<FriendRequest>>,
}

impl Tables {
    fn summary(&self, id: ID<Member>) -> Option<Summary> {
        self.members.get(&id).map(|(m, _)| m.summary())
    }
    fn befriended(&self, a: ID<Member>, b: ID<Member>) -> bool {
        self.members
            .get(&a)
            .map(|(m, _)| m.is_friend(b))
            .unwrap_or(false)
    }
}

#[derive(Default)]
pub struct Memory {
    tables: RwLock<Tables>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Accounts for Memory {
    async fn create(&self, member: &Member, hashword: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.emails.contains_key(member.email()) {
            return Err(StoreError::Duplicate);
        }
        tables.emails.insert(member.email().to_string(), member.id());
        tables
            .members
            .insert(member.id(), (member.clone(), hashword.to_string()));
        Ok(())
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.members.get(id))
            .cloned())
    }

    async fn find(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
        Ok(self
            .tables
            .read()
            .await
            .members
            .get(&id)
            .map(|(m, _)| m.clone()))
    }

    async fn onboard(
        &self,
        id: ID<Member>,
        form: &Onboarding,
    ) -> Result<Option<Member>, StoreError> {
        Ok(self
            .tables
            .write()
            .await
            .members
            .get_mut(&id)
            .map(|(m, _)| {
                m.onboard(form);
                m.clone()
            }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl Graph for Memory {
    async fn exists(&self, user: ID<Member>) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.members.contains_key(&user))
    }

    async fn befriended(&self, a: ID<Member>, b: ID<Member>) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.befriended(a, b))
    }

    async fn propose(&self, request: &FriendRequest) -> Result<Proposal, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.befriended(request.sender(), request.recipient()) {
            return Ok(Proposal::AlreadyFriends);
        }
        if tables.pairs.contains_key(&request.pair()) {
            return Ok(Proposal::Exists);
        }
        tables
            .pairs
            .insert(request.pair(), request.id());
        tables.requests.insert(request.id(), request.clone());
        Ok(Proposal::Created)
    }

    async fn request(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError> {
        Ok(self.tables.read().await.requests.get(&id).cloned())
    }

    async fn accept(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(request) = tables.requests.get_mut(&id) else {
            return Ok(None);
        };
        if !request.accept() {
            return Ok(None);
        }
        let request = request.clone();
        let (sender, recipient) = (request.sender(), request.recipient());
        if let Some((m, _)) = tables.members.get_mut(&sender) {
            m.befriend(recipient);
        }
        if let Some((m, _)) = tables.members.get_mut(&recipient) {
            m.befriend(sender);
        }
        Ok(Some(request))
    }

    async fn friends(&self, user: ID<Member>) -> Result<Vec<Summary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .get(&user)
            .map(|(m, _)| m.friends())
            .unwrap_or_default()
            .iter()
            .filter_map(|id| tables.summary(*id))
            .collect())
    }

    async fn requests(
        &self,
        user: ID<Member>,
        side: Side,
        status: Status,
    ) -> Result<Vec<Populated>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .requests
            .values()
            .filter(|r| r.status() == status)
            .filter(|r| match side {
                Side::Sent => r.sender() == user,
                Side::Received => r.recipient() == user,
            })
            .filter_map(|r| {
                let sender = tables.summary(r.sender())?;
                let recipient = tables.summary(r.recipient())?;
                Some(r.populate(sender, recipient))
            })
            .collect())
    }

    async fn strangers(&self, user: ID<Member>) -> Result<Vec<Summary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .members
            .values()
            .map(|(m, _)| m)
            .filter(|m| m.onboarded())
            .filter(|m| m.id() != user)
            .filter(|m| !m.is_friend(user))
            .filter(|m| !tables.pairs.contains_key(&pair(user, m.id())))
            .map(Member::summary)
            .collect())
    }
}
