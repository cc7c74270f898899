use std::sync::Arc;
use tandem_auth::*;
use tandem_core::ID;
use tandem_core::Unique;
use tandem_memory::Memory;
use tandem_social::*;

struct World {
    store: Arc<Memory>,
    engine: Relationships,
}

impl World {
    fn new() -> Self {
        let store = Arc::new(Memory::new());
        let engine = Relationships::new(store.clone());
        Self { store, engine }
    }
    /// Registers and onboards a member.
    async fn join(&self, name: &str) -> Member {
        let member = credentials::create(
            self.store.as_ref(),
            Signup {
                email: format!("{}@example.com", name),
                password: "hunter22".into(),
                full_name: name.into(),
            },
        )
        .await
        .unwrap();
        let form = Onboarding {
            full_name: name.into(),
            bio: "bio".into(),
            native_language: "english".into(),
            learning_language: "spanish".into(),
            location: "here".into(),
        };
        credentials::onboard(self.store.as_ref(), member.id(), &form)
            .await
            .unwrap()
    }
    /// Reloads a member, as the gate would on the next request.
    async fn fresh(&self, member: &Member) -> Member {
        self.store.find(member.id()).await.unwrap().unwrap()
    }
}

#[tokio::test]
async fn request_then_accept_makes_friends_both_ways() {
    let world = World::new();
    let a = world.join("a").await;
    let b = world.join("b").await;

    let request = world.engine.send(&a, b.id()).await.unwrap();
    assert_eq!(request.status(), Status::Pending);
    assert_eq!(world.engine.outgoing(a.id()).await.unwrap().len(), 1);
    let incoming = world.engine.incoming(b.id()).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].sender().id(), a.id());

    world.engine.accept(request.id(), b.id()).await.unwrap();
    assert!(world.fresh(&a).await.is_friend(b.id()));
    assert!(world.fresh(&b).await.is_friend(a.id()));
    let friends = world.engine.friends(a.id()).await.unwrap();
    assert_eq!(friends.iter().map(|s| s.id()).collect::<Vec<_>>(), vec![b.id()]);
    assert!(world.engine.incoming(b.id()).await.unwrap().is_empty());
    assert!(world.engine.outgoing(a.id()).await.unwrap().is_empty());
    let accepted = world.engine.accepted(a.id()).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].status(), Status::Accepted);
    assert_eq!(accepted[0].recipient().id(), b.id());
}

#[tokio::test]
async fn send_rules() {
    let world = World::new();
    let a = world.join("a").await;
    let b = world.join("b").await;

    assert!(matches!(
        world.engine.send(&a, a.id()).await,
        Err(SocialError::SelfRequest)
    ));
    assert!(matches!(
        world.engine.send(&a, ID::default()).await,
        Err(SocialError::UserNotFound)
    ));
    world.engine.send(&a, b.id()).await.unwrap();
    assert!(matches!(
        world.engine.send(&a, b.id()).await,
        Err(SocialError::RequestExists)
    ));
    assert!(matches!(
        world.engine.send(&b, a.id()).await,
        Err(SocialError::RequestExists)
    ));
}

#[tokio::test]
async fn friends_cannot_request_each_other() {
    let world = World::new();
    let a = world.join("a").await;
    let b = world.join("b").await;
    let request = world.engine.send(&a, b.id()).await.unwrap();
    world.engine.accept(request.id(), b.id()).await.unwrap();

    let a = world.fresh(&a).await;
    assert!(matches!(
        world.engine.send(&a, b.id()).await,
        Err(SocialError::AlreadyFriends)
    ));
    // a stale identity still loses to the store's own check
    assert!(matches!(
        world.engine.send(&b, a.id()).await,
        Err(SocialError::AlreadyFriends)
    ));
}

#[tokio::test]
async fn accept_rules() {
    let world = World::new();
    let a = world.join("a").await;
    let b = world.join("b").await;
    let c = world.join("c").await;
    let request = world.engine.send(&a, b.id()).await.unwrap();

    assert!(matches!(
        world.engine.accept(ID::default(), b.id()).await,
        Err(SocialError::RequestNotFound)
    ));
    assert!(matches!(
        world.engine.accept(request.id(), a.id()).await,
        Err(SocialError::Forbidden)
    ));
    assert!(matches!(
        world.engine.accept(request.id(), c.id()).await,
        Err(SocialError::Forbidden)
    ));
    assert!(world.engine.friends(a.id()).await.unwrap().is_empty());

    world.engine.accept(request.id(), b.id()).await.unwrap();
    assert!(matches!(
        world.engine.accept(request.id(), b.id()).await,
        Err(SocialError::AlreadyFriends)
    ));
    assert_eq!(world.fresh(&a).await.friends(), &[b.id()]);
}

#[tokio::test]
async fn recommendations_skip_every_linked_member() {
    let world = World::new();
    let me = world.join("me").await;
    let friend = world.join("friend").await;
    let pending = world.join("pending").await;
    let inbound = world.join("inbound").await;
    let stranger = world.join("stranger").await;
    credentials::create(
        world.store.as_ref(),
        Signup {
            email: "new@example.com".into(),
            password: "hunter22".into(),
            full_name: "new".into(),
        },
    )
    .await
    .unwrap();

    let request = world.engine.send(&me, friend.id()).await.unwrap();
    world.engine.accept(request.id(), friend.id()).await.unwrap();
    world.engine.send(&me, pending.id()).await.unwrap();
    world.engine.send(&inbound, me.id()).await.unwrap();

    let ids = world
        .engine
        .recommend(me.id())
        .await
        .unwrap()
        .iter()
        .map(|s| s.id())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![stranger.id()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_leave_one_edge() {
    let world = Arc::new(World::new());
    let a = world.join("a").await;
    let b = world.join("b").await;

    let there = {
        let (world, a, b) = (world.clone(), a.clone(), b.id());
        tokio::spawn(async move { world.engine.send(&a, b).await })
    };
    let back = {
        let (world, b, a) = (world.clone(), b.clone(), a.id());
        tokio::spawn(async move { world.engine.send(&b, a).await })
    };
    let (there, back) = (there.await.unwrap(), back.await.unwrap());
    assert!(there.is_ok() ^ back.is_ok());
    let edges = world.engine.outgoing(a.id()).await.unwrap().len()
        + world.engine.outgoing(b.id()).await.unwrap().len();
    assert_eq!(edges, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_accepts_apply_once() {
    let world = Arc::new(World::new());
    let a = world.join("a").await;
    let b = world.join("b").await;
    let request = world.engine.send(&a, b.id()).await.unwrap();

    let handles = (0..8)
        .map(|_| {
            let world = world.clone();
            let (id, by) = (request.id(), b.id());
            tokio::spawn(async move { world.engine.accept(id, by).await })
        })
        .collect::<Vec<_>>();
    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(e) => assert!(matches!(e, SocialError::AlreadyFriends)),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(world.fresh(&a).await.friends(), &[b.id()]);
    assert_eq!(world.fresh(&b).await.friends(), &[a.id()]);
}
