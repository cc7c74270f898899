//! The relationship engine over a live PostgreSQL store named by `DB_URL`.
//!
//! Ignored by default; run with
//! `DB_URL=... cargo test -p tandem-social --test postgres -- --ignored`.
//! Members get unique emails, so runs can share a database.
use std::sync::Arc;
use std::sync::LazyLock;
use tandem_auth::*;
use tandem_core::ID;
use tandem_core::Unique;
use tandem_social::*;
use tokio::sync::OnceCell;
use tokio_postgres::Client;

/// Table creation runs once per process, not once per test.
static PREPARED: LazyLock<OnceCell<()>> = LazyLock::new(OnceCell::new);

async fn client() -> Arc<Client> {
    let client = tandem_database::db().await;
    PREPARED
        .get_or_init(|| async {
            tandem_database::prepare::<Member>(&client).await.unwrap();
            tandem_database::prepare::<FriendRequest>(&client).await.unwrap();
            tandem_database::prepare::<Friendship>(&client).await.unwrap();
        })
        .await;
    client
}

async fn enroll(client: &Client, name: &str) -> Member {
    let signup = Signup {
        email: format!("{}-{}@example.com", name, uuid::Uuid::now_v7()),
        password: "hunter22".into(),
        full_name: name.into(),
    };
    credentials::create(client, signup).await.unwrap()
}

async fn join(client: &Client, name: &str) -> Member {
    let member = enroll(client, name).await;
    let form = Onboarding {
        full_name: name.into(),
        bio: "bio".into(),
        native_language: "english".into(),
        learning_language: "portuguese".into(),
        location: "Porto".into(),
    };
    credentials::onboard(client, member.id(), &form).await.unwrap()
}

async fn reload(client: &Client, member: &Member) -> Member {
    client.find(member.id()).await.unwrap().unwrap()
}

#[tokio::test]
#[ignore]
async fn one_edge_per_pair_in_either_direction() {
    let client = client().await;
    let engine = Relationships::new(client.clone());
    let a = join(&client, "a").await;
    let b = join(&client, "b").await;

    engine.send(&a, b.id()).await.unwrap();
    assert!(matches!(engine.send(&a, b.id()).await, Err(SocialError::RequestExists)));
    assert!(matches!(engine.send(&b, a.id()).await, Err(SocialError::RequestExists)));
    assert!(matches!(engine.send(&a, a.id()).await, Err(SocialError::SelfRequest)));
    assert!(matches!(
        engine.send(&a, ID::default()).await,
        Err(SocialError::UserNotFound)
    ));

    let outgoing = engine.outgoing(a.id()).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].sender().profile().full_name, "a");
    assert_eq!(outgoing[0].recipient().id(), b.id());
    assert_eq!(outgoing[0].recipient().profile().location, "Porto");
    let incoming = engine.incoming(b.id()).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].sender().id(), a.id());
    assert_eq!(incoming[0].status(), Status::Pending);
}

#[tokio::test]
#[ignore]
async fn only_the_recipient_accepts_and_only_once() {
    let client = client().await;
    let engine = Relationships::new(client.clone());
    let a = join(&client, "a").await;
    let b = join(&client, "b").await;
    let c = join(&client, "c").await;
    let request = engine.send(&a, b.id()).await.unwrap();

    assert!(matches!(
        engine.accept(request.id(), c.id()).await,
        Err(SocialError::Forbidden)
    ));
    assert!(matches!(
        engine.accept(request.id(), a.id()).await,
        Err(SocialError::Forbidden)
    ));
    assert!(engine.friends(a.id()).await.unwrap().is_empty());

    let accepted = engine.accept(request.id(), b.id()).await.unwrap();
    assert_eq!(accepted.status(), Status::Accepted);
    assert!(matches!(
        engine.accept(request.id(), b.id()).await,
        Err(SocialError::AlreadyFriends)
    ));
    assert!(matches!(
        engine.accept(ID::default(), b.id()).await,
        Err(SocialError::RequestNotFound)
    ));

    let friends_of = |user: ID<Member>| {
        let engine = engine.clone();
        async move {
            engine
                .friends(user)
                .await
                .unwrap()
                .iter()
                .map(|s| s.id())
                .collect::<Vec<_>>()
        }
    };
    assert_eq!(friends_of(a.id()).await, vec![b.id()]);
    assert_eq!(friends_of(b.id()).await, vec![a.id()]);
    assert_eq!(reload(&client, &a).await.friends(), &[b.id()]);
    assert_eq!(reload(&client, &b).await.friends(), &[a.id()]);
    assert!(engine.incoming(b.id()).await.unwrap().is_empty());
    let sent = engine.accepted(a.id()).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient().id(), b.id());
}

#[tokio::test]
#[ignore]
async fn friends_cannot_request_again() {
    let client = client().await;
    let engine = Relationships::new(client.clone());
    let a = join(&client, "a").await;
    let b = join(&client, "b").await;
    let request = engine.send(&a, b.id()).await.unwrap();
    engine.accept(request.id(), b.id()).await.unwrap();

    let fresh = reload(&client, &a).await;
    assert!(matches!(
        engine.send(&fresh, b.id()).await,
        Err(SocialError::AlreadyFriends)
    ));
    // b was loaded before the accept, so only the store knows
    assert!(!b.is_friend(a.id()));
    assert!(matches!(
        engine.send(&b, a.id()).await,
        Err(SocialError::AlreadyFriends)
    ));
}

#[tokio::test]
#[ignore]
async fn recommendations_skip_every_linked_member() {
    let client = client().await;
    let engine = Relationships::new(client.clone());
    let me = join(&client, "me").await;
    let friend = join(&client, "friend").await;
    let pending = join(&client, "pending").await;
    let inbound = join(&client, "inbound").await;
    let stranger = join(&client, "stranger").await;
    let newcomer = enroll(&client, "newcomer").await;

    let request = engine.send(&me, friend.id()).await.unwrap();
    engine.accept(request.id(), friend.id()).await.unwrap();
    engine.send(&me, pending.id()).await.unwrap();
    engine.send(&inbound, me.id()).await.unwrap();

    let ids = engine
        .recommend(me.id())
        .await
        .unwrap()
        .iter()
        .map(|s| s.id())
        .collect::<Vec<_>>();
    assert!(ids.contains(&stranger.id()));
    for excluded in [&me, &friend, &pending, &inbound, &newcomer] {
        assert!(!ids.contains(&excluded.id()));
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn racing_sends_leave_one_edge() {
    let client = client().await;
    let engine = Relationships::new(client.clone());
    let a = join(&client, "a").await;
    let b = join(&client, "b").await;

    let handles = (0..16)
        .map(|i| {
            let engine = engine.clone();
            let (from, to) = match i % 2 {
                0 => (a.clone(), b.id()),
                _ => (b.clone(), a.id()),
            };
            tokio::spawn(async move { engine.send(&from, to).await })
        })
        .collect::<Vec<_>>();
    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(matches!(e, SocialError::RequestExists)),
        }
    }
    assert_eq!(created, 1);
    let edges = engine.outgoing(a.id()).await.unwrap().len()
        + engine.outgoing(b.id()).await.unwrap().len();
    assert_eq!(edges, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn racing_accepts_apply_once() {
    let client = client().await;
    let engine = Relationships::new(client.clone());
    let a = join(&client, "a").await;
    let b = join(&client, "b").await;
    let request = engine.send(&a, b.id()).await.unwrap();

    let handles = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let (id, by) = (request.id(), b.id());
            tokio::spawn(async move { engine.accept(id, by).await })
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
    assert_eq!(reload(&client, &a).await.friends(), &[b.id()]);
    assert_eq!(reload(&client, &b).await.friends(), &[a.id()]);
}
