use super::*;
use std::time::SystemTime;
use tandem_auth::Member;
use tandem_auth::Profile;
use tandem_auth::Summary;
use tandem_core::ID;
use tandem_core::Unique;
use tandem_database::*;
use tokio_postgres::Client;
use tokio_postgres::Row;

/// Outcome of [`Graph::propose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proposal {
    Created,
    AlreadyFriends,
    /// A request already links the pair, in either direction.
    Exists,
}

/// Persistence contract for the friend graph.
///
/// Lists come back ordered by id. `propose` and `accept` are atomic:
/// concurrent callers can never create two edges for one pair or a
/// half-applied friendship.
#[async_trait::async_trait]
pub trait Graph: Send + Sync {
    async fn exists(&self, user: ID<Member>) -> Result<bool, StoreError>;
    async fn befriended(&self, a: ID<Member>, b: ID<Member>) -> Result<bool, StoreError>;
    /// Inserts the request unless the pair is already linked.
    async fn propose(&self, request: &FriendRequest) -> Result<Proposal, StoreError>;
    async fn request(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError>;
    /// Marks a pending request accepted and records the friendship both ways.
    /// Returns `None` if the request is missing or no longer pending.
    async fn accept(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError>;
    async fn friends(&self, user: ID<Member>) -> Result<Vec<Summary>, StoreError>;
    async fn requests(
        &self,
        user: ID<Member>,
        side: Side,
        status: Status,
    ) -> Result<Vec<Populated>, StoreError>;
    /// Onboarded members with no friendship and no request of any kind
    /// linking them to `user`.
    async fn strangers(&self, user: ID<Member>) -> Result<Vec<Summary>, StoreError>;
}

const SUMMARY_S: &str =
    "s.id, s.full_name, s.bio, s.profile_pic, s.native_language, s.learning_language, s.location";
const SUMMARY_T: &str =
    "t.id, t.full_name, t.bio, t.profile_pic, t.native_language, t.learning_language, t.location";
const REQUEST: &str = "r.id, r.sender_id, r.recipient_id, r.status, r.created_at";
const POPULATED: &str = const_format::concatcp!(
    "SELECT ",
    REQUEST,
    ", ",
    SUMMARY_S,
    ", ",
    SUMMARY_T,
    " FROM ",
    FRIEND_REQUESTS,
    " r JOIN ",
    USERS,
    " s ON s.id = r.sender_id JOIN ",
    USERS,
    " t ON t.id = r.recipient_id"
);

/// Reads a summary from seven consecutive columns starting at `at`.
fn summary(row: &Row, at: usize) -> Summary {
    Summary::new(
        ID::from(row.get::<_, uuid::Uuid>(at)),
        Profile {
            full_name: row.get(at + 1),
            bio: row.get(at + 2),
            profile_pic: row.get(at + 3),
            native_language: row.get(at + 4),
            learning_language: row.get(at + 5),
            location: row.get(at + 6),
        },
    )
}

/// Parses a stored status, refusing anything the CHECK constraint forbids.
fn status(text: &str) -> Result<Status, StoreError> {
    text.parse().map_err(|e: String| {
        log::error!("{}", e);
        StoreError::Corrupt(e)
    })
}

/// Reads a request from the [`REQUEST`] column list.
fn edge(row: &Row) -> Result<FriendRequest, StoreError> {
    Ok(FriendRequest::restore(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        ID::from(row.get::<_, uuid::Uuid>(2)),
        status(row.get::<_, &str>(3))?,
        row.get::<_, SystemTime>(4),
    ))
}

fn populated(row: &Row) -> Result<Populated, StoreError> {
    Ok(edge(row)?.populate(summary(row, 5), summary(row, 12)))
}

#[async_trait::async_trait]
impl Graph for Client {
    async fn exists(&self, user: ID<Member>) -> Result<bool, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", USERS, " WHERE id = $1"),
            &[&user.inner()],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(StoreError::from)
    }

    async fn befriended(&self, a: ID<Member>, b: ID<Member>) -> Result<bool, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ",
                FRIENDSHIPS,
                " WHERE user_id = $1 AND friend_id = $2"
            ),
            &[&a.inner(), &b.inner()],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(StoreError::from)
    }

    async fn propose(&self, request: &FriendRequest) -> Result<Proposal, StoreError> {
        let inserted = self
            .query_opt(
                const_format::concatcp!(
                    "INSERT INTO ",
                    FRIEND_REQUESTS,
                    " (id, sender_id, recipient_id, status, created_at)
                     SELECT $1::uuid, $2::uuid, $3::uuid, $4::text, $5::timestamptz
                     WHERE NOT EXISTS (SELECT 1 FROM ",
                    FRIENDSHIPS,
                    " WHERE user_id = $2::uuid AND friend_id = $3::uuid)
                     ON CONFLICT DO NOTHING
                     RETURNING id"
                ),
                &[
                    &request.id().inner(),
                    &request.sender().inner(),
                    &request.recipient().inner(),
                    &request.status().as_str(),
                    &request.created_at(),
                ],
            )
            .await?;
        match inserted {
            Some(_) => Ok(Proposal::Created),
            None if self.befriended(request.sender(), request.recipient()).await? => {
                Ok(Proposal::AlreadyFriends)
            }
            None => Ok(Proposal::Exists),
        }
    }

    async fn request(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT ", REQUEST, " FROM ", FRIEND_REQUESTS, " r WHERE r.id = $1"),
            &[&id.inner()],
        )
        .await?
        .as_ref()
        .map(edge)
        .transpose()
    }

    async fn accept(&self, id: ID<FriendRequest>) -> Result<Option<FriendRequest>, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "WITH r AS (
                    UPDATE ",
                FRIEND_REQUESTS,
                " SET status = 'accepted'
                    WHERE id = $1 AND status = 'pending'
                    RETURNING id, sender_id, recipient_id, status, created_at
                 ), f AS (
                    INSERT INTO ",
                FRIENDSHIPS,
                " (user_id, friend_id)
                    SELECT sender_id, recipient_id FROM r
                    UNION ALL
                    SELECT recipient_id, sender_id FROM r
                    ON CONFLICT DO NOTHING
                 )
                 SELECT ",
                REQUEST,
                " FROM r"
            ),
            &[&id.inner()],
        )
        .await?
        .as_ref()
        .map(edge)
        .transpose()
    }

    async fn friends(&self, user: ID<Member>) -> Result<Vec<Summary>, StoreError> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                SUMMARY_S,
                " FROM ",
                FRIENDSHIPS,
                " f JOIN ",
                USERS,
                " s ON s.id = f.friend_id
                 WHERE f.user_id = $1
                 ORDER BY s.id"
            ),
            &[&user.inner()],
        )
        .await
        .map(|rows| rows.iter().map(|row| summary(row, 0)).collect())
        .map_err(StoreError::from)
    }

    async fn requests(
        &self,
        user: ID<Member>,
        side: Side,
        status: Status,
    ) -> Result<Vec<Populated>, StoreError> {
        let sql = match side {
            Side::Sent => const_format::concatcp!(
                POPULATED,
                " WHERE r.sender_id = $1 AND r.status = $2 ORDER BY r.id"
            ),
            Side::Received => const_format::concatcp!(
                POPULATED,
                " WHERE r.recipient_id = $1 AND r.status = $2 ORDER BY r.id"
            ),
        };
        self.query(sql, &[&user.inner(), &status.as_str()])
            .await?
            .iter()
            .map(populated)
            .collect()
    }

    async fn strangers(&self, user: ID<Member>) -> Result<Vec<Summary>, StoreError> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                SUMMARY_S,
                " FROM ",
                USERS,
                " s
                 WHERE s.onboarded
                   AND s.id <> $1
                   AND NOT EXISTS (SELECT 1 FROM ",
                FRIENDSHIPS,
                " f WHERE f.user_id = $1 AND f.friend_id = s.id)
                   AND NOT EXISTS (SELECT 1 FROM ",
                FRIEND_REQUESTS,
                " r WHERE (r.sender_id = $1 AND r.recipient_id = s.id)
                        OR (r.sender_id = s.id AND r.recipient_id = $1))
                 ORDER BY s.id"
            ),
            &[&user.inner()],
        )
        .await
        .map(|rows| rows.iter().map(|row| summary(row, 0)).collect())
        .map_err(StoreError::from)
    }
}
