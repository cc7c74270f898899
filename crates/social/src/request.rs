use serde::Serialize;
use std::time::SystemTime;
use tandem_auth::Member;
use tandem_auth::Summary;
use tandem_core::ID;
use tandem_core::Unique;

/// Lifecycle of a friend request. Accepted is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Accepted,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            other => Err(format!("unknown request status: {}", other)),
        }
    }
}

/// Which end of a request a member is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Sent,
    Received,
}

/// Directed edge from sender to recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    id: ID<Self>,
    sender: ID<Member>,
    recipient: ID<Member>,
    status: Status,
    #[serde(serialize_with = "tandem_core::epoch")]
    created_at: SystemTime,
}

impl FriendRequest {
    /// A new pending request stamped now.
    pub fn new(sender: ID<Member>, recipient: ID<Member>) -> Self {
        Self::restore(
            ID::default(),
            sender,
            recipient,
            Status::Pending,
            SystemTime::now(),
        )
    }
    pub fn restore(
        id: ID<Self>,
        sender: ID<Member>,
        recipient: ID<Member>,
        status: Status,
        created_at: SystemTime,
    ) -> Self {
        Self {
            id,
            sender,
            recipient,
            status,
            created_at,
        }
    }
    pub fn sender(&self) -> ID<Member> {
        self.sender
    }
    pub fn recipient(&self) -> ID<Member> {
        self.recipient
    }
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
    /// The unordered endpoint pair, smaller id first.
    pub fn pair(&self) -> (ID<Member>, ID<Member>) {
        match self.sender < self.recipient {
            true => (self.sender, self.recipient),
            false => (self.recipient, self.sender),
        }
    }
    /// Moves a pending request to accepted. Returns false if it already was.
    pub fn accept(&mut self) -> bool {
        match self.status {
            Status::Pending => {
                self.status = Status::Accepted;
                true
            }
            Status::Accepted => false,
        }
    }
    /// Expands both endpoints for display.
    pub fn populate(&self, sender: Summary, recipient: Summary) -> Populated {
        Populated {
            id: self.id,
            status: self.status,
            created_at: self.created_at,
            sender,
            recipient,
        }
    }
}

impl Unique for FriendRequest {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// A friend request with both endpoints shown as public summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Populated {
    id: ID<FriendRequest>,
    status: Status,
    #[serde(serialize_with = "tandem_core::epoch")]
    created_at: SystemTime,
    sender: Summary,
    recipient: Summary,
}

impl Populated {
    pub fn status(&self) -> Status {
        self.status
    }
    pub fn sender(&self) -> &Summary {
        &self.sender
    }
    pub fn recipient(&self) -> &Summary {
        &self.recipient
    }
}

impl Unique<FriendRequest> for Populated {
    fn id(&self) -> ID<FriendRequest> {
        self.id
    }
}

/// Marker for the symmetric friendships table.
pub struct Friendship;

mod schema {
    use super::*;
    use tandem_database::*;

    /// At most one request per unordered pair, enforced by the pair index.
    impl Schema for FriendRequest {
        fn name() -> &'static str {
            FRIEND_REQUESTS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                FRIEND_REQUESTS,
                " (
                    id           UUID PRIMARY KEY,
                    sender_id    UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    recipient_id UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    status       TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'accepted')),
                    created_at   TIMESTAMPTZ NOT NULL DEFAULT now(),
                    CHECK (sender_id <> recipient_id)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_friend_requests_pair ON ",
                FRIEND_REQUESTS,
                " (LEAST(sender_id, recipient_id), GREATEST(sender_id, recipient_id));
                 CREATE INDEX IF NOT EXISTS idx_friend_requests_recipient ON ",
                FRIEND_REQUESTS,
                " (recipient_id, status);
                 CREATE INDEX IF NOT EXISTS idx_friend_requests_sender ON ",
                FRIEND_REQUESTS,
                " (sender_id, status);"
            )
        }
    }

    /// One row per direction, so each side lists friends with a single scan.
    impl Schema for Friendship {
        fn name() -> &'static str {
            FRIENDSHIPS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                FRIENDSHIPS,
                " (
                    user_id    UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    friend_id  UUID NOT NULL REFERENCES ",
                USERS,
                "(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                    PRIMARY KEY (user_id, friend_id),
                    CHECK (user_id <> friend_id)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_friendships_friend ON ",
                FRIENDSHIPS,
                " (friend_id);"
            )
        }
    }
}
