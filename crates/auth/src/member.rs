use super::*;
use serde::Serialize;
use tandem_core::ID;
use tandem_core::Unique;

/// User-editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub full_name: String,
    pub bio: String,
    pub profile_pic: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
}

/// Registered user. The password hash never lives here; it stays in the
/// store and is only surfaced alongside a member by [`Accounts::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    id: ID<Self>,
    email: String,
    #[serde(flatten)]
    profile: Profile,
    #[serde(rename = "isOnboarded")]
    onboarded: bool,
    friends: Vec<ID<Member>>,
}

impl Member {
    /// A freshly signed-up member: not onboarded, no friends.
    pub fn new(id: ID<Self>, email: String, profile: Profile) -> Self {
        Self::restore(id, email, profile, false, Vec::new())
    }
    /// Rebuilds a member from stored state.
    pub fn restore(
        id: ID<Self>,
        email: String,
        profile: Profile,
        onboarded: bool,
        mut friends: Vec<ID<Member>>,
    ) -> Self {
        friends.sort();
        friends.dedup();
        Self {
            id,
            email,
            profile,
            onboarded,
            friends,
        }
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
    pub fn onboarded(&self) -> bool {
        self.onboarded
    }
    /// Friend ids in ascending order, without duplicates.
    pub fn friends(&self) -> &[ID<Member>] {
        &self.friends
    }
    pub fn is_friend(&self, other: ID<Member>) -> bool {
        self.friends.binary_search(&other).is_ok()
    }
    /// Applies the onboarding allow-list and marks the profile complete.
    pub fn onboard(&mut self, form: &Onboarding) {
        self.profile.full_name = form.full_name.clone();
        self.profile.bio = form.bio.clone();
        self.profile.native_language = form.native_language.clone();
        self.profile.learning_language = form.learning_language.clone();
        self.profile.location = form.location.clone();
        self.onboarded = true;
    }
    /// Adds a friend reference. Returns false if it was already present.
    pub fn befriend(&mut self, other: ID<Member>) -> bool {
        match self.friends.binary_search(&other) {
            Ok(_) => false,
            Err(i) => {
                self.friends.insert(i, other);
                true
            }
        }
    }
    pub fn summary(&self) -> Summary {
        Summary::new(self.id, self.profile.clone())
    }
    /// The record the messaging provider keeps for this member.
    pub fn chat_user(&self) -> tandem_chat::ChatUser {
        tandem_chat::ChatUser::new(
            self.id.to_string(),
            self.profile.full_name.clone(),
            self.profile.profile_pic.clone(),
        )
    }
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Public view of a member: no email, no friends, no credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    id: ID<Member>,
    #[serde(flatten)]
    profile: Profile,
}

impl Summary {
    pub fn new(id: ID<Member>, profile: Profile) -> Self {
        Self { id, profile }
    }
    pub fn profile(&self) -> &Profile {
        &self.profile
    }
}

impl Unique<Member> for Summary {
    fn id(&self) -> ID<Member> {
        self.id
    }
}

mod schema {
    use super::*;
    use tandem_database::*;

    /// Schema implementation for Member (users table).
    /// Note: hashword is a database-only column, not part of the Member domain type.
    impl Schema for Member {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id                UUID PRIMARY KEY,
                    email             VARCHAR(255) UNIQUE NOT NULL,
                    hashword          TEXT NOT NULL,
                    full_name         TEXT NOT NULL,
                    bio               TEXT NOT NULL DEFAULT '',
                    profile_pic       TEXT NOT NULL DEFAULT '',
                    native_language   TEXT NOT NULL DEFAULT '',
                    learning_language TEXT NOT NULL DEFAULT '',
                    location          TEXT NOT NULL DEFAULT '',
                    onboarded         BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at        TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_users_onboarded ON ",
                USERS,
                " (id) WHERE onboarded;"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> Member {
        Member::new(
            ID::default(),
            "ada@example.com".into(),
            Profile {
                full_name: "Ada".into(),
                profile_pic: "pic".into(),
                ..Profile::default()
            },
        )
    }

    #[test]
    fn befriend_is_idempotent_and_sorted() {
        let mut ada = member();
        let (a, b) = (ID::default(), ID::default());
        assert!(ada.befriend(b));
        assert!(ada.befriend(a));
        assert!(!ada.befriend(b));
        assert_eq!(ada.friends(), &[a, b]);
        assert!(ada.is_friend(a));
    }

    #[test]
    fn restore_dedups_friends() {
        let a = ID::default();
        let ada = Member::restore(
            ID::default(),
            "ada@example.com".into(),
            Profile::default(),
            true,
            vec![a, a],
        );
        assert_eq!(ada.friends(), &[a]);
    }

    #[test]
    fn onboarding_keeps_avatar_and_email() {
        let mut ada = member();
        ada.onboard(&Onboarding {
            full_name: "Ada L".into(),
            bio: "hi".into(),
            native_language: "english".into(),
            learning_language: "french".into(),
            location: "London".into(),
        });
        assert!(ada.onboarded());
        assert_eq!(ada.profile().full_name, "Ada L");
        assert_eq!(ada.profile().profile_pic, "pic");
        assert_eq!(ada.email(), "ada@example.com");
    }

    #[test]
    fn json_shape() {
        let ada = member();
        let json = serde_json::to_value(&ada).unwrap();
        assert_eq!(json["fullName"], "Ada");
        assert_eq!(json["isOnboarded"], false);
        assert_eq!(json["friends"], serde_json::json!([]));
        assert!(json.get("hashword").is_none());
        let summary = serde_json::to_value(ada.summary()).unwrap();
        assert_eq!(summary["id"], ada.id().to_string());
        assert!(summary.get("email").is_none());
        assert!(summary.get("friends").is_none());
    }
}
