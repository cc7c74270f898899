use super::*;
use tandem_core::ID;
use tandem_core::Unique;
use tandem_database::*;
use tokio_postgres::Client;

/// Persistence contract for user records.
/// Abstracts SQL from the credential and session logic.
#[async_trait::async_trait]
pub trait Accounts: Send + Sync {
    /// Inserts a new member. Fails [`StoreError::Duplicate`] if the email is taken.
    async fn create(&self, member: &Member, hashword: &str) -> Result<(), StoreError>;
    /// Finds a member and their password hash by normalized email.
    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError>;
    /// Finds a member by id.
    async fn find(&self, id: ID<Member>) -> Result<Option<Member>, StoreError>;
    /// Applies an onboarding form, returning the updated member.
    async fn onboard(&self, id: ID<Member>, form: &Onboarding)
    -> Result<Option<Member>, StoreError>;
    /// Cheap round trip proving the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Columns in the order [`hydrate`] expects, friends folded into an array.
const MEMBER: &str = const_format::concatcp!(
    "id, email, full_name, bio, profile_pic, native_language, learning_language, location, onboarded,
     ARRAY(SELECT friend_id FROM ",
    FRIENDSHIPS,
    " f WHERE f.user_id = ",
    USERS,
    ".id ORDER BY friend_id) AS friends"
);

/// Rebuilds a member from a row selected with the [`MEMBER`] column list.
fn hydrate(row: &tokio_postgres::Row) -> Member {
    Member::restore(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        Profile {
            full_name: row.get(2),
            bio: row.get(3),
            profile_pic: row.get(4),
            native_language: row.get(5),
            learning_language: row.get(6),
            location: row.get(7),
        },
        row.get::<_, bool>(8),
        row.get::<_, Vec<uuid::Uuid>>(9)
            .into_iter()
            .map(ID::from)
            .collect(),
    )
}

#[async_trait::async_trait]
impl Accounts for Client {
    async fn create(&self, member: &Member, hashword: &str) -> Result<(), StoreError> {
        let profile = member.profile();
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (id, email, hashword, full_name, bio, profile_pic, native_language, learning_language, location, onboarded)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
            ),
            &[
                &member.id().inner(),
                &member.email(),
                &hashword,
                &profile.full_name,
                &profile.bio,
                &profile.profile_pic,
                &profile.native_language,
                &profile.learning_language,
                &profile.location,
                &member.onboarded(),
            ],
        )
        .await
        .map(|_| ())
        .map_err(StoreError::from)
    }

    async fn lookup(&self, email: &str) -> Result<Option<(Member, String)>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT ", MEMBER, ", hashword FROM ", USERS, " WHERE email = $1"),
            &[&email],
        )
        .await
        .map(|opt| opt.map(|row| (hydrate(&row), row.get::<_, String>(10))))
        .map_err(StoreError::from)
    }

    async fn find(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT ", MEMBER, " FROM ", USERS, " WHERE id = $1"),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.as_ref().map(hydrate))
        .map_err(StoreError::from)
    }

    async fn onboard(
        &self,
        id: ID<Member>,
        form: &Onboarding,
    ) -> Result<Option<Member>, StoreError> {
        let updated = self
            .execute(
                const_format::concatcp!(
                    "UPDATE ",
                    USERS,
                    " SET full_name = $2, bio = $3, native_language = $4, learning_language = $5, location = $6, onboarded = TRUE
                     WHERE id = $1"
                ),
                &[
                    &id.inner(),
                    &form.full_name,
                    &form.bio,
                    &form.native_language,
                    &form.learning_language,
                    &form.location,
                ],
            )
            .await?;
        match updated {
            0 => Ok(None),
            _ => self.find(id).await,
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.execute("SELECT 1", &[])
            .await
            .map(|_| ())
            .map_err(StoreError::from)
    }
}
