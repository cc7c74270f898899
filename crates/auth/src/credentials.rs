//! Account creation, credential verification, and onboarding.
//!
//! Every store call is bounded; password work runs on the blocking pool.
use super::*;
use tandem_core::AVATAR_COUNT;
use tandem_core::AVATAR_URL;
use tandem_core::ID;
use tandem_database::StoreError;
use tandem_database::bounded;

/// Registers a new account with a random stock avatar.
pub async fn create(accounts: &dyn Accounts, signup: Signup) -> Result<Member, AuthError> {
    let Signup {
        email,
        password: plain,
        full_name,
    } = signup;
    let hashword = blocking(move || password::hash(&plain))
        .await?
        .map_err(|e| AuthError::Internal(format!("password hashing: {}", e)))?;
    let profile = Profile {
        full_name,
        profile_pic: avatar(),
        ..Profile::default()
    };
    let member = Member::new(ID::default(), email, profile);
    match bounded(accounts.create(&member, &hashword)).await {
        Ok(()) => Ok(member),
        Err(StoreError::Duplicate) => Err(AuthError::DuplicateEmail),
        Err(e) => Err(e.into()),
    }
}

/// Checks an email and password pair.
///
/// Unknown emails and wrong passwords fail identically, in comparable time.
pub async fn verify(accounts: &dyn Accounts, email: &str, password: &str) -> Result<Member, AuthError> {
    let found = bounded(accounts.lookup(email)).await?;
    let plain = password.to_string();
    match found {
        Some((member, hashword)) => {
            match blocking(move || password::verify(&plain, &hashword)).await? {
                true => Ok(member),
                false => Err(AuthError::InvalidCredentials),
            }
        }
        None => {
            blocking(move || password::decoy(&plain)).await?;
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Completes a member's profile from an allow-listed form.
///
/// A member deleted since authenticating is reported as unauthorized.
pub async fn onboard(accounts: &dyn Accounts, id: ID<Member>, form: &Onboarding) -> Result<Member, AuthError> {
    bounded(accounts.onboard(id, form))
        .await?
        .ok_or(AuthError::Unauthorized)
}

/// A stock avatar chosen uniformly at random.
pub fn avatar() -> String {
    use rand::Rng;
    let index = rand::rng().random_range(1..=AVATAR_COUNT);
    format!("{}{}.png", AVATAR_URL, index)
}

async fn blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::Internal(format!("blocking task: {}", e)))
}
