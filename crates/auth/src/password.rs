//! Argon2 password hashing.
//!
//! Hashes are PHC strings carrying their own salt and parameters, so
//! verification needs nothing but the stored string. Comparison inside
//! `verify_password` is constant-time.
use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::SaltString;
use std::sync::OnceLock;

fn salt() -> Result<SaltString, argon2::password_hash::Error> {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes)
}

pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
}

pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Spends one verification's worth of work against a throwaway hash.
///
/// Run when the account does not exist so a failed login costs the same
/// whether or not the email is registered.
pub fn decoy(password: &str) {
    static DECOY: OnceLock<String> = OnceLock::new();
    let hashword = DECOY.get_or_init(|| hash("decoy-password").unwrap_or_default());
    verify(password, hashword);
}
