use super::*;
use serde::Deserialize;
use serde::Serialize;
use tandem_core::MIN_PASSWORD_LENGTH;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "displayName")]
    pub full_name: Option<String>,
}

/// A signup that passed boundary validation. The email is normalized.
#[derive(Debug)]
pub struct Signup {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl SignupRequest {
    pub fn validate(self) -> Result<Signup, AuthError> {
        let (Some(email), Some(password), Some(full_name)) = (
            present(self.email),
            self.password.filter(|p| !p.is_empty()),
            present(self.full_name),
        ) else {
            return Err(AuthError::Validation("All fields are required".into()));
        };
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("Invalid email format".into()));
        }
        Ok(Signup {
            email: normalize(&email),
            password,
            full_name,
        })
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns the normalized email and the password.
    pub fn validate(self) -> Result<(String, String), AuthError> {
        match (present(self.email), self.password.filter(|p| !p.is_empty())) {
            (Some(email), Some(password)) => Ok((normalize(&email), password)),
            _ => Err(AuthError::Validation(
                "Email and password are required".into(),
            )),
        }
    }
}

/// Onboarding body. Only these fields are read; anything else a client
/// sends (flags, email, friends) is ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardRequest {
    #[serde(default, alias = "displayName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub native_language: Option<String>,
    #[serde(default)]
    pub learning_language: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Validated onboarding form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Onboarding {
    pub full_name: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
}

impl OnboardRequest {
    pub fn validate(self) -> Result<Onboarding, AuthError> {
        let fields = [
            ("fullName", present(self.full_name)),
            ("bio", present(self.bio)),
            ("nativeLanguage", present(self.native_language)),
            ("learningLanguage", present(self.learning_language)),
            ("location", present(self.location)),
        ];
        let missing = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(AuthError::Validation(format!(
                "All fields are required, missing: {}",
                missing.join(", ")
            )));
        }
        let [full_name, bio, native_language, learning_language, location] =
            fields.map(|(_, value)| value.unwrap_or_default());
        Ok(Onboarding {
            full_name,
            bio,
            native_language,
            learning_language,
            location,
        })
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: Member,
}

impl From<Member> for AuthResponse {
    fn from(user: Member) -> Self {
        Self {
            success: true,
            user,
        }
    }
}

/// Trimmed, non-blank text.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Canonical form used for email storage and lookup.
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
