use super::PgErr;
use tokio_postgres::error::SqlState;

/// Failure reported by a store implementation.
///
/// Callers treat every variant except [`StoreError::Duplicate`] as an
/// infrastructure failure: logged in full, surfaced to clients as a
/// generic error, and safe to retry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store call did not finish within {0:?}")]
    Timeout(std::time::Duration),
    #[error("unique constraint violated")]
    Duplicate,
    #[error("postgres: {0}")]
    Postgres(PgErr),
    /// A stored value the schema should have ruled out.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<PgErr> for StoreError {
    fn from(e: PgErr) -> Self {
        match e.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => Self::Duplicate,
            _ => Self::Postgres(e),
        }
    }
}
