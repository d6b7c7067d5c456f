/// Error taxonomy shared by every service in the workspace.
///
/// Mutating operations validate preconditions inside the lock-holding
/// transaction and return one of these without leaving partial writes
/// behind. Surrounding layers map the variants to status codes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Expired: {0}")]
    Expired(String),
}

impl Error {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("{} {}", entity, id))
    }

    pub fn transition(from: impl std::fmt::Debug, to: impl std::fmt::Debug) -> Self {
        Error::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
