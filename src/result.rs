#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemas", derive(JsonSchema))]
#[serde(tag = "type")]
pub enum Error {
    /// No authenticated identity where one is required
    Unauthorized,
    /// Creator is at or above their invitation quota
    QuotaExceeded,
    /// Registration submitted without an invite code
    CodeRequired,
    /// Code does not exist or has already been redeemed
    InvalidCode,
    /// Invitation (or its creator) could not be resolved
    NotFound,
    /// Invitation has already been claimed by another identity
    AlreadyUsed,

    /// The store reported no created record
    CreationFailed,
    /// The new identity could not be linked to its invitation
    UpdateUserFailed,
    /// The record was still present after deletion
    RevokeFailed,
    /// The store errored while fetching invitations
    FetchFailed,

    /// Raw store failure; re-wrapped at checkpoint boundaries
    DatabaseError {
        operation: &'static str,
        with: &'static str,
    },
    /// Catch-all for unexpected failures, cause preserved
    ProcessFailed {
        cause: String,
    },
}

impl Error {
    /// Wrap anything that is not already a domain error into `ProcessFailed`
    pub fn into_process_failed(self) -> Error {
        match self {
            Error::DatabaseError { operation, with } => Error::ProcessFailed {
                cause: format!("database error: {} on {}", operation, with),
            },
            error => error,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type Success = Result<()>;
