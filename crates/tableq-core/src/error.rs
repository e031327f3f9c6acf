//! Error types for tableq-core
//!
//! Every failure a core operation can report is a named variant here, so the
//! boundary layer can translate it into a user-facing response without
//! parsing messages.

use thiserror::Error;

/// Core error type for waitlist, outcome and ledger operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Enqueue or insert of a username that is already waiting
    #[error("'{0}' is already in the queue")]
    AlreadyQueued(String),

    /// Removal of a username that is not waiting
    #[error("'{0}' is not in the queue")]
    NotQueued(String),

    /// Remove-top on an empty queue
    #[error("the queue is empty")]
    QueueEmpty,

    /// Insert target outside `1..=len+1`
    #[error("invalid position {position}: must be between 1 and {max}")]
    InvalidPosition { position: usize, max: usize },

    /// Game reported by someone who is not at the table
    #[error("'{0}' can only report games while at the table")]
    NotEligible(String),

    /// Winner/loser missing or identical
    #[error("invalid game report: {0}")]
    InvalidReport(String),

    /// Winner or loser is not one of the two players at the table
    #[error("'{winner}' and '{loser}' must both be at the table")]
    PlayersNotAtTable { winner: String, loser: String },

    /// Ledger record does not exist
    #[error("user not found: {0}")]
    NotFound(String),

    /// Ledger already holds this username
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// Username rejected by registration rules
    #[error("invalid username: {0}")]
    InvalidUsername(String),

    /// Credential token could not be verified
    #[error("invalid token")]
    InvalidToken,

    /// Administrative operation attempted without the admin capability
    #[error("admin access required for '{0}'")]
    AdminRequired(String),

    /// Identity provider or ledger failed to answer
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration value rejected
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration or state file could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Filesystem failure
    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    /// Create a service-unavailable error from any collaborator failure.
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::ServiceUnavailable(msg.into())
    }

    /// Create a configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an io error.
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether the error left every piece of state untouched because the
    /// request itself was rejected.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::ServiceUnavailable(_) | Self::Io(_) | Self::Parse(_) | Self::InvalidConfig(_)
        )
    }

    /// Process exit code for the CLI.
    ///
    /// - 1: the request was malformed or not allowed
    /// - 2: the request conflicts with current state
    /// - 3: a collaborator or the environment failed
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidPosition { .. }
            | Self::NotEligible(_)
            | Self::InvalidReport(_)
            | Self::PlayersNotAtTable { .. }
            | Self::InvalidUsername(_)
            | Self::InvalidToken
            | Self::AdminRequired(_)
            | Self::InvalidConfig(_)
            | Self::Parse(_) => 1,
            Self::AlreadyQueued(_)
            | Self::NotQueued(_)
            | Self::QueueEmpty
            | Self::NotFound(_)
            | Self::DuplicateUsername(_) => 2,
            Self::ServiceUnavailable(_) | Self::Io(_) => 3,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

/// Result type alias for tableq-core operations
pub type Result<T> = std::result::Result<T, Error>;
