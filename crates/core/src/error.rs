//! Domain error model.

use thiserror::Error;

use crate::status::StatusCode;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures that can be detected without
/// talking to the server (validation, malformed identifiers, missing fields).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A request field required to rebuild a typed request was absent.
    #[error("missing field: {0}")]
    MissingField(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::MissingField(name.into())
    }
}

/// The server answered, but refused (or only partly applied) the request.
///
/// This is deliberately distinct from transport failures: the round trip
/// worked and the server reported a status explaining why the operation did
/// not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{operation} failed with status {status}: {message}")]
pub struct RemoteError {
    /// Element name of the node that carried the failing status
    /// (`FbiMsgsRs`, `AddInventoryRs`, ...).
    pub operation: String,
    pub status: StatusCode,
    pub message: String,
    /// The envelope reported success but the operation node did not.
    pub partial: bool,
}

impl RemoteError {
    /// Build an error for `status`, falling back to the documented
    /// description when the server sent no message.
    pub fn new(operation: impl Into<String>, status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| status.description().unwrap_or("unknown status").to_string());
        Self {
            operation: operation.into(),
            status,
            message,
            partial: false,
        }
    }

    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }
}
