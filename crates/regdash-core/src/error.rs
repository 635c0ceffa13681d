//! Shared error type across regdash crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Missing or unknown credentials.
    AuthFailed,
    /// Authenticated, but the role does not permit the operation.
    NotAllowed,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Collaborator (backend) failed or is unreachable.
    Unavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::AuthFailed => "AUTH_FAILED",
            ClientCode::NotAllowed => "NOT_ALLOWED",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RegdashError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum RegdashError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("auth failed")]
    AuthFailed,
    #[error("not allowed: {0}")]
    NotAllowed(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RegdashError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RegdashError::BadRequest(_) => ClientCode::BadRequest,
            RegdashError::AuthFailed => ClientCode::AuthFailed,
            RegdashError::NotAllowed(_) => ClientCode::NotAllowed,
            RegdashError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            RegdashError::Unavailable(_) => ClientCode::Unavailable,
            RegdashError::Internal(_) => ClientCode::Internal,
        }
    }
}
