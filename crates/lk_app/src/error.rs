use thiserror::Error;

/// Failure classes for backend calls. `Unauthorized` is special-cased at the
/// sync-engine boundary (it expires the session and is never shown as a
/// message of its own); every other variant is a generic operation failure
/// that leaves state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("authorization rejected")]
    Unauthorized,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("malformed response body: {0}")]
    Decode(String),
}

/// Failures from the external sign-in provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("sign-in rejected: {0}")]
    Rejected(String),
    #[error("transport failure: {0}")]
    Transport(String),
}
