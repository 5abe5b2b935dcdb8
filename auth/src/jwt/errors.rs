use thiserror::Error;

/// Error type for JWT operations.
///
/// Every decode failure (bad signature, malformed token, wrong algorithm,
/// expired) is reported as `InvalidToken`. The message is meant for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}
