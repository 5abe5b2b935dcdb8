use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error raised by the user store
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Unique constraint on email fired on insert
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Errors surfaced by the authentication flows.
///
/// Display strings are the generic messages returned to clients; they never
/// reveal whether an email is registered or why a token was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("user exists")]
    UserExists,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid token")]
    InvalidToken,

    #[error("not authenticated")]
    Unauthorized,

    #[error("not enough privileges")]
    Forbidden,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => AuthError::UserExists,
            UserError::InvalidEmail(e) => AuthError::InvalidEmail(e),
            UserError::DatabaseError(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Blocking task failed: {}", err))
    }
}
