use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::errors::UserError;

/// Port for the authentication flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user with a hashed password.
    ///
    /// # Arguments
    /// * `command` - Validated email and plaintext password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UserExists` - Email is already registered
    /// * `Internal` - Hashing or store failure
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError>;

    /// Look up a user by email and check the password.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (not distinguished)
    /// * `Internal` - Store failure
    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Internal` - Token issuance or store failure
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError>;

    /// Exchange a refresh token for a new access token.
    ///
    /// # Returns
    /// New access token with the presented refresh token echoed back
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, expired, not a refresh token, or no subject
    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Resolve a bearer access token to the user it authenticates.
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, a refresh token, without subject,
    ///   or the subject no longer exists
    /// * `Internal` - Store failure
    async fn resolve_current_user(&self, token: &str) -> Result<User, AuthError>;

    /// Make sure a superuser with `email` exists, creating it if absent.
    ///
    /// An existing user with that email is returned as is.
    ///
    /// # Errors
    /// * `Internal` - Hashing or store failure
    async fn bootstrap_superuser(
        &self,
        email: EmailAddress,
        password: &str,
    ) -> Result<User, AuthError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User fields; the id is assigned by the store
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Arguments
    /// * `email` - Email address string
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
