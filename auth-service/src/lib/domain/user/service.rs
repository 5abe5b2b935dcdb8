use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenPair;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation of the authentication flows.
///
/// Concrete implementation of AuthServicePort with the user store and the
/// token authenticator injected at construction.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Argon2 is CPU-bound, so it runs on the blocking pool.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await?
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    async fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = stored_hash.to_string();

        Ok(tokio::task::spawn_blocking(move || {
            authenticator.verify_password(&password, &stored_hash)
        })
        .await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, AuthError> {
        let email = user.email.clone();
        self.repository.create(user).await.map_err(|e| {
            let err = AuthError::from(e);
            if err == AuthError::UserExists {
                tracing::warn!(email = %email, "Registration lost race on unique email");
            }
            err
        })
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::UserExists);
        }

        let password_hash = self.hash_password(&command.password).await?;

        let user = self
            .create_user(NewUser {
                email: command.email,
                password_hash,
                is_superuser: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    async fn verify_credentials(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            tracing::warn!("Login attempt rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::warn!("Login attempt rejected");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AuthError> {
        let user = self
            .verify_credentials(&command.email, &command.password)
            .await?;

        let tokens = self
            .authenticator
            .issue_token_pair(user.email.as_str())
            .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.authenticator
            .refresh(refresh_token)
            .map_err(|e| match e {
                AuthenticationError::InvalidToken(reason) => {
                    tracing::warn!(reason = %reason, "Refresh token rejected");
                    AuthError::InvalidToken
                }
                other => AuthError::Internal(other.to_string()),
            })
    }

    async fn resolve_current_user(&self, token: &str) -> Result<User, AuthError> {
        let subject = self
            .authenticator
            .validate_access_token(token)
            .map_err(|e| {
                tracing::warn!("Access token validation failed: {}", e);
                AuthError::Unauthorized
            })?;

        self.repository
            .find_by_email(&subject)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Access token subject no longer exists");
                AuthError::Unauthorized
            })
    }

    async fn bootstrap_superuser(
        &self,
        email: EmailAddress,
        password: &str,
    ) -> Result<User, AuthError> {
        if let Some(existing) = self.repository.find_by_email(email.as_str()).await? {
            if !existing.is_superuser {
                tracing::warn!(
                    user_id = %existing.id,
                    "Configured superuser email belongs to a regular user"
                );
            }
            return Ok(existing);
        }

        let password_hash = self.hash_password(password).await?;

        match self
            .create_user(NewUser {
                email: email.clone(),
                password_hash,
                is_superuser: true,
            })
            .await
        {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Superuser created");
                Ok(user)
            }
            // Another instance created it concurrently
            Err(AuthError::UserExists) => self
                .repository
                .find_by_email(email.as_str())
                .await?
                .ok_or(AuthError::Internal("Superuser vanished after conflict".to_string())),
            Err(e) => Err(e),
        }
    }
}
