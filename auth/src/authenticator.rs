use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

use crate::clock::Clock;
use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::SigningAlgorithm;
use crate::jwt::REFRESH_TOKEN_TYPE;
use crate::jwt::TOKEN_TYPE_CLAIM;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Token type reported to clients alongside a token pair.
pub const BEARER_TOKEN_TYPE: &str = "bearer";

/// Lifetimes of issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl TokenLifetimes {
    pub fn new(access: Duration, refresh: Duration) -> Self {
        Self { access, refresh }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(30),
            refresh: Duration::days(7),
        }
    }
}

/// Access and refresh tokens handed out on login and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: BEARER_TOKEN_TYPE.to_string(),
        }
    }
}

/// Authentication coordinator combining password verification and JWT generation.
///
/// Owns the immutable signing configuration and token lifetimes, and
/// implements the token rules of the service: which token kinds are
/// accepted where, and how a refresh token is exchanged for a new access
/// token.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(JwtError),
}

impl From<JwtError> for AuthenticationError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::InvalidToken(reason) => AuthenticationError::InvalidToken(reason),
            JwtError::EncodingFailed(_) => AuthenticationError::TokenIssuance(err),
        }
    }
}

impl Authenticator {
    /// Create a new authenticator with HS256 and default lifetimes.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_settings(jwt_secret, SigningAlgorithm::default(), TokenLifetimes::default())
    }

    /// Create a new authenticator from explicit settings.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `algorithm` - Signing algorithm
    /// * `lifetimes` - Access and refresh token lifetimes
    pub fn with_settings(
        jwt_secret: &[u8],
        algorithm: SigningAlgorithm,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret, algorithm),
            lifetimes,
        }
    }

    /// Replace the time source used for issuing and validating tokens.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.jwt_handler = self.jwt_handler.with_clock(clock);
        self
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a token pair for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Principal the tokens are issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `TokenIssuance` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair(subject)?)
    }

    /// Issue a fresh access/refresh token pair for `subject`.
    pub fn issue_token_pair(&self, subject: &str) -> Result<TokenPair, JwtError> {
        let access_token = self.issue_access_token(subject)?;
        let refresh_token = self.issue_refresh_token(subject)?;
        Ok(TokenPair::bearer(access_token, refresh_token))
    }

    /// Issue a short-lived access token.
    pub fn issue_access_token(&self, subject: &str) -> Result<String, JwtError> {
        self.jwt_handler.encode(subject, self.lifetimes.access)
    }

    /// Issue a long-lived refresh token, marked with `type = "refresh"`.
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String, JwtError> {
        let extra = HashMap::from([(
            TOKEN_TYPE_CLAIM.to_string(),
            serde_json::Value::from(REFRESH_TOKEN_TYPE),
        )]);
        self.jwt_handler
            .encode_with_claims(subject, self.lifetimes.refresh, extra)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is returned unchanged; there is no rotation.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature or expiry invalid, token is not a
    ///   refresh token, or it carries no subject
    /// * `TokenIssuance` - New access token could not be signed
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthenticationError> {
        let claims = self.jwt_handler.decode(refresh_token)?;

        if !claims.is_refresh() {
            return Err(AuthenticationError::InvalidToken(
                "not a refresh token".to_string(),
            ));
        }

        let subject = Self::subject_of(&claims)?;
        let access_token = self.issue_access_token(subject)?;

        Ok(TokenPair::bearer(access_token, refresh_token.to_string()))
    }

    /// Validate an access token and return its subject.
    ///
    /// Refresh tokens are rejected so they cannot stand in for access tokens.
    ///
    /// # Errors
    /// * `InvalidToken` - Token invalid, a refresh token, or without subject
    pub fn validate_access_token(&self, token: &str) -> Result<String, AuthenticationError> {
        let claims = self.jwt_handler.decode(token)?;

        if claims.is_refresh() {
            return Err(AuthenticationError::InvalidToken(
                "refresh token used as access token".to_string(),
            ));
        }

        Self::subject_of(&claims).map(str::to_string)
    }

    /// Validate and decode a token of any kind.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }

    fn subject_of(claims: &Claims) -> Result<&str, AuthenticationError> {
        claims
            .sub
            .as_deref()
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| AuthenticationError::InvalidToken("missing sub claim".to_string()))
    }
}
