//! Authentication utilities library
//!
//! Provides the authentication core of the service:
//! - Password hashing (Argon2id)
//! - Signed, expiring JWT access and refresh tokens
//! - An injectable clock for token issuance and expiry
//! - Authentication coordination (login, refresh, access validation)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtHandler, SigningAlgorithm};
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", SigningAlgorithm::HS256);
//! let token = handler.encode("a@x.com", Duration::minutes(30)).unwrap();
//! let claims = handler.decode(&token).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("a@x.com"));
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a token pair
//! let pair = auth.authenticate("password123", &hash, "a@x.com").unwrap();
//!
//! // Use the access token
//! let subject = auth.validate_access_token(&pair.access_token).unwrap();
//! assert_eq!(subject, "a@x.com");
//!
//! // Renew it with the refresh token
//! let renewed = auth.refresh(&pair.refresh_token).unwrap();
//! assert_eq!(renewed.refresh_token, pair.refresh_token);
//! ```

pub mod authenticator;
pub mod clock;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenLifetimes;
pub use authenticator::TokenPair;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SigningAlgorithm;
pub use password::PasswordError;
pub use password::PasswordHasher;
