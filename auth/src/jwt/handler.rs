use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Symmetric signing algorithms accepted for service tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS384,
    HS512,
}

impl From<SigningAlgorithm> for Algorithm {
    fn from(algorithm: SigningAlgorithm) -> Self {
        match algorithm {
            SigningAlgorithm::HS256 => Algorithm::HS256,
            SigningAlgorithm::HS384 => Algorithm::HS384,
            SigningAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

/// JWT token handler for encoding and decoding tokens.
///
/// Holds the signing secret and algorithm, fixed at construction. Expiry is
/// checked against the injected [`Clock`] rather than the wall clock so that
/// token lifetimes can be exercised deterministically.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `algorithm` - HMAC variant used to sign and verify
    ///
    /// # Security Notes
    /// - The secret should be at least as long as the HMAC output (32 bytes for HS256)
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], algorithm: SigningAlgorithm) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: algorithm.into(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, subject: &str, ttl: Duration) -> Result<String, JwtError> {
        self.encode_with_claims(subject, ttl, HashMap::new())
    }

    /// Issue a token for `subject` valid for `ttl`, merging `extra` claims.
    ///
    /// Extra claims cannot override `sub`, `exp`, `iat` or `jti`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode_with_claims(
        &self,
        subject: &str,
        ttl: Duration,
        extra: HashMap<String, serde_json::Value>,
    ) -> Result<String, JwtError> {
        let mut claims = Claims::for_subject(subject, self.clock.now(), ttl)?;
        for (key, value) in extra {
            if !matches!(key.as_str(), "sub" | "exp" | "iat" | "jti") {
                claims.extra.insert(key, value);
            }
        }
        self.encode_claims(&claims)
    }

    /// Encode an arbitrary claim set into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token.
    ///
    /// Verifies the signature and algorithm, then requires an `exp` claim
    /// strictly later than the clock's current time.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch, malformed token, wrong
    ///   algorithm, missing expiry or expired
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is enforced below against the injected clock
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))?
            .claims;

        if claims.exp.is_none() {
            return Err(JwtError::InvalidToken("missing exp claim".to_string()));
        }
        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(JwtError::InvalidToken("token expired".to_string()));
        }

        Ok(claims)
    }
}
