use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::JwtError;

/// Claim name carrying the token kind discriminator.
pub const TOKEN_TYPE_CLAIM: &str = "type";

/// Value of the `type` claim on refresh tokens.
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// JWT claim set.
///
/// Registered claims used by the service plus custom fields via `extra`.
/// All registered fields are optional so that tokens missing one of them
/// still deserialize and can be rejected with a precise reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (the user's email)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique token identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create claims for a subject valid from `now` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Principal identifier (email)
    /// * `now` - Issue instant
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, exp, iat and a random jti set
    ///
    /// # Errors
    /// * `EncodingFailed` - `now + ttl` is not a representable instant
    pub fn for_subject(
        subject: impl ToString,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::EncodingFailed(format!("expiry overflows: ttl {}", ttl)))?;

        Ok(Self {
            sub: Some(subject.to_string()),
            exp: Some(expires_at.timestamp()),
            iat: Some(now.timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
            extra: HashMap::new(),
        })
    }

    /// Set subject.
    pub fn with_subject(mut self, sub: impl ToString) -> Self {
        self.sub = Some(sub.to_string());
        self
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }

    /// Token kind from the `type` claim, if present and a string.
    pub fn token_type(&self) -> Option<&str> {
        self.extra.get(TOKEN_TYPE_CLAIM).and_then(|v| v.as_str())
    }

    /// Whether this claim set is marked as a refresh token.
    pub fn is_refresh(&self) -> bool {
        self.token_type() == Some(REFRESH_TOKEN_TYPE)
    }

    /// Check if token is expired.
    ///
    /// A token is only valid while its expiry is strictly in the future,
    /// so a token whose `exp` equals the current second is expired.
    /// Claims without `exp` are treated as expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp.map_or(true, |exp| exp <= current_timestamp)
    }
}
