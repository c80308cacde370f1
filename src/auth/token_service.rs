//! Stateless session tokens signed with HMAC-SHA256.
//!
//! A token carries the full [`Identity`] plus issue and expiry timestamps.
//! Nothing is persisted: a token is valid while its signature checks out and
//! the injected clock has not passed its expiry.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::models::{AuthError, Identity, Role};
use crate::domain::UserId;
use crate::errors::{Error, Result};

/// Default session lifetime.
pub const DEFAULT_TTL_SECONDS: u64 = 900;

/// Longest accepted session lifetime (7 days).
pub const MAX_TTL_SECONDS: u64 = 604_800;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and validates session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl_seconds", &self.ttl_seconds).finish()
    }
}

impl TokenService {
    /// Create a token service signing with `secret`.
    ///
    /// Expiry is enforced against `clock` rather than the system time so tests
    /// can move time forward.
    pub fn new(secret: &[u8], ttl_seconds: u64, clock: Arc<dyn Clock>) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::config("token secret must not be empty"));
        }
        if ttl_seconds == 0 || ttl_seconds > MAX_TTL_SECONDS {
            return Err(Error::config(format!("invalid token ttl: {}", ttl_seconds)));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
            clock,
        })
    }

    /// Sign a token for `identity` expiring `ttl_seconds` from now.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = self.clock.utc().timestamp();
        let claims = Claims {
            sub: identity.subject_id.to_string(),
            name: identity.display_name.clone(),
            email: identity.email.clone(),
            role: identity.role,
            iat: now,
            exp: now
                .checked_add_unsigned(self.ttl_seconds)
                .ok_or_else(|| Error::Token("session token expiry out of range".to_string()))?,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| Error::Token(format!("failed to sign session token: {}", err)))
    }

    /// Validate `token` and recover the identity it was issued for.
    ///
    /// Every failure is reported as [`AuthError::InvalidToken`]; the reason is
    /// only logged.
    pub fn validate(&self, token: &str) -> std::result::Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            debug!(error = %err, "session token rejected");
            AuthError::InvalidToken
        })?;
        let claims = data.claims;

        if self.clock.utc().timestamp() > claims.exp {
            debug!(exp = claims.exp, "session token expired");
            return Err(AuthError::InvalidToken);
        }

        let subject_id = claims.sub.parse::<UserId>().map_err(|err| {
            debug!(error = %err, "session token subject is not an account id");
            AuthError::InvalidToken
        })?;

        Ok(Identity::new(subject_id, claims.name, claims.email, claims.role))
    }

    pub fn expiry_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    pub fn expiry_minutes(&self) -> f64 {
        self.ttl_seconds as f64 / 60.0
    }

    pub fn expiry_hours(&self) -> f64 {
        self.ttl_seconds as f64 / 3600.0
    }
}
