//! JWT issuing and verification.

use std::collections::BTreeMap;

use auth_error::{AppError, AuthError};
use chrono::Duration;
use jwt::{AlgorithmType, SignWithKey, VerifyWithKey};
use serde_json::Value;

use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::config::JwtConfig;
use crate::key::SigningKey;

/// Issues and verifies HMAC-signed compact tokens.
///
/// Holds only the immutable key and lifetime, so one instance can be cloned
/// or shared across request handlers freely.
#[derive(Debug, Clone)]
pub struct TokenService<C = SystemClock> {
    key: SigningKey,
    ttl_ms: i64,
    clock: C,
}

impl TokenService {
    /// Create a token service reading the wall clock.
    pub fn new(config: &JwtConfig) -> Result<Self, AppError> {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> TokenService<C> {
    /// Create a token service with a custom time source.
    pub fn with_clock(config: &JwtConfig, clock: C) -> Result<Self, AppError> {
        config.validate()?;
        let key = SigningKey::from_secret(config.jwt_secret.as_bytes())?;
        tracing::info!(
            "Token service ready: {:?}, lifetime {} ms",
            key.algorithm(),
            config.jwt_expiration_ms
        );
        Ok(Self {
            key,
            ttl_ms: config.jwt_expiration_ms,
            clock,
        })
    }

    /// Signing algorithm in use.
    pub fn algorithm(&self) -> AlgorithmType {
        self.key.algorithm()
    }

    /// Lifetime of issued tokens.
    pub fn ttl(&self) -> Duration {
        Duration::milliseconds(self.ttl_ms)
    }

    /// Issue a token for a user with its roles joined into the `roles` claim.
    pub fn issue<I, R>(&self, subject: impl Into<String>, roles: I) -> Result<String, AuthError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        self.sign(self.claims_for(subject)?.with_roles(roles))
    }

    /// Issue a token carrying arbitrary named claims.
    ///
    /// `sub`, `iat` and `exp` entries in `claims` are ignored.
    pub fn issue_with_claims(
        &self,
        subject: impl Into<String>,
        claims: BTreeMap<String, Value>,
    ) -> Result<String, AuthError> {
        let claims = claims
            .into_iter()
            .fold(self.claims_for(subject)?, |acc, (name, value)| acc.with_claim(name, value));
        self.sign(claims)
    }

    /// Decode and validate a token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::MalformedToken("token is empty".to_string()));
        }

        // Only the JSON shape is checked before the signature; field types after.
        let decoded: Result<BTreeMap<String, Value>, jwt::Error> = match &self.key {
            SigningKey::Hs256(key) => token.verify_with_key(key),
            SigningKey::Hs384(key) => token.verify_with_key(key),
            SigningKey::Hs512(key) => token.verify_with_key(key),
        };
        let payload = decoded.map_err(|e| {
            tracing::warn!("Failed to decode JWT: {}", e);
            rejection(e)
        })?;

        let claims: Claims = serde_json::from_value(Value::Object(payload.into_iter().collect()))
            .map_err(|e| {
                tracing::warn!("Signed JWT has unexpected claims: {}", e);
                AuthError::MalformedToken(e.to_string())
            })?;

        if claims.is_expired_at(self.now_ms()) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Subject of a valid token.
    pub fn subject(&self, token: &str) -> Result<String, AuthError> {
        self.verify(token).map(|claims| claims.sub)
    }

    /// String form of a named claim of a valid token.
    pub fn claim(&self, token: &str, name: &str) -> Result<String, AuthError> {
        self.verify(token)?
            .get(name)
            .ok_or_else(|| AuthError::ClaimNotFound(name.to_string()))
    }

    /// Check a token, logging why it was rejected.
    pub fn validate(&self, token: &str) -> bool {
        match self.verify(token) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!("Invalid JWT token: {}", e);
                false
            }
        }
    }

    fn claims_for(&self, subject: impl Into<String>) -> Result<Claims, AuthError> {
        Claims::new(subject, self.now_ms(), self.ttl_ms).ok_or_else(|| {
            tracing::error!("Token expiration overflows with lifetime {} ms", self.ttl_ms);
            AuthError::TokenCreationFailed
        })
    }

    fn sign(&self, claims: Claims) -> Result<String, AuthError> {
        tracing::debug!("Issuing token for subject {}", claims.sub);
        let signed: Result<String, jwt::Error> = match &self.key {
            SigningKey::Hs256(key) => claims.sign_with_key(key),
            SigningKey::Hs384(key) => claims.sign_with_key(key),
            SigningKey::Hs512(key) => claims.sign_with_key(key),
        };
        signed.map_err(|e| {
            tracing::error!("Failed to encode JWT: {}", e);
            AuthError::TokenCreationFailed
        })
    }

    fn now_ms(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }
}

fn rejection(err: jwt::Error) -> AuthError {
    match err {
        jwt::Error::InvalidSignature
        | jwt::Error::RustCryptoMac(_)
        | jwt::Error::AlgorithmMismatch(..) => AuthError::SignatureMismatch,
        other => AuthError::MalformedToken(other.to_string()),
    }
}
