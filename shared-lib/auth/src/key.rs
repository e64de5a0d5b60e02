//! HMAC signing key derived from the configured secret.

use std::fmt;

use auth_error::AuthError;
use hmac::{Hmac, Mac};
use jwt::AlgorithmType;
use sha2::{Sha256, Sha384, Sha512};

/// Shortest secret accepted for HMAC signing.
pub const MIN_KEY_BITS: usize = 256;

/// HMAC key; the algorithm follows the secret length.
#[derive(Clone)]
pub(crate) enum SigningKey {
    Hs256(Hmac<Sha256>),
    Hs384(Hmac<Sha384>),
    Hs512(Hmac<Sha512>),
}

impl SigningKey {
    /// Build a key from raw secret bytes.
    ///
    /// 64 bytes or more selects HS512, 48 or more HS384, anything else from
    /// 32 bytes up HS256.
    pub(crate) fn from_secret(secret: &[u8]) -> Result<Self, AuthError> {
        let bits = secret.len() * 8;
        if bits < MIN_KEY_BITS {
            tracing::error!(
                "JWT secret is {} bits, at least {} required",
                bits,
                MIN_KEY_BITS
            );
            return Err(AuthError::WeakKey { bits });
        }

        let key = if bits >= 512 {
            Self::Hs512(Hmac::new_from_slice(secret).map_err(key_setup_failed)?)
        } else if bits >= 384 {
            Self::Hs384(Hmac::new_from_slice(secret).map_err(key_setup_failed)?)
        } else {
            Self::Hs256(Hmac::new_from_slice(secret).map_err(key_setup_failed)?)
        };
        Ok(key)
    }

    pub(crate) fn algorithm(&self) -> AlgorithmType {
        match self {
            Self::Hs256(_) => AlgorithmType::Hs256,
            Self::Hs384(_) => AlgorithmType::Hs384,
            Self::Hs512(_) => AlgorithmType::Hs512,
        }
    }
}

fn key_setup_failed(e: impl fmt::Display) -> AuthError {
    tracing::error!("Failed to create HMAC key: {}", e);
    AuthError::TokenCreationFailed
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey")
            .field(&self.algorithm())
            .field(&"<redacted>")
            .finish()
    }
}
