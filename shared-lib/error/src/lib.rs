//! Common error types for microservices.
//!
//! This crate provides the error taxonomy shared by every service that
//! issues or verifies tokens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Token-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is not a well-formed compact JWS or its payload is unreadable.
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Tampered token, wrong key or wrong algorithm.
    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token expired")]
    TokenExpired,

    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Token creation failed")]
    TokenCreationFailed,

    /// The signing secret is shorter than 256 bits.
    #[error("Signing key is too weak: {bits} bits, at least 256 required")]
    WeakKey { bits: usize },
}

impl AuthError {
    /// Whether the error means the caller presented a bad token.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MalformedToken(_) | Self::SignatureMismatch | Self::TokenExpired
        )
    }

    /// HTTP status a request handler should answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_rejection() {
            401
        } else {
            500
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Missing configuration value: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {name}: {value}")]
    Invalid { name: String, value: String },
}

/// Error response for API clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let (code, message) = match &err {
            AuthError::MalformedToken(_) => ("AUTH_MALFORMED_TOKEN", "Malformed token"),
            AuthError::SignatureMismatch => ("AUTH_SIGNATURE_MISMATCH", "Invalid token signature"),
            AuthError::TokenExpired => ("AUTH_TOKEN_EXPIRED", "Token has expired"),
            AuthError::ClaimNotFound(_) => ("AUTH_CLAIM_NOT_FOUND", "Required claim is missing"),
            AuthError::TokenCreationFailed => ("AUTH_TOKEN_CREATION_FAILED", "Failed to create token"),
            AuthError::WeakKey { .. } => ("AUTH_WEAK_KEY", "Signing key is misconfigured"),
        };
        let response = Self::new(code, message);
        match err {
            AuthError::MalformedToken(reason) => response.with_details(reason),
            AuthError::ClaimNotFound(name) => response.with_details(name),
            _ => response,
        }
    }
}

impl From<ConfigError> for ErrorResponse {
    fn from(err: ConfigError) -> Self {
        Self::new("CONFIG_INVALID", "Service is misconfigured").with_details(err.to_string())
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Auth(e) => e.into(),
            AppError::Config(e) => e.into(),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
