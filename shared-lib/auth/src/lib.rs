//! Authentication library for microservices.
//!
//! This crate issues and verifies compact HMAC-signed JWTs. Tokens are
//! stateless: validity is the signature plus the `exp` claim, nothing is
//! stored server side.
//!
//! ```no_run
//! use auth_token::{JwtConfig, TokenService};
//!
//! let config = JwtConfig::from_env()?;
//! let tokens = TokenService::new(&config)?;
//!
//! let token = tokens.issue("42", ["ROLE_USER", "ROLE_ADMIN"])?;
//! if tokens.validate(&token) {
//!     let user_id = tokens.subject(&token)?;
//!     let roles = tokens.claim(&token, "roles")?;
//!     println!("{user_id}: {roles}");
//! }
//! # Ok::<(), auth_token::AppError>(())
//! ```

mod claims;
mod clock;
mod config;
mod jwt;
mod key;

pub use auth_error::{AppError, AuthError, ConfigError};
pub use claims::{Claims, ROLES_CLAIM};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{JwtConfig, DEFAULT_EXPIRATION_MS, EXPIRATION_ENV, SECRET_ENV};
pub use jwt::TokenService;
pub use key::MIN_KEY_BITS;
pub use ::jwt::AlgorithmType;
