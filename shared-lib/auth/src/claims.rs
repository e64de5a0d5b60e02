//! JWT claims carried in the token payload.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claim name holding the comma-joined role list.
pub const ROLES_CLAIM: &str = "roles";

/// Claim names owned by the token service itself.
pub(crate) const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Every other claim, `roles` included
    #[serde(flatten)]
    pub custom: BTreeMap<String, Value>,
}

impl Claims {
    /// Create claims valid from `issued_at_ms` for `ttl_ms` milliseconds.
    ///
    /// Returns `None` when the expiration instant does not fit in an `i64`.
    pub fn new(subject: impl Into<String>, issued_at_ms: i64, ttl_ms: i64) -> Option<Self> {
        let expires_at_ms = issued_at_ms.checked_add(ttl_ms)?;
        Some(Self {
            sub: subject.into(),
            iat: issued_at_ms.div_euclid(1000),
            exp: expires_at_ms.div_euclid(1000),
            custom: BTreeMap::new(),
        })
    }

    /// Attach a custom claim. Reserved names are ignored.
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if !RESERVED_CLAIMS.contains(&name.as_str()) {
            self.custom.insert(name, value.into());
        }
        self
    }

    /// Attach the role list as one comma-joined claim.
    pub fn with_roles<I, R>(self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<str>,
    {
        let joined = roles
            .into_iter()
            .map(|r| r.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.with_claim(ROLES_CLAIM, joined)
    }

    /// The raw `roles` claim, if the token carries one.
    pub fn roles(&self) -> Option<&str> {
        self.custom.get(ROLES_CLAIM).and_then(Value::as_str)
    }

    /// Individual role names.
    pub fn role_list(&self) -> Vec<&str> {
        self.roles()
            .map(|r| r.split(',').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Check whether the user holds a role.
    pub fn has_role(&self, role: &str) -> bool {
        self.role_list().contains(&role)
    }

    /// String form of a claim: strings verbatim, other values as JSON text.
    pub fn get(&self, name: &str) -> Option<String> {
        match name {
            "sub" => Some(self.sub.clone()),
            "iat" => Some(self.iat.to_string()),
            "exp" => Some(self.exp.to_string()),
            _ => match self.custom.get(name)? {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            },
        }
    }

    /// Check if the claims have expired at `now_ms`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.exp.saturating_mul(1000)
    }
}
