//! Integration tests for tokens shared between services
//!
//! The user service issues tokens; the notification service only holds the
//! secret and verifies what callers present.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

use auth_token::{AuthError, FixedClock, JwtConfig, TokenService};
use serde_json::Value;

const SECRET: &str = "shared-secret-for-user-and-notification-services";
const NOW_MS: i64 = 1_712_000_000_000;

fn user_service() -> TokenService<FixedClock> {
    let config = JwtConfig::new(SECRET, 14_400_000);
    TokenService::with_clock(&config, FixedClock::from_millis(NOW_MS).unwrap()).unwrap()
}

fn notification_service(now_ms: i64) -> TokenService<FixedClock> {
    let config: JwtConfig =
        serde_json::from_str(&format!(r#"{{"jwtSecret":"{}"}}"#, SECRET)).unwrap();
    TokenService::with_clock(&config, FixedClock::from_millis(now_ms).unwrap()).unwrap()
}

#[test]
fn test_issued_token_accepted_by_other_service() {
    let token = user_service()
        .issue("42", ["ROLE_USER", "ROLE_ADMIN"])
        .unwrap();

    let verifier = notification_service(NOW_MS + 1_000);
    assert!(verifier.validate(&token));
    assert_eq!(verifier.subject(&token).unwrap(), "42");
    assert_eq!(verifier.claim(&token, "roles").unwrap(), "ROLE_USER,ROLE_ADMIN");

    let claims = verifier.verify(&token).unwrap();
    assert!(claims.has_role("ROLE_ADMIN"));
}

#[test]
fn test_token_rejected_after_issuer_lifetime() {
    let token = user_service().issue("42", ["ROLE_USER"]).unwrap();

    // the issuer's lifetime is baked into `exp`, not the verifier's setting
    let verifier = notification_service(NOW_MS + 14_400_000);
    assert!(!verifier.validate(&token));
    assert_eq!(verifier.subject(&token), Err(AuthError::TokenExpired));
}

#[test]
fn test_other_secret_rejected() {
    let token = user_service().issue("42", ["ROLE_USER"]).unwrap();

    let config = JwtConfig::new("another-secret-that-is-also-forty-eight-bytes-!!", 60_000);
    let clock = FixedClock::from_millis(NOW_MS).unwrap();
    let stranger = TokenService::with_clock(&config, clock).unwrap();
    assert!(!stranger.validate(&token));
    assert_eq!(stranger.subject(&token), Err(AuthError::SignatureMismatch));
}

#[test]
fn test_any_tampered_character_rejected() {
    let service = user_service();
    let token = service.issue("42", ["ROLE_USER"]).unwrap();
    let payload_start = token.find('.').unwrap() + 1;

    for i in payload_start..token.len() {
        let original = token.as_bytes()[i];
        if original == b'.' {
            continue;
        }
        let replacement = if original == b'A' { 'B' } else { 'A' };
        let mut tampered = token.clone();
        tampered.replace_range(i..i + 1, &replacement.to_string());
        assert!(!service.validate(&tampered), "accepted tampering at {}", i);
    }
}

#[test]
fn test_custom_claims_for_notifications() {
    let mut claims = BTreeMap::new();
    claims.insert("notificationId".to_string(), Value::from("n-1001"));
    claims.insert("priority".to_string(), Value::from(5));
    let token = user_service().issue_with_claims("42", claims).unwrap();

    let verifier = notification_service(NOW_MS);
    assert_eq!(verifier.claim(&token, "notificationId").unwrap(), "n-1001");
    assert_eq!(verifier.claim(&token, "priority").unwrap(), "5");
    assert_eq!(
        verifier.claim(&token, "roles"),
        Err(AuthError::ClaimNotFound("roles".to_string()))
    );
}

#[test]
fn test_shared_across_threads() {
    let service = Arc::new(user_service());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let subject = format!("user-{}", i);
                let token = service.issue(subject.as_str(), ["ROLE_USER"]).unwrap();
                assert!(service.validate(&token));
                service.subject(&token).unwrap() == subject
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
