//! Stateless session tokens.
//!
//! A session is an HS256-signed JWT carrying a [`SessionClaims`] payload. No
//! session table exists server-side: a token is valid exactly when its
//! signature checks out and `exp` has not passed. The embedded role is a
//! snapshot taken at login, so a later role change only takes effect after
//! the user signs in again. There is no revocation list.

use alovate_core::roles::Role;
use alovate_core::types::UserId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject -- the user's id.
    pub sub: UserId,
    pub email: String,
    /// Role at the moment the token was minted.
    pub role: Role,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit logs.
    pub jti: String,
}

/// Signing secret, lifetime and cookie flags for session tokens.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token and cookie lifetime in seconds.
    pub max_age_secs: i64,
    /// Adds `Secure` to the session cookie (set when served over HTTPS).
    pub cookie_secure: bool,
}

/// Default session lifetime: 30 days.
pub const DEFAULT_SESSION_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Mint a session token for a user who just proved their credentials.
pub fn issue_session_token(
    user_id: UserId,
    email: &str,
    role: Role,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = SessionClaims {
        sub: user_id,
        email: email.to_string(),
        role,
        exp: now + config.max_age_secs,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a session token and return its claims.
///
/// Fails on a bad signature, a malformed token, or an expired `exp`.
pub fn decode_session_token(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SessionConfig {
        SessionConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            max_age_secs: 3600,
            cookie_secure: false,
        }
    }

    fn sign(claims: &SessionClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn issued_token_round_trips_identity_and_role() {
        let config = test_config();
        let id = UserId::now_v7();
        let token = issue_session_token(id, "a@x.com", Role::Admin, &config).unwrap();

        let claims = decode_session_token(&token, &config).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            sub: UserId::now_v7(),
            email: "late@x.com".to_string(),
            role: Role::User,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = sign(&claims, &config.secret);
        assert!(decode_session_token(&token, &config).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_fails() {
        let token =
            issue_session_token(UserId::now_v7(), "a@x.com", Role::User, &test_config()).unwrap();

        let other = SessionConfig {
            secret: "secret-bravo".to_string(),
            ..test_config()
        };
        assert!(decode_session_token(&token, &other).is_err());
    }

    #[test]
    fn tampered_role_claim_fails() {
        let config = test_config();
        let token = issue_session_token(UserId::now_v7(), "a@x.com", Role::User, &config).unwrap();

        // Swap in a payload claiming ADMIN while keeping the USER signature.
        let forged_claims = SessionClaims {
            role: Role::Admin,
            ..decode_session_token(&token, &config).unwrap()
        };
        let forged = sign(&forged_claims, "attacker-secret");
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;
        let spliced = parts.join(".");

        assert!(decode_session_token(&spliced, &config).is_err());
    }

    #[test]
    fn garbage_token_fails() {
        assert!(decode_session_token("not-a-jwt", &test_config()).is_err());
        assert!(decode_session_token("", &test_config()).is_err());
    }
}
