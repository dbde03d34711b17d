//! Admin bearer-token authentication

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;
use crate::store::models::AdminUser;

/// Claims carried in an admin token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Admin user id
    pub sub: u64,
    pub username: String,
    pub role: String,
    /// Expiry, seconds since epoch
    pub exp: i64,
}

/// Issues and verifies admin JWTs with a process-wide HMAC secret.
pub struct TokenAuthority {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenAuthority {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, admin: &AdminUser) -> Result<String, PortalError> {
        let claims = AdminClaims {
            sub: admin.id,
            username: admin.username.clone(),
            role: admin.role.clone(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| PortalError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, PortalError> {
        decode::<AdminClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| PortalError::InvalidToken)
    }
}

/// Extract and verify the `Authorization: Bearer` token from request headers.
pub fn require_admin(
    authority: &TokenAuthority,
    headers: &HeaderMap,
) -> Result<AdminClaims, PortalError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(PortalError::NoToken)?;
    authority.verify(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminUser {
        AdminUser {
            id: 7,
            username: "registrar".to_string(),
            password_hash: String::new(),
            email: "registrar@srivasaviengg.ac.in".to_string(),
            full_name: "College Registrar".to_string(),
            role: "admin".to_string(),
            is_first_login: false,
            last_login: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let authority = TokenAuthority::new("test-secret", 24);
        let token = authority.issue(&admin()).unwrap();
        let claims = authority.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "registrar");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenAuthority::new("secret-a", 24);
        let verifier = TokenAuthority::new("secret-b", 24);
        let token = issuer.issue(&admin()).unwrap();
        assert!(matches!(
            verifier.verify(&token),
            Err(PortalError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let authority = TokenAuthority::new("test-secret", -1);
        let token = authority.issue(&admin()).unwrap();
        assert!(matches!(
            authority.verify(&token),
            Err(PortalError::InvalidToken)
        ));
    }
}
