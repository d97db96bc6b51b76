//! JWT session token generation and validation
//! Stateless HS256 tokens carrying identity + role; no server-side revocation

use crate::{auth::middleware::AuthContext, config::AppConfig, error::AppError, models::user::Role};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Session lifetime: 7 days
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Minimum HS256 secret length
const MIN_SECRET_LEN: usize = 32;

/// JWT claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID)
    pub id: String,

    pub email: String,

    pub role: Role,

    /// Issued at
    pub iat: i64,

    /// Expiration
    pub exp: i64,
}

/// Why a presented token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("signature does not match")]
    SignatureInvalid,

    #[error("token expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => VerificationError::SignatureInvalid,
            ErrorKind::ExpiredSignature => VerificationError::Expired,
            _ => VerificationError::Malformed,
        }
    }
}

/// Signs and verifies session tokens.
///
/// Callers only depend on this trait, so a denylist check can later be slotted
/// in front of signature verification without touching the gate or handlers.
pub trait TokenCodec: Send + Sync {
    /// Issue a token for `identity` that expires `ttl` from now
    fn issue(&self, identity: &AuthContext, ttl: Duration) -> Result<String, AppError>;

    /// Check signature and expiry, returning the embedded claims
    fn verify(&self, token: &str) -> Result<Claims, VerificationError>;
}

pub type SharedTokenCodec = Arc<dyn TokenCodec>;

/// JWT service
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Create JWT service from a raw secret
    pub fn new(secret: &str) -> Result<Self, AppError> {
        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < MIN_SECRET_LEN {
            return Err(AppError::Config("JWT secret too short (min 32 chars)".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Create JWT service from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(config.security.jwt_secret.expose_secret())
    }

    /// Issue a token with the standard session lifetime
    pub fn issue_session(&self, identity: &AuthContext) -> Result<String, AppError> {
        self.issue(identity, Duration::seconds(SESSION_TTL_SECS))
    }
}

impl TokenCodec for JwtService {
    fn issue(&self, identity: &AuthContext, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now + ttl;

        let claims = Claims {
            id: identity.id.to_string(),
            email: identity.email.clone(),
            role: identity.role,
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            AppError::Internal(format!("Failed to encode session token: {}", e))
        })
    }

    fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token validation failed: {:?}", e);
                VerificationError::from(e)
            })?;

        // jsonwebtoken 只拒绝 exp < now；到期那一秒也算过期
        if claims.exp <= Utc::now().timestamp() {
            tracing::debug!("Token validation failed: expired at {}", claims.exp);
            return Err(VerificationError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "test_secret_key_32_characters_long!";

    fn identity(role: Role) -> AuthContext {
        AuthContext {
            id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_issue_and_verify_session_token() {
        let service = JwtService::new(SECRET).unwrap();
        let who = identity(Role::Admin);

        let token = service.issue_session(&who).unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.id, who.id.to_string());
        assert_eq!(claims.email, who.email);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS);
    }

    #[test]
    fn test_secret_too_short() {
        assert!(JwtService::new("short").is_err());
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let service = JwtService::new(SECRET).unwrap();
        let token = service
            .issue(&identity(Role::User), Duration::seconds(-5))
            .unwrap();

        assert_eq!(service.verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn test_token_is_void_at_expiry_second() {
        let service = JwtService::new(SECRET).unwrap();
        let token = service
            .issue(&identity(Role::Admin), Duration::seconds(0))
            .unwrap();

        assert_eq!(service.verify(&token), Err(VerificationError::Expired));
    }

    #[test]
    fn test_foreign_secret_is_signature_invalid() {
        let issuer = JwtService::new(SECRET).unwrap();
        let other = JwtService::new("another_secret_key_that_is_32_chars!").unwrap();
        let token = issuer.issue_session(&identity(Role::User)).unwrap();

        assert_eq!(other.verify(&token), Err(VerificationError::SignatureInvalid));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let service = JwtService::new(SECRET).unwrap();
        assert_eq!(service.verify("invalid_token"), Err(VerificationError::Malformed));
        assert_eq!(service.verify(""), Err(VerificationError::Malformed));
    }

    #[test]
    fn test_claims_wire_shape() {
        let service = JwtService::new(SECRET).unwrap();
        let token = service.issue_session(&identity(Role::User)).unwrap();
        let claims = service.verify(&token).unwrap();

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "USER");
        for key in ["id", "email", "role", "iat", "exp"] {
            assert!(json.get(key).is_some(), "missing claim {key}");
        }
    }
}
