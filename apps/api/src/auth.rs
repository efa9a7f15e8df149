//! Credential and token services.
//!
//! Passwords are hashed with Argon2id; tokens are HS256 JWTs carrying a
//! `client_id` claim and, when a lifespan is configured, an `exp` claim.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use freight_core::ClientId;

/// Failures of the credential and token services.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

// =============================================================================
// Passwords
// =============================================================================

/// Hashes and checks passwords.
pub trait PasswordService: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// `false` for a wrong password and for a malformed stored hash.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// Argon2id with a random salt per password.
#[derive(Clone, Default)]
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    /// Default Argon2id parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom cost: memory in KiB, iterations, lanes.
    pub fn with_cost(memory_kib: u32, iterations: u32, lanes: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, lanes, None)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        self.argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

// =============================================================================
// Tokens
// =============================================================================

/// Issues and parses session tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, subject: ClientId) -> Result<String, AuthError>;

    fn parse(&self, token: &str) -> Result<ClientId, AuthError>;
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject
    pub client_id: i64,

    pub authorized: bool,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp); absent when tokens never expire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// HS256 JWT manager.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifespan_hours: i64,
}

impl JwtTokenService {
    /// `lifespan_hours == 0` issues tokens without an `exp` claim.
    pub fn new(secret: &str, lifespan_hours: i64) -> Self {
        JwtTokenService {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifespan_hours,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::default();
        if self.lifespan_hours == 0 {
            validation.required_spec_claims.clear();
        }
        validation
    }

    /// Decodes and checks signature and expiry.
    pub fn claims(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation())
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: ClientId) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = if self.lifespan_hours == 0 {
            None
        } else {
            let expires_at = Duration::try_hours(self.lifespan_hours)
                .and_then(|lifespan| now.checked_add_signed(lifespan))
                .ok_or_else(|| {
                    AuthError::Signing(format!(
                        "token lifespan of {} hours is out of range",
                        self.lifespan_hours
                    ))
                })?;
            Some(expires_at.timestamp())
        };

        let claims = Claims {
            client_id: subject.0,
            authorized: true,
            iat: now.timestamp(),
            exp,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    fn parse(&self, token: &str) -> Result<ClientId, AuthError> {
        let claims = self.claims(token)?;
        if !claims.authorized || claims.client_id <= 0 {
            return Err(AuthError::InvalidToken("missing client".to_string()));
        }
        Ok(ClientId(claims.client_id))
    }
}

// =============================================================================
// Token extraction
// =============================================================================

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Picks the request's token: `token` query parameter first, then the
/// `Authorization` header.
pub fn read_token<'a>(query_token: Option<&'a str>, auth_header: Option<&'a str>) -> Option<&'a str> {
    query_token
        .filter(|token| !token.is_empty())
        .or_else(|| auth_header.and_then(extract_bearer_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_passwords() -> Argon2PasswordService {
        Argon2PasswordService::with_cost(8, 1, 1).unwrap()
    }

    #[test]
    fn test_password_roundtrip() {
        let passwords = cheap_passwords();
        let hash = passwords.hash("hunter2").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(passwords.verify(&hash, "hunter2"));
        assert!(!passwords.verify(&hash, "hunter3"));
        assert!(!passwords.verify("not-a-hash", "hunter2"));
    }

    #[test]
    fn test_salts_differ() {
        let passwords = cheap_passwords();
        assert_ne!(passwords.hash("same").unwrap(), passwords.hash("same").unwrap());
    }

    #[test]
    fn test_jwt_roundtrip() {
        let tokens = JwtTokenService::new("test-secret", 1);
        let token = tokens.issue(ClientId(123)).unwrap();

        assert_eq!(tokens.parse(&token).unwrap(), ClientId(123));

        let claims = tokens.claims(&token).unwrap();
        let exp = claims.exp.unwrap();
        assert!((exp - (Utc::now().timestamp() + 3600)).abs() <= 5);
    }

    #[test]
    fn test_token_without_expiry() {
        let tokens = JwtTokenService::new("test-secret", 0);
        let token = tokens.issue(ClientId(9)).unwrap();

        assert!(tokens.claims(&token).unwrap().exp.is_none());
        assert_eq!(tokens.parse(&token).unwrap(), ClientId(9));
    }

    #[test]
    fn test_out_of_range_lifespan_fails_to_sign() {
        let tokens = JwtTokenService::new("test-secret", 10_000_000_000);
        assert!(matches!(
            tokens.issue(ClientId(1)),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = JwtTokenService::new("secret-a", 1).issue(ClientId(1)).unwrap();
        assert!(JwtTokenService::new("secret-b", 1).parse(&token).is_err());
    }

    #[test]
    fn test_expiring_service_rejects_tokens_without_exp() {
        let token = JwtTokenService::new("shared", 0).issue(ClientId(1)).unwrap();
        assert!(JwtTokenService::new("shared", 1).parse(&token).is_err());
    }

    #[test]
    fn test_read_token_prefers_query() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(read_token(Some("q"), Some("Bearer h")), Some("q"));
        assert_eq!(read_token(Some(""), Some("Bearer h")), Some("h"));
        assert_eq!(read_token(None, None), None);
    }
}
