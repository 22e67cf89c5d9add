//! JWT token generation and validation

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::domain::user::User;
use crate::domain::DomainError;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create new claims for a user
    pub fn new(user: &User, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(expiration_hours);

        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// The authenticated user's id
    pub fn user_id(&self) -> Result<Uuid, DomainError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| DomainError::unauthorized("Token subject is not a user id"))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Signed token handed out at login
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }
}

impl From<&AuthConfig> for JwtConfig {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_expiration_hours)
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a signed token for a user
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError>;

    /// Validate a token and return its claims; any failure is `Unauthorized`
    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError>;

    fn expiration_hours(&self) -> i64;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &User) -> Result<IssuedToken, DomainError> {
        let claims = JwtClaims::new(user, self.config.expiration_hours);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    fn validate(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::unauthorized(format!("Invalid token: {}", e)))
    }

    fn expiration_hours(&self) -> i64 {
        self.config.expiration_hours
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

    fn service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET, 24))
    }

    fn user() -> User {
        User::new("jane@example.com", "jane", "hash")
    }

    #[test]
    fn test_generate_and_validate() {
        let service = service();
        let user = user();

        let issued = service.generate(&user).unwrap();
        let claims = service.validate(&issued.token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert_eq!(claims.expires_at(), issued.expires_at);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let issued = service.generate(&user()).unwrap();
        let tampered = format!("{}x", issued.token);

        let result = service.validate(&tampered);
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issued = service().generate(&user()).unwrap();
        let other = JwtService::new(JwtConfig::new("another-secret-that-is-also-32-bytes", 24));

        assert!(matches!(
            other.validate(&issued.token),
            Err(DomainError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let user = user();
        let claims = JwtClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iat: Utc::now().timestamp() - 7200,
            exp: Utc::now().timestamp() - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate(&token),
            Err(DomainError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(service().validate("not.a.token").is_err());
        assert!(service().validate("").is_err());
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = JwtClaims {
            sub: "admin".to_string(),
            email: String::new(),
            iat: 0,
            exp: 0,
        };

        assert!(matches!(
            claims.user_id(),
            Err(DomainError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains(SECRET));
    }
}
