/// Session token validation
///
/// Sessions are issued by the external identity provider as HS256-signed JWTs.
/// The API verifies them with the provider's shared secret and uses the
/// subject to resolve the user record.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Audience**: always `"authenticated"`
/// - **Validation**: signature, expiration, not-before and audience
/// - **Secret Management**: secrets should be at least 32 bytes (256 bits)
///
/// [`create_token`] exists for development tooling and tests; in production
/// tokens come from the provider.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::{create_token, validate_token, SessionClaims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// let token = create_token(&SessionClaims::new(user_id, "me@example.com"), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience claim carried by every session token
pub const SESSION_AUDIENCE: &str = "authenticated";

/// Default lifetime of a development session token
pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 1;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was issued for another audience
    #[error("Invalid audience")]
    InvalidAudience,
}

/// Claims of a session token
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `aud`: Audience (`"authenticated"`)
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Provider Claims
///
/// - `email`: Email address of the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Email of the signed-in user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionClaims {
    /// Creates claims with the default lifetime
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self::with_expiration(
            user_id,
            email,
            Duration::hours(DEFAULT_SESSION_LIFETIME_HOURS),
        )
    }

    /// Creates claims expiring after `expires_in`
    pub fn with_expiration(user_id: Uuid, email: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            aud: SESSION_AUDIENCE.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            email: Some(email.into()),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Signs claims into a token string using HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &SessionClaims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts its claims
///
/// # Errors
///
/// Returns error if:
/// - Signature is invalid
/// - Token has expired or is not yet valid
/// - Audience doesn't match
/// - Token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<SessionClaims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[SESSION_AUDIENCE]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidAudience,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = SessionClaims::new(user_id, "a@example.com");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.aud, SESSION_AUDIENCE);
        assert_eq!(claims.email.as_deref(), Some("a@example.com"));
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let token = create_token(&SessionClaims::new(user_id, "a@example.com"), SECRET)
            .expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.aud, SESSION_AUDIENCE);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let token = create_token(&SessionClaims::new(Uuid::new_v4(), "a@example.com"), SECRET)
            .unwrap();

        assert!(validate_token(&token, "another-secret-key-that-is-32-bytes!").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = SessionClaims::with_expiration(
            Uuid::new_v4(),
            "a@example.com",
            Duration::seconds(-3600),
        );
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_wrong_audience() {
        let mut claims = SessionClaims::new(Uuid::new_v4(), "a@example.com");
        claims.aud = "service_role".to_string();

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(
            validate_token(&token, SECRET),
            Err(JwtError::InvalidAudience)
        ));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            validate_token("not-a-jwt", SECRET),
            Err(JwtError::ValidationError(_))
        ));
    }
}
