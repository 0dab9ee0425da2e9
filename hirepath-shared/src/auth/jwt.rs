/// JWT token generation and validation
///
/// Two kinds of HS256 tokens are issued, both with issuer `hirepath`:
///
/// - **Access tokens** identify a signed-in user (id, email, role, name) and
///   are sent as `Authorization: Bearer <token>` on protected routes.
///   Default lifetime: 24 hours.
/// - **Document review tokens** are embedded in the links emailed to the
///   recruitment office for a freshly uploaded document. Each one is bound to
///   a single document and a single decision (validate or reject).
///   Default lifetime: 7 days.
///
/// The `token_type` claim keeps the two from being used interchangeably.
///
/// # Example
///
/// ```
/// use hirepath_shared::auth::jwt::{create_token, validate_access_token, Claims};
/// use hirepath_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "a-secret-of-at-least-thirty-two-bytes";
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, "ada@example.com", UserRole::Candidate)
///     .with_name("Ada", "Lovelace");
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_access_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Issuer claim for every token minted by HirePath
pub const ISSUER: &str = "hirepath";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Signature, format or claim validation failed
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was minted for a different purpose
    #[error("Wrong token type: expected {expected}")]
    WrongType { expected: &'static str },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// API access token
    Access,

    /// Admin review link for one uploaded document
    DocumentReview,
}

impl TokenType {
    /// Default lifetime for the token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::DocumentReview => Duration::days(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::DocumentReview => "document_review",
        }
    }
}

/// Access token claims
///
/// `sub` is the user ID. Email, role and name are carried along so the
/// frontend can render the session without another round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "hirepath"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// User email at the time of login
    pub email: String,

    /// User role at the time of login
    pub role: UserRole,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    /// Token type (always `access`)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates access claims with the default 24 hour lifetime
    pub fn new(user_id: Uuid, email: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + TokenType::Access.default_expiration()).timestamp(),
            nbf: now.timestamp(),
            email: email.into(),
            role,
            first_name: String::new(),
            last_name: String::new(),
            token_type: TokenType::Access,
        }
    }

    /// Attaches the user's display name
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Overrides the lifetime, counted from `iat`
    pub fn expires_in(mut self, lifetime: Duration) -> Self {
        self.exp = self.iat + lifetime.num_seconds();
        self
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// What an admin review link does when followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Validate,
    Reject,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Validate => "validate",
            ReviewDecision::Reject => "reject",
        }
    }
}

/// Document review link claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewClaims {
    /// Subject - Document ID
    pub sub: Uuid,

    /// Owner of the document
    pub owner: Uuid,

    /// Decision the link applies
    pub decision: ReviewDecision,

    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,

    /// Token type (always `document_review`)
    pub token_type: TokenType,
}

impl ReviewClaims {
    pub fn new(
        document_id: Uuid,
        owner_id: Uuid,
        decision: ReviewDecision,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: document_id,
            owner: owner_id,
            decision,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
            token_type: TokenType::DocumentReview,
        }
    }
}

/// Signs claims with HS256
///
/// The secret should be at least 32 bytes; the API refuses to start otherwise.
pub fn create_token<T: Serialize>(claims: &T, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies signature, issuer, `exp` and `nbf`, then deserializes the claims
fn decode_claims<T: DeserializeOwned + Clone>(token: &str, secret: &str) -> Result<T, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    decode::<T>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
        })
}

/// Validates an access token and returns its claims
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims: Claims = decode_claims(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongType {
            expected: TokenType::Access.as_str(),
        });
    }

    Ok(claims)
}

/// Validates a document review token and returns its claims
pub fn validate_review_token(token: &str, secret: &str) -> Result<ReviewClaims, JwtError> {
    let claims: ReviewClaims = decode_claims(token, secret)?;

    if claims.token_type != TokenType::DocumentReview {
        return Err(JwtError::WrongType {
            expected: TokenType::DocumentReview.as_str(),
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(24));
        assert_eq!(TokenType::DocumentReview.default_expiration(), Duration::days(7));
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "ada@example.com", UserRole::Admin).with_name("Ada", "Lovelace");

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "hirepath");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.first_name, "Ada");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_access_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "ada@example.com", UserRole::Candidate);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_access_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.email, "ada@example.com");
        assert_eq!(validated.role, UserRole::Candidate);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), "a@example.com", UserRole::Candidate);
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(
            validate_access_token(&token, "another-secret-key-at-least-32-bytes"),
            Err(JwtError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::new(Uuid::new_v4(), "a@example.com", UserRole::Candidate)
            .expires_in(Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).unwrap();
        assert!(matches!(validate_access_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_review_token_roundtrip() {
        let document_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();
        let claims = ReviewClaims::new(
            document_id,
            owner_id,
            ReviewDecision::Reject,
            TokenType::DocumentReview.default_expiration(),
        );
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_review_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, document_id);
        assert_eq!(validated.owner, owner_id);
        assert_eq!(validated.decision, ReviewDecision::Reject);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let access = create_token(
            &Claims::new(Uuid::new_v4(), "a@example.com", UserRole::Admin),
            SECRET,
        )
        .unwrap();
        assert!(validate_review_token(&access, SECRET).is_err());

        let review = create_token(
            &ReviewClaims::new(Uuid::new_v4(), Uuid::new_v4(), ReviewDecision::Validate, Duration::hours(1)),
            SECRET,
        )
        .unwrap();
        assert!(validate_access_token(&review, SECRET).is_err());
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let mut claims = Claims::new(Uuid::new_v4(), "a@example.com", UserRole::Candidate);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_access_token(&token, SECRET).is_err());
    }
}
