/// JWT issuance and validation
///
/// Every login creates a session and a pair of HS256-signed tokens bound to
/// it through the `sid` claim:
///
/// - **Access token**: short-lived (default 15 minutes), presented on every
///   request
/// - **Refresh token**: long-lived (default 7 days), exchanged for a new pair
///
/// Each token also carries a random `jti`, so two tokens minted in the same
/// second for the same session still differ. Refresh rotation relies on this.
///
/// # Example
///
/// ```
/// use teamboard_shared::auth::jwt::{JwtSettings, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), teamboard_shared::auth::jwt::JwtError> {
/// let settings = JwtSettings::new("an-example-secret-of-at-least-32-bytes");
/// let (user_id, session_id) = (Uuid::new_v4(), Uuid::new_v4());
///
/// let pair = settings.issue_pair(user_id, session_id)?;
/// let claims = settings.validate(&pair.access_token, TokenType::Access)?;
/// assert_eq!(claims.sid, session_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written to and required in every token
pub const ISSUER: &str = "teamboard";

/// Minimum accepted signing secret length in bytes
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("failed to sign token: {0}")]
    Sign(String),

    #[error("token has expired")]
    Expired,

    #[error("expected {expected} token, got {actual}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid token: {0}")]
    Invalid(String),
}

/// Which half of the pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    /// Lifetime used when no override is configured
    pub fn default_ttl(&self) -> Duration {
        match self {
            TokenType::Access => Duration::minutes(15),
            TokenType::Refresh => Duration::days(7),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,

    /// Session ID
    pub sid: Uuid,

    /// Unique token ID
    pub jti: Uuid,

    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub token_type: TokenType,
}

impl Claims {
    fn new(user_id: Uuid, session_id: Uuid, token_type: TokenType, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            sid: session_id,
            jti: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Freshly issued access and refresh tokens
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Signing secret and token lifetimes
#[derive(Clone)]
pub struct JwtSettings {
    secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl JwtSettings {
    /// Settings with the default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: TokenType::Access.default_ttl(),
            refresh_ttl: TokenType::Refresh.default_ttl(),
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn ttl(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    /// Signs one token for the session
    pub fn issue(
        &self,
        user_id: Uuid,
        session_id: Uuid,
        token_type: TokenType,
    ) -> Result<(String, Claims), JwtError> {
        let claims = Claims::new(user_id, session_id, token_type, self.ttl(token_type));
        let key = EncodingKey::from_secret(self.secret.as_bytes());

        let token = encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map_err(|e| JwtError::Sign(e.to_string()))?;
        Ok((token, claims))
    }

    /// Signs an access and a refresh token for the session
    pub fn issue_pair(&self, user_id: Uuid, session_id: Uuid) -> Result<TokenPair, JwtError> {
        let (access_token, access) = self.issue(user_id, session_id, TokenType::Access)?;
        let (refresh_token, refresh) = self.issue(user_id, session_id, TokenType::Refresh)?;

        Ok(TokenPair {
            access_token,
            access_expires_at: access.expires_at(),
            refresh_token,
            refresh_expires_at: refresh.expires_at(),
        })
    }

    /// Verifies signature, issuer, time window and token type
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let key = DecodingKey::from_secret(self.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })?
            .claims;

        if claims.token_type != expected {
            return Err(JwtError::WrongType {
                expected: expected.as_str(),
                actual: claims.token_type.as_str(),
            });
        }

        Ok(claims)
    }
}
