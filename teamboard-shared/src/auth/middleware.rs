/// Request authentication
///
/// Access tokens arrive either in the `accessToken` cookie or as an
/// `Authorization: Bearer` header. A token authenticates a request only if
/// all of the following hold:
///
/// 1. The JWT signature, issuer and time window validate
/// 2. It is an access token (not a refresh token)
/// 3. The session named by its `sid` exists, belongs to `sub`, and is active
/// 4. The user named by `sub` still exists
///
/// Any failure yields 401. The HTTP layer runs [`authenticate`] and inserts
/// the resulting [`AuthContext`] into request extensions, where handlers
/// pick it up as an extractor.
///
/// # Example
///
/// ```no_run
/// use teamboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, error};
use uuid::Uuid;

use super::jwt::{JwtError, JwtSettings, TokenType};
use crate::store::{Store, StoreError};

/// Identity of an authenticated request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub session_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(#[from] JwtError),

    #[error("session is not active")]
    InactiveSession,

    #[error("user no longer exists")]
    UnknownUser,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AuthError::Store(e) => {
                error!(error = %e, "Authentication lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AuthError::MissingCredentials => (StatusCode::UNAUTHORIZED, "Unauthorized request"),
            _ => (StatusCode::UNAUTHORIZED, "Invalid or expired access token"),
        };

        let body = json!({
            "statusCode": status.as_u16(),
            "message": message,
            "success": false,
        });
        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validates an access token against its session and user
pub async fn authenticate(
    store: &dyn Store,
    jwt: &JwtSettings,
    token: &str,
) -> Result<AuthContext, AuthError> {
    let claims = jwt.validate(token, TokenType::Access)?;

    let session = store
        .find_session(claims.sid)
        .await?
        .filter(|s| s.user_id == claims.sub && s.is_active(Utc::now()))
        .ok_or_else(|| {
            debug!(session_id = %claims.sid, "Access token for inactive session");
            AuthError::InactiveSession
        })?;

    if store.find_user_by_id(claims.sub).await?.is_none() {
        return Err(AuthError::UnknownUser);
    }

    Ok(AuthContext {
        user_id: claims.sub,
        session_id: session.id,
    })
}
