/// Access-token authentication layers
///
/// The token is taken from the `accessToken` cookie, falling back to an
/// `Authorization: Bearer` header. [`require_auth`] rejects the request with
/// 401 when no valid token is present; [`optional_auth`] lets it through
/// unauthenticated. Either way a verified identity is stored in request
/// extensions as an [`AuthContext`].

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use teamboard_shared::auth::middleware::{authenticate, bearer_token, AuthContext, AuthError};
use tracing::debug;

use crate::{app::AppState, cookies, error::ApiError};

fn access_token(headers: &HeaderMap) -> Option<&str> {
    cookies::read_cookie(headers, cookies::ACCESS_COOKIE).or_else(|| bearer_token(headers))
}

async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<AuthContext, AuthError> {
    let token = access_token(headers).ok_or(AuthError::MissingCredentials)?;
    authenticate(state.store.as_ref(), &state.jwt, token).await
}

/// Rejects requests without a valid access token
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = resolve(&state, req.headers()).await.map_err(|e| {
        debug!(error = %e, path = %req.uri().path(), "Authentication failed");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(auth);
    Ok(next.run(req).await)
}

/// Attaches the caller's identity when a valid token is present
///
/// Store failures still surface as errors; a missing or invalid token does
/// not.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match resolve(&state, req.headers()).await {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
        }
        Err(e @ AuthError::Store(_)) => return Err(e.into()),
        Err(_) => {}
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken=from-cookie"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(access_token(&headers), Some("from-cookie"));

        headers.remove(header::COOKIE);
        assert_eq!(access_token(&headers), Some("from-header"));

        headers.remove(header::AUTHORIZATION);
        assert_eq!(access_token(&headers), None);
    }
}
