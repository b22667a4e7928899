/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST   /api/auth/register` - Register a new user
/// - `POST   /api/auth/login` - Login; sets `accessToken` / `refreshToken` cookies
/// - `POST   /api/auth/logout` - Revoke the current session and clear cookies
/// - `POST   /api/auth/refresh-token` - Rotate the token pair
/// - `GET    /api/auth/me` - Current user, or `null` when not logged in
/// - `GET    /api/auth/users` - All users as `{id, username, email}`
/// - `GET    /api/auth/profile` - Current user with their projects
/// - `GET    /api/auth/sessions` - Active sessions of the current user
/// - `DELETE /api/auth/sessions/:id` - Revoke one of those sessions

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use teamboard_shared::{
    auth::middleware::AuthContext,
    models::{
        session::Session,
        user::{normalize_identity, User, UserSummary},
    },
    services::auth::{self as auth_service, LoginInput, Profile, RegisterInput},
};
use validator::{Validate, ValidationError};

use crate::{
    app::AppState,
    cookies,
    error::ApiResult,
    extract::{parse_id, ValidatedJson},
    response::ApiResponse,
};

/// Usernames: 3 to 30 characters of `a-z`, `0-9`, `_`, `.`, `-` after
/// trimming and lower-casing
fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = normalize_identity(username);
    let valid_len = (3..=30).contains(&username.chars().count());
    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-'));

    if valid_len && valid_chars {
        Ok(())
    } else {
        let mut err = ValidationError::new("username");
        err.message = Some(
            "Username must be 3-30 characters of letters, digits, '_', '.' or '-'".into(),
        );
        Err(err)
    }
}

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Username or email already exists
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<ApiResponse<User>> {
    let user = auth_service::register(
        state.store.as_ref(),
        RegisterInput {
            name: req.name.trim().to_string(),
            username: req.username,
            email: req.email,
            password: req.password,
        },
    )
    .await?;

    Ok(ApiResponse::created(user, "User registered successfully"))
}

/// Login with username and password
///
/// Opens a new session and delivers its tokens as HTTP-only cookies.
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| ua.chars().take(512).collect());

    let signed_in = auth_service::login(
        state.store.as_ref(),
        &state.jwt,
        LoginInput {
            username: req.username,
            password: req.password,
            user_agent,
        },
    )
    .await?;

    let cookies = cookies::session_cookies(&signed_in.tokens, state.production())?;
    Ok((
        cookies,
        ApiResponse::ok(
            LoginResponse {
                user: signed_in.user,
            },
            "User logged in successfully",
        ),
    ))
}

/// Revoke the current session and clear both cookies
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<impl IntoResponse> {
    auth_service::logout(state.store.as_ref(), auth).await?;

    let cookies = cookies::cleared_cookies(state.production())?;
    Ok((cookies, ApiResponse::ok(json!({}), "User logged out")))
}

/// Rotate the token pair using the `refreshToken` cookie
///
/// # Errors
///
/// - `401 Unauthorized`: Cookie missing, token invalid or expired, session
///   revoked, or token already rotated out (which also revokes the session)
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let presented = cookies::read_cookie(&headers, cookies::REFRESH_COOKIE);
    let signed_in = auth_service::refresh(state.store.as_ref(), &state.jwt, presented).await?;

    let cookies = cookies::session_cookies(&signed_in.tokens, state.production())?;
    Ok((cookies, ApiResponse::ok(json!({}), "Token refreshed")))
}

/// The current user, or `null` when the request carries no valid token
pub async fn me(
    State(state): State<AppState>,
    auth: Option<AuthContext>,
) -> ApiResult<ApiResponse<Option<User>>> {
    let Some(auth) = auth else {
        return Ok(ApiResponse::ok(None, "Not logged in"));
    };

    let user = auth_service::current_user(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(Some(user), "User fetched"))
}

pub async fn users(
    State(state): State<AppState>,
    _auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<UserSummary>>> {
    let users = auth_service::list_users(state.store.as_ref()).await?;
    Ok(ApiResponse::ok(users, "Users fetched"))
}

pub async fn profile(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Profile>> {
    let profile = auth_service::profile(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(profile, "Profile fetched successfully"))
}

pub async fn sessions(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Vec<Session>>> {
    let sessions = auth_service::list_sessions(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(sessions, "Active sessions"))
}

pub async fn revoke_session(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<Value>> {
    let session_id = parse_id(&id, "session")?;
    auth_service::revoke_session(state.store.as_ref(), auth.user_id, session_id).await?;
    Ok(ApiResponse::ok(json!({}), "Session revoked"))
}
