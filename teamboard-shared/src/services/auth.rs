//! Registration, login, and session lifecycle.
//!
//! Login creates a session row and a token pair bound to it. Refreshing
//! rotates the pair: the session keeps its ID, the stored refresh fingerprint
//! is swapped, and the old refresh token stops working. Presenting a refresh
//! token that no longer matches a live session is treated as theft and
//! revokes the session outright.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::jwt::{JwtSettings, TokenPair, TokenType};
use crate::auth::middleware::AuthContext;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::session::{hash_refresh_token, refresh_token_matches};
use crate::models::project::ProjectSummary;
use crate::models::session::{CreateSession, Session};
use crate::models::user::{normalize_identity, CreateUser, User, UserSummary};
use crate::store::{Store, StoreError};

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const INVALID_REFRESH: &str = "Invalid or expired refresh token";

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
    pub user_agent: Option<String>,
}

/// A signed-in user with freshly issued tokens
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub session_id: Uuid,
    pub tokens: TokenPair,
}

/// User plus the projects they lead or belong to
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user: User,
    pub projects: Vec<ProjectSummary>,
}

/// Creates an account
///
/// # Errors
///
/// [`ServiceError::Conflict`] when the username or email is already taken,
/// including when a concurrent registration wins the race.
pub async fn register(store: &dyn Store, input: RegisterInput) -> ServiceResult<User> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ServiceError::validation("Name is required"));
    }

    let username = normalize_identity(&input.username);
    let email = normalize_identity(&input.email);

    if store.user_exists(&username, &email).await? {
        return Err(ServiceError::conflict("User already exists"));
    }

    let password = input.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let user = store
        .create_user(CreateUser::new(name, &username, &email, password_hash))
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => ServiceError::conflict("User already exists"),
            other => other.into(),
        })?;

    info!(user_id = %user.id, username = %user.username, "User registered");
    Ok(user)
}

/// Verifies credentials and opens a new session
pub async fn login(
    store: &dyn Store,
    jwt: &JwtSettings,
    input: LoginInput,
) -> ServiceResult<SignedIn> {
    let username = normalize_identity(&input.username);

    let Some(user) = store.find_user_by_username(&username).await? else {
        warn!(username = %username, "Login failed: unknown user");
        return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
    };

    let password = input.password;
    let stored_hash = user.password_hash.clone();
    let valid =
        tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await??;
    if !valid {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(ServiceError::unauthorized(INVALID_CREDENTIALS));
    }

    let session_id = Uuid::new_v4();
    let tokens = jwt.issue_pair(user.id, session_id)?;

    store
        .create_session(CreateSession {
            id: session_id,
            user_id: user.id,
            refresh_token_hash: hash_refresh_token(&tokens.refresh_token),
            user_agent: input.user_agent,
            expires_at: tokens.refresh_expires_at,
        })
        .await?;

    info!(user_id = %user.id, session_id = %session_id, "User logged in");
    Ok(SignedIn {
        user,
        session_id,
        tokens,
    })
}

/// Exchanges a refresh token for a new token pair
///
/// Fails closed: every problem with the presented token yields
/// [`ServiceError::Unauthorized`].
pub async fn refresh(
    store: &dyn Store,
    jwt: &JwtSettings,
    refresh_token: Option<&str>,
) -> ServiceResult<SignedIn> {
    let token = refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ServiceError::unauthorized("Refresh token is missing"))?;

    let claims = jwt.validate(token, TokenType::Refresh).map_err(|e| {
        warn!(error = %e, "Refresh rejected: token invalid");
        ServiceError::unauthorized(INVALID_REFRESH)
    })?;

    let session = store
        .find_session(claims.sid)
        .await?
        .filter(|s| s.user_id == claims.sub && s.is_active(Utc::now()))
        .ok_or_else(|| ServiceError::unauthorized(INVALID_REFRESH))?;

    if !refresh_token_matches(token, &session.refresh_token_hash) {
        store.revoke_session(session.id).await?;
        warn!(
            user_id = %session.user_id,
            session_id = %session.id,
            "Refresh token reuse detected, session revoked"
        );
        return Err(ServiceError::unauthorized(INVALID_REFRESH));
    }

    let user = store
        .find_user_by_id(session.user_id)
        .await?
        .ok_or_else(|| ServiceError::unauthorized(INVALID_REFRESH))?;

    let tokens = jwt.issue_pair(user.id, session.id)?;
    let rotated = store
        .rotate_session(
            session.id,
            &session.refresh_token_hash,
            &hash_refresh_token(&tokens.refresh_token),
            tokens.refresh_expires_at,
        )
        .await?;
    if !rotated {
        warn!(session_id = %session.id, "Refresh lost a concurrent rotation");
        return Err(ServiceError::unauthorized(INVALID_REFRESH));
    }

    info!(user_id = %user.id, session_id = %session.id, "Tokens refreshed");
    Ok(SignedIn {
        user,
        session_id: session.id,
        tokens,
    })
}

/// Revokes the caller's current session
pub async fn logout(store: &dyn Store, auth: AuthContext) -> ServiceResult<()> {
    store.revoke_session(auth.session_id).await?;
    info!(user_id = %auth.user_id, session_id = %auth.session_id, "User logged out");
    Ok(())
}

pub async fn list_sessions(store: &dyn Store, user_id: Uuid) -> ServiceResult<Vec<Session>> {
    Ok(store.list_active_sessions(user_id, Utc::now()).await?)
}

/// Revokes one of the caller's sessions
///
/// Sessions of other users are reported as not found.
pub async fn revoke_session(
    store: &dyn Store,
    user_id: Uuid,
    session_id: Uuid,
) -> ServiceResult<()> {
    let owned = store
        .find_session(session_id)
        .await?
        .is_some_and(|s| s.user_id == user_id && s.is_active(Utc::now()));
    if !owned {
        return Err(ServiceError::not_found("Session not found"));
    }

    store.revoke_session(session_id).await?;
    info!(user_id = %user_id, session_id = %session_id, "Session revoked");
    Ok(())
}

pub async fn current_user(store: &dyn Store, user_id: Uuid) -> ServiceResult<User> {
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found"))
}

/// Every user as `{id, username, email}`, ordered by username
pub async fn list_users(store: &dyn Store) -> ServiceResult<Vec<UserSummary>> {
    let users = store.list_users().await?;
    Ok(users.iter().map(User::summary).collect())
}

pub async fn profile(store: &dyn Store, user_id: Uuid) -> ServiceResult<Profile> {
    let user = current_user(store, user_id).await?;
    let projects = store.list_projects_for_user(user_id).await?;

    Ok(Profile {
        user,
        projects: projects.iter().map(ProjectSummary::from).collect(),
    })
}
