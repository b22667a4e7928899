/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use teamboard_api::{app::{build_router, AppState}, config::Config};
/// use teamboard_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{
        auth::{optional_auth, require_auth},
        security::SecurityHeadersLayer,
    },
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use teamboard_shared::{auth::jwt::JwtSettings, store::Store};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Token signing and validation
    pub jwt: Arc<JwtSettings>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let jwt = JwtSettings::new(config.jwt.secret.clone())
            .with_ttls(config.jwt.access_ttl, config.jwt.refresh_ttl);

        Self {
            store,
            config: Arc::new(config),
            jwt: Arc::new(jwt),
        }
    }

    /// Whether cookies must be Secure / SameSite=None
    pub fn production(&self) -> bool {
        self.config.api.production
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        // Credentials cannot be combined with a literal `*`, so mirror the
        // caller's origin instead
        return CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true);
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /health                          public
/// /api/auth/register               public
/// /api/auth/login                  public
/// /api/auth/refresh-token          refresh cookie
/// /api/auth/me                     optional auth
/// /api/auth/logout                 ┐
/// /api/auth/users                  │
/// /api/auth/profile                │
/// /api/auth/sessions[/:id]         │
/// /api/dashboard                   │
/// /api/createProject               │
/// /api/myProjects                  │ access token required
/// /api/projects/:id[/invite]       │
/// /api/requests                    │
/// /api/respond                     │
/// /api/createTask                  │
/// /api/myTask                      │
/// /api/taskInReview                │
/// /api/:taskId/status              ┘
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost last):
/// 1. Authentication (per route group)
/// 2. Compression
/// 3. Logging (tower-http TraceLayer)
/// 4. CORS
/// 5. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/refresh-token", post(routes::auth::refresh_token));

    let optional_routes = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            optional_auth,
        ));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/auth/users", get(routes::auth::users))
        .route("/api/auth/profile", get(routes::auth::profile))
        .route("/api/auth/sessions", get(routes::auth::sessions))
        .route("/api/auth/sessions/:id", delete(routes::auth::revoke_session))
        .route("/api/dashboard", get(routes::dashboard::dashboard))
        .route("/api/createProject", post(routes::projects::create_project))
        .route("/api/myProjects", get(routes::projects::my_projects))
        .route("/api/projects/:id", get(routes::projects::project_detail))
        .route("/api/projects/:id/invite", post(routes::projects::invite_members))
        .route("/api/requests", get(routes::invitations::requests))
        .route("/api/respond", post(routes::invitations::respond))
        .route("/api/createTask", post(routes::tasks::create_task))
        .route("/api/myTask", get(routes::tasks::my_tasks))
        .route("/api/taskInReview", get(routes::tasks::tasks_in_review))
        .route("/api/:taskId/status", patch(routes::tasks::update_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(optional_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.production()))
        .with_state(state)
}
