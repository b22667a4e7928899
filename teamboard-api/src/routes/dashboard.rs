/// `GET /api/dashboard` - counts, recent projects and recent team activity

use axum::extract::State;
use teamboard_shared::{
    auth::middleware::AuthContext,
    services::dashboard::{self as dashboard_service, Dashboard},
};

use crate::{app::AppState, error::ApiResult, response::ApiResponse};

pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthContext,
) -> ApiResult<ApiResponse<Dashboard>> {
    let dashboard = dashboard_service::dashboard(state.store.as_ref(), auth.user_id).await?;
    Ok(ApiResponse::ok(
        dashboard,
        "Dashboard data fetched successfully",
    ))
}
