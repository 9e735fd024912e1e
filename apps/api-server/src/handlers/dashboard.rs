//! Role dashboards.

use actix_web::{HttpResponse, http::StatusCode, web};

use mealhub_core::domain::Role;

use super::respond;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/user/provider/dashboard-stats
pub async fn provider_stats(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Provider])?;
    let stats = state.dashboard.provider_stats(identity.user_id).await?;
    Ok(respond(
        StatusCode::OK,
        "Provider dashboard stats retrieved successfully",
        stats,
    ))
}

/// GET /api/customer/dashboard-stats
pub async fn customer_stats(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Customer])?;
    let stats = state.dashboard.customer_stats(identity.user_id).await?;
    Ok(respond(
        StatusCode::OK,
        "Customer dashboard stats retrieved successfully",
        stats,
    ))
}
