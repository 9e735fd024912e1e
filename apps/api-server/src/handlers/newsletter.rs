//! Newsletter handlers.

use actix_web::{HttpResponse, http::StatusCode, web};

use mealhub_core::domain::Role;
use mealhub_shared::dto::{SubscribeRequest, SubscriptionFilter};

use super::respond;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/newsletter/subscribe
pub async fn subscribe(
    state: web::Data<AppState>,
    body: web::Json<SubscribeRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let email = body.into_inner().email.unwrap_or_default();

    let subscription = state.newsletter.subscribe(&email).await?;
    Ok(respond(
        StatusCode::OK,
        "Successfully subscribed to newsletter",
        subscription,
    ))
}

/// GET /api/newsletter/unsubscribe/{email}
pub async fn unsubscribe(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let subscription = state.newsletter.unsubscribe(&path).await?;
    Ok(respond(
        StatusCode::OK,
        "Successfully unsubscribed from newsletter",
        subscription,
    ))
}

/// GET /api/newsletter/all
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    filter: web::Query<SubscriptionFilter>,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Admin])?;
    let subscriptions = state.newsletter.list(filter.is_subscribed).await?;
    Ok(respond(
        StatusCode::OK,
        "Newsletter subscriptions retrieved successfully",
        subscriptions,
    ))
}
