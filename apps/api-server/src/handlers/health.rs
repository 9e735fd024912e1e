//! Health check endpoint.

use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;

use super::respond;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: database_status(&state).await,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    respond(StatusCode::OK, "Server is healthy", response)
}

#[cfg(feature = "postgres")]
async fn database_status(state: &AppState) -> &'static str {
    match &state.db {
        Some(db) if db.ping().await => "connected",
        Some(_) => "unreachable",
        None => "in-memory",
    }
}

#[cfg(not(feature = "postgres"))]
async fn database_status(_state: &AppState) -> &'static str {
    "in-memory"
}
