//! Authentication handlers.

use actix_web::{HttpResponse, http::StatusCode, web};
use std::sync::Arc;

use mealhub_core::domain::{Role, User};
use mealhub_core::ports::TokenService;
use mealhub_core::services::Registration;
use mealhub_shared::dto::{AuthResponse, LoginRequest, RegisterUserRequest};

use super::{respond, user_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn issue_token(tokens: &dyn TokenService, user: &User) -> AppResult<AuthResponse> {
    let access_token = tokens.generate_token(user.id, &user.email, vec![user.role.to_string()])?;

    Ok(AuthResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: tokens.expiration_seconds().max(0) as u64,
        user: user_response(user),
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let role = req
        .role
        .as_deref()
        .map(|r| {
            r.parse::<Role>()
                .map_err(|_| AppError::BadRequest(format!("Invalid role: {r}")))
        })
        .transpose()?;

    let user = state
        .users
        .register(Registration {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            role,
        })
        .await?;
    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    let auth = issue_token(tokens.get_ref().as_ref(), &user)?;
    Ok(respond(StatusCode::CREATED, "User registered successfully", auth))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state.users.authenticate(&req.email, &req.password).await?;

    let auth = issue_token(tokens.get_ref().as_ref(), &user)?;
    Ok(respond(StatusCode::OK, "Login successful", auth))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .get(&identity.actor(), &identity.user_id.to_string())
        .await?;
    Ok(respond(
        StatusCode::OK,
        "User retrieved successfully",
        user_response(&user),
    ))
}
