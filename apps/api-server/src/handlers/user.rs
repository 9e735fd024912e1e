//! User account handlers.

use actix_web::{HttpResponse, http::StatusCode, web};

use mealhub_core::domain::{Role, UserPatch};
use mealhub_shared::dto::{AdminUpdateUserRequest, ChangePasswordRequest, UpdateProfileRequest};

use super::{respond, user_response};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/user
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Admin])?;
    let users: Vec<_> = state.users.list_all().await?.iter().map(user_response).collect();
    Ok(respond(
        StatusCode::OK,
        "Users are retrieved successfully",
        users,
    ))
}

/// GET /api/user/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user = state.users.get(&identity.actor(), &path).await?;
    Ok(respond(
        StatusCode::OK,
        "User is retrieved successfully",
        user_response(&user),
    ))
}

/// PATCH /api/user/{id}
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let patch = UserPatch {
        name: req.name,
        email: req.email,
        phone: req.phone,
        address: req.address,
        role: None,
    };

    let user = state
        .users
        .update_profile(&identity.actor(), &path, req.password.as_deref(), patch)
        .await?;
    Ok(respond(
        StatusCode::OK,
        "User information updated successfully",
        user_response(&user),
    ))
}

/// PATCH /api/user/change-password/{id}
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    state
        .users
        .change_password(
            &identity.actor(),
            &path,
            req.current_password.as_deref().unwrap_or_default(),
            req.new_password.as_deref().unwrap_or_default(),
        )
        .await?;
    tracing::info!(user_id = %identity.user_id, "Password changed");

    Ok(respond(
        StatusCode::OK,
        "Password changed successfully",
        serde_json::Value::Null,
    ))
}

/// PATCH /api/user/admin/{id}
pub async fn admin_update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<AdminUpdateUserRequest>,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Admin])?;
    let req = body.into_inner();
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
        .admin_update(
            &path,
            UserPatch {
                name: req.name,
                email: req.email,
                phone: req.phone,
                address: req.address,
                role,
            },
        )
        .await?;
    Ok(respond(
        StatusCode::OK,
        "User information updated successfully by admin",
        user_response(&user),
    ))
}

/// DELETE /api/user/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    identity.require_any(&[Role::Admin])?;
    let user = state.users.delete(&path).await?;
    tracing::info!(user_id = %user.id, admin_id = %identity.user_id, "User deleted");
    Ok(respond(
        StatusCode::OK,
        "User deleted successfully",
        user_response(&user),
    ))
}
