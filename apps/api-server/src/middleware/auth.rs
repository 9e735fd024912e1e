//! Authentication extractor and role checks.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use std::sync::Arc;

use mealhub_core::domain::{Actor, Role};
use mealhub_core::ports::{AuthError, TokenClaims, TokenService};

use super::error::AppError;
use crate::state::AppState;

/// Authenticated caller, decoded from the `Authorization` header.
///
/// The token only proves who the caller is. The role is read from the stored
/// account on every request, so role changes and deletions apply at once.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> AppResult<HttpResponse> {
///     identity.require_any(&[Role::Admin])?;
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub role: Role,
}

impl Identity {
    /// Capability check: the caller must hold one of `roles`.
    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        if self.role.is_any_of(roles) {
            Ok(())
        } else {
            tracing::debug!(user_id = %self.user_id, role = %self.role, "Role check failed");
            Err(AppError::Forbidden(
                "You are not authorized to access this resource".to_string(),
            ))
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
        }
    }
}

impl TryFrom<TokenClaims> for Identity {
    type Error = AuthError;

    fn try_from(claims: TokenClaims) -> Result<Self, Self::Error> {
        let role = claims
            .roles
            .iter()
            .find_map(|r| r.parse::<Role>().ok())
            .ok_or_else(|| AuthError::InvalidToken("token carries no known role".to_string()))?;

        Ok(Self {
            user_id: claims.user_id,
            role,
        })
    }
}

/// Accepts `Bearer <token>` as well as a bare token.
fn token_from_header(req: &HttpRequest) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?
        .trim();

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(AuthError::MissingAuth);
    }
    Ok(token)
}

/// Verify the token and decode the identity it claims.
fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return Err(AppError::Internal("Server configuration error".to_string()));
    };

    let token = token_from_header(req)?;
    let claims = tokens.validate_token(token)?;
    Ok(Identity::try_from(claims)?)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claimed = authenticate(req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            let claimed = claimed?;
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            let user = state.users.current(claimed.user_id).await?;
            if user.role != claimed.role {
                tracing::debug!(
                    user_id = %user.id,
                    token_role = %claimed.role,
                    role = %user.role,
                    "Token role is stale"
                );
            }
            Ok(Identity {
                user_id: user.id,
                role: user.role,
            })
        })
    }
}
