use axum::{
    body::Body, extract::State, http::HeaderMap, http::Request, middleware::Next,
    response::Response,
};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::debug;

use crate::model::user::{User, ROLE_ADMIN};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_repo: Arc<UserRepositoryImpl>,
}

/// The authenticated caller, resolved from the bearer token and attached to
/// the request extensions for handlers downstream.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub role: String,
}

fn unauthorized(message: &str) -> HandlerError {
    HandlerError {
        error: HandlerErrorKind::Unauthorized,
        message: message.to_string(),
        details: None,
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        CurrentUser {
            id: user.id.unwrap_or_default(),
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Resolve the Authorization header to a stored user, or 401. Authentication
/// failure is terminal for the request.
async fn resolve_user(state: &AuthState, headers: &HeaderMap) -> Result<CurrentUser, HandlerError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Not authorized, no token"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| unauthorized("Not authorized, no token"))?;
    let claims = state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| unauthorized("Not authorized, token failed"))?;

    let user_id =
        ObjectId::parse_str(&claims.sub).map_err(|_| unauthorized("Not authorized, token failed"))?;
    let user = state
        .user_repo
        .find_by_id(&user_id)
        .await
        .map_err(|_| unauthorized("Not authorized, token failed"))?
        .ok_or_else(|| unauthorized("Not authorized, token failed"))?;

    debug!("Authenticated user: {}", user.email);
    Ok(CurrentUser::from(user))
}

/// Require a valid bearer token; attaches `CurrentUser` to the request.
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let user = resolve_user(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require a valid bearer token belonging to an admin account.
pub async fn require_admin(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let user = resolve_user(&state, req.headers()).await?;
    if user.role != ROLE_ADMIN {
        return Err(HandlerError {
            error: HandlerErrorKind::Forbidden,
            message: "Not authorized as an admin".to_string(),
            details: None,
        });
    }
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
