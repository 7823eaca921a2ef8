use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::handler::user_handler::{me_handler, update_profile_handler};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/users/me", get(me_handler))
        .route("/api/users/{id}", put(update_profile_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
