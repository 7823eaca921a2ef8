use axum::{routing::post, Router};
use std::sync::Arc;

use crate::handler::auth_handler::{login_handler, refresh_token_handler, register_handler};
use crate::service::user_service::UserServiceImpl;

pub fn auth_router(service: Arc<UserServiceImpl>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh-token", post(refresh_token_handler))
        .with_state(service)
}
