use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::review_handler::{
    create_review_handler, delete_review_handler, list_reviews_handler, update_review_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::review_service::ReviewServiceImpl;

pub fn review_router(service: Arc<ReviewServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Anyone can read a book's reviews
    let public = Router::new().route("/api/reviews", get(list_reviews_handler));

    // Writing requires a logged-in user; ownership is checked in the service
    let authenticated = Router::new()
        .route("/api/reviews", post(create_review_handler))
        .route("/api/reviews/{id}", put(update_review_handler))
        .route("/api/reviews/{id}", delete(delete_review_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    public.merge(authenticated).with_state(service)
}
