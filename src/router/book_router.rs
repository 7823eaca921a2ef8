use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::book_handler::{
    create_book_handler, delete_book_handler, featured_books_handler, get_book_handler,
    list_books_handler, update_book_handler,
};
use crate::middlewares::auth_middleware::{require_admin, AuthState};
use crate::service::book_service::BookServiceImpl;

pub fn book_router(service: Arc<BookServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public catalog reads
    let public = Router::new()
        .route("/api/books", get(list_books_handler))
        .route("/api/books/featured", get(featured_books_handler))
        .route("/api/books/{id}", get(get_book_handler));

    // Catalog mutations are admin-only
    let admin = Router::new()
        .route("/api/books", post(create_book_handler))
        .route("/api/books/{id}", put(update_book_handler))
        .route("/api/books/{id}", delete(delete_book_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_admin));

    public.merge(admin).with_state(service)
}
