pub mod auth_router;
pub mod user_router;
pub mod book_router;
pub mod review_router;
