pub mod user_service;
pub mod book_service;
pub mod review_service;
