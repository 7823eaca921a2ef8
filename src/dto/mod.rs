pub mod user_dto;
pub mod book_dto;
pub mod review_dto;
