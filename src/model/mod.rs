pub mod user;
pub mod book;
pub mod review;
