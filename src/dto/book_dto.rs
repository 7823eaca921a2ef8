use bson::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::review_dto::ReviewDto;
use crate::model::book::Book;

#[derive(Debug, Deserialize, Default)]
pub struct BookListQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub author: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    pub cover_image: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub genre: String,
    #[validate(range(min = 0, max = 2100))]
    pub published_year: i32,
    pub featured: Option<bool>,
}

/// Partial update: a field is overwritten iff it is present in the request,
/// independent of its runtime value. `featured: Some(false)` clears the flag.
#[derive(Debug, Deserialize, Validate, Default)]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub author: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    pub cover_image: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub genre: Option<String>,
    #[validate(range(min = 0, max = 2100))]
    pub published_year: Option<i32>,
    pub featured: Option<bool>,
}

impl UpdateBookRequest {
    /// $set document holding exactly the provided fields.
    pub fn to_update_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(ref title) = self.title {
            doc.insert("title", title.clone());
        }
        if let Some(ref author) = self.author {
            doc.insert("author", author.clone());
        }
        if let Some(ref description) = self.description {
            doc.insert("description", description.clone());
        }
        if let Some(ref cover_image) = self.cover_image {
            doc.insert("cover_image", cover_image.clone());
        }
        if let Some(ref genre) = self.genre {
            doc.insert("genre", genre.clone());
        }
        if let Some(published_year) = self.published_year {
            doc.insert("published_year", published_year);
        }
        if let Some(featured) = self.featured {
            doc.insert("featured", featured);
        }
        doc
    }
}

/// Book with its derived average rating.
#[derive(Debug, Clone, Serialize)]
pub struct BookDto {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub genre: String,
    pub published_year: i32,
    pub featured: bool,
    pub created_at: Option<String>,
    pub average_rating: f64,
}

impl BookDto {
    pub fn from_book(book: Book, average_rating: f64) -> Self {
        BookDto {
            id: book.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: book.title,
            author: book.author,
            description: book.description,
            cover_image: book.cover_image,
            genre: book.genre,
            published_year: book.published_year,
            featured: book.featured,
            created_at: book.created_at,
            average_rating,
        }
    }
}

/// Book detail: reviews populated with reviewer names.
#[derive(Debug, Clone, Serialize)]
pub struct BookDetailDto {
    #[serde(flatten)]
    pub book: BookDto,
    pub reviews: Vec<ReviewDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookListResponse {
    pub books: Vec<BookDto>,
    pub page: u32,
    pub pages: u32,
    pub total: u64,
}
