use bson::Document;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::review::Review;

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    /// Book id the reviews belong to; required.
    pub book: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub book: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(min = 1, max = 2000))]
    pub comment: Option<String>,
}

impl UpdateReviewRequest {
    /// $set document holding exactly the provided fields.
    pub fn to_update_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(rating) = self.rating {
            doc.insert("rating", rating);
        }
        if let Some(ref comment) = self.comment {
            doc.insert("comment", comment.clone());
        }
        doc
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewUserDto {
    pub id: String,
    pub name: String,
}

/// Review with its author's display name populated.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewDto {
    pub id: String,
    pub user: ReviewUserDto,
    pub book: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ReviewDto {
    pub fn from_review(review: Review, user_name: String) -> Self {
        ReviewDto {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: ReviewUserDto {
                id: review.user.to_hex(),
                name: user_name,
            },
            book: review.book.to_hex(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
