use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One review per (user, book) pair; the pair carries a unique compound
/// index in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub book: ObjectId,
    pub rating: i32, // 1..=5
    pub comment: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Arithmetic mean of the given review ratings, 0.0 when there are none.
/// Derived on every read, never persisted.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: i64 = reviews.iter().map(|r| r.rating as i64).sum();
    sum as f64 / reviews.len() as f64
}
