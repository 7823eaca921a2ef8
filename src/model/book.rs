use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub author: String,
    pub description: String,
    pub cover_image: Option<String>,
    pub genre: String,
    pub published_year: i32,
    pub featured: bool,
    pub created_at: Option<String>,
}
