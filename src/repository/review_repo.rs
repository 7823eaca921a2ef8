use crate::config::mongo_conf::MongoConfig;
use crate::model::review::Review;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::{
    options::{FindOptions, IndexOptions},
    IndexModel,
};
use tracing::{error, info};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn create(&self, review: Review) -> RepositoryResult<Review>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Review>;
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepositoryResult<Review>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn find_by_book(&self, book: ObjectId) -> RepositoryResult<Vec<Review>>;
    async fn find_by_books(&self, books: &[ObjectId]) -> RepositoryResult<Vec<Review>>;
    async fn find_by_user_and_book(
        &self,
        user: ObjectId,
        book: ObjectId,
    ) -> RepositoryResult<Option<Review>>;
}

pub struct MongoReviewRepository {
    collection: mongodb::Collection<Review>,
}

impl MongoReviewRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = super::database(config).await?;
        let collection = db.collection::<Review>(config.review_collection_name());

        // At most one review per (user, book); the index closes the race
        // window the application-level pre-check leaves open.
        let index = IndexModel::builder()
            .keys(doc! { "user": 1, "book": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        Ok(MongoReviewRepository { collection })
    }

    async fn collect(&self, mut cursor: mongodb::Cursor<Review>) -> RepositoryResult<Vec<Review>> {
        let mut reviews = Vec::new();
        while let Some(review) = cursor.next().await {
            reviews.push(review.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize review: {}", e))
            })?);
        }
        Ok(reviews)
    }
}

#[async_trait]
impl ReviewRepository for MongoReviewRepository {
    #[tracing::instrument(skip(self, review), fields(user = %review.user, book = %review.book))]
    async fn create(&self, review: Review) -> RepositoryResult<Review> {
        let mut new_review = review;
        new_review.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        new_review.created_at = Some(now.clone());
        new_review.updated_at = Some(now);

        match self.collection.insert_one(new_review.clone(), None).await {
            Ok(_) => {
                info!("Review created");
                Ok(new_review)
            }
            Err(e) => {
                error!("Failed to create review: {}", e);
                // From<mongodb::error::Error> turns E11000 into AlreadyExists.
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Review> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(review)) => Ok(review),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Review not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch review by ID: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to fetch review by ID: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, fields), fields(id = %id))]
    async fn update_fields(&self, id: ObjectId, mut fields: Document) -> RepositoryResult<Review> {
        fields.insert("updated_at", chrono::Utc::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let update = doc! { "$set": fields };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            Ok(r) if r.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No review found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update review: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update review: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let result = self.collection.delete_one(filter, None).await;
        match result {
            Ok(r) if r.deleted_count > 0 => {
                info!("Review deleted");
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No review found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to delete review: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to delete review: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(book = %book))]
    async fn find_by_book(&self, book: ObjectId) -> RepositoryResult<Vec<Review>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .collection
            .find(doc! { "book": book }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list reviews: {}", e)))?;
        self.collect(cursor).await
    }

    async fn find_by_books(&self, books: &[ObjectId]) -> RepositoryResult<Vec<Review>> {
        if books.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "book": { "$in": books } }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list reviews: {}", e)))?;
        self.collect(cursor).await
    }

    async fn find_by_user_and_book(
        &self,
        user: ObjectId,
        book: ObjectId,
    ) -> RepositoryResult<Option<Review>> {
        let filter = doc! { "user": user, "book": book };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find review: {}", e)))
    }
}
