use crate::config::mongo_conf::MongoConfig;
use crate::model::user::User;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::{options::IndexOptions, IndexModel};
use tracing::{error, info};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepositoryResult<User>;
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>>;
}

pub struct UserRepositoryImpl {
    collection: mongodb::Collection<User>,
}

impl UserRepositoryImpl {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = super::database(config).await?;
        let collection = db.collection::<User>(config.user_collection_name());

        // Email is the login identity, keep it unique at the store level.
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        collection.create_index(index, None).await?;

        Ok(UserRepositoryImpl { collection })
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    #[tracing::instrument(skip(self, user), fields(email = %user.email))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        let now = chrono::Utc::now().to_rfc3339();
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => {
                error!("Failed to insert user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self, fields), fields(id = %id))]
    async fn update_fields(&self, id: ObjectId, mut fields: Document) -> RepositoryResult<User> {
        fields.insert("updated_at", chrono::Utc::now().to_rfc3339());
        let filter = doc! { "_id": id };
        let update = doc! { "$set": fields };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            // matched_count, not modified_count: a no-op update is a success.
            Ok(r) if r.matched_count > 0 => self
                .find_by_id(&id)
                .await?
                .ok_or_else(|| RepositoryError::not_found(format!("User not found: {}", id))),
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No user found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update user: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let filter = doc! { "email": email };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by email: {}", e)))?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let filter = doc! { "_id": id };
        let user = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! { "_id": { "$in": ids } };
        let mut cursor = self
            .collection
            .find(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find users: {}", e)))?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            users.push(user.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize user: {}", e))
            })?);
        }
        Ok(users)
    }
}
