use crate::config::mongo_conf::MongoConfig;
use crate::model::book::Book;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info};

/// Catalog query filter: `search` matches title or author, `genre` matches
/// the genre field, both case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct BookFilter {
    pub search: Option<String>,
    pub genre: Option<String>,
}

impl BookFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(ref search) = self.search {
            filter.insert(
                "$or",
                vec![
                    doc! { "title": { "$regex": search, "$options": "i" } },
                    doc! { "author": { "$regex": search, "$options": "i" } },
                ],
            );
        }
        if let Some(ref genre) = self.genre {
            filter.insert("genre", doc! { "$regex": genre, "$options": "i" });
        }
        filter
    }
}

#[async_trait]
pub trait BookRepository: Send + Sync {
    async fn create(&self, book: Book) -> RepositoryResult<Book>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Book>;
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepositoryResult<Book>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
    async fn list(&self, filter: &BookFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Book>>;
    async fn count(&self, filter: &BookFilter) -> RepositoryResult<u64>;
    async fn find_featured(&self, limit: i64) -> RepositoryResult<Vec<Book>>;
}

pub struct MongoBookRepository {
    collection: mongodb::Collection<Book>,
}

impl MongoBookRepository {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = super::database(config).await?;
        let collection = db.collection::<Book>(config.book_collection_name());
        Ok(MongoBookRepository { collection })
    }

    async fn collect(&self, mut cursor: mongodb::Cursor<Book>) -> RepositoryResult<Vec<Book>> {
        let mut books = Vec::new();
        while let Some(book) = cursor.next().await {
            books.push(book.map_err(|e| {
                RepositoryError::serialization(format!("Failed to deserialize book: {}", e))
            })?);
        }
        Ok(books)
    }
}

#[async_trait]
impl BookRepository for MongoBookRepository {
    #[tracing::instrument(skip(self, book), fields(title = %book.title))]
    async fn create(&self, book: Book) -> RepositoryResult<Book> {
        let mut new_book = book;
        new_book.id = Some(ObjectId::new());
        new_book.created_at = Some(chrono::Utc::now().to_rfc3339());

        match self.collection.insert_one(new_book.clone(), None).await {
            Ok(_) => {
                info!("Book created");
                Ok(new_book)
            }
            Err(e) => {
                error!("Failed to create book: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to create book: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Book> {
        let filter = doc! { "_id": id };
        match self.collection.find_one(filter, None).await {
            Ok(Some(book)) => Ok(book),
            Ok(None) => Err(RepositoryError::not_found(format!(
                "Book not found for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to fetch book by ID: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to fetch book by ID: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, fields), fields(id = %id))]
    async fn update_fields(&self, id: ObjectId, fields: Document) -> RepositoryResult<Book> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": fields };
        let result = self.collection.update_one(filter, update, None).await;
        match result {
            // matched_count, not modified_count: setting featured to its
            // current value must not read as "book missing".
            Ok(r) if r.matched_count > 0 => self.get_by_id(id).await,
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No book found to update for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to update book: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to update book: {}",
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
                info!("Book deleted");
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!(
                "No book found to delete for ID: {}",
                id
            ))),
            Err(e) => {
                error!("Failed to delete book: {}", e);
                Err(RepositoryError::database(format!(
                    "Failed to delete book: {}",
                    e
                )))
            }
        }
    }

    #[tracing::instrument(skip(self, filter), fields(page = page, limit = limit))]
    async fn list(&self, filter: &BookFilter, page: u32, limit: u32) -> RepositoryResult<Vec<Book>> {
        let skip = (page.saturating_sub(1) as u64) * limit as u64;
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit as i64)
            .build();
        let cursor = self
            .collection
            .find(filter.to_document(), options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list books: {}", e)))?;
        self.collect(cursor).await
    }

    #[tracing::instrument(skip(self, filter))]
    async fn count(&self, filter: &BookFilter) -> RepositoryResult<u64> {
        self.collection
            .count_documents(filter.to_document(), None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count books: {}", e)))
    }

    #[tracing::instrument(skip(self))]
    async fn find_featured(&self, limit: i64) -> RepositoryResult<Vec<Book>> {
        let options = FindOptions::builder().limit(limit).build();
        let cursor = self
            .collection
            .find(doc! { "featured": true }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch featured books: {}", e)))?;
        self.collect(cursor).await
    }
}
