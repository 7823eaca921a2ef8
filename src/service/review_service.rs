use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::review_dto::{CreateReviewRequest, ReviewDto, UpdateReviewRequest};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::model::review::Review;
use crate::repository::book_repo::{BookRepository, MongoBookRepository};
use crate::repository::repository_error::RepositoryError;
use crate::repository::review_repo::{MongoReviewRepository, ReviewRepository};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;

#[async_trait]
pub trait ReviewService: Send + Sync {
    async fn list_for_book(&self, book: ObjectId) -> Result<Vec<ReviewDto>, ServiceError>;
    async fn create(
        &self,
        caller: &CurrentUser,
        request: CreateReviewRequest,
    ) -> Result<ReviewDto, ServiceError>;
    async fn update(
        &self,
        id: ObjectId,
        caller: &CurrentUser,
        request: UpdateReviewRequest,
    ) -> Result<ReviewDto, ServiceError>;
    async fn delete(&self, id: ObjectId, caller: &CurrentUser) -> Result<(), ServiceError>;
}

pub struct ReviewServiceImpl {
    pub review_repo: Arc<MongoReviewRepository>,
    pub book_repo: Arc<MongoBookRepository>,
    pub user_repo: Arc<UserRepositoryImpl>,
}

impl ReviewServiceImpl {
    pub fn new(
        review_repo: Arc<MongoReviewRepository>,
        book_repo: Arc<MongoBookRepository>,
        user_repo: Arc<UserRepositoryImpl>,
    ) -> Self {
        Self {
            review_repo,
            book_repo,
            user_repo,
        }
    }

    async fn owned_review(
        &self,
        id: ObjectId,
        caller: &CurrentUser,
    ) -> Result<Review, ServiceError> {
        let review = self.review_repo.get_by_id(id).await?;
        if review.user != caller.id {
            return Err(ServiceError::Forbidden(
                "Not authorized to modify this review".to_string(),
            ));
        }
        Ok(review)
    }

    async fn populate(&self, review: Review) -> Result<ReviewDto, ServiceError> {
        let name = self
            .user_repo
            .find_by_id(&review.user)
            .await?
            .map(|u| u.name)
            .unwrap_or_default();
        Ok(ReviewDto::from_review(review, name))
    }
}

#[async_trait]
impl ReviewService for ReviewServiceImpl {
    #[instrument(skip(self), fields(book = %book))]
    async fn list_for_book(&self, book: ObjectId) -> Result<Vec<ReviewDto>, ServiceError> {
        let reviews = self.review_repo.find_by_book(book).await?;

        let user_ids: Vec<ObjectId> = reviews.iter().map(|r| r.user).collect();
        let users = self.user_repo.find_by_ids(&user_ids).await?;
        let names: std::collections::HashMap<ObjectId, String> = users
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u.name)))
            .collect();

        Ok(reviews
            .into_iter()
            .map(|review| {
                let name = names.get(&review.user).cloned().unwrap_or_default();
                ReviewDto::from_review(review, name)
            })
            .collect())
    }

    #[instrument(skip(self, request), fields(user = %caller.id, book = %request.book))]
    async fn create(
        &self,
        caller: &CurrentUser,
        request: CreateReviewRequest,
    ) -> Result<ReviewDto, ServiceError> {
        let book_id = ObjectId::parse_str(&request.book)
            .map_err(|_| ServiceError::InvalidInput("Invalid book ID".to_string()))?;

        // The book must exist before it can be reviewed.
        self.book_repo.get_by_id(book_id).await.map_err(|e| match e {
            RepositoryError::NotFound(_) => ServiceError::NotFound("Book not found".to_string()),
            other => ServiceError::from(other),
        })?;

        // Friendly pre-check; the unique (user, book) index is the backstop
        // for concurrent submissions.
        if self
            .review_repo
            .find_by_user_and_book(caller.id, book_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(
                "You have already reviewed this book".to_string(),
            ));
        }

        let review = Review {
            id: None,
            user: caller.id,
            book: book_id,
            rating: request.rating,
            comment: request.comment,
            created_at: None,
            updated_at: None,
        };
        let created = self.review_repo.create(review).await.map_err(|e| {
            match ServiceError::from(e) {
                ServiceError::Conflict(_) => {
                    ServiceError::Conflict("You have already reviewed this book".to_string())
                }
                other => other,
            }
        })?;

        info!("Review created");
        Ok(ReviewDto::from_review(created, caller.name.clone()))
    }

    #[instrument(skip(self, request), fields(id = %id, user = %caller.id))]
    async fn update(
        &self,
        id: ObjectId,
        caller: &CurrentUser,
        request: UpdateReviewRequest,
    ) -> Result<ReviewDto, ServiceError> {
        let review = self.owned_review(id, caller).await?;

        let fields = request.to_update_document();
        let updated = if fields.is_empty() {
            review
        } else {
            self.review_repo.update_fields(id, fields).await?
        };
        self.populate(updated).await
    }

    #[instrument(skip(self), fields(id = %id, user = %caller.id))]
    async fn delete(&self, id: ObjectId, caller: &CurrentUser) -> Result<(), ServiceError> {
        self.owned_review(id, caller).await?;
        self.review_repo.delete(id).await?;
        Ok(())
    }
}
