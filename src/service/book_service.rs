use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{info, instrument};

use crate::dto::book_dto::{
    BookDetailDto, BookDto, BookListQuery, BookListResponse, CreateBookRequest, UpdateBookRequest,
};
use crate::dto::review_dto::ReviewDto;
use crate::model::book::Book;
use crate::model::review::{average_rating, Review};
use crate::repository::book_repo::{BookFilter, BookRepository, MongoBookRepository};
use crate::repository::review_repo::{MongoReviewRepository, ReviewRepository};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;

/// The landing page surfaces only the manually curated featured books.
const FEATURED_BOOKS_LIMIT: i64 = 1;

const DEFAULT_PAGE_SIZE: u32 = 10;

#[async_trait]
pub trait BookService: Send + Sync {
    async fn list(&self, query: BookListQuery) -> Result<BookListResponse, ServiceError>;
    async fn featured(&self) -> Result<Vec<BookDto>, ServiceError>;
    async fn get(&self, id: ObjectId) -> Result<BookDetailDto, ServiceError>;
    async fn create(&self, request: CreateBookRequest) -> Result<BookDto, ServiceError>;
    async fn update(&self, id: ObjectId, request: UpdateBookRequest)
        -> Result<BookDto, ServiceError>;
    async fn delete(&self, id: ObjectId) -> Result<(), ServiceError>;
}

pub struct BookServiceImpl {
    pub book_repo: Arc<MongoBookRepository>,
    pub review_repo: Arc<MongoReviewRepository>,
    pub user_repo: Arc<UserRepositoryImpl>,
}

impl BookServiceImpl {
    pub fn new(
        book_repo: Arc<MongoBookRepository>,
        review_repo: Arc<MongoReviewRepository>,
        user_repo: Arc<UserRepositoryImpl>,
    ) -> Self {
        Self {
            book_repo,
            review_repo,
            user_repo,
        }
    }

    /// Attach the derived average rating to each book. Ratings are recomputed
    /// from the current review set on every read, never cached.
    async fn with_ratings(&self, books: Vec<Book>) -> Result<Vec<BookDto>, ServiceError> {
        let ids: Vec<ObjectId> = books.iter().filter_map(|b| b.id).collect();
        let reviews = self.review_repo.find_by_books(&ids).await?;

        let mut by_book: HashMap<ObjectId, Vec<Review>> = HashMap::new();
        for review in reviews {
            by_book.entry(review.book).or_default().push(review);
        }

        Ok(books
            .into_iter()
            .map(|book| {
                let rating = book
                    .id
                    .and_then(|id| by_book.get(&id))
                    .map(|rs| average_rating(rs))
                    .unwrap_or(0.0);
                BookDto::from_book(book, rating)
            })
            .collect())
    }

    async fn populate_reviews(&self, reviews: Vec<Review>) -> Result<Vec<ReviewDto>, ServiceError> {
        let user_ids: Vec<ObjectId> = reviews.iter().map(|r| r.user).collect();
        let users = self.user_repo.find_by_ids(&user_ids).await?;
        let names: HashMap<ObjectId, String> = users
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
}

#[async_trait]
impl BookService for BookServiceImpl {
    #[instrument(skip(self, query))]
    async fn list(&self, query: BookListQuery) -> Result<BookListResponse, ServiceError> {
        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let filter = BookFilter {
            search: query.search,
            genre: query.genre,
        };

        let books = self.book_repo.list(&filter, page, limit).await?;
        let total = self.book_repo.count(&filter).await?;
        let pages = ((total + limit as u64 - 1) / limit as u64) as u32;

        Ok(BookListResponse {
            books: self.with_ratings(books).await?,
            page,
            pages,
            total,
        })
    }

    #[instrument(skip(self))]
    async fn featured(&self) -> Result<Vec<BookDto>, ServiceError> {
        let books = self.book_repo.find_featured(FEATURED_BOOKS_LIMIT).await?;
        self.with_ratings(books).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: ObjectId) -> Result<BookDetailDto, ServiceError> {
        let book = self.book_repo.get_by_id(id).await?;
        let reviews = self.review_repo.find_by_book(id).await?;
        let rating = average_rating(&reviews);

        Ok(BookDetailDto {
            book: BookDto::from_book(book, rating),
            reviews: self.populate_reviews(reviews).await?,
        })
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create(&self, request: CreateBookRequest) -> Result<BookDto, ServiceError> {
        info!("Creating book");
        let book = Book {
            id: None,
            title: request.title,
            author: request.author,
            description: request.description,
            cover_image: request.cover_image,
            genre: request.genre,
            published_year: request.published_year,
            featured: request.featured.unwrap_or(false),
            created_at: None,
        };
        let created = self.book_repo.create(book).await?;
        Ok(BookDto::from_book(created, 0.0))
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update(
        &self,
        id: ObjectId,
        request: UpdateBookRequest,
    ) -> Result<BookDto, ServiceError> {
        let fields = request.to_update_document();
        let book = if fields.is_empty() {
            self.book_repo.get_by_id(id).await?
        } else {
            self.book_repo.update_fields(id, fields).await?
        };
        let reviews = self.review_repo.find_by_book(id).await?;
        Ok(BookDto::from_book(book, average_rating(&reviews)))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> Result<(), ServiceError> {
        self.book_repo.delete(id).await?;
        Ok(())
    }
}
