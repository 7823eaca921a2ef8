use std::sync::Arc;

use bson::oid::ObjectId;
use uuid::Uuid;

use book_review_backend::config::mongo_conf::MongoConfig;
use book_review_backend::config::JwtConfig;
use book_review_backend::dto::book_dto::{BookListQuery, CreateBookRequest, UpdateBookRequest};
use book_review_backend::dto::review_dto::{CreateReviewRequest, UpdateReviewRequest};
use book_review_backend::middlewares::auth_middleware::CurrentUser;
use book_review_backend::repository::book_repo::{BookFilter, BookRepository, MongoBookRepository};
use book_review_backend::repository::review_repo::MongoReviewRepository;
use book_review_backend::repository::user_repo::UserRepositoryImpl;
use book_review_backend::service::book_service::{BookService, BookServiceImpl};
use book_review_backend::service::review_service::{ReviewService, ReviewServiceImpl};
use book_review_backend::service::user_service::{UserService, UserServiceImpl};
use book_review_backend::util::error::ServiceError;
use book_review_backend::util::jwt::JwtTokenUtilsImpl;

struct TestServices {
    user_service: Arc<UserServiceImpl>,
    book_service: Arc<BookServiceImpl>,
    review_service: Arc<ReviewServiceImpl>,
}

/// Returns None (skipping the test) when no MongoDB instance is reachable.
async fn setup_services() -> Option<TestServices> {
    let _ = dotenv::dotenv();
    let config = match MongoConfig::from_env() {
        Ok(c) => c,
        Err(_) => {
            eprintln!("MONGO_URI not configured, skipping MongoDB-backed test");
            return None;
        }
    };

    let user_repo = Arc::new(UserRepositoryImpl::new(&config).await.ok()?);
    let book_repo = Arc::new(MongoBookRepository::new(&config).await.ok()?);
    let review_repo = Arc::new(MongoReviewRepository::new(&config).await.ok()?);

    if book_repo.count(&BookFilter::default()).await.is_err() {
        eprintln!("MongoDB not reachable, skipping MongoDB-backed test");
        return None;
    }

    let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));
    Some(TestServices {
        user_service: Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils)),
        book_service: Arc::new(BookServiceImpl::new(
            book_repo.clone(),
            review_repo.clone(),
            user_repo.clone(),
        )),
        review_service: Arc::new(ReviewServiceImpl::new(review_repo, book_repo, user_repo)),
    })
}

async fn register_user(services: &TestServices, name: &str) -> CurrentUser {
    let email = format!("{}-{}@example.com", name, Uuid::new_v4().simple());
    let auth = services
        .user_service
        .register(name.to_string(), email.clone(), "password123".to_string())
        .await
        .expect("Failed to register user");
    CurrentUser {
        id: ObjectId::parse_str(&auth.user.id).expect("Bad user id"),
        name: auth.user.name,
        email,
        role: auth.user.role,
    }
}

#[tokio::test]
async fn test_review_lifecycle_and_rating_aggregation() {
    let Some(services) = setup_services().await else {
        return;
    };

    let reader = register_user(&services, "john").await;
    let other = register_user(&services, "jane").await;

    let book = services
        .book_service
        .create(CreateBookRequest {
            title: format!("1984 {}", Uuid::new_v4().simple()),
            author: "George Orwell".to_string(),
            description: "A dystopian novel.".to_string(),
            cover_image: None,
            genre: "Sci-Fi".to_string(),
            published_year: 1949,
            featured: None,
        })
        .await
        .expect("Failed to create book");
    assert_eq!(book.average_rating, 0.0);
    let book_id = ObjectId::parse_str(&book.id).expect("Bad book id");

    // First review: detail view derives the average from it.
    let review = services
        .review_service
        .create(
            &reader,
            CreateReviewRequest {
                book: book.id.clone(),
                rating: 5,
                comment: "Bleak and brilliant.".to_string(),
            },
        )
        .await
        .expect("Failed to create review");
    assert_eq!(review.user.name, reader.name);

    let detail = services
        .book_service
        .get(book_id)
        .await
        .expect("Failed to fetch book detail");
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.book.average_rating, 5.0);
    assert_eq!(detail.reviews[0].user.name, reader.name);

    // A second review from the same user is a conflict and persists nothing.
    let duplicate = services
        .review_service
        .create(
            &reader,
            CreateReviewRequest {
                book: book.id.clone(),
                rating: 1,
                comment: "Changed my mind.".to_string(),
            },
        )
        .await;
    assert!(matches!(duplicate, Err(ServiceError::Conflict(_))));
    let detail = services.book_service.get(book_id).await.unwrap();
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.book.average_rating, 5.0);

    // A different user may review; the average tracks the current set.
    services
        .review_service
        .create(
            &other,
            CreateReviewRequest {
                book: book.id.clone(),
                rating: 4,
                comment: "Good.".to_string(),
            },
        )
        .await
        .expect("Second user review should succeed");
    let detail = services.book_service.get(book_id).await.unwrap();
    assert_eq!(detail.book.average_rating, 4.5);

    let review_id = ObjectId::parse_str(&review.id).unwrap();

    // Only the owner may update; a foreign update leaves the review alone.
    let forbidden = services
        .review_service
        .update(
            review_id,
            &other,
            UpdateReviewRequest {
                rating: Some(1),
                comment: None,
            },
        )
        .await;
    assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));
    let listed = services
        .review_service
        .list_for_book(book_id)
        .await
        .unwrap();
    let kept = listed.iter().find(|r| r.id == review.id).unwrap();
    assert_eq!(kept.rating, 5);

    // Owner updates the rating only; the comment is retained.
    let updated = services
        .review_service
        .update(
            review_id,
            &reader,
            UpdateReviewRequest {
                rating: Some(3),
                comment: None,
            },
        )
        .await
        .expect("Owner update should succeed");
    assert_eq!(updated.rating, 3);
    assert_eq!(updated.comment, "Bleak and brilliant.");

    // Foreign delete is forbidden, owner delete works.
    let forbidden = services.review_service.delete(review_id, &other).await;
    assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));
    services
        .review_service
        .delete(review_id, &reader)
        .await
        .expect("Owner delete should succeed");

    let detail = services.book_service.get(book_id).await.unwrap();
    assert_eq!(detail.reviews.len(), 1);
    assert_eq!(detail.book.average_rating, 4.0);

    services
        .book_service
        .delete(book_id)
        .await
        .expect("Failed to delete book");
}

#[tokio::test]
async fn test_review_for_missing_book_is_not_found() {
    let Some(services) = setup_services().await else {
        return;
    };
    let reader = register_user(&services, "ghost").await;

    let res = services
        .review_service
        .create(
            &reader,
            CreateReviewRequest {
                book: ObjectId::new().to_hex(),
                rating: 5,
                comment: "No such book.".to_string(),
            },
        )
        .await;
    assert!(matches!(res, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn test_book_list_pagination_and_partial_update() {
    let Some(services) = setup_services().await else {
        return;
    };
    let marker = Uuid::new_v4().simple().to_string();

    for i in 0..3 {
        services
            .book_service
            .create(CreateBookRequest {
                title: format!("Pagination {} {}", marker, i),
                author: "Test Author".to_string(),
                description: "Listing fixture.".to_string(),
                cover_image: None,
                genre: "Fantasy".to_string(),
                published_year: 2000 + i,
                featured: None,
            })
            .await
            .expect("Failed to create book");
    }

    let page = services
        .book_service
        .list(BookListQuery {
            search: Some(format!("pagination {}", marker)),
            genre: None,
            page: Some(1),
            limit: Some(2),
        })
        .await
        .expect("Failed to list books");
    assert_eq!(page.total, 3);
    assert_eq!(page.pages, 2);
    assert_eq!(page.books.len(), 2);
    // Newest first
    assert!(page.books[0].created_at >= page.books[1].created_at);

    // Explicit featured=false stays false, other fields untouched.
    let target = &page.books[0];
    let id = ObjectId::parse_str(&target.id).unwrap();
    let updated = services
        .book_service
        .update(
            id,
            UpdateBookRequest {
                featured: Some(false),
                description: Some("Updated description.".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Partial update failed");
    assert!(!updated.featured);
    assert_eq!(updated.description, "Updated description.");
    assert_eq!(updated.title, target.title);

    // Cleanup
    let all = services
        .book_service
        .list(BookListQuery {
            search: Some(format!("pagination {}", marker)),
            genre: None,
            page: Some(1),
            limit: Some(50),
        })
        .await
        .expect("Failed to list books for cleanup");
    for book in all.books {
        let id = ObjectId::parse_str(&book.id).unwrap();
        let _ = services.book_service.delete(id).await;
    }
}
