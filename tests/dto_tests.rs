use book_review_backend::dto::book_dto::{CreateBookRequest, UpdateBookRequest};
use book_review_backend::dto::review_dto::{CreateReviewRequest, UpdateReviewRequest};
use book_review_backend::dto::user_dto::RegisterRequest;
use validator::Validate;

#[test]
fn test_update_book_document_contains_only_provided_fields() {
    let request = UpdateBookRequest {
        title: Some("1984".to_string()),
        published_year: Some(1949),
        ..Default::default()
    };

    let doc = request.to_update_document();
    assert_eq!(doc.get_str("title").unwrap(), "1984");
    assert_eq!(doc.get_i32("published_year").unwrap(), 1949);
    assert!(!doc.contains_key("author"));
    assert!(!doc.contains_key("featured"));
    assert!(!doc.contains_key("genre"));
}

#[test]
fn test_update_book_featured_false_is_an_explicit_update() {
    // A provided false must overwrite, not be treated as "absent".
    let request = UpdateBookRequest {
        featured: Some(false),
        ..Default::default()
    };

    let doc = request.to_update_document();
    assert!(doc.get_bool("featured").is_ok());
    assert!(!doc.get_bool("featured").unwrap());
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_update_book_empty_request_yields_empty_document() {
    let doc = UpdateBookRequest::default().to_update_document();
    assert!(doc.is_empty());
}

#[test]
fn test_update_review_document_partial_fields() {
    let request = UpdateReviewRequest {
        rating: Some(3),
        comment: None,
    };
    let doc = request.to_update_document();
    assert_eq!(doc.get_i32("rating").unwrap(), 3);
    assert!(!doc.contains_key("comment"));

    let request = UpdateReviewRequest {
        rating: None,
        comment: Some("better on a reread".to_string()),
    };
    let doc = request.to_update_document();
    assert!(!doc.contains_key("rating"));
    assert_eq!(doc.get_str("comment").unwrap(), "better on a reread");
}

#[test]
fn test_review_rating_must_be_between_one_and_five() {
    for rating in [1, 3, 5] {
        let request = CreateReviewRequest {
            book: "64b7f8a0c2a4e13f5c9d1e22".to_string(),
            rating,
            comment: "ok".to_string(),
        };
        assert!(request.validate().is_ok(), "rating {} should pass", rating);
    }

    for rating in [0, 6, -1] {
        let request = CreateReviewRequest {
            book: "64b7f8a0c2a4e13f5c9d1e22".to_string(),
            rating,
            comment: "ok".to_string(),
        };
        assert!(request.validate().is_err(), "rating {} should fail", rating);
    }
}

#[test]
fn test_update_review_rating_range_applies_when_provided() {
    let request = UpdateReviewRequest {
        rating: Some(6),
        comment: None,
    };
    assert!(request.validate().is_err());

    let request = UpdateReviewRequest {
        rating: None,
        comment: None,
    };
    assert!(request.validate().is_ok());
}

#[test]
fn test_register_request_validation() {
    let request = RegisterRequest {
        name: "John Doe".to_string(),
        email: "john@example.com".to_string(),
        password: "password123".to_string(),
    };
    assert!(request.validate().is_ok());

    let request = RegisterRequest {
        name: "John Doe".to_string(),
        email: "not-an-email".to_string(),
        password: "password123".to_string(),
    };
    assert!(request.validate().is_err());

    let request = RegisterRequest {
        name: "J".to_string(),
        email: "john@example.com".to_string(),
        password: "password123".to_string(),
    };
    assert!(request.validate().is_err());
}

#[test]
fn test_create_book_request_validation() {
    let request = CreateBookRequest {
        title: "1984".to_string(),
        author: "George Orwell".to_string(),
        description: "A dystopian novel.".to_string(),
        cover_image: None,
        genre: "Sci-Fi".to_string(),
        published_year: 1949,
        featured: None,
    };
    assert!(request.validate().is_ok());

    let request = CreateBookRequest {
        title: "".to_string(),
        author: "George Orwell".to_string(),
        description: "A dystopian novel.".to_string(),
        cover_image: None,
        genre: "Sci-Fi".to_string(),
        published_year: 1949,
        featured: None,
    };
    assert!(request.validate().is_err());
}
