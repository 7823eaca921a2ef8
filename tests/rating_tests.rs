use bson::oid::ObjectId;

use book_review_backend::model::review::{average_rating, Review};

fn review(rating: i32) -> Review {
    Review {
        id: Some(ObjectId::new()),
        user: ObjectId::new(),
        book: ObjectId::new(),
        rating,
        comment: "fine".to_string(),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn test_average_of_no_reviews_is_zero() {
    assert_eq!(average_rating(&[]), 0.0);
}

#[test]
fn test_average_of_single_review() {
    assert_eq!(average_rating(&[review(5)]), 5.0);
}

#[test]
fn test_average_is_arithmetic_mean() {
    let reviews = vec![review(1), review(2), review(5)];
    let avg = average_rating(&reviews);
    assert!((avg - 8.0 / 3.0).abs() < f64::EPSILON);
}

#[test]
fn test_average_handles_fractional_means() {
    let reviews = vec![review(4), review(5)];
    assert_eq!(average_rating(&reviews), 4.5);
}
