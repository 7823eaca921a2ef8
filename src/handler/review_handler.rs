use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde_json::json;
use std::sync::Arc;

use crate::dto::review_dto::{CreateReviewRequest, ReviewListQuery, UpdateReviewRequest};
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::review_service::{ReviewService, ReviewServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_reviews_handler(
    State(service): State<Arc<ReviewServiceImpl>>,
    Query(query): Query<ReviewListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let book = query
        .book
        .ok_or_else(|| HandlerError::bad_request("Book ID is required"))?;
    let book = parse_object_id(&book, "book")?;
    let res = service.list_for_book(book).await?;
    Ok(Json(res))
}

pub async fn create_review_handler(
    State(service): State<Arc<ReviewServiceImpl>>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let res = service.create(&current_user, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn update_review_handler(
    State(service): State<Arc<ReviewServiceImpl>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let id = parse_object_id(&id, "review")?;
    let res = service.update(id, &current_user, payload).await?;
    Ok(Json(res))
}

pub async fn delete_review_handler(
    State(service): State<Arc<ReviewServiceImpl>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "review")?;
    service.delete(id, &current_user).await?;
    Ok(Json(json!({ "message": "Review removed" })))
}
