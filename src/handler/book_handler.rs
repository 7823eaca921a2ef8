use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::sync::Arc;

use crate::dto::book_dto::{BookListQuery, CreateBookRequest, UpdateBookRequest};
use crate::handler::{parse_object_id, validate_payload};
use crate::service::book_service::{BookService, BookServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_books_handler(
    State(service): State<Arc<BookServiceImpl>>,
    Query(query): Query<BookListQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let res = service.list(query).await?;
    Ok(Json(res))
}

pub async fn featured_books_handler(
    State(service): State<Arc<BookServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let res = service.featured().await?;
    Ok(Json(res))
}

pub async fn get_book_handler(
    State(service): State<Arc<BookServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "book")?;
    let res = service.get(id).await?;
    Ok(Json(res))
}

pub async fn create_book_handler(
    State(service): State<Arc<BookServiceImpl>>,
    Json(payload): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let res = service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn update_book_handler(
    State(service): State<Arc<BookServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBookRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let id = parse_object_id(&id, "book")?;
    let res = service.update(id, payload).await?;
    Ok(Json(res))
}

pub async fn delete_book_handler(
    State(service): State<Arc<BookServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id(&id, "book")?;
    service.delete(id).await?;
    Ok(Json(json!({ "message": "Book removed" })))
}
