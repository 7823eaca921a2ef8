use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::dto::user_dto::{LoginRequest, RefreshTokenRequest, RegisterRequest};
use crate::handler::validate_payload;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;

pub async fn register_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let res = service
        .register(payload.name, payload.email, payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(res)))
}

pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let res = service.login(payload.email, payload.password).await?;
    Ok(Json(res))
}

pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let res = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(res))
}
