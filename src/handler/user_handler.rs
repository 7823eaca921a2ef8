use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    Extension,
};
use std::sync::Arc;

use crate::dto::user_dto::UpdateProfileRequest;
use crate::handler::{parse_object_id, validate_payload};
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::HandlerError;

pub async fn me_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let res = service.get_profile(current_user.id).await?;
    Ok(Json(res))
}

pub async fn update_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    validate_payload(&payload)?;
    let target = parse_object_id(&id, "user")?;
    let res = service
        .update_profile(target, current_user.id, payload)
        .await?;
    Ok(Json(res))
}
