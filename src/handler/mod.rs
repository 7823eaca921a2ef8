pub mod auth_handler;
pub mod user_handler;
pub mod book_handler;
pub mod review_handler;

use bson::oid::ObjectId;
use validator::Validate;

use crate::util::error::{HandlerError, HandlerErrorKind};

/// Parse a path/query id, rejecting malformed values before any store access.
pub(crate) fn parse_object_id(id: &str, what: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request(format!("Invalid {} ID", what)))
}

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> Result<(), HandlerError> {
    payload.validate().map_err(|e| HandlerError {
        error: HandlerErrorKind::Validation,
        message: format!("Validation error: {}", e),
        details: None,
    })
}
