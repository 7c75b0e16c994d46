// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::{code::ErrorCode, ApiError, ApiErrorResponse, ForwarderError};
use poem::{IntoResponse, Response};
use poem_openapi::payload::Json;
use tracing::warn;

/// Classifies a failure raised by poem itself rather than by a handler.
fn poem_error_code(error: &poem::Error) -> ErrorCode {
    if error.is::<poem::error::NotFoundError>() {
        ErrorCode::ResourceNotFound
    } else if error.is::<poem::error::MethodNotAllowedError>() {
        ErrorCode::MethodNotAllowed
    } else if error.is::<poem::error::ParseJsonError>()
        || error.is::<poem::error::ParseTypedHeaderError>()
        || error.is::<poem::error::ParseQueryError>()
        || error.is::<poem::error::ParsePathError>()
        || error.is::<poem_openapi::error::ParseRequestPayloadError>()
        || error.is::<poem_openapi::error::ContentTypeError>()
        || error.is::<poem_openapi::error::ParseParamError>()
        || error.is::<poem_openapi::error::ParsePathError>()
    {
        ErrorCode::InvalidParameter
    } else {
        ErrorCode::UnhandledPoemError
    }
}

/// Renders any error reaching the edge of the router as an [`ApiError`] body.
/// The status poem chose is kept; service errors render through their own
/// `ResponseError` impl.
pub async fn error_handler(error: poem::Error) -> Response {
    if error.is::<ForwarderError>() {
        return error.into_response();
    }
    let code = poem_error_code(&error);
    let status = error.status();
    warn!(
        error_code = code as u32,
        status = %status,
        "request rejected: {}",
        error
    );
    ApiErrorResponse::Generic(status, Json(ApiError::new(error.to_string()))).into_response()
}
