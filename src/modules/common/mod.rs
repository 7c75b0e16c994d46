// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use super::error::code::ErrorCode;
use super::error::{ApiError, ApiErrorResponse, ForwarderError};
use poem::error::ResponseError;
use poem::{http::StatusCode, Error, IntoResponse, Response};
use poem_openapi::payload::Json;
use tracing::error;

pub mod auth;
pub mod error;
pub mod log;
pub mod timeout;

#[inline]
fn create_forwarder_error(message: &str, code: ErrorCode) -> ForwarderError {
    ForwarderError::Generic {
        message: message.into(),
        location: snafu::Location::default(),
        code,
    }
}

#[inline]
pub fn create_api_error_response(message: &str, code: ErrorCode) -> Error {
    create_forwarder_error(message, code).into()
}

impl ResponseError for ForwarderError {
    fn status(&self) -> StatusCode {
        ForwarderError::status(self)
    }

    fn as_response(&self) -> Response
    where
        Self: std::error::Error + Send + Sync + 'static,
    {
        let code = self.error_code();
        match self {
            ForwarderError::Generic { location, .. }
            | ForwarderError::GraphApi { location, .. }
            | ForwarderError::PipelineStage { location, .. } => {
                error!(
                    error_code = code as u32,
                    error_message = %self,
                    error_location = ?location
                );
            }
        }

        ApiErrorResponse::Generic(ForwarderError::status(self), Json(ApiError::from(self)))
            .into_response()
    }
}
