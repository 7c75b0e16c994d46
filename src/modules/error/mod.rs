// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use code::ErrorCode;
use poem::http::StatusCode;
use poem_openapi::{payload::Json, ApiResponse, Object};
use snafu::{Location, Snafu};

pub mod code;
pub mod handler;

#[cfg(test)]
mod tests;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ForwarderError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
    /// A non-success reply from the mail service.
    #[snafu(display("Graph API returned {status} ({code}): {message}"))]
    GraphApi {
        status: u16,
        code: String,
        message: String,
        body: Option<String>,
        #[snafu(implicit)]
        location: Location,
    },
    /// A forwarding step after resolution failed.
    #[snafu(display("{stage} failed for message {message_id}: {source}"))]
    PipelineStage {
        stage: &'static str,
        message_id: String,
        #[snafu(source(from(ForwarderError, Box::new)))]
        source: Box<ForwarderError>,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type ForwarderResult<T, E = ForwarderError> = std::result::Result<T, E>;

impl ForwarderError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ForwarderError::Generic { code, .. } => *code,
            ForwarderError::GraphApi { status, .. } => match *status {
                401 => ErrorCode::AuthenticationMissing,
                403 => ErrorCode::PermissionDenied,
                404 => ErrorCode::ResourceNotFound,
                429 => ErrorCode::TooManyRequest,
                _ => ErrorCode::GraphApiCallFailed,
            },
            ForwarderError::PipelineStage { source, .. } => {
                if source.is_not_found() {
                    ErrorCode::ResourceNotFound
                } else {
                    ErrorCode::PipelineStageFailure
                }
            }
        }
    }

    /// HTTP status this failure is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ForwarderError::Generic { code, .. } => code.status(),
            ForwarderError::GraphApi { status, .. } => match *status {
                401 => StatusCode::UNAUTHORIZED,
                403 => StatusCode::FORBIDDEN,
                404 => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // Only a missing message passes through; everything else downstream is a 500.
            ForwarderError::PipelineStage { source, .. } => {
                if source.is_not_found() {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        }
    }

    /// The message id a pipeline failure was working on.
    pub fn message_id(&self) -> Option<&str> {
        match self {
            ForwarderError::PipelineStage { message_id, .. } => Some(message_id),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ForwarderError::GraphApi { status, .. } => *status == 404,
            ForwarderError::Generic { code, .. } => *code == ErrorCode::ResourceNotFound,
            ForwarderError::PipelineStage { source, .. } => source.is_not_found(),
        }
    }
}

/// Body of every failed request: the same failure shape the forward operation
/// reports, so callers parse one format whatever rejected the request.
#[derive(Debug, Clone, PartialEq, Eq, Object)]
#[oai(rename_all = "camelCase")]
pub struct ApiError {
    pub success: bool,
    pub error: String,
    #[oai(skip_serializing_if_is_none)]
    pub message_id_used: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message_id_used: None,
        }
    }
}

impl From<&ForwarderError> for ApiError {
    fn from(error: &ForwarderError) -> Self {
        Self {
            message_id_used: error.message_id().map(str::to_string),
            ..Self::new(error.to_string())
        }
    }
}

#[derive(Debug, Clone, ApiResponse)]
pub enum ApiErrorResponse {
    Generic(StatusCode, Json<ApiError>),
}
