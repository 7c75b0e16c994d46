// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use tracing::debug;

use crate::modules::error::handler::error_handler;

/// Renders any error escaping the wrapped routes as the JSON error body, so
/// callers never see poem's plain-text defaults.
pub struct ErrorCapture;

impl<E: Endpoint> Middleware<E> for ErrorCapture {
    type Output = ErrorCaptureEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        ErrorCaptureEndpoint { inner: ep }
    }
}

pub struct ErrorCaptureEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for ErrorCaptureEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let response = match self.inner.call(req).await {
            Ok(response) => response.into_response(),
            Err(error) => {
                debug!(status = %error.status(), "rendering error response: {}", error);
                error_handler(error).await.into_response()
            }
        };
        Ok(response)
    }
}
