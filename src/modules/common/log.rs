// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{num::NonZeroU32, sync::LazyLock, time::Duration, time::Instant};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use poem::{
    http::header, web::RealIp, Endpoint, FromRequest, IntoResponse, Middleware, Request, Response,
    Result,
};
use tracing::{error, info, warn, Instrument};

type GovRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

/// Completion lines budgeted per second; cheaper severities are dropped first.
const LOG_BUDGET_PER_SECOND: NonZeroU32 = match NonZeroU32::new(10) {
    Some(budget) => budget,
    None => NonZeroU32::MIN,
};

static REQUEST_LOG_LIMITER: LazyLock<RequestLogLimiter> = LazyLock::new(RequestLogLimiter::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    ServerError,
    ClientError,
    Success,
}

impl Severity {
    fn of(status: u16) -> Self {
        match status {
            500.. => Severity::ServerError,
            400..=499 => Severity::ClientError,
            _ => Severity::Success,
        }
    }

    fn cost(self) -> NonZeroU32 {
        match self {
            Severity::ServerError => NonZeroU32::MIN,
            Severity::ClientError => NonZeroU32::new(3).unwrap_or(NonZeroU32::MIN),
            Severity::Success => NonZeroU32::new(5).unwrap_or(NonZeroU32::MIN),
        }
    }
}

struct RequestLogLimiter {
    limiter: GovRateLimiter,
}

impl RequestLogLimiter {
    fn new() -> Self {
        Self {
            limiter: RateLimiter::direct(Quota::per_second(LOG_BUDGET_PER_SECOND)),
        }
    }

    fn should_log(&self, severity: Severity) -> bool {
        self.limiter.check_n(severity.cost()).is_ok_and(|r| r.is_ok())
    }
}

/// Wraps each request in a span and logs its completion, rate limited.
#[derive(Default)]
pub struct Tracing;

impl<E: Endpoint> Middleware<E> for Tracing {
    type Output = TracingEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        TracingEndpoint { inner: ep }
    }
}

pub struct TracingEndpoint<E> {
    inner: E,
}

impl<E: Endpoint> Endpoint for TracingEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let remote_addr = RealIp::from_request_without_body(&req)
            .await
            .ok()
            .and_then(|real_ip| real_ip.0)
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| req.remote_addr().to_string());
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));
        let content_length = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok().map(|v| v.to_string()));

        let span = tracing::info_span!(
            "request",
            remote_addr = %remote_addr,
            method = %req.method(),
            path = %req.uri().path(),
            user_agent = ?user_agent,
            content_length = ?content_length,
        );

        async move {
            let now = Instant::now();
            let res = self.inner.call(req).await;
            let duration = now.elapsed();

            match res {
                Ok(resp) => {
                    let resp = resp.into_response();
                    log_completion(resp.status().as_u16(), duration);
                    Ok(resp)
                }
                Err(err) => {
                    log_completion(err.status().as_u16(), duration);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn log_completion(status: u16, duration: Duration) {
    let severity = Severity::of(status);
    if !REQUEST_LOG_LIMITER.should_log(severity) {
        return;
    }
    match severity {
        Severity::ServerError => {
            error!(status = %status, duration = ?duration, "request completed with server error")
        }
        Severity::ClientError => {
            warn!(status = %status, duration = ?duration, "request completed with client error")
        }
        Severity::Success => {
            info!(status = %status, duration = ?duration, "request completed successfully")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Severity;

    #[test]
    fn status_severity_and_cost() {
        assert_eq!(Severity::of(503), Severity::ServerError);
        assert_eq!(Severity::of(404), Severity::ClientError);
        assert_eq!(Severity::of(200), Severity::Success);
        assert!(Severity::ServerError.cost() < Severity::ClientError.cost());
        assert!(Severity::ClientError.cost() < Severity::Success.cost());
    }
}
