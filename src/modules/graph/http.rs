// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::{
    forwarder_version,
    modules::{
        error::{code::ErrorCode, ForwarderError, ForwarderResult},
        graph::model::GraphErrorEnvelope,
    },
    raise_error,
};

/// Thin bearer-authenticated JSON client. Every non-2xx reply becomes
/// [`ForwarderError::GraphApi`].
pub struct HttpClient {
    client: reqwest::Client,
    access_token: String,
}

impl HttpClient {
    pub fn new(access_token: &str, timeout: Duration) -> ForwarderResult<HttpClient> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(format!("graph-forwarder/{}", forwarder_version!()))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                raise_error!(
                    format!("Failed to build HTTP client: {:#?}", e),
                    ErrorCode::InternalError
                )
            })?;
        Ok(Self {
            client,
            access_token: access_token.to_string(),
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> ForwarderResult<T> {
        let response = self.send(self.client.get(url), url).await?;
        Self::json(response, url).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &B,
    ) -> ForwarderResult<T> {
        let response = self.send(self.client.post(url).json(payload), url).await?;
        Self::json(response, url).await
    }

    /// POST whose reply body is ignored (`202 Accepted` / `201 Created` style actions).
    pub async fn post_no_content<B: Serialize + ?Sized>(
        &self,
        url: &str,
        payload: Option<&B>,
    ) -> ForwarderResult<()> {
        let builder = match payload {
            Some(payload) => self.client.post(url).json(payload),
            // Graph rejects action POSTs without a Content-Length.
            None => self.client.post(url).header(reqwest::header::CONTENT_LENGTH, 0),
        };
        self.send(builder, url).await?;
        Ok(())
    }

    async fn send(&self, builder: RequestBuilder, url: &str) -> ForwarderResult<Response> {
        debug!(url = %url, "calling Graph API");
        let response = builder
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(e, url))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.ok().filter(|b| !b.is_empty());
        Err(graph_error(status.as_u16(), body))
    }

    async fn json<T: DeserializeOwned>(response: Response, url: &str) -> ForwarderResult<T> {
        let bytes = response.bytes().await.map_err(|e| transport_error(e, url))?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            raise_error!(
                format!(
                    "Failed to deserialize Graph API response from {}: {:#?}. Possible model mismatch or API change.",
                    url, e
                ),
                ErrorCode::HttpResponseError
            )
        })
    }
}

fn transport_error(e: reqwest::Error, url: &str) -> ForwarderError {
    let code = if e.is_timeout() {
        ErrorCode::ConnectionTimeout
    } else {
        ErrorCode::NetworkError
    };
    raise_error!(format!("Request to {} failed: {:#?}", url, e), code)
}

pub(crate) fn graph_error(status: u16, body: Option<String>) -> ForwarderError {
    let detail = body
        .as_deref()
        .and_then(|b| serde_json::from_str::<GraphErrorEnvelope>(b).ok())
        .map(|envelope| envelope.error);
    let (code, message) = match detail {
        Some(detail) => (detail.code, detail.message),
        None => (
            "UnknownError".to_string(),
            "Graph API returned a non-success status without an error envelope".to_string(),
        ),
    };
    ForwarderError::GraphApi {
        status,
        code,
        message,
        body,
        location: snafu::Location::default(),
    }
}
