// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use serde_json::json;
use url::Url;

use crate::{
    modules::{
        error::{code::ErrorCode, ForwarderResult},
        graph::{
            http::HttpClient,
            model::{
                Attachment, AttachmentPage, CandidateMessage, CandidatePage, DraftMessage,
                Message, NewAttachment, TranslateExchangeIdsRequest,
                TranslateExchangeIdsResponse,
            },
            GraphEndpoint, IdType, MailService, MessageQuery,
        },
        settings::cli::SETTINGS,
    },
    raise_error,
};

pub struct GraphClient {
    http: HttpClient,
    base_url: String,
    beta_url: String,
    mailbox: String,
}

impl GraphClient {
    /// Builds a client acting with the caller's bearer token, configured from [`SETTINGS`].
    pub fn from_settings(access_token: &str) -> ForwarderResult<Self> {
        Self::new(
            access_token,
            &SETTINGS.forwarder_graph_base_url,
            &SETTINGS.forwarder_graph_beta_url,
            SETTINGS.forwarder_graph_mailbox.as_deref(),
            Duration::from_secs(SETTINGS.forwarder_graph_timeout_secs),
        )
    }

    pub fn new(
        access_token: &str,
        base_url: &str,
        beta_url: &str,
        mailbox: Option<&str>,
        timeout: Duration,
    ) -> ForwarderResult<Self> {
        let mailbox = match mailbox.map(str::trim).filter(|m| !m.is_empty()) {
            Some(user) => format!("users/{}", urlencoding::encode(user)),
            None => "me".to_string(),
        };
        Ok(Self {
            http: HttpClient::new(access_token, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            beta_url: beta_url.trim_end_matches('/').to_string(),
            mailbox,
        })
    }

    fn root(&self, endpoint: GraphEndpoint) -> &str {
        match endpoint {
            GraphEndpoint::Primary => &self.base_url,
            GraphEndpoint::Beta => &self.beta_url,
        }
    }

    pub(crate) fn message_url(&self, endpoint: GraphEndpoint, id: &str) -> String {
        format!(
            "{}/{}/messages/{}",
            self.root(endpoint),
            self.mailbox,
            urlencoding::encode(id)
        )
    }

    /// Renders a query as `/messages?$filter=..&$top=..`, percent-encoding every value.
    pub(crate) fn query_url(&self, query: &MessageQuery) -> ForwarderResult<Url> {
        let mut params = Vec::with_capacity(4);
        if !query.filter.is_empty() {
            params.push(format!("$filter={}", urlencoding::encode(&query.filter)));
        }
        params.push(format!("$top={}", query.top));
        if !query.select.is_empty() {
            params.push(format!(
                "$select={}",
                urlencoding::encode(&query.select.join(","))
            ));
        }
        if let Some(order_by) = &query.order_by {
            params.push(format!("$orderby={}", urlencoding::encode(order_by)));
        }
        let raw = format!(
            "{}/{}/messages?{}",
            self.base_url,
            self.mailbox,
            params.join("&")
        );
        Url::parse(&raw).map_err(|e| {
            raise_error!(
                format!("Failed to build message query URL '{}': {:#?}", raw, e),
                ErrorCode::InternalError
            )
        })
    }
}

impl MailService for GraphClient {
    async fn query_messages(&self, query: &MessageQuery) -> ForwarderResult<Vec<CandidateMessage>> {
        let url = self.query_url(query)?;
        let page: CandidatePage = self.http.get(url.as_str()).await?;
        Ok(page.value)
    }

    async fn translate_id(
        &self,
        id: &str,
        source: IdType,
        target: IdType,
    ) -> ForwarderResult<String> {
        let url = format!("{}/{}/translateExchangeIds", self.base_url, self.mailbox);
        let request = TranslateExchangeIdsRequest {
            input_ids: vec![id],
            source_id_type: source.as_str(),
            target_id_type: target.as_str(),
        };
        let response: TranslateExchangeIdsResponse = self.http.post(&url, &request).await?;
        let result = response.value.into_iter().next().ok_or_else(|| {
            raise_error!(
                "translateExchangeIds returned no result for the input id".into(),
                ErrorCode::TranslationFailed
            )
        })?;
        match result.target_id.filter(|t| !t.is_empty()) {
            Some(target_id) => Ok(target_id),
            None => {
                let reason = result
                    .error_details
                    .map(|d| format!("{}: {}", d.code, d.message))
                    .unwrap_or_else(|| "no targetId in response".into());
                Err(raise_error!(
                    format!("translateExchangeIds could not convert the id ({})", reason),
                    ErrorCode::TranslationFailed
                ))
            }
        }
    }

    async fn get_message(
        &self,
        id: &str,
        endpoint: GraphEndpoint,
        select: &[&str],
    ) -> ForwarderResult<Message> {
        let url = format!(
            "{}?$select={}",
            self.message_url(endpoint, id),
            urlencoding::encode(&select.join(","))
        );
        self.http.get(&url).await
    }

    async fn list_attachments(&self, message_id: &str) -> ForwarderResult<Vec<Attachment>> {
        // Item attachments only carry their embedded item when expanded.
        let mut url = format!(
            "{}/attachments?$expand={}",
            self.message_url(GraphEndpoint::Primary, message_id),
            urlencoding::encode("microsoft.graph.itemattachment/item")
        );
        let mut attachments = Vec::new();
        loop {
            let page: AttachmentPage = self.http.get(&url).await?;
            attachments.extend(page.value);
            match page.next_link {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(attachments)
    }

    async fn create_message(&self, draft: &DraftMessage) -> ForwarderResult<Message> {
        let url = format!("{}/{}/messages", self.base_url, self.mailbox);
        self.http.post(&url, draft).await
    }

    async fn add_attachment(
        &self,
        message_id: &str,
        attachment: &NewAttachment,
    ) -> ForwarderResult<()> {
        let url = format!(
            "{}/attachments",
            self.message_url(GraphEndpoint::Primary, message_id)
        );
        self.http.post_no_content(&url, Some(attachment)).await
    }

    async fn send_message(&self, message_id: &str) -> ForwarderResult<()> {
        let url = format!(
            "{}/send",
            self.message_url(GraphEndpoint::Primary, message_id)
        );
        self.http.post_no_content::<()>(&url, None).await
    }

    async fn move_message(&self, message_id: &str, destination: &str) -> ForwarderResult<()> {
        let url = format!(
            "{}/move",
            self.message_url(GraphEndpoint::Primary, message_id)
        );
        let data = json!({
          "destinationId": destination
        });
        self.http.post_no_content(&url, Some(&data)).await
    }
}
