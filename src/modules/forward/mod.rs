// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{info, warn};

use crate::{
    modules::{
        error::{code::ErrorCode, ForwarderError, ForwarderResult},
        forward::attachment::copy_attachments,
        graph::{
            model::{DraftMessage, Message},
            GraphEndpoint, MailService, MESSAGE_FIELDS, REDUCED_MESSAGE_FIELDS,
        },
        settings::cli::SETTINGS,
    },
    raise_error,
};

pub mod attachment;


/// Attempts made after the primary fetch fails, when the fallback is enabled.
const FETCH_FALLBACKS: &[(GraphEndpoint, &[&str])] = &[
    (GraphEndpoint::Beta, MESSAGE_FIELDS),
    (GraphEndpoint::Primary, REDUCED_MESSAGE_FIELDS),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardReport {
    pub original_id: String,
    pub new_message_id: String,
    pub attachments_copied: usize,
    pub attachments_skipped: usize,
}

/// Sends a duplicate of a resolved message and moves the original to the trash.
pub struct ForwardPipeline<'a, S> {
    service: &'a S,
    trash_folder: String,
    fetch_fallback: bool,
}

fn stage_failure(stage: &'static str, message_id: &str, source: ForwarderError) -> ForwarderError {
    ForwarderError::PipelineStage {
        stage,
        message_id: message_id.to_string(),
        source: Box::new(source),
        location: snafu::Location::default(),
    }
}

impl<'a, S: MailService> ForwardPipeline<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            trash_folder: SETTINGS.forwarder_trash_folder.clone(),
            fetch_fallback: SETTINGS.forwarder_fetch_fallback_enabled,
        }
    }

    pub fn with_fetch_fallback(mut self, enabled: bool) -> Self {
        self.fetch_fallback = enabled;
        self
    }

    pub fn with_trash_folder(mut self, folder: &str) -> Self {
        self.trash_folder = folder.to_string();
        self
    }

    pub async fn forward(&self, message_id: &str) -> ForwarderResult<ForwardReport> {
        let original = self
            .fetch(message_id)
            .await
            .map_err(|e| stage_failure("fetch", message_id, e))?;
        info!(
            message_id = %message_id,
            has_attachments = ?original.has_attachments,
            is_read = ?original.is_read,
            "fetched original message"
        );

        let attachments = if original.has_attachments.unwrap_or(false) {
            self.service
                .list_attachments(message_id)
                .await
                .map_err(|e| stage_failure("attachments", message_id, e))?
        } else {
            Vec::new()
        };

        let draft = self
            .service
            .create_message(&DraftMessage::from(&original))
            .await
            .map_err(|e| stage_failure("create", message_id, e))?;
        if draft.id.is_empty() {
            return Err(stage_failure(
                "create",
                message_id,
                raise_error!(
                    "Graph API created the draft but returned no id".into(),
                    ErrorCode::HttpResponseError
                ),
            ));
        }
        info!(draft_id = %draft.id, "created duplicate draft");

        let copied = copy_attachments(self.service, &draft.id, &attachments).await;
        if copied.skipped > 0 {
            warn!(
                copied = copied.copied,
                skipped = copied.skipped,
                "some attachments were not copied"
            );
        }

        self.service
            .send_message(&draft.id)
            .await
            .map_err(|e| stage_failure("send", message_id, e))?;
        info!(draft_id = %draft.id, "sent duplicate message");

        self.service
            .move_message(message_id, &self.trash_folder)
            .await
            .map_err(|e| stage_failure("move", message_id, e))?;
        info!(message_id = %message_id, folder = %self.trash_folder, "moved original message");

        Ok(ForwardReport {
            original_id: message_id.to_string(),
            new_message_id: draft.id,
            attachments_copied: copied.copied,
            attachments_skipped: copied.skipped,
        })
    }

    /// Fetches the original; with the fallback enabled a non-404 failure is retried
    /// against the beta endpoint and then with fewer fields.
    async fn fetch(&self, message_id: &str) -> ForwarderResult<Message> {
        let mut outcome = self
            .service
            .get_message(message_id, GraphEndpoint::Primary, MESSAGE_FIELDS)
            .await;
        if !self.fetch_fallback {
            return outcome;
        }
        for (endpoint, fields) in FETCH_FALLBACKS {
            match &outcome {
                Err(e) if !e.is_not_found() => {
                    warn!(
                        message_id = %message_id,
                        next_endpoint = ?endpoint,
                        "message fetch failed, retrying: {}", e
                    );
                }
                _ => break,
            }
            outcome = self
                .service
                .get_message(message_id, *endpoint, fields)
                .await;
        }
        outcome
    }
}
