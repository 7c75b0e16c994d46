// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::{collections::VecDeque, sync::Mutex};

use ahash::{AHashMap, AHashSet};

use crate::modules::{
    error::{code::ErrorCode, ForwarderResult},
    graph::{
        http::graph_error,
        model::{Attachment, CandidateMessage, DraftMessage, Message, NewAttachment, Recipient},
        GraphEndpoint, IdType, MailService, MessageQuery,
    },
};
use crate::raise_error;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query(MessageQuery),
    Translate(String),
    Get {
        id: String,
        endpoint: GraphEndpoint,
        fields: usize,
    },
    ListAttachments(String),
    Create(DraftMessage),
    AddAttachment {
        message_id: String,
        name: String,
    },
    Send(String),
    Move {
        id: String,
        destination: String,
    },
}

/// Scripted stand-in for the Graph API that records every call.
#[derive(Default)]
pub struct MockMailService {
    pub candidates: Vec<CandidateMessage>,
    pub query_failure: Option<u16>,
    pub translations: AHashMap<String, String>,
    pub messages: AHashMap<String, Message>,
    /// Statuses returned, in order, by the next `get_message` calls.
    pub fetch_failures: Mutex<VecDeque<u16>>,
    pub attachments: Vec<Attachment>,
    pub failing_attachments: AHashSet<String>,
    pub failing_stage: Option<&'static str>,
    pub calls: Mutex<Vec<Call>>,
}

pub const DRAFT_ID: &str = "draft-1";

impl MockMailService {
    pub fn with_candidates(candidates: Vec<CandidateMessage>) -> Self {
        Self {
            candidates,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail_if(&self, stage: &str) -> ForwarderResult<()> {
        if self.failing_stage == Some(stage) {
            return Err(graph_error(500, None));
        }
        Ok(())
    }
}

pub fn candidate(id: &str, subject: &str, to: &[&str]) -> CandidateMessage {
    CandidateMessage {
        id: id.to_string(),
        received_date_time: Some("2024-03-01T10:00:00Z".to_string()),
        subject: Some(subject.to_string()),
        to_recipients: to.iter().map(|a| Recipient::new(a)).collect(),
    }
}

impl MailService for MockMailService {
    async fn query_messages(&self, query: &MessageQuery) -> ForwarderResult<Vec<CandidateMessage>> {
        self.record(Call::Query(query.clone()));
        if let Some(status) = self.query_failure {
            return Err(graph_error(status, None));
        }
        Ok(self.candidates.clone())
    }

    async fn translate_id(
        &self,
        id: &str,
        _source: IdType,
        _target: IdType,
    ) -> ForwarderResult<String> {
        self.record(Call::Translate(id.to_string()));
        self.translations.get(id).cloned().ok_or_else(|| {
            raise_error!(
                "translateExchangeIds could not convert the id".into(),
                ErrorCode::TranslationFailed
            )
        })
    }

    async fn get_message(
        &self,
        id: &str,
        endpoint: GraphEndpoint,
        select: &[&str],
    ) -> ForwarderResult<Message> {
        self.record(Call::Get {
            id: id.to_string(),
            endpoint,
            fields: select.len(),
        });
        if let Some(status) = self.fetch_failures.lock().unwrap().pop_front() {
            return Err(graph_error(status, None));
        }
        self.messages
            .get(id)
            .cloned()
            .ok_or_else(|| graph_error(404, None))
    }

    async fn list_attachments(&self, message_id: &str) -> ForwarderResult<Vec<Attachment>> {
        self.record(Call::ListAttachments(message_id.to_string()));
        self.fail_if("attachments")?;
        Ok(self.attachments.clone())
    }

    async fn create_message(&self, draft: &DraftMessage) -> ForwarderResult<Message> {
        self.record(Call::Create(draft.clone()));
        self.fail_if("create")?;
        Ok(Message {
            id: DRAFT_ID.to_string(),
            ..Default::default()
        })
    }

    async fn add_attachment(
        &self,
        message_id: &str,
        attachment: &NewAttachment,
    ) -> ForwarderResult<()> {
        self.record(Call::AddAttachment {
            message_id: message_id.to_string(),
            name: attachment.name().to_string(),
        });
        if self.failing_attachments.contains(attachment.name()) {
            return Err(graph_error(413, None));
        }
        Ok(())
    }

    async fn send_message(&self, message_id: &str) -> ForwarderResult<()> {
        self.record(Call::Send(message_id.to_string()));
        self.fail_if("send")
    }

    async fn move_message(&self, message_id: &str, destination: &str) -> ForwarderResult<()> {
        self.record(Call::Move {
            id: message_id.to_string(),
            destination: destination.to_string(),
        });
        self.fail_if("move")
    }
}
