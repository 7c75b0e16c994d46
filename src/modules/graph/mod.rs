// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::{
    error::ForwarderResult,
    graph::model::{Attachment, CandidateMessage, DraftMessage, Message, NewAttachment},
};

pub mod client;
pub mod http;
pub mod model;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
mod tests;

/// Fields requested for every metadata-search candidate.
pub const CANDIDATE_FIELDS: &[&str] = &["id", "receivedDateTime", "subject", "toRecipients"];

/// Fields the forwarding pipeline reads from the original message.
pub const MESSAGE_FIELDS: &[&str] = &[
    "id",
    "subject",
    "body",
    "toRecipients",
    "ccRecipients",
    "bccRecipients",
    "sender",
    "hasAttachments",
    "importance",
    "isRead",
];

/// Last-resort field set for the fetch fallback.
pub const REDUCED_MESSAGE_FIELDS: &[&str] = &[
    "id",
    "subject",
    "body",
    "toRecipients",
    "ccRecipients",
    "hasAttachments",
];

/// A single-page message query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub filter: String,
    pub top: u32,
    pub select: Vec<&'static str>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdType {
    EwsId,
    RestId,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::EwsId => "ewsId",
            IdType::RestId => "restId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphEndpoint {
    Primary,
    Beta,
}

/// Operations of the remote mail service the resolver and the pipeline rely on.
#[allow(async_fn_in_trait)]
pub trait MailService {
    async fn query_messages(&self, query: &MessageQuery) -> ForwarderResult<Vec<CandidateMessage>>;

    async fn translate_id(&self, id: &str, source: IdType, target: IdType)
        -> ForwarderResult<String>;

    async fn get_message(
        &self,
        id: &str,
        endpoint: GraphEndpoint,
        select: &[&str],
    ) -> ForwarderResult<Message>;

    async fn list_attachments(&self, message_id: &str) -> ForwarderResult<Vec<Attachment>>;

    async fn create_message(&self, draft: &DraftMessage) -> ForwarderResult<Message>;

    async fn add_attachment(
        &self,
        message_id: &str,
        attachment: &NewAttachment,
    ) -> ForwarderResult<()>;

    async fn send_message(&self, message_id: &str) -> ForwarderResult<()>;

    async fn move_message(&self, message_id: &str, destination: &str) -> ForwarderResult<()>;
}
