// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CandidatePage {
    #[serde(rename = "@odata.context")]
    pub context: Option<String>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(default)]
    pub value: Vec<CandidateMessage>,
}

/// The slice of a message a metadata search needs for client-side validation.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CandidateMessage {
    pub id: String,
    #[serde(rename = "receivedDateTime")]
    pub received_date_time: Option<String>,
    pub subject: Option<String>,
    #[serde(rename = "toRecipients", default)]
    pub to_recipients: Vec<Recipient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Message {
    #[serde(rename = "@odata.etag")]
    pub etag: Option<String>,
    #[serde(default)]
    pub id: String,
    pub subject: Option<String>,
    pub body: Option<ItemBody>,
    #[serde(rename = "toRecipients")]
    pub to_recipients: Option<Vec<Recipient>>,
    #[serde(rename = "ccRecipients")]
    pub cc_recipients: Option<Vec<Recipient>>,
    #[serde(rename = "bccRecipients")]
    pub bcc_recipients: Option<Vec<Recipient>>,
    pub sender: Option<Recipient>,
    #[serde(rename = "hasAttachments")]
    pub has_attachments: Option<bool>,
    pub importance: Option<String>,
    #[serde(rename = "isRead")]
    pub is_read: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ItemBody {
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Recipient {
    #[serde(rename = "emailAddress")]
    pub email_address: EmailAddress,
}

impl Recipient {
    pub fn new(address: &str) -> Self {
        Self {
            email_address: EmailAddress {
                name: None,
                address: Some(address.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EmailAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Body of the draft created for the duplicate.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct DraftMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,
    #[serde(rename = "toRecipients")]
    pub to_recipients: Vec<Recipient>,
    #[serde(rename = "ccRecipients")]
    pub cc_recipients: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<String>,
}

impl From<&Message> for DraftMessage {
    fn from(message: &Message) -> Self {
        Self {
            subject: message.subject.clone(),
            body: message.body.clone(),
            to_recipients: message.to_recipients.clone().unwrap_or_default(),
            cc_recipients: message.cc_recipients.clone().unwrap_or_default(),
            importance: message.importance.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AttachmentPage {
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(default)]
    pub value: Vec<Attachment>,
}

/// An attachment as listed on an existing message, discriminated by `@odata.type`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum Attachment {
    #[serde(rename = "#microsoft.graph.fileAttachment")]
    File(FileAttachment),
    #[serde(rename = "#microsoft.graph.itemAttachment")]
    Item(ItemAttachment),
    #[serde(rename = "#microsoft.graph.referenceAttachment")]
    Reference(ReferenceAttachment),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    #[serde(default)]
    pub is_inline: bool,
    pub content_id: Option<String>,
    pub content_bytes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemAttachment {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub item: Option<Value>,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceAttachment {
    pub id: Option<String>,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub source_url: Option<String>,
    pub provider_type: Option<String>,
    pub permission: Option<String>,
    pub is_folder: Option<bool>,
}

/// An attachment in the shape Graph accepts on create.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "@odata.type")]
pub enum NewAttachment {
    #[serde(rename = "#microsoft.graph.fileAttachment", rename_all = "camelCase")]
    File {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_type: Option<String>,
        content_bytes: String,
        is_inline: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        content_id: Option<String>,
    },
    #[serde(rename = "#microsoft.graph.itemAttachment", rename_all = "camelCase")]
    Item { name: String, item: Value },
    #[serde(rename = "#microsoft.graph.referenceAttachment", rename_all = "camelCase")]
    Reference {
        name: String,
        source_url: String,
        provider_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        permission: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_folder: Option<bool>,
    },
}

impl NewAttachment {
    pub fn name(&self) -> &str {
        match self {
            NewAttachment::File { name, .. }
            | NewAttachment::Item { name, .. }
            | NewAttachment::Reference { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateExchangeIdsRequest<'a> {
    pub input_ids: Vec<&'a str>,
    pub source_id_type: &'a str,
    pub target_id_type: &'a str,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TranslateExchangeIdsResponse {
    #[serde(default)]
    pub value: Vec<ConvertIdResult>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConvertIdResult {
    pub source_id: Option<String>,
    pub target_id: Option<String>,
    pub error_details: Option<GraphErrorDetail>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphErrorEnvelope {
    pub error: GraphErrorDetail,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GraphErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}
