// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde_json::Value;
use tracing::{info, warn};

use crate::modules::graph::{
    model::{Attachment, NewAttachment},
    MailService,
};

/// Server-assigned fields an embedded item must not carry when re-created.
const READ_ONLY_ITEM_FIELDS: &[&str] = &[
    "id",
    "@odata.etag",
    "@odata.context",
    "changeKey",
    "createdDateTime",
    "lastModifiedDateTime",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingContentBytes,
    MissingItem,
    MissingSourceUrl,
    MissingProviderType,
    UnsupportedType,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::MissingContentBytes => "file attachment has no contentBytes",
            SkipReason::MissingItem => "item attachment has no embedded item",
            SkipReason::MissingSourceUrl => "reference attachment has no sourceUrl",
            SkipReason::MissingProviderType => "reference attachment has no providerType",
            SkipReason::UnsupportedType => "unsupported attachment type",
        };
        f.write_str(reason)
    }
}

impl Attachment {
    pub fn display_name(&self) -> &str {
        let name = match self {
            Attachment::File(a) => a.name.as_deref(),
            Attachment::Item(a) => a.name.as_deref(),
            Attachment::Reference(a) => a.name.as_deref(),
            Attachment::Unsupported => None,
        };
        name.unwrap_or("attachment")
    }

    /// The create payload for this attachment, or why it cannot be re-created.
    pub fn to_new(&self) -> Result<NewAttachment, SkipReason> {
        let name = self.display_name().to_string();
        match self {
            Attachment::File(file) => {
                let content_bytes = file
                    .content_bytes
                    .clone()
                    .filter(|c| !c.is_empty())
                    .ok_or(SkipReason::MissingContentBytes)?;
                Ok(NewAttachment::File {
                    name,
                    content_type: file.content_type.clone(),
                    content_bytes,
                    is_inline: file.is_inline,
                    content_id: file.content_id.clone(),
                })
            }
            Attachment::Item(item) => {
                let mut payload = item.item.clone().ok_or(SkipReason::MissingItem)?;
                if let Value::Object(map) = &mut payload {
                    for field in READ_ONLY_ITEM_FIELDS {
                        map.remove(*field);
                    }
                }
                Ok(NewAttachment::Item {
                    name,
                    item: payload,
                })
            }
            Attachment::Reference(reference) => Ok(NewAttachment::Reference {
                name,
                source_url: reference
                    .source_url
                    .clone()
                    .ok_or(SkipReason::MissingSourceUrl)?,
                provider_type: reference
                    .provider_type
                    .clone()
                    .ok_or(SkipReason::MissingProviderType)?,
                permission: reference.permission.clone(),
                is_folder: reference.is_folder,
            }),
            Attachment::Unsupported => Err(SkipReason::UnsupportedType),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    pub copied: usize,
    pub skipped: usize,
}

/// Re-creates attachments on `target_id` one at a time. Neither a malformed
/// attachment nor a failed create call stops the loop.
pub async fn copy_attachments<S: MailService>(
    service: &S,
    target_id: &str,
    attachments: &[Attachment],
) -> CopyOutcome {
    let mut outcome = CopyOutcome::default();
    for attachment in attachments {
        let new_attachment = match attachment.to_new() {
            Ok(new_attachment) => new_attachment,
            Err(reason) => {
                warn!(name = %attachment.display_name(), "skipping attachment: {}", reason);
                outcome.skipped += 1;
                continue;
            }
        };
        match service.add_attachment(target_id, &new_attachment).await {
            Ok(()) => {
                info!(name = %new_attachment.name(), "attachment copied");
                outcome.copied += 1;
            }
            Err(e) => {
                warn!(name = %new_attachment.name(), "failed to copy attachment: {}", e);
                outcome.skipped += 1;
            }
        }
    }
    outcome
}
