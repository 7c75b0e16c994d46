// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::Duration;

use serde_json::json;

use crate::modules::{
    error::ForwarderError,
    graph::{
        client::GraphClient,
        http::graph_error,
        model::{Attachment, AttachmentPage, CandidatePage, DraftMessage, Message, NewAttachment},
        GraphEndpoint, MessageQuery, CANDIDATE_FIELDS,
    },
};

fn client(mailbox: Option<&str>) -> GraphClient {
    GraphClient::new(
        "token",
        "https://graph.microsoft.com/v1.0/",
        "https://graph.microsoft.com/beta",
        mailbox,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[test]
fn query_url_percent_encodes_odata_parameters() {
    let query = MessageQuery {
        filter: "subject eq 'Invoice #42'".into(),
        top: 5,
        select: CANDIDATE_FIELDS.to_vec(),
        order_by: Some("receivedDateTime desc".into()),
    };
    let url = client(None).query_url(&query).unwrap();
    assert_eq!(
        url.as_str(),
        "https://graph.microsoft.com/v1.0/me/messages?\
         $filter=subject%20eq%20%27Invoice%20%2342%27&\
         $top=5&\
         $select=id%2CreceivedDateTime%2Csubject%2CtoRecipients&\
         $orderby=receivedDateTime%20desc"
    );
}

#[test]
fn query_url_omits_empty_filter_and_missing_order() {
    let query = MessageQuery {
        filter: String::new(),
        top: 1,
        select: vec![],
        order_by: None,
    };
    let url = client(None).query_url(&query).unwrap();
    assert_eq!(url.as_str(), "https://graph.microsoft.com/v1.0/me/messages?$top=1");
}

#[test]
fn message_url_addresses_configured_mailbox() {
    let c = client(Some("shared@contoso.com"));
    assert_eq!(
        c.message_url(GraphEndpoint::Beta, "AAMk+abc="),
        "https://graph.microsoft.com/beta/users/shared%40contoso.com/messages/AAMk%2Babc%3D"
    );
    let c = client(Some("   "));
    assert_eq!(
        c.message_url(GraphEndpoint::Primary, "AAMk"),
        "https://graph.microsoft.com/v1.0/me/messages/AAMk"
    );
}

#[test]
fn candidate_page_tolerates_missing_recipients() {
    let page: CandidatePage = serde_json::from_value(json!({
        "@odata.context": "ctx",
        "value": [
            {"id": "1", "subject": "Hi", "receivedDateTime": "2024-03-01T10:00:00Z"},
            {"id": "2", "toRecipients": [{"emailAddress": {"address": "a@x.com", "name": "A"}}]}
        ]
    }))
    .unwrap();
    assert_eq!(page.value.len(), 2);
    assert!(page.value[0].to_recipients.is_empty());
    assert_eq!(
        page.value[1].to_recipients[0].email_address.address.as_deref(),
        Some("a@x.com")
    );
}

#[test]
fn attachments_deserialize_by_odata_type() {
    let page: AttachmentPage = serde_json::from_value(json!({
        "value": [
            {
                "@odata.type": "#microsoft.graph.fileAttachment",
                "id": "f1", "name": "report.pdf", "contentType": "application/pdf",
                "size": 10, "isInline": false, "contentBytes": "SGVsbG8="
            },
            {
                "@odata.type": "#microsoft.graph.itemAttachment",
                "id": "i1", "name": "Forwarded",
                "item": {"@odata.type": "#microsoft.graph.message", "subject": "inner"}
            },
            {
                "@odata.type": "#microsoft.graph.referenceAttachment",
                "id": "r1", "name": "Plan", "sourceUrl": "https://contoso.sharepoint.com/plan",
                "providerType": "oneDriveBusiness", "isFolder": false
            },
            {"@odata.type": "#microsoft.graph.somethingNew", "id": "x"}
        ]
    }))
    .unwrap();

    assert!(matches!(&page.value[0], Attachment::File(f) if f.content_bytes.as_deref() == Some("SGVsbG8=")));
    assert!(matches!(&page.value[1], Attachment::Item(i) if i.item.is_some()));
    assert!(matches!(&page.value[2], Attachment::Reference(r) if r.provider_type.as_deref() == Some("oneDriveBusiness")));
    assert_eq!(page.value[3], Attachment::Unsupported);
}

#[test]
fn new_attachment_serializes_with_discriminator() {
    let attachment = NewAttachment::Reference {
        name: "Plan".into(),
        source_url: "https://contoso.sharepoint.com/plan".into(),
        provider_type: "oneDriveBusiness".into(),
        permission: None,
        is_folder: Some(false),
    };
    assert_eq!(
        serde_json::to_value(&attachment).unwrap(),
        json!({
            "@odata.type": "#microsoft.graph.referenceAttachment",
            "name": "Plan",
            "sourceUrl": "https://contoso.sharepoint.com/plan",
            "providerType": "oneDriveBusiness",
            "isFolder": false
        })
    );
}

#[test]
fn draft_keeps_subject_body_recipients_and_importance() {
    let message: Message = serde_json::from_value(json!({
        "id": "orig",
        "subject": "Quarterly numbers",
        "body": {"contentType": "html", "content": "<p>hi</p>"},
        "toRecipients": [{"emailAddress": {"address": "a@x.com"}}],
        "ccRecipients": [{"emailAddress": {"address": "c@x.com"}}],
        "bccRecipients": [{"emailAddress": {"address": "hidden@x.com"}}],
        "importance": "high",
        "hasAttachments": true
    }))
    .unwrap();

    let draft = serde_json::to_value(DraftMessage::from(&message)).unwrap();
    assert_eq!(
        draft,
        json!({
            "subject": "Quarterly numbers",
            "body": {"contentType": "html", "content": "<p>hi</p>"},
            "toRecipients": [{"emailAddress": {"address": "a@x.com"}}],
            "ccRecipients": [{"emailAddress": {"address": "c@x.com"}}],
            "importance": "high"
        })
    );
}

#[test]
fn graph_error_reads_error_envelope() {
    let body = r#"{"error":{"code":"ErrorItemNotFound","message":"Not found."}}"#;
    match graph_error(404, Some(body.into())) {
        ForwarderError::GraphApi {
            status,
            code,
            message,
            body: raw,
            ..
        } => {
            assert_eq!(status, 404);
            assert_eq!(code, "ErrorItemNotFound");
            assert_eq!(message, "Not found.");
            assert_eq!(raw.as_deref(), Some(body));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn graph_error_without_envelope_keeps_status() {
    let error = graph_error(502, Some("<html>bad gateway</html>".into()));
    assert!(matches!(
        error,
        ForwarderError::GraphApi { status: 502, ref code, .. } if code == "UnknownError"
    ));
}
