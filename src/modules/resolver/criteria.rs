// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use ahash::AHashSet;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};

use crate::modules::{
    graph::model::CandidateMessage,
    resolver::{ResolutionFailure, ResolutionRequest},
    utils::non_blank,
};

/// Normalized metadata a search filters and validates against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Trimmed, original case. Compared case-insensitively.
    pub subject: Option<String>,
    /// Trimmed, lowercased, de-duplicated, in request order.
    pub recipients: Vec<String>,
    /// UTC instant rendered for an OData `DateTimeOffset` literal.
    pub received_time: Option<String>,
}

impl SearchCriteria {
    pub fn from_request(request: &ResolutionRequest) -> Result<Self, ResolutionFailure> {
        let subject = non_blank(request.subject.as_deref());
        let recipients = request
            .recipients
            .as_deref()
            .map(normalize_recipients)
            .unwrap_or_default();
        let received_time = match non_blank(request.received_time.as_deref()) {
            Some(raw) => Some(
                normalize_received_time(&raw)
                    .ok_or(ResolutionFailure::InvalidReceivedTime(raw))?,
            ),
            None => None,
        };

        if subject.is_none() && recipients.is_empty() && received_time.is_none() {
            return Err(ResolutionFailure::InsufficientCriteria);
        }
        Ok(Self {
            subject,
            recipients,
            received_time,
        })
    }
}

/// Splits a `;`-separated recipient list into trimmed lowercase addresses.
pub fn normalize_recipients(raw: &str) -> Vec<String> {
    let mut seen = AHashSet::new();
    raw.split(';')
        .map(|address| address.trim().to_lowercase())
        .filter(|address| !address.is_empty())
        .filter(|address| seen.insert(address.clone()))
        .collect()
}

fn parse_instant(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).ok()
}

/// `2024-03-01T12:00:00+02:00` becomes `2024-03-01T10:00:00Z`; sub-second digits survive.
pub fn normalize_received_time(raw: &str) -> Option<String> {
    parse_instant(raw).map(|t| {
        t.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::AutoSi, true)
    })
}

/// Why a candidate was passed over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateVerdict {
    Accepted,
    SubjectMismatch { actual: Option<String> },
    MissingRecipients(Vec<String>),
}

/// Re-applies every supplied attribute to a candidate, including the ones the
/// server-side filter could not express.
pub fn check_candidate(criteria: &SearchCriteria, candidate: &CandidateMessage) -> CandidateVerdict {
    if let Some(expected) = &criteria.subject {
        let actual = candidate.subject.as_deref().unwrap_or_default();
        if actual.trim().to_lowercase() != expected.to_lowercase() {
            return CandidateVerdict::SubjectMismatch {
                actual: candidate.subject.clone(),
            };
        }
    }

    if !criteria.recipients.is_empty() {
        let actual: AHashSet<String> = candidate
            .to_recipients
            .iter()
            .filter_map(|r| r.email_address.address.as_deref())
            .map(|address| address.trim().to_lowercase())
            .collect();
        let missing: Vec<String> = criteria
            .recipients
            .iter()
            .filter(|expected| !actual.contains(*expected))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return CandidateVerdict::MissingRecipients(missing);
        }
    }

    CandidateVerdict::Accepted
}

/// True when a time was requested and the candidate reports a different instant.
pub fn received_time_differs(criteria: &SearchCriteria, candidate: &CandidateMessage) -> bool {
    let Some(expected) = criteria.received_time.as_deref().and_then(parse_instant) else {
        return false;
    };
    match candidate.received_date_time.as_deref().and_then(parse_instant) {
        Some(actual) => actual != expected,
        None => true,
    }
}
