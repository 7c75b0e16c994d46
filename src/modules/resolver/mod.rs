// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::modules::{
    error::{code::ErrorCode, ForwarderError},
    graph::{IdType, MailService},
    resolver::{
        criteria::{check_candidate, received_time_differs, CandidateVerdict, SearchCriteria},
        query::build_search_query,
    },
    settings::cli::SETTINGS,
};

pub mod criteria;
pub mod query;


/// Marks an id as belonging to a legacy (EWS-style) addressing scheme.
const LEGACY_ID_MARKER: char = '/';

/// What the caller knows about the message to forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionRequest {
    /// Used verbatim when present; blank counts as absent.
    pub provided_id: Option<String>,
    pub subject: Option<String>,
    /// `;`-separated addresses, every one of which must be a recipient.
    pub recipients: Option<String>,
    /// ISO-8601 receipt time.
    pub received_time: Option<String>,
    pub allow_metadata_search: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    Direct,
    Translated,
    MetadataSearch,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStrategy::Direct => "direct",
            ResolutionStrategy::Translated => "translated",
            ResolutionStrategy::MetadataSearch => "metadataSearch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMessage {
    pub id: String,
    pub strategy: ResolutionStrategy,
}

#[derive(Debug)]
pub enum ResolutionFailure {
    /// Metadata search was allowed but no attribute to search on was given.
    InsufficientCriteria,
    /// Neither an id nor permission to search.
    NoUsableIdentifier,
    InvalidReceivedTime(String),
    /// The query service itself failed; never reported as "no match".
    SearchFailed(ForwarderError),
}

impl ResolutionFailure {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ResolutionFailure::InsufficientCriteria | ResolutionFailure::NoUsableIdentifier => {
                ErrorCode::InsufficientCriteria
            }
            ResolutionFailure::InvalidReceivedTime(_) => ErrorCode::InvalidParameter,
            ResolutionFailure::SearchFailed(_) => ErrorCode::SearchServiceFailure,
        }
    }
}

impl fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionFailure::InsufficientCriteria => write!(f, "insufficient search criteria"),
            ResolutionFailure::NoUsableIdentifier => write!(
                f,
                "no usable message id was supplied and metadata search is disabled"
            ),
            ResolutionFailure::InvalidReceivedTime(raw) => {
                write!(f, "receivedTime '{}' is not an RFC 3339 timestamp", raw)
            }
            ResolutionFailure::SearchFailed(e) => write!(f, "search failed: {}", e),
        }
    }
}

/// At most one message, or a definitive reason why none.
#[derive(Debug)]
pub enum ResolutionResult {
    Resolved(ResolvedMessage),
    NotFound,
    Invalid(ResolutionFailure),
}

/// A native id is non-empty and free of the legacy path separator.
pub fn is_native_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(LEGACY_ID_MARKER)
}

pub struct MessageResolver<'a, S> {
    service: &'a S,
    page_size: u32,
}

impl<'a, S: MailService> MessageResolver<'a, S> {
    pub fn new(service: &'a S) -> Self {
        Self {
            service,
            page_size: SETTINGS.forwarder_search_page_size,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Tries the direct id, then legacy-id translation, then metadata search.
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionResult {
        // Blank counts as absent; a usable id is passed on exactly as supplied.
        let provided_id = request
            .provided_id
            .as_deref()
            .filter(|id| !id.trim().is_empty());

        if let Some(id) = provided_id {
            if is_native_id(id) {
                debug!(message_id = %id, "using provided message id as-is");
                return ResolutionResult::Resolved(ResolvedMessage {
                    id: id.to_string(),
                    strategy: ResolutionStrategy::Direct,
                });
            }
            // Not native and not blank, so it carries the legacy marker.
            if let Some(translated) = self.translate(id).await {
                return ResolutionResult::Resolved(ResolvedMessage {
                    id: translated,
                    strategy: ResolutionStrategy::Translated,
                });
            }
        }

        if !request.allow_metadata_search {
            return match provided_id {
                Some(_) => {
                    info!("legacy id could not be translated and metadata search is disabled");
                    ResolutionResult::NotFound
                }
                None => ResolutionResult::Invalid(ResolutionFailure::NoUsableIdentifier),
            };
        }

        let criteria = match SearchCriteria::from_request(request) {
            Ok(criteria) => criteria,
            Err(failure) => {
                warn!("refusing metadata search: {}", failure);
                return ResolutionResult::Invalid(failure);
            }
        };
        self.search(&criteria).await
    }

    async fn translate(&self, legacy_id: &str) -> Option<String> {
        match self
            .service
            .translate_id(legacy_id, IdType::EwsId, IdType::RestId)
            .await
        {
            Ok(translated) => {
                info!(
                    legacy_id = %legacy_id,
                    message_id = %translated,
                    "translated legacy message id"
                );
                Some(translated)
            }
            Err(e) => {
                warn!(legacy_id = %legacy_id, "legacy id translation failed: {}", e);
                None
            }
        }
    }

    async fn search(&self, criteria: &SearchCriteria) -> ResolutionResult {
        let query = build_search_query(criteria, self.page_size);
        debug!(filter = %query.filter, top = query.top, "searching messages by metadata");

        let candidates = match self.service.query_messages(&query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("metadata search query failed: {}", e);
                return ResolutionResult::Invalid(ResolutionFailure::SearchFailed(e));
            }
        };
        info!(count = candidates.len(), "metadata search returned candidates");

        // First candidate passing every supplied check wins.
        for candidate in &candidates {
            if received_time_differs(criteria, candidate) {
                warn!(
                    message_id = %candidate.id,
                    expected = ?criteria.received_time,
                    actual = ?candidate.received_date_time,
                    "candidate receivedDateTime differs from the requested time"
                );
            }
            match check_candidate(criteria, candidate) {
                CandidateVerdict::Accepted => {
                    info!(message_id = %candidate.id, "metadata search matched message");
                    return ResolutionResult::Resolved(ResolvedMessage {
                        id: candidate.id.clone(),
                        strategy: ResolutionStrategy::MetadataSearch,
                    });
                }
                CandidateVerdict::SubjectMismatch { actual } => {
                    debug!(message_id = %candidate.id, actual = ?actual, "skipping candidate: subject mismatch");
                }
                CandidateVerdict::MissingRecipients(missing) => {
                    debug!(message_id = %candidate.id, missing = ?missing, "skipping candidate: recipients missing");
                }
            }
        }

        info!("no candidate passed validation");
        ResolutionResult::NotFound
    }
}
