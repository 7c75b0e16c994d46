// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::{
    graph::{MessageQuery, CANDIDATE_FIELDS},
    resolver::criteria::SearchCriteria,
};

/// Always-true lower bound. Graph rejects `$orderby` on a property that does not
/// lead the `$filter`, so ordered queries start with this term.
pub const RECEIVED_LOWER_BOUND: &str = "receivedDateTime ge 1900-01-01T00:00:00Z";

/// Quotes a value as an OData string literal.
pub fn odata_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds the server-side half of a metadata search.
///
/// Graph can only test "any recipient equals X" on `toRecipients`, so at most the
/// first expected recipient is pushed to the server. An exact receipt time is
/// selective enough on its own: it is combined with the subject only and all
/// recipient checks happen client-side. Without one, the newest candidates come
/// first.
pub fn build_search_query(criteria: &SearchCriteria, top: u32) -> MessageQuery {
    let mut terms = Vec::with_capacity(3);
    let subject_term = criteria
        .subject
        .as_deref()
        .map(|subject| format!("subject eq {}", odata_string(subject)));

    let order_by = match criteria.received_time.as_deref() {
        Some(received_time) => {
            terms.push(format!("receivedDateTime eq {}", received_time));
            terms.extend(subject_term);
            None
        }
        None => {
            terms.push(RECEIVED_LOWER_BOUND.to_string());
            terms.extend(subject_term);
            if let Some(first) = criteria.recipients.first() {
                terms.push(format!(
                    "toRecipients/any(r:r/emailAddress/address eq {})",
                    odata_string(first)
                ));
            }
            Some("receivedDateTime desc".to_string())
        }
    };

    MessageQuery {
        filter: terms.join(" and "),
        top,
        select: CANDIDATE_FIELDS.to_vec(),
        order_by,
    }
}
