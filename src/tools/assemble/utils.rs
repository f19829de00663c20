use chrono::{DateTime, SecondsFormat, Utc};
use scraper::ElementRef;

use super::types::{Status, StatusRule};

/// Classify a container by its text. Order matters: online, then reachable.
pub(super) fn classify_status(container: ElementRef<'_>, rule: &StatusRule) -> Status {
    let text = container.text().collect::<String>().to_lowercase();
    if !rule.online.is_empty() && text.contains(&rule.online.to_lowercase()) {
        Status::Online
    } else if !rule.reachable.is_empty() && text.contains(&rule.reachable.to_lowercase()) {
        Status::Reachable
    } else {
        Status::Offline
    }
}

/// RFC 3339, millisecond precision, `Z` suffix.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
