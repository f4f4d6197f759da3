use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A training session together with its attendance responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
    /// Ordered by response time, oldest first.
    pub attendance: Vec<AttendanceRecord>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub user_id: String,
    pub attending: bool,
    pub responded_at: String,
}

/// Editable fields of a session, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFields {
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
}

/// Parses the date formats the client sends for a session.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (as produced by
/// `datetime-local` inputs) and a bare `YYYY-MM-DD`. Naive values are taken
/// as UTC.
#[must_use]
pub fn parse_session_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
