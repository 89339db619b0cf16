//! Checklist status as assigned by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Backend-assigned lifecycle status of a checklist record.
///
/// The client never computes a status. New records start as [`Status::Draft`]
/// and every outgoing payload carries `DRAFT`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Draft,
    Submitted,
    Approved,
    Signed,
    Archived,
    Finalized,
    Pending,
    Paid,
}

impl Status {
    pub const ALL: [Status; 8] = [
        Status::Draft,
        Status::Submitted,
        Status::Approved,
        Status::Signed,
        Status::Archived,
        Status::Finalized,
        Status::Pending,
        Status::Paid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "DRAFT",
            Status::Submitted => "SUBMITTED",
            Status::Approved => "APPROVED",
            Status::Signed => "SIGNED",
            Status::Archived => "ARCHIVED",
            Status::Finalized => "FINALIZED",
            Status::Pending => "PENDING",
            Status::Paid => "PAID",
        }
    }

    /// Case-insensitive parse of a status name.
    pub fn parse(raw: &str) -> Option<Status> {
        let raw = raw.trim();
        Status::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(raw))
    }

    /// Read a status from backend data. Missing values are `DRAFT`; unknown
    /// values are logged and also read as `DRAFT`.
    pub fn from_backend(raw: &str) -> Status {
        if raw.trim().is_empty() {
            return Status::Draft;
        }
        Status::parse(raw).unwrap_or_else(|| {
            tracing::warn!(status = raw, "unknown checklist status, treating as DRAFT");
            Status::Draft
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Status::parse("approved"), Some(Status::Approved));
        assert_eq!(Status::parse(" Paid "), Some(Status::Paid));
        assert_eq!(Status::parse("closed"), None);
    }

    #[test]
    fn unknown_or_missing_backend_status_reads_as_draft() {
        assert_eq!(Status::from_backend(""), Status::Draft);
        assert_eq!(Status::from_backend("REOPENED"), Status::Draft);
        assert_eq!(Status::from_backend("SIGNED"), Status::Signed);
    }

    #[test]
    fn serializes_upper_case() {
        assert_eq!(
            serde_json::to_value(Status::Finalized).unwrap(),
            serde_json::json!("FINALIZED")
        );
        let back: Status = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(back, Status::Pending);
    }
}
