//! Failure → user-facing sentence.
//!
//! Every failure a checklist page can hit (local validation, transport,
//! HTTP status, malformed payload) is reduced to exactly one short sentence.
//! Classification is an ordered rule table evaluated top to bottom; the first
//! matching rule decides. The order is part of the contract: a message can
//! match several rules (e.g. one mentioning both `404` and `localhost`) and
//! the earlier rule always wins.
//!
//! 1. absent input → generic sentence
//! 2. exact sentinel codes
//! 3. keyword groups (network, timeout, not found, server error,
//!    unavailable, backend host, JSON parsing, id cast failure)
//! 4. short validation messages are shown verbatim
//! 5. long or implementation-leaking messages → generic sentence
//! 6. everything else verbatim

use std::fmt;

// ── Sentinel codes ───────────────────────────────────────────────────

pub const CHECKLIST_NOT_FOUND: &str = "CHECKLIST_NOT_FOUND";
pub const INVALID_RESPONSE_FORMAT: &str = "INVALID_RESPONSE_FORMAT";
pub const NO_DATA_RECEIVED: &str = "NO_DATA_RECEIVED";
pub const SERVER_ERROR_PREFIX: &str = "SERVER_ERROR_";

/// Hostname fragments of the deployed backend. A message naming one of them
/// is a raw upstream error that must not be shown.
pub const BACKEND_HOSTS: &[&str] = &["onrender.com", "sts-backend", "herokuapp.com"];

/// Messages shorter than this that mention validation are shown verbatim.
pub const VERBATIM_MAX_CHARS: usize = 80;

/// Messages longer than this are replaced by the generic sentence.
pub const LEAK_MAX_CHARS: usize = 100;

const VALIDATION_KEYWORDS: &[&str] = &["required", "invalid", "missing"];
const LEAK_MARKERS: &[&str] = &["http://", "localhost", "node_modules"];

// ── Failure kinds ────────────────────────────────────────────────────

/// Pre-classified failure, each owning one fixed sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Generic,
    ChecklistNotFound,
    InvalidResponse,
    NoData,
    ServerError,
    Network,
    Timeout,
    NotFound,
    InternalServer,
    Unavailable,
    BackendHost,
    Parse,
    InvalidId,
}

impl FailureKind {
    pub fn sentence(self) -> &'static str {
        match self {
            FailureKind::Generic => "An unexpected error occurred. Please try again.",
            FailureKind::ChecklistNotFound | FailureKind::NotFound => {
                "Checklist not found. Please verify the operation reference number."
            }
            FailureKind::InvalidResponse | FailureKind::Parse => {
                "The server returned an invalid response. Please try again later."
            }
            FailureKind::NoData => "No data was received from the server. Please try again.",
            FailureKind::ServerError | FailureKind::InternalServer => {
                "The server encountered an error. Please try again later."
            }
            FailureKind::Network => {
                "Unable to connect to server. Please check your internet connection and try again."
            }
            FailureKind::Timeout => "The request timed out. Please try again.",
            FailureKind::Unavailable => {
                "The service is temporarily unavailable. Please try again in a few minutes."
            }
            FailureKind::BackendHost => {
                "Unable to reach the checklist service. Please try again later."
            }
            FailureKind::InvalidId => {
                "Invalid operation reference format. Please check the reference number."
            }
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sentence())
    }
}

/// Result of classifying one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Replace the message with the kind's sentence.
    Fixed(FailureKind),
    /// The message is already safe to show.
    Verbatim,
}

// ── Rule table ───────────────────────────────────────────────────────

/// The message under classification, with its lower-cased form cached.
struct Probe<'a> {
    raw: &'a str,
    lower: String,
}

impl Probe<'_> {
    fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.lower.contains(n))
    }

    fn chars(&self) -> usize {
        self.raw.chars().count()
    }
}

struct Rule {
    name: &'static str,
    matches: fn(&Probe<'_>) -> bool,
    outcome: Outcome,
}

const RULES: &[Rule] = &[
    Rule {
        name: "sentinel-not-found",
        matches: |p| is_sentinel(p, CHECKLIST_NOT_FOUND),
        outcome: Outcome::Fixed(FailureKind::ChecklistNotFound),
    },
    Rule {
        name: "sentinel-invalid-response",
        matches: |p| is_sentinel(p, INVALID_RESPONSE_FORMAT),
        outcome: Outcome::Fixed(FailureKind::InvalidResponse),
    },
    Rule {
        name: "sentinel-no-data",
        matches: |p| is_sentinel(p, NO_DATA_RECEIVED),
        outcome: Outcome::Fixed(FailureKind::NoData),
    },
    Rule {
        name: "sentinel-server-error",
        matches: |p| {
            let trimmed = p.raw.trim();
            trimmed.len() >= SERVER_ERROR_PREFIX.len()
                && trimmed.is_char_boundary(SERVER_ERROR_PREFIX.len())
                && trimmed[..SERVER_ERROR_PREFIX.len()].eq_ignore_ascii_case(SERVER_ERROR_PREFIX)
        },
        outcome: Outcome::Fixed(FailureKind::ServerError),
    },
    Rule {
        name: "network",
        matches: |p| p.contains_any(&["network", "fetch", "connection"]),
        outcome: Outcome::Fixed(FailureKind::Network),
    },
    Rule {
        name: "timeout",
        matches: |p| p.contains_any(&["timeout", "aborted"]),
        outcome: Outcome::Fixed(FailureKind::Timeout),
    },
    Rule {
        name: "not-found",
        matches: |p| p.contains_any(&["404", "not found"]),
        outcome: Outcome::Fixed(FailureKind::NotFound),
    },
    Rule {
        name: "internal-server-error",
        matches: |p| p.contains_any(&["500", "internal server error"]),
        outcome: Outcome::Fixed(FailureKind::InternalServer),
    },
    Rule {
        name: "unavailable",
        matches: |p| p.contains_any(&["502", "503", "bad gateway", "service unavailable"]),
        outcome: Outcome::Fixed(FailureKind::Unavailable),
    },
    Rule {
        name: "backend-host",
        matches: |p| p.contains_any(BACKEND_HOSTS),
        outcome: Outcome::Fixed(FailureKind::BackendHost),
    },
    Rule {
        name: "parse",
        matches: |p| p.contains_any(&["json", "parse"]),
        outcome: Outcome::Fixed(FailureKind::Parse),
    },
    Rule {
        name: "invalid-id",
        matches: |p| p.contains_any(&["cast to objectid"]),
        outcome: Outcome::Fixed(FailureKind::InvalidId),
    },
    Rule {
        name: "short-validation",
        matches: |p| p.contains_any(VALIDATION_KEYWORDS) && p.chars() < VERBATIM_MAX_CHARS,
        outcome: Outcome::Verbatim,
    },
    Rule {
        name: "leaky",
        matches: |p| p.chars() > LEAK_MAX_CHARS || p.contains_any(LEAK_MARKERS),
        outcome: Outcome::Fixed(FailureKind::Generic),
    },
];

fn is_sentinel(probe: &Probe<'_>, code: &str) -> bool {
    probe.raw.trim().eq_ignore_ascii_case(code)
}

// ── Entry points ─────────────────────────────────────────────────────

fn first_match(raw: &str) -> Option<&'static Rule> {
    let probe = Probe {
        raw,
        lower: raw.to_lowercase(),
    };
    RULES.iter().find(|rule| (rule.matches)(&probe))
}

/// Classify a raw failure message. `None` stands for a missing error value.
pub fn classify(raw: Option<&str>) -> Outcome {
    match raw {
        None => Outcome::Fixed(FailureKind::Generic),
        Some(raw) => first_match(raw).map_or(Outcome::Verbatim, |rule| rule.outcome),
    }
}

/// Name of the rule that decides `raw`, for diagnostics.
pub fn deciding_rule(raw: Option<&str>) -> &'static str {
    match raw {
        None => "absent",
        Some(raw) => first_match(raw).map_or("verbatim", |rule| rule.name),
    }
}

/// Turn a raw failure message into the one sentence shown to the user.
pub fn normalize(raw: Option<&str>) -> String {
    match classify(raw) {
        Outcome::Fixed(kind) => kind.sentence().to_string(),
        Outcome::Verbatim => raw.unwrap_or_default().to_string(),
    }
}

/// Normalize any error value through its `Display` text.
pub fn normalize_error(err: &dyn std::error::Error) -> String {
    normalize(Some(&err.to_string()))
}
