//! Operation reference normalization.
//!
//! Operation references arrive from page URLs and hand-typed form fields and
//! frequently carry a trailing comma (copied out of lists) or stray spaces.
//! Every comparison, lookup and submission goes through [`OperationRef`],
//! which only ever holds the trimmed, non-empty form.

use std::fmt;

use serde::Serialize;

/// Strip surrounding whitespace and every trailing comma.
///
/// Commas and whitespace at the end are removed in any interleaving, so the
/// function is idempotent: `"OP123, ,"` and `"OP123"` both yield `"OP123"`.
pub fn trim_operation_ref(raw: &str) -> &str {
    raw.trim_end_matches(|c: char| c == ',' || c.is_whitespace())
        .trim_start()
}

/// A trimmed, non-empty operation reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OperationRef(String);

impl OperationRef {
    /// Parse a raw reference. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = trim_operation_ref(raw);
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OperationRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
