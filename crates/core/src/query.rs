//! Page query parameters and URL encoding helpers.
//!
//! A checklist page is addressed as `/forms/<slug>?operationRef=<ref>&mode=update`.
//! Only the literal `mode=update` selects update mode; anything else is create.

use crate::opref::OperationRef;

/// Whether a page edits an existing record or creates a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Create,
    Update,
}

/// Parsed page query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageQuery {
    pub operation_ref: Option<OperationRef>,
    /// `true` only for the literal `mode=update`.
    pub update_requested: bool,
}

impl PageQuery {
    pub fn new(operation_ref: Option<&str>, update_requested: bool) -> Self {
        Self {
            operation_ref: operation_ref.and_then(OperationRef::parse),
            update_requested,
        }
    }

    /// Parse a raw query string, with or without the leading `?`.
    ///
    /// The first occurrence of each parameter wins; unknown parameters are ignored.
    pub fn parse(query: &str) -> Self {
        let mut operation_ref = None;
        let mut mode = None;
        for pair in query.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match percent_decode(key).as_str() {
                "operationRef" if operation_ref.is_none() => {
                    operation_ref = Some(percent_decode(value));
                }
                "mode" if mode.is_none() => mode = Some(percent_decode(value)),
                _ => {}
            }
        }
        Self::new(operation_ref.as_deref(), mode.as_deref() == Some("update"))
    }

    /// The mode a page mounts in: update requires both `mode=update` and a
    /// non-empty reference.
    pub fn mode(&self) -> Mode {
        if self.update_requested && self.operation_ref.is_some() {
            Mode::Update
        } else {
            Mode::Create
        }
    }

    /// Re-encode as a query string (without `?`). Empty when nothing is set.
    pub fn to_query_string(&self) -> String {
        let mut parts = Vec::new();
        if let Some(op) = &self.operation_ref {
            parts.push(format!("operationRef={}", urlencoded(op.as_str())));
        }
        if self.update_requested {
            parts.push("mode=update".to_string());
        }
        parts.join("&")
    }
}

/// Percent-encode a query string value (spaces → %20, etc.).
///
/// Only unreserved characters are left as-is.
pub fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(ch),
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).as_bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    out
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes are kept literally.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                match (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_mode_needs_reference() {
        let q = PageQuery::parse("?operationRef=OP123&mode=update");
        assert_eq!(q.mode(), Mode::Update);
        assert_eq!(q.operation_ref.unwrap().as_str(), "OP123");

        let q = PageQuery::parse("operationRef=%2C&mode=update");
        assert_eq!(q.operation_ref, None);
        assert_eq!(q.mode(), Mode::Create);
    }

    #[test]
    fn only_literal_update_selects_update_mode() {
        assert_eq!(PageQuery::parse("operationRef=A&mode=UPDATE").mode(), Mode::Create);
        assert_eq!(PageQuery::parse("operationRef=A&mode=edit").mode(), Mode::Create);
        assert_eq!(PageQuery::parse("operationRef=A").mode(), Mode::Create);
    }

    #[test]
    fn reference_is_decoded_then_trimmed() {
        let q = PageQuery::parse("operationRef=OP%20123%2C%20%20");
        assert_eq!(q.operation_ref.unwrap().as_str(), "OP 123");
        let q = PageQuery::parse("operationRef=STS+7,");
        assert_eq!(q.operation_ref.unwrap().as_str(), "STS 7");
    }

    #[test]
    fn first_occurrence_wins() {
        let q = PageQuery::parse("operationRef=A&operationRef=B&mode=update&mode=create");
        assert_eq!(q.operation_ref.unwrap().as_str(), "A");
        assert!(q.update_requested);
    }

    #[test]
    fn urlencoded_escapes_reserved_characters() {
        assert_eq!(urlencoded("OP 1/2&3"), "OP%201%2F2%263");
        assert_eq!(urlencoded("STS-2025_01.a~"), "STS-2025_01.a~");
        assert_eq!(urlencoded("Ø"), "%C3%98");
    }

    #[test]
    fn decode_reverses_encode() {
        for raw in ["OP 1/2&3", "Ø-ref", "plain"] {
            assert_eq!(percent_decode(&urlencoded(raw)), raw);
        }
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn query_string_round_trip() {
        let q = PageQuery::new(Some("OP 9,"), true);
        assert_eq!(q.to_query_string(), "operationRef=OP%209&mode=update");
        assert_eq!(PageQuery::parse(&q.to_query_string()), q);
        assert_eq!(PageQuery::default().to_query_string(), "");
    }
}
