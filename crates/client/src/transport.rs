//! HTTP transport seam.
//!
//! [`ProxyClient`](crate::ProxyClient) builds [`ProxyRequest`] values and
//! hands them to a [`Transport`]. [`UreqTransport`] performs real requests;
//! tests substitute a scripted transport.

use std::fmt;

use crate::error::TransportError;

/// Fixed multipart boundary. The body only ever holds one JSON text part, and
/// JSON text never contains a CRLF-prefixed `--` boundary line.
pub const BOUNDARY: &str = "sts-checklist-boundary-7f3a91c2";

/// Name of the single multipart field carrying the JSON payload.
pub const DATA_FIELD: &str = "data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        })
    }
}

/// Encoded request body with its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FormBody {
    /// Wrap a JSON text as `multipart/form-data` with one field named `data`.
    ///
    /// The part has no `Content-Type` header, matching how browsers encode a
    /// plain string `FormData` entry.
    pub fn data_field(json: &str) -> Self {
        let mut bytes: Vec<u8> = Vec::with_capacity(json.len() + 128);
        bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{DATA_FIELD}\"\r\n\r\n"
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(json.as_bytes());
        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Self {
            content_type: format!("multipart/form-data; boundary={BOUNDARY}"),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<FormBody>,
}

/// Status and raw body text of any HTTP response, 2xx or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: String,
}

pub trait Transport {
    /// Perform one request. HTTP error statuses are responses, not errors.
    fn send(&self, request: &ProxyRequest) -> Result<ProxyResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ProxyRequest) -> Result<ProxyResponse, TransportError> {
        (**self).send(request)
    }
}

/// Blocking transport over `ureq`.
///
/// Status-as-error is disabled so that 4xx/5xx bodies stay readable. No
/// timeout is configured beyond ureq's own defaults.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &ProxyRequest) -> Result<ProxyResponse, TransportError> {
        tracing::debug!(method = %request.method, url = %request.url, "proxy request");

        let result = match (request.method, &request.body) {
            (Method::Get, _) => self.agent.get(&request.url).call(),
            (Method::Post, Some(body)) => self
                .agent
                .post(&request.url)
                .header("Content-Type", &body.content_type)
                .send(&body.bytes[..]),
            (Method::Post, None) => self.agent.post(&request.url).send_empty(),
            (Method::Put, Some(body)) => self
                .agent
                .put(&request.url)
                .header("Content-Type", &body.content_type)
                .send(&body.bytes[..]),
            (Method::Put, None) => self.agent.put(&request.url).send_empty(),
        };

        let response = result.map_err(classify_ureq_error)?;
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(classify_ureq_error)?;

        tracing::debug!(status, bytes = body.len(), "proxy response");
        Ok(ProxyResponse { status, body })
    }
}

/// Map a ureq error onto the transport taxonomy.
fn classify_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) => TransportError::Timeout(err.to_string()),
        other => TransportError::Network(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_field_body_is_bit_exact() {
        let body = FormBody::data_field(r#"{"operationRef":"OP1"}"#);
        let expected = concat!(
            "--sts-checklist-boundary-7f3a91c2\r\n",
            "Content-Disposition: form-data; name=\"data\"\r\n",
            "\r\n",
            "{\"operationRef\":\"OP1\"}\r\n",
            "--sts-checklist-boundary-7f3a91c2--\r\n",
        );
        assert_eq!(String::from_utf8(body.bytes).unwrap(), expected);
        assert_eq!(
            body.content_type,
            "multipart/form-data; boundary=sts-checklist-boundary-7f3a91c2"
        );
    }

    #[test]
    fn data_field_keeps_multiline_json_intact() {
        let json = "{\n  \"generalRemarks\": \"line one\\nline two\"\n}";
        let body = FormBody::data_field(json);
        let text = String::from_utf8(body.bytes).unwrap();
        assert!(text.contains(json));
        assert_eq!(text.matches(BOUNDARY).count(), 2);
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Get.to_string(), "GET");
    }

    #[test]
    fn refused_connection_is_a_network_error() {
        // Port 9 (discard) on localhost is essentially never listening.
        let transport = UreqTransport::new();
        let err = transport
            .send(&ProxyRequest {
                method: Method::Get,
                url: "http://127.0.0.1:9/api/sts-proxy/ops-ofd-001?operationRef=X".into(),
                body: None,
            })
            .unwrap_err();
        assert!(matches!(err, TransportError::Network(_)), "{err:?}");
    }
}
