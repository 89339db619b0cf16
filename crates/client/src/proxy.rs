//! Proxy API client.
//!
//! [`ProxyClient`] owns every HTTP interaction with the checklist proxy.
//! Sessions and CLI commands call it rather than building requests
//! themselves. Every response goes through [`interpret_response`], which
//! applies the fixed policy: 404 is `CHECKLIST_NOT_FOUND`, other non-2xx
//! statuses carry the backend's own message or `SERVER_ERROR_<status>`, and
//! empty or non-JSON bodies become the matching sentinel.

use serde_json::Value;
use sts_core::lenient::{is_empty_payload, text, unwrap_data};
use sts_core::query::urlencoded;
use sts_core::{FormKind, OperationRef};

use crate::error::ProxyError;
use crate::listing::Listing;
use crate::transport::{FormBody, Method, ProxyRequest, ProxyResponse, Transport, UreqTransport};

/// Client for `<proxy base>/<slug>` endpoints.
pub struct ProxyClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl ProxyClient<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> ProxyClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Read one record.
    ///
    /// GET `<base>/<slug>?operationRef=<enc>`
    ///
    /// Returns the record JSON with any `data` envelope removed.
    pub fn fetch(&self, kind: FormKind, operation_ref: &OperationRef) -> Result<Value, ProxyError> {
        let url = self.record_url(kind, operation_ref);
        let body = self.exchange(Method::Get, url, None)?;
        let record = unwrap_data(&body);
        if is_empty_payload(record) {
            return Err(ProxyError::NoDataReceived);
        }
        Ok(record.clone())
    }

    /// Create a record.
    ///
    /// POST `<base>/<slug>/create` with the payload in the `data` field.
    pub fn create(&self, kind: FormKind, payload: &Value) -> Result<Value, ProxyError> {
        let url = format!("{}/{}/create", self.base_url, kind.slug());
        let body = encode_payload(payload)?;
        self.exchange(Method::Post, url, Some(body))
    }

    /// Replace a record.
    ///
    /// PUT `<base>/<slug>?operationRef=<enc>` with the payload in the `data` field.
    pub fn update(
        &self,
        kind: FormKind,
        operation_ref: &OperationRef,
        payload: &Value,
    ) -> Result<Value, ProxyError> {
        let url = self.record_url(kind, operation_ref);
        let body = encode_payload(payload)?;
        self.exchange(Method::Put, url, Some(body))
    }

    /// List the records of one form created in `year`.
    ///
    /// GET `<base>/<slug>/list?year=<yyyy>`
    pub fn list(&self, kind: FormKind, year: i32) -> Result<Listing, ProxyError> {
        let url = format!("{}/{}/list?year={}", self.base_url, kind.slug(), year);
        let response = self.send(Method::Get, url, None)?;
        // An empty year is an empty listing, not NO_DATA_RECEIVED.
        let body = read_body(&response)?;
        Ok(Listing::from_body(&body))
    }

    fn record_url(&self, kind: FormKind, operation_ref: &OperationRef) -> String {
        format!(
            "{}/{}?operationRef={}",
            self.base_url,
            kind.slug(),
            urlencoded(operation_ref.as_str())
        )
    }

    fn exchange(
        &self,
        method: Method,
        url: String,
        body: Option<FormBody>,
    ) -> Result<Value, ProxyError> {
        let response = self.send(method, url, body)?;
        interpret_response(&response)
    }

    fn send(
        &self,
        method: Method,
        url: String,
        body: Option<FormBody>,
    ) -> Result<ProxyResponse, ProxyError> {
        tracing::debug!(%method, %url, "sending checklist request");
        let request = ProxyRequest { method, url, body };
        Ok(self.transport.send(&request)?)
    }
}

fn encode_payload(payload: &Value) -> Result<FormBody, ProxyError> {
    let json = serde_json::to_string(payload).map_err(|e| ProxyError::Encode(e.to_string()))?;
    Ok(FormBody::data_field(&json))
}

/// Apply the response policy to one HTTP response.
///
/// On success returns the parsed body (envelope intact).
pub fn interpret_response(response: &ProxyResponse) -> Result<Value, ProxyError> {
    let body = read_body(response)?;
    if is_empty_payload(&body) {
        return Err(ProxyError::NoDataReceived);
    }
    Ok(body)
}

/// Status, body and `success` checks without the empty-payload rule.
fn read_body(response: &ProxyResponse) -> Result<Value, ProxyError> {
    let status = response.status;
    if status == 404 {
        return Err(ProxyError::NotFound);
    }

    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| backend_message(&body));
        return Err(match message {
            Some(message) => ProxyError::Rejected { status, message },
            None => ProxyError::Server { status },
        });
    }

    if response.body.trim().is_empty() {
        return Err(ProxyError::NoDataReceived);
    }
    let body: Value =
        serde_json::from_str(&response.body).map_err(|_| ProxyError::InvalidResponseFormat)?;

    if body.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(match backend_message(&body) {
            Some(message) => ProxyError::Rejected { status, message },
            None => ProxyError::Server { status },
        });
    }

    Ok(body)
}

/// The backend's own explanation: `message`, else `error`.
fn backend_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .map(|key| text(body, key))
        .find(|s| !s.trim().is_empty())
}
