//! Client error types.
//!
//! The `Display` text of [`ProxyError`] is the raw failure message handed to
//! [`sts_core::normalize()`]: sentinel codes for the pre-classified cases,
//! the backend's own message when it sent one, transport detail otherwise.

/// Failure of one proxy round trip or of local validation before it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// No operation reference left after trimming. Raised before any request.
    #[error("Operation reference is required. Please provide a valid reference number.")]
    MissingOperationRef,

    /// HTTP 404.
    #[error("CHECKLIST_NOT_FOUND")]
    NotFound,

    /// Non-2xx status without a usable backend message.
    #[error("SERVER_ERROR_{status}")]
    Server { status: u16 },

    /// The backend explained the failure itself (`message` / `error` field).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The body was not JSON.
    #[error("INVALID_RESPONSE_FORMAT")]
    InvalidResponseFormat,

    /// The body was empty or carried an empty payload.
    #[error("NO_DATA_RECEIVED")]
    NoDataReceived,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The record could not be rendered as JSON.
    #[error("failed to serialize JSON payload: {0}")]
    Encode(String),
}

impl ProxyError {
    /// The sentence shown to the user for this failure.
    pub fn user_message(&self) -> String {
        sts_core::normalize(Some(&self.to_string()))
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout: {0}")]
    Timeout(String),
}
