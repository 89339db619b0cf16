//! sts-client: talking to the STS checklist proxy API.
//!
//! - [`ProxyClient`] -- read/create/update/list round trips with the fixed
//!   response policy (sentinel errors for 404, non-2xx, malformed and empty
//!   bodies)
//! - [`FormSession`] -- the per-page submission lifecycle
//! - [`capture_image`] -- signature/stamp files to data URLs
//! - [`StsConfig`] -- backend URLs from flags, environment and `sts.toml`
//!
//! HTTP goes through the [`Transport`] trait; [`UreqTransport`] is the real
//! implementation.

pub mod capture;
pub mod config;
pub mod error;
pub mod listing;
pub mod proxy;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::{capture_image, CaptureError};
pub use config::{ConfigError, ConfigOverrides, StsConfig};
pub use error::{ProxyError, TransportError};
pub use listing::{dashboard, DashboardRow, ListEntry, Listing};
pub use proxy::{interpret_response, ProxyClient};
pub use session::{FormSession, Phase};
pub use transport::{FormBody, Method, ProxyRequest, ProxyResponse, Transport, UreqTransport};
