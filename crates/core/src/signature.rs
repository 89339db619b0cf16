//! Signature and stamp image values.
//!
//! A signature field holds one of four things: nothing, a freshly captured
//! `data:` URL, a backend-relative `/uploads/...` path, or an absolute URL.
//! Display resolves relative paths against the backend host; transmission
//! strips the `data:...;base64,` prefix because the backend expects raw
//! base64.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Suffix removed from the configured API base URL to obtain the asset host.
pub const API_SUFFIX: &str = "/api";

/// A signature or stamp image value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SignatureImage {
    #[default]
    Empty,
    /// `data:<mime>;base64,<payload>`
    DataUrl(String),
    /// Backend-relative path, kept exactly as stored.
    RelativePath(String),
    /// `http://` or `https://` URL.
    Absolute(String),
}

impl SignatureImage {
    /// Classify a stored or received value by its prefix.
    pub fn classify(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() {
            return SignatureImage::Empty;
        }
        if value.starts_with("data:") {
            return SignatureImage::DataUrl(value.to_string());
        }
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return SignatureImage::Absolute(value.to_string());
        }
        SignatureImage::RelativePath(value.to_string())
    }

    /// Build a data URL from a MIME type and already-encoded base64 payload.
    pub fn from_base64(mime: &str, payload: &str) -> Self {
        SignatureImage::DataUrl(format!("data:{};base64,{}", mime, payload))
    }

    pub fn as_str(&self) -> &str {
        match self {
            SignatureImage::Empty => "",
            SignatureImage::DataUrl(s)
            | SignatureImage::RelativePath(s)
            | SignatureImage::Absolute(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SignatureImage::Empty)
    }

    /// URL suitable for display. Absolute and data URLs are returned as-is.
    pub fn resolve(&self, api_base_url: &str) -> String {
        match self {
            SignatureImage::RelativePath(path) => {
                let path = path.trim_start_matches('/');
                format!("{}/{}", asset_base(api_base_url), path)
            }
            other => other.as_str().to_string(),
        }
    }

    /// Value sent to the backend: raw base64 for data URLs, unchanged otherwise.
    pub fn to_wire(&self) -> &str {
        match self {
            SignatureImage::DataUrl(url) => match url.find("base64,") {
                Some(idx) => &url[idx + "base64,".len()..],
                None => url.split_once(',').map(|(_, data)| data).unwrap_or(""),
            },
            other => other.as_str(),
        }
    }
}

/// Asset host derived from the API base URL: trailing `/` and a trailing
/// [`API_SUFFIX`] are removed.
pub fn asset_base(api_base_url: &str) -> &str {
    let trimmed = api_base_url.trim().trim_end_matches('/');
    trimmed.strip_suffix(API_SUFFIX).unwrap_or(trimmed)
}

/// Resolve a raw stored value for display.
pub fn resolve_image_url(raw: &str, api_base_url: &str) -> String {
    SignatureImage::classify(raw).resolve(api_base_url)
}

impl Serialize for SignatureImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SignatureImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(SignatureImage::classify)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://sts.example.com/api";

    #[test]
    fn classify_by_prefix() {
        assert_eq!(SignatureImage::classify("  "), SignatureImage::Empty);
        assert!(matches!(
            SignatureImage::classify("data:image/png;base64,AAAA"),
            SignatureImage::DataUrl(_)
        ));
        assert!(matches!(
            SignatureImage::classify("HTTPS://cdn.example.com/a.png"),
            SignatureImage::Absolute(_)
        ));
        assert_eq!(
            SignatureImage::classify("uploads/sig.png"),
            SignatureImage::RelativePath("uploads/sig.png".into())
        );
    }

    #[test]
    fn unprefixed_values_travel_back_unchanged() {
        let raw = "iVBORw0KGgoAAAANSUhEUg/+AB==";
        let img = SignatureImage::classify(raw);
        assert_eq!(img.as_str(), raw);
        assert_eq!(img.to_wire(), raw);
        assert_eq!(
            resolve_image_url("uploads/sig.png", BASE),
            "https://sts.example.com/uploads/sig.png"
        );
    }

    #[test]
    fn relative_path_resolves_against_asset_host() {
        assert_eq!(
            resolve_image_url("/uploads/sig.png", BASE),
            "https://sts.example.com/uploads/sig.png"
        );
        assert_eq!(
            resolve_image_url("/uploads/sig.png", "https://sts.example.com/api/"),
            "https://sts.example.com/uploads/sig.png"
        );
        assert_eq!(
            resolve_image_url("/uploads/sig.png", "https://sts.example.com"),
            "https://sts.example.com/uploads/sig.png"
        );
    }

    #[test]
    fn resolution_is_idempotent_for_absolute_and_data_urls() {
        for raw in [
            "http://files.example.com/x.png",
            "https://files.example.com/x.png",
            "data:image/jpeg;base64,/9j/4AAQ",
        ] {
            assert_eq!(resolve_image_url(raw, BASE), raw);
        }
        let once = resolve_image_url("/uploads/a.png", BASE);
        assert_eq!(resolve_image_url(&once, BASE), once);
    }

    #[test]
    fn wire_value_strips_data_url_prefix() {
        let img = SignatureImage::from_base64("image/png", "iVBORw0KGgo=");
        assert_eq!(img.to_wire(), "iVBORw0KGgo=");
        let path = SignatureImage::classify("/uploads/stamp.png");
        assert_eq!(path.to_wire(), "/uploads/stamp.png");
        assert_eq!(SignatureImage::Empty.to_wire(), "");
    }

    #[test]
    fn deserializes_null_as_empty() {
        let img: SignatureImage = serde_json::from_str("null").unwrap();
        assert!(img.is_empty());
        let img: SignatureImage = serde_json::from_str("\"/uploads/a.png\"").unwrap();
        assert_eq!(img.as_str(), "/uploads/a.png");
    }
}
