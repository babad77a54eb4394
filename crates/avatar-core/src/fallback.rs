//! Fallback value when the primary ingestion path fails.

use url::Url;

/// True if `raw` parses and its scheme is exactly `http` or `https`.
pub fn is_web_link(raw: &str) -> bool {
    Url::parse(raw)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

/// Value to store on the profile after a failed ingestion: the raw link if it
/// is an http(s) URL, otherwise nothing (the image is cleared).
pub fn fallback_value(raw: &str) -> Option<String> {
    is_web_link(raw).then(|| raw.to_string())
}
