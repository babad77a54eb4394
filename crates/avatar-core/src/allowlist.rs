//! Hostname allowlist gating every outbound fetch.
//!
//! Matching is exact: `imgur.com` does not admit `i.imgur.com` unless both are
//! listed. Parse failures are a denial, never an error the caller must handle.

use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Why a URL may not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("imageUrl is not a valid URL: {0}")]
    Malformed(url::ParseError),
    #[error("imageUrl has no host")]
    MissingHost,
    #[error("imageUrl points to a non-allowed domain: {host}")]
    HostNotAllowed { host: String },
}

/// Result of checking a raw URL against the allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Allowed(Url),
    Denied(ValidationError),
}

impl Validation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Validation::Allowed(_))
    }

    pub fn into_result(self) -> Result<Url, ValidationError> {
        match self {
            Validation::Allowed(url) => Ok(url),
            Validation::Denied(e) => Err(e),
        }
    }
}

/// Closed set of hostnames image URLs may point at.
#[derive(Debug, Clone, Default)]
pub struct HostAllowlist {
    hosts: HashSet<String>,
}

impl HostAllowlist {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|h| h.as_ref().trim().to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        Self { hosts }
    }

    /// True if the parsed URL's host is listed verbatim.
    pub fn is_allowed(&self, url: &Url) -> bool {
        url.host_str().is_some_and(|h| self.hosts.contains(h))
    }

    /// Parse `raw` and check its host. No side effects.
    pub fn validate(&self, raw: &str) -> Validation {
        let url = match Url::parse(raw) {
            Ok(u) => u,
            Err(e) => return Validation::Denied(ValidationError::Malformed(e)),
        };
        let Some(host) = url.host_str() else {
            return Validation::Denied(ValidationError::MissingHost);
        };
        if !self.hosts.contains(host) {
            return Validation::Denied(ValidationError::HostNotAllowed {
                host: host.to_string(),
            });
        }
        Validation::Allowed(url)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
