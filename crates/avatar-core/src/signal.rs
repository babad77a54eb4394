//! Abuse signal: flags URLs that look like SSRF-challenge probes.
//!
//! Advisory only. Detection never changes how a request is handled.

use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Observability sink told about probe attempts.
pub trait AbuseSignal: Send + Sync {
    fn probe_detected(&self, raw_url: &str);
}

/// Matches raw URLs against the configured probe pattern.
#[derive(Debug, Clone)]
pub struct ProbeDetector {
    pattern: Regex,
}

impl ProbeDetector {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn matches(&self, raw_url: &str) -> bool {
        self.pattern.is_match(raw_url)
    }
}

/// Best-effort probe counter. Concurrent increments may interleave freely;
/// the count only ever grows.
#[derive(Debug, Default)]
pub struct ProbeCounter {
    hits: AtomicU64,
}

impl ProbeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// True once any probe has been seen.
    pub fn triggered(&self) -> bool {
        self.hits() > 0
    }
}

impl AbuseSignal for ProbeCounter {
    fn probe_detected(&self, raw_url: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(url = %raw_url, "ssrf challenge probe detected");
    }
}
