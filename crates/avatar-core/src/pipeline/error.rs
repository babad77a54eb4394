//! Pipeline failure taxonomy.

use thiserror::Error;

use crate::allowlist::ValidationError;
use crate::fetch::FetchError;
use crate::storage::PersistError;

/// Why the primary path gave up. Always recovered by the fallback.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl FailureReason {
    /// Stage name for logs.
    pub fn stage(&self) -> &'static str {
        match self {
            FailureReason::Validation(_) => "validate",
            FailureReason::Fetch(_) => "fetch",
            FailureReason::Persist(_) => "persist",
        }
    }

    /// True if the failure happened before any outbound request was made.
    pub fn before_network(&self) -> bool {
        matches!(self, FailureReason::Validation(_))
    }
}

/// Failures the pipeline cannot recover from. The caller sees a generic error.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No authenticated identity; nothing was fetched or written.
    #[error("Blocked illegal activity by {origin}")]
    IdentityMissing { origin: String },
    #[error("identity lookup failed")]
    Identity(#[source] anyhow::Error),
    /// The profile store rejected the stored asset path.
    #[error("failed to record profile image")]
    ProfileUpdate(#[source] anyhow::Error),
    /// The profile store rejected the fallback value as well.
    #[error("fallback profile update failed after: {reason}")]
    FallbackUpdate {
        reason: String,
        #[source]
        source: anyhow::Error,
    },
}
