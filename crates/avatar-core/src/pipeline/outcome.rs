//! Request and outcome types.

use serde::Serialize;

use super::error::FailureReason;
use crate::profile::ProfileUpdate;
use crate::storage::PersistedAsset;
use crate::url_model::ImageExtension;

/// One inbound "set my profile image from this URL" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUploadRequest {
    pub raw_url: Option<String>,
    /// Opaque session credential handed to the identity collaborator.
    pub credential: Option<String>,
    /// Remote network origin, for logs and the rejection message.
    pub origin: String,
}

impl ImageUploadRequest {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            raw_url: None,
            credential: None,
            origin: origin.into(),
        }
    }

    pub fn with_url(mut self, raw_url: impl Into<String>) -> Self {
        self.raw_url = Some(raw_url.into());
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }
}

/// Terminal state of a request that did not fail fatally.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The request carried no URL; nothing happened.
    PassThrough,
    Stored {
        asset: PersistedAsset,
        update: ProfileUpdate,
    },
    FellBack {
        reason: FailureReason,
        /// The raw link for http(s) URLs, None when the image was cleared.
        value: Option<String>,
        update: ProfileUpdate,
    },
}

impl PipelineOutcome {
    /// Value handed to the profile store, or None for a pass-through.
    pub fn written_value(&self) -> Option<Option<&str>> {
        match self {
            PipelineOutcome::PassThrough => None,
            PipelineOutcome::Stored { asset, .. } => Some(Some(asset.public_path.as_str())),
            PipelineOutcome::FellBack { value, .. } => Some(value.as_deref()),
        }
    }
}

/// Where the caller is sent after any non-fatal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
}

/// Dry-run classification of a raw URL. No network or disk access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlReport {
    pub url: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<String>,
    /// Extension the asset would be stored with (allowed URLs only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<ImageExtension>,
    /// Value stored if ingestion fails.
    pub fallback: Option<String>,
    pub probe: bool,
}
