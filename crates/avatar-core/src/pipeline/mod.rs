//! Validate, fetch, persist, and record a remote profile image.
//!
//! ```text
//! Start -> Validating -> Fetching -> Persisting -> Updated
//!              |            |            |
//!              +------------+------------+--> FallbackPending -> Updated | FatalError
//! ```
//!
//! Each stage returns a `Result`; the first failure becomes a `FailureReason`
//! and is handed to the fallback, which writes either the raw http(s) link or
//! nothing. The profile field is written at most once per request.

mod error;
mod outcome;

pub use error::{FailureReason, PipelineError};
pub use outcome::{ImageUploadRequest, PipelineOutcome, Redirect, UrlReport};

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::allowlist::{HostAllowlist, Validation};
use crate::config::AvatarConfig;
use crate::fallback::fallback_value;
use crate::fetch::Fetcher;
use crate::profile::{Identity, IdentityId, IdentityResolver, ProfileStore};
use crate::signal::{AbuseSignal, ProbeDetector};
use crate::storage::{AssetStore, PersistedAsset};
use crate::url_model::extension_for_url;

/// Collaborators the pipeline talks to but does not own.
#[derive(Clone)]
pub struct Collaborators {
    pub identities: Arc<dyn IdentityResolver>,
    pub profiles: Arc<dyn ProfileStore>,
    pub signal: Arc<dyn AbuseSignal>,
}

pub struct Pipeline {
    allowlist: HostAllowlist,
    fetcher: Fetcher,
    assets: AssetStore,
    probes: ProbeDetector,
    base_path: String,
    collab: Collaborators,
}

impl Pipeline {
    pub fn from_config(cfg: &AvatarConfig, collab: Collaborators) -> Result<Self> {
        let allowlist = HostAllowlist::new(&cfg.allowed_hosts);
        if allowlist.is_empty() {
            tracing::warn!("allowlist is empty; every image URL will fall back");
        }
        let probes = ProbeDetector::new(&cfg.probe_pattern)
            .with_context(|| format!("invalid probe_pattern: {}", cfg.probe_pattern))?;
        Ok(Self {
            fetcher: Fetcher::new(cfg.fetch.to_options(), allowlist.clone()),
            allowlist,
            assets: AssetStore::new(&cfg.assets_root, &cfg.public_base),
            probes,
            base_path: cfg.base_path.trim_end_matches('/').to_string(),
            collab,
        })
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Location every non-fatal request is sent to.
    pub fn profile_redirect(&self) -> Redirect {
        Redirect {
            location: format!("{}/profile", self.base_path),
        }
    }

    /// Run the request and map it to the caller-facing redirect.
    pub async fn respond(&self, req: &ImageUploadRequest) -> Result<Redirect, PipelineError> {
        self.handle(req).await?;
        Ok(self.profile_redirect())
    }

    pub async fn handle(&self, req: &ImageUploadRequest) -> Result<PipelineOutcome, PipelineError> {
        let Some(raw) = req.raw_url.as_deref() else {
            return Ok(PipelineOutcome::PassThrough);
        };

        if self.probes.matches(raw) {
            self.collab.signal.probe_detected(raw);
        }

        let identity = self.authenticate(req).await?;

        match self.ingest(identity.id, raw).await {
            Ok(asset) => {
                let update = self
                    .collab
                    .profiles
                    .update_profile_image(identity.id, Some(&asset.public_path))
                    .await
                    .map_err(PipelineError::ProfileUpdate)?;
                tracing::info!(
                    identity = identity.id,
                    path = %asset.public_path,
                    bytes = asset.bytes,
                    ?update,
                    "profile image stored"
                );
                Ok(PipelineOutcome::Stored { asset, update })
            }
            Err(reason) => self.fall_back(identity.id, raw, reason).await,
        }
    }

    async fn authenticate(&self, req: &ImageUploadRequest) -> Result<Identity, PipelineError> {
        let identity = match req.credential.as_deref() {
            Some(credential) => self
                .collab
                .identities
                .resolve(credential)
                .await
                .map_err(PipelineError::Identity)?,
            None => None,
        };
        identity.ok_or_else(|| {
            tracing::warn!(origin = %req.origin, "blocked unauthenticated profile image upload");
            PipelineError::IdentityMissing {
                origin: req.origin.clone(),
            }
        })
    }

    async fn ingest(&self, id: IdentityId, raw: &str) -> Result<PersistedAsset, FailureReason> {
        let url = self.allowlist.validate(raw).into_result()?;
        let ext = extension_for_url(&url);
        tracing::debug!(identity = id, host = url.host_str().unwrap_or(""), %ext, "fetching profile image");
        let mut body = self.fetcher.fetch(&url).await?;
        Ok(self.assets.persist(id, ext, &mut body).await?)
    }

    async fn fall_back(
        &self,
        id: IdentityId,
        raw: &str,
        reason: FailureReason,
    ) -> Result<PipelineOutcome, PipelineError> {
        let value = fallback_value(raw);
        let valid = value.is_some();
        let update = self
            .collab
            .profiles
            .update_profile_image(id, value.as_deref())
            .await
            .map_err(|source| PipelineError::FallbackUpdate {
                reason: reason.to_string(),
                source,
            })?;
        tracing::warn!(
            identity = id,
            stage = reason.stage(),
            valid,
            "error retrieving profile image: {reason}; using image link directly (valid: {valid})"
        );
        Ok(PipelineOutcome::FellBack {
            reason,
            value,
            update,
        })
    }

    /// Classify `raw` without touching the network, disk, or collaborators.
    pub fn classify(&self, raw: &str) -> UrlReport {
        classify_url(&self.allowlist, &self.probes, raw)
    }
}

/// Dry-run view of what the pipeline would do with `raw`.
pub fn classify_url(allowlist: &HostAllowlist, probes: &ProbeDetector, raw: &str) -> UrlReport {
    let (allowed, denial, extension) = match allowlist.validate(raw) {
        Validation::Allowed(url) => (true, None, Some(extension_for_url(&url))),
        Validation::Denied(e) => (false, Some(e.to_string()), None),
    };
    UrlReport {
        url: raw.to_string(),
        allowed,
        denial,
        extension,
        fallback: fallback_value(raw),
        probe: probes.matches(raw),
    }
}
