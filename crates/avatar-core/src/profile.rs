//! Ports to the collaborators that own identities and profile records.

use async_trait::async_trait;

/// Stable identity key; also the asset file stem.
pub type IdentityId = i64;

/// An authenticated identity. The pipeline reads it and never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
}

/// Result of writing the profile image field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUpdate {
    Updated,
    /// No profile record exists for the identity; nothing was written.
    NoProfile,
}

/// Resolves an opaque session credential to an identity.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` when the credential is unknown or expired.
    async fn resolve(&self, credential: &str) -> anyhow::Result<Option<Identity>>;
}

/// Owner of profile records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Set (or clear, with `None`) the identity's profile image.
    async fn update_profile_image(
        &self,
        id: IdentityId,
        value: Option<&str>,
    ) -> anyhow::Result<ProfileUpdate>;
}
