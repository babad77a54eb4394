//! Collaborator port implementations for `ProfileDb`.

use async_trait::async_trait;

use super::db::ProfileDb;
use crate::profile::{Identity, IdentityId, IdentityResolver, ProfileStore, ProfileUpdate};

#[async_trait]
impl IdentityResolver for ProfileDb {
    async fn resolve(&self, credential: &str) -> anyhow::Result<Option<Identity>> {
        self.identity_for_token(credential).await
    }
}

#[async_trait]
impl ProfileStore for ProfileDb {
    async fn update_profile_image(
        &self,
        id: IdentityId,
        value: Option<&str>,
    ) -> anyhow::Result<ProfileUpdate> {
        self.set_profile_image(id, value).await
    }
}
