//! Row types returned by the profile database.

use crate::profile::IdentityId;

/// A user and the current value of their profile image field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: IdentityId,
    pub email: String,
    /// Public asset path, raw http(s) link, or None.
    pub profile_image: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
