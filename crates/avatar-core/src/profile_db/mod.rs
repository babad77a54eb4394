//! SQLite-backed identity and profile store (sqlx).
//!
//! Holds users with their `profile_image` field and session tokens that
//! resolve to a user. Implements the `IdentityResolver` and `ProfileStore`
//! ports so the pipeline can run against a local database.

mod db;
mod ports;
mod sessions;
mod types;
mod users;

pub use db::ProfileDb;
pub use types::UserRecord;
