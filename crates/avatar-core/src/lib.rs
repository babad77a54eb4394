//! Allowlisted remote profile-image ingestion.
//!
//! A submitted image URL is checked against a hostname allowlist, fetched
//! once, streamed to a per-identity file, and recorded on the profile. If any
//! step fails, the profile gets the raw http(s) link or no image.

pub mod config;
pub mod logging;

pub mod allowlist;
pub mod fallback;
pub mod fetch;
pub mod pipeline;
pub mod profile;
pub mod profile_db;
pub mod signal;
pub mod storage;
pub mod url_model;
