//! CLI for the avatar profile-image pipeline.

mod commands;

use anyhow::Result;
use avatar_core::config;
use avatar_core::profile_db::ProfileDb;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_add_user, run_check, run_login, run_logout, run_show, run_upload, run_users};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "avatar")]
#[command(about = "Allowlisted remote profile-image ingestion", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/avatar/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Profile database (default: ~/.local/state/avatar/profiles.db).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Create a user with an empty profile image.
    AddUser {
        email: String,
    },

    /// Open a session for a user and print its token.
    Login {
        /// User identifier.
        id: i64,
    },

    /// End a session.
    Logout {
        token: String,
    },

    /// Set a profile image from a remote URL.
    Upload {
        /// Session token identifying the uploader.
        #[arg(long)]
        token: Option<String>,
        /// Image URL; omit to pass through without changes.
        #[arg(long)]
        url: Option<String>,
        /// Remote origin recorded when the request is rejected.
        #[arg(long, default_value = "local")]
        origin: String,
    },

    /// Show a user's profile image.
    Show {
        /// User identifier.
        id: i64,
    },

    /// List users.
    Users,

    /// Classify a URL against the allowlist without fetching it.
    Check {
        url: String,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_or_init_at(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        if let CliCommand::Check { url, json } = &cli.command {
            return run_check(&cfg, url, *json);
        }

        let db = match &cli.db {
            Some(path) => ProfileDb::open_at(path).await?,
            None => ProfileDb::open_default().await?,
        };

        match cli.command {
            CliCommand::AddUser { email } => run_add_user(&db, &email).await?,
            CliCommand::Login { id } => run_login(&db, id).await?,
            CliCommand::Logout { token } => run_logout(&db, &token).await?,
            CliCommand::Upload { token, url, origin } => {
                run_upload(&cfg, &db, token, url, origin).await?
            }
            CliCommand::Show { id } => run_show(&db, id).await?,
            CliCommand::Users => run_users(&db).await?,
            CliCommand::Check { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
