//! `avatar login <id>` – open a session token for a user.

use anyhow::{bail, Result};
use avatar_core::profile_db::ProfileDb;

pub async fn run_login(db: &ProfileDb, id: i64) -> Result<()> {
    if db.get_user(id).await?.is_none() {
        bail!("user {id} not found");
    }
    let token = db.create_session(id).await?;
    println!("{token}");
    Ok(())
}
