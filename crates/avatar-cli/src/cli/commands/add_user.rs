//! `avatar add-user <email>`

use anyhow::Result;
use avatar_core::profile_db::ProfileDb;

pub async fn run_add_user(db: &ProfileDb, email: &str) -> Result<()> {
    let id = db.add_user(email).await?;
    println!("Added user {id} ({email})");
    Ok(())
}
