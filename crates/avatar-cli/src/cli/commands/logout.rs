//! `avatar logout <token>`

use anyhow::Result;
use avatar_core::profile_db::ProfileDb;

pub async fn run_logout(db: &ProfileDb, token: &str) -> Result<()> {
    if db.remove_session(token).await? {
        println!("Session closed.");
    } else {
        println!("No such session.");
    }
    Ok(())
}
