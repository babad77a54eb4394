//! `avatar show <id>`

use anyhow::{bail, Result};
use avatar_core::profile_db::ProfileDb;

pub async fn run_show(db: &ProfileDb, id: i64) -> Result<()> {
    let Some(user) = db.get_user(id).await? else {
        bail!("user {id} not found");
    };
    println!("{}", user.profile_image.as_deref().unwrap_or("-"));
    Ok(())
}
