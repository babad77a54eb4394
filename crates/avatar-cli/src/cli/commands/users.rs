//! `avatar users` – list users and their profile images.

use anyhow::Result;
use avatar_core::profile_db::ProfileDb;

pub async fn run_users(db: &ProfileDb) -> Result<()> {
    let users = db.list_users().await?;
    if users.is_empty() {
        println!("No users in database.");
        return Ok(());
    }
    println!("{:<6} {:<32} {}", "ID", "EMAIL", "PROFILE IMAGE");
    for u in users {
        println!(
            "{:<6} {:<32} {}",
            u.id,
            u.email,
            u.profile_image.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
