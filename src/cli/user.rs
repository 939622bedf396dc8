use crate::{services::users, Config, Database};
use anyhow::Result;
use std::path::Path;

use super::UserCommand;

pub async fn run(config_path: &Path, command: UserCommand) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;

    match command {
        UserCommand::Add { username, staff } => {
            users::create_user(&db, &username, staff)?;
            tracing::info!("User '{}' created", username);
        }
        UserCommand::List => {
            let all = users::list_users(&db)?;

            println!("{:<20} {:<8}", "USERNAME", "STAFF");
            println!("{}", "-".repeat(28));
            for user in all {
                println!(
                    "{:<20} {:<8}",
                    user.username,
                    if user.is_staff { "yes" } else { "no" }
                );
            }
        }
        UserCommand::Remove { username } => {
            if users::delete_user(&db, &username)? {
                tracing::info!("User '{}' removed", username);
            } else {
                tracing::warn!("User '{}' not found", username);
            }
        }
    }

    Ok(())
}
