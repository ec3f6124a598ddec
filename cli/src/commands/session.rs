//! Session commands

use anyhow::Result;

use crate::config::Config;
use crate::output;
use crate::SessionCommands;

pub fn handle(action: SessionCommands, mut config: Config, profile: Option<&str>) -> Result<()> {
    match action {
        SessionCommands::Login { admin_id } => {
            let admin_id = admin_id.trim().to_string();
            if admin_id.is_empty() {
                anyhow::bail!("Admin id cannot be empty");
            }
            config.admin_id = Some(admin_id.clone());
            let path = config.save(profile)?;
            output::success(format!("Logged in as {} ({})", admin_id, path.display()));
        }
        SessionCommands::Logout => {
            config.admin_id = None;
            config.save(profile)?;
            output::success("Logged out");
        }
        SessionCommands::Whoami => match config.session().admin_id() {
            Some(id) => println!("{}", id),
            None => println!("(not logged in)"),
        },
    }
    Ok(())
}
