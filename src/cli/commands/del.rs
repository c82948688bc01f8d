use crate::cli::commands::{ask_confirmation, open_repository};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::repository::{EntryRepository, find_entry};
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, all } = cmd {
        let repo = open_repository(cfg)?;

        if *all {
            if !ask_confirmation("Delete ALL entries? This action is irreversible.") {
                info("Operation cancelled.");
                return Ok(());
            }
            repo.delete_all()?;
            success("All entries have been deleted.");
            return Ok(());
        }

        if let Some(id) = id {
            let entry = find_entry(&*repo, id)?;

            let prompt = format!(
                "Delete entry [{}] of {}? This action is irreversible.",
                entry.short_id(),
                entry.start.format("%Y-%m-%d %H:%M")
            );
            if !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }

            repo.delete(&entry)?;
            success(format!("Entry [{}] has been deleted.", entry.short_id()));
        }
    }

    Ok(())
}
