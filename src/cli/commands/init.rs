use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log;
use crate::db::repository::SqliteEntryRepository;
use crate::errors::AppResult;
use crate::ui::messages::warning;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    // 1️⃣ configuration
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing paytimer…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &cfg.database);

    // 2️⃣ database + migrations
    let repo = SqliteEntryRepository::open(&cfg.database)?;

    println!("✅ Database initialized at {}", &cfg.database);

    // 3️⃣ internal log (non blocking)
    if let Err(e) = log::ttlog(
        &repo.pool().conn,
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 paytimer initialization completed!");
    Ok(())
}
