//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `itask_core` linkage and storage bootstrap from a shell.
//! - Print the persisted task counts for the configured slot.

use itask_core::db::open_db;
use itask_core::{
    init_logging_from_config, CoreConfig, SnapshotStore, SqliteSlotRepository, TaskStore,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("itask_core ping={}", itask_core::ping());
    println!("itask_core version={}", itask_core::core_version());

    match report_counts() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("itask_core error={err}");
            ExitCode::FAILURE
        }
    }
}

fn report_counts() -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    init_logging_from_config(&config)?;

    let conn = open_db(&config.db_path)?;
    let repo = SqliteSlotRepository::try_new(&conn)?;
    let store = TaskStore::open(SnapshotStore::new(repo, config.slot_key.as_str()))?;
    let counts = store.counts();

    log::info!(
        "event=cli_probe module=cli status=ok total={} remaining={}",
        counts.total,
        counts.remaining
    );
    println!("itask_core db={}", config.db_path.display());
    println!(
        "itask_core slot={} total={} remaining={}",
        config.slot_key, counts.total, counts.remaining
    );
    Ok(())
}
