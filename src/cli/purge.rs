//! CLI `--purge` command — forget directories that no longer exist.

use anyhow::Result;
use std::process::ExitCode;

use waymark::config::WaymarkConfig;
use waymark::entries::maintenance::run_maintenance;
use waymark::entries::EntryStore;

pub fn purge(config: &WaymarkConfig) -> Result<ExitCode> {
    let mut store = EntryStore::load(config.resolved_data_path());
    let removed = store.purge_missing();
    run_maintenance(&mut store, config);

    for path in &removed {
        println!("  {path}");
    }
    println!("Purged {} entries.", removed.len());
    Ok(ExitCode::SUCCESS)
}
