//! CLI `--add`, `--increase` and `--decrease`: change weights, then run maintenance.

use anyhow::Result;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, warn};

use waymark::config::WaymarkConfig;
use waymark::entries::maintenance::run_maintenance;
use waymark::entries::EntryStore;

/// Record a visit to `dir`. Called by the shell hook on every directory change.
pub fn add(config: &WaymarkConfig, dir: &Path) -> Result<ExitCode> {
    let dir = super::absolute(dir)?;
    let Some(path) = dir.to_str() else {
        warn!(path = %dir.display(), "path is not valid UTF-8, not recorded");
        return Ok(ExitCode::SUCCESS);
    };

    // Home is where every shell starts; counting it would drown everything else.
    if dirs::home_dir().is_some_and(|home| home == dir) {
        debug!("not recording home directory");
        return Ok(ExitCode::SUCCESS);
    }

    let mut store = EntryStore::load(config.resolved_data_path());
    match store.add(path, config.weights.visit_increment) {
        Ok(weight) => debug!(path, weight, "visit recorded"),
        Err(err) => {
            warn!(error = %err, "visit not recorded");
            return Ok(ExitCode::SUCCESS);
        }
    }
    run_maintenance(&mut store, config);
    Ok(ExitCode::SUCCESS)
}

/// Raise (positive `delta`) or lower the current directory's weight and print the result.
pub fn adjust_current(config: &WaymarkConfig, delta: f64) -> Result<ExitCode> {
    let Some(cwd) = super::current_dir() else {
        warn!("cannot determine current directory");
        return Ok(ExitCode::FAILURE);
    };

    let mut store = EntryStore::load(config.resolved_data_path());
    let weight = match store.adjust(&cwd, delta) {
        Ok(weight) => weight,
        Err(err) => {
            warn!(error = %err, "weight not changed");
            return Ok(ExitCode::FAILURE);
        }
    };
    run_maintenance(&mut store, config);

    println!("{weight:.1}:\t{cwd}");
    Ok(ExitCode::SUCCESS)
}
