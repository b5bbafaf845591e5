use anyhow::Result;
use std::process::ExitCode;

use waymark::config::WaymarkConfig;
use waymark::entries::stats::store_stats;
use waymark::entries::EntryStore;

/// Display store statistics in the terminal, or as JSON.
pub fn stats(config: &WaymarkConfig, json: bool) -> Result<ExitCode> {
    let store = EntryStore::load(config.resolved_data_path());
    let cwd = super::current_dir();
    let response = store_stats(&store, cwd.as_deref());

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(ExitCode::SUCCESS);
    }

    for entry in &response.entries {
        println!("{:>10.1}:  {}", entry.weight, entry.path);
    }
    println!("{}", "_".repeat(40));
    println!();
    println!("  Total weight:        {:.0}", response.total_weight);
    println!("  Entries:             {}", response.total_entries);
    match response.current_dir_weight {
        Some(weight) => println!("  Current directory:   {weight:.2}"),
        None => println!("  Current directory:   (not recorded)"),
    }
    println!();
    println!("Data file:             {}", response.data_path);
    println!("Data size:             {} bytes", response.data_size_bytes);
    if let Some(ref modified) = response.data_modified {
        println!("Last saved:            {modified}");
    }
    if let Some(ref modified) = response.backup_modified {
        println!("Last backup:           {modified}");
    }

    Ok(ExitCode::SUCCESS)
}
