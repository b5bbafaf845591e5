use chrono::{DateTime, Utc};
use serde::Serialize;

use super::store::EntryStore;
use super::types::Entry;

/// Response from store_stats.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Entries lightest first, so the best candidates end up next to the prompt.
    pub entries: Vec<Entry>,
    pub total_entries: usize,
    pub total_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_dir_weight: Option<f64>,
    pub data_path: String,
    pub data_size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_modified: Option<String>,
}

/// Compute store statistics.
///
/// `current_dir` is looked up so the shell can show how well the current directory is known.
pub fn store_stats(store: &EntryStore, current_dir: Option<&str>) -> StatsResponse {
    let mut entries = store.entries();
    entries.reverse();

    let data_meta = std::fs::metadata(store.data_path()).ok();
    let data_size_bytes = data_meta.as_ref().map(|m| m.len()).unwrap_or(0);
    let data_modified = data_meta.and_then(|m| m.modified().ok()).map(rfc3339);
    let backup_modified = std::fs::metadata(store.backup_path())
        .and_then(|m| m.modified())
        .ok()
        .map(rfc3339);

    StatsResponse {
        total_entries: entries.len(),
        total_weight: store.total_weight(),
        current_dir_weight: current_dir.and_then(|dir| store.weight(dir)),
        data_path: store.data_path().display().to_string(),
        data_size_bytes,
        data_modified,
        backup_modified,
        entries,
    }
}

fn rfc3339(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}
