use anyhow::Result;
use std::process::ExitCode;
use tracing::debug;

use waymark::config::WaymarkConfig;
use waymark::entries::EntryStore;
use waymark::matching::{find_matches, resolve_token, MatchOptions, TabResolution, TabToken};

/// Resolve needles to one directory and print it.
///
/// A last needle shaped like a completion token (`proj__2`, `proj__1__/path`)
/// selects from the completion menu instead of searching.
pub fn jump(config: &WaymarkConfig, needles: &[String], quotes: bool) -> Result<ExitCode> {
    let store = EntryStore::load(config.resolved_data_path());
    let entries = store.entries();
    let cwd = super::current_dir();
    let needles: Vec<&str> = needles.iter().map(String::as_str).collect();

    if let Some(token) = needles.last().map(|last| TabToken::decode(last)) {
        if token.is_selection() {
            let options = MatchOptions::for_completion(config, cwd.as_deref());
            if let TabResolution::Selected(path) = resolve_token(&token, &entries, &options) {
                super::emit(&path, quotes);
                return Ok(ExitCode::SUCCESS);
            }
            return Ok(ExitCode::FAILURE);
        }
    }

    let options = MatchOptions::from_config(config, cwd.as_deref());
    let result = find_matches(&entries, &needles, &options);
    debug!(tier = ?result.tier, matches = result.paths.len(), "jump resolved");

    match result.first() {
        Some(path) => {
            super::emit(path, quotes);
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}
