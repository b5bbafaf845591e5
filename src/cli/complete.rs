use anyhow::Result;
use std::process::ExitCode;

use waymark::config::WaymarkConfig;
use waymark::entries::EntryStore;
use waymark::matching::{resolve_token, MatchOptions, TabResolution, TabToken};

/// Print completion candidates for the last needle, one `needle__n__path` per line,
/// or the selected path when the needle already encodes a choice.
pub fn complete(config: &WaymarkConfig, needles: &[String], quotes: bool) -> Result<ExitCode> {
    let store = EntryStore::load(config.resolved_data_path());
    let entries = store.entries();
    let cwd = super::current_dir();
    let options = MatchOptions::for_completion(config, cwd.as_deref());

    let last = needles.last().map(String::as_str).unwrap_or("");
    match resolve_token(&TabToken::decode(last), &entries, &options) {
        TabResolution::Selected(path) => super::emit(&path, quotes),
        TabResolution::Menu(lines) => {
            for line in &lines {
                super::emit(line, quotes);
            }
        }
        TabResolution::NoMatch => return Ok(ExitCode::FAILURE),
    }
    Ok(ExitCode::SUCCESS)
}
