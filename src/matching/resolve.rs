//! Query resolution: run the matcher strategies over the ranked entries.
//!
//! Passes, stopping at the first that yields anything (completion mode always
//! runs the second pass too, to widen the menu):
//!
//! 1. case-sensitive: consecutive matches, then anywhere matches;
//! 2. case-insensitive: same order, merged after pass 1;
//! 3. fuzzy: last needle against the final path segment.
//!
//! Within a strategy, heavier entries come first.

use std::collections::HashSet;
use std::path::Path;
use tracing::trace;

use super::matcher::Strategy;
use crate::config::WaymarkConfig;
use crate::entries::Entry;

const EXACT_STRATEGIES: [Strategy; 2] = [Strategy::Consecutive, Strategy::Anywhere];

/// Knobs for one resolution.
#[derive(Debug, Clone)]
pub struct MatchOptions<'a> {
    pub max_matches: usize,
    /// Never returned, since the shell is already there.
    pub current_dir: Option<&'a str>,
    /// Completion menus always include case-insensitive matches.
    pub completion: bool,
    /// Drop paths that no longer exist on disk.
    pub check_exists: bool,
    pub fuzzy_threshold: f64,
}

impl<'a> MatchOptions<'a> {
    /// Options for a plain jump.
    pub fn from_config(config: &WaymarkConfig, current_dir: Option<&'a str>) -> Self {
        Self {
            max_matches: config.matching.max_results,
            current_dir,
            completion: false,
            check_exists: true,
            fuzzy_threshold: config.matching.fuzzy_threshold,
        }
    }

    /// Options for building a completion menu.
    pub fn for_completion(config: &WaymarkConfig, current_dir: Option<&'a str>) -> Self {
        Self {
            max_matches: config.matching.completion_entries,
            completion: true,
            ..Self::from_config(config, current_dir)
        }
    }
}

/// Which pass produced the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    NoMatch,
    CaseSensitive,
    CaseInsensitive,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub paths: Vec<String>,
    pub tier: MatchTier,
}

impl MatchResult {
    pub fn first(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Accumulates distinct, reachable paths up to a limit.
struct Collector<'e, 'o> {
    options: &'o MatchOptions<'o>,
    paths: Vec<String>,
    seen: HashSet<&'e str>,
    missing: HashSet<&'e str>,
}

impl<'e, 'o> Collector<'e, 'o> {
    fn new(options: &'o MatchOptions<'o>) -> Self {
        Self {
            options,
            paths: Vec::new(),
            seen: HashSet::new(),
            missing: HashSet::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.paths.len() >= self.options.max_matches
    }

    fn run_pass(
        &mut self,
        candidates: &[&'e Entry],
        strategies: &[Strategy],
        needles: &[&str],
        ignore_case: bool,
    ) {
        for strategy in strategies {
            for &entry in candidates {
                if self.is_full() {
                    return;
                }
                let path = entry.path.as_str();
                if self.seen.contains(path) || self.missing.contains(path) {
                    continue;
                }
                if !strategy.matches(needles, path, ignore_case, self.options.fuzzy_threshold) {
                    continue;
                }
                if self.options.check_exists && !Path::new(path).exists() {
                    trace!(path, "skipping missing path");
                    self.missing.insert(path);
                    continue;
                }
                self.seen.insert(path);
                self.paths.push(path.to_string());
            }
        }
    }
}

/// Resolve `needles` against `entries`.
///
/// `entries` need not be sorted. An empty needle list matches every entry.
pub fn find_matches(entries: &[Entry], needles: &[&str], options: &MatchOptions) -> MatchResult {
    let mut candidates: Vec<&Entry> = entries
        .iter()
        .filter(|e| options.current_dir != Some(e.path.as_str()))
        .collect();
    candidates.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut collector = Collector::new(options);
    let mut tier = MatchTier::NoMatch;

    collector.run_pass(&candidates, &EXACT_STRATEGIES, needles, false);
    if !collector.paths.is_empty() {
        tier = MatchTier::CaseSensitive;
    }

    if options.completion || collector.paths.is_empty() {
        collector.run_pass(&candidates, &EXACT_STRATEGIES, needles, true);
        if tier == MatchTier::NoMatch && !collector.paths.is_empty() {
            tier = MatchTier::CaseInsensitive;
        }
    }

    if collector.paths.is_empty() {
        collector.run_pass(&candidates, &[Strategy::Fuzzy], needles, true);
        if !collector.paths.is_empty() {
            tier = MatchTier::Fuzzy;
        }
    }

    MatchResult {
        paths: collector.paths,
        tier,
    }
}
