use serde::Serialize;
use tracing::{debug, warn};

use super::store::{EntryStore, SaveOutcome};
use super::types::Entry;
use crate::config::WaymarkConfig;

/// Hard stop for the decay loop; a factor validated into (0, 1) converges long before this.
const MAX_DECAY_ROUNDS: usize = 10_000;

// ── Result types ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DecayResult {
    pub rounds: usize,
    pub total_before: f64,
    pub total_after: f64,
}

#[derive(Debug, Serialize)]
pub struct TrimResult {
    pub removed: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct MaintenanceResult {
    pub decay: DecayResult,
    pub trim: TrimResult,
    #[serde(skip)]
    pub save: SaveOutcome,
}

// ── Decay ────────────────────────────────────────────────────────────────────

/// Decay all weights by `decay_factor` until the total is back under `max_total_weight`.
///
/// A store already under the ceiling is left alone (`rounds == 0`).
pub fn decay_if_over(store: &mut EntryStore, config: &WaymarkConfig) -> DecayResult {
    let w = &config.weights;
    let total_before = store.total_weight();
    let mut total = total_before;
    let mut rounds = 0;

    while total > w.max_total_weight && rounds < MAX_DECAY_ROUNDS {
        store.decay(w.decay_factor);
        total = store.total_weight();
        rounds += 1;
    }

    if total > w.max_total_weight {
        warn!(total, ceiling = w.max_total_weight, "decay did not converge");
    } else if rounds > 0 {
        debug!(rounds, total_before, total_after = total, "weights decayed");
    }

    DecayResult {
        rounds,
        total_before,
        total_after: total,
    }
}

// ── Trim ─────────────────────────────────────────────────────────────────────

/// Drop the lightest `trim_percent` of entries once the store holds more than `max_entries`.
pub fn trim_if_over(store: &mut EntryStore, config: &WaymarkConfig) -> TrimResult {
    let w = &config.weights;
    if store.len() <= w.max_entries {
        return TrimResult {
            removed: Vec::new(),
        };
    }

    let removed = store.trim(w.trim_percent);
    debug!(removed = removed.len(), remaining = store.len(), "store trimmed");
    TrimResult { removed }
}

// ── Full cycle ───────────────────────────────────────────────────────────────

/// Decay, then trim, then persist. Run once at the end of every mutating invocation.
pub fn run_maintenance(store: &mut EntryStore, config: &WaymarkConfig) -> MaintenanceResult {
    let decay = decay_if_over(store, config);
    let trim = trim_if_over(store, config);
    let save = store.save(config.backup_interval());
    MaintenanceResult { decay, trim, save }
}
