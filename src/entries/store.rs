//! The weighted entry store and its on-disk lifecycle.
//!
//! [`EntryStore::load`] never fails: a corrupt data file is replaced from the
//! `.bak` copy once, and if that fails too the store starts empty.
//! [`EntryStore::save`] writes a temp file next to the target, fsyncs it, and
//! renames it into place, so readers only ever see a complete snapshot.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use super::types::{is_storable_path, parse_line, Entry, StoreError};

/// What [`EntryStore::save`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Data file replaced.
    Written,
    /// Target is owned by someone else; nothing touched.
    Skipped,
    /// Writing failed; the previous data file is intact.
    Failed,
}

#[derive(Debug, Clone)]
pub struct EntryStore {
    data_path: PathBuf,
    backup_path: PathBuf,
    entries: HashMap<String, f64>,
}

/// `<data_path>.bak`
pub fn backup_path_for(data_path: &Path) -> PathBuf {
    let mut name = data_path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

impl EntryStore {
    /// An empty store that will persist to `data_path`.
    pub fn empty(data_path: impl Into<PathBuf>) -> Self {
        let data_path = data_path.into();
        Self {
            backup_path: backup_path_for(&data_path),
            data_path,
            entries: HashMap::new(),
        }
    }

    /// Load the store from `data_path`, falling back to the backup and then to empty.
    pub fn load(data_path: impl Into<PathBuf>) -> Self {
        let mut store = Self::empty(data_path);
        store.entries = match read_entries(&store.data_path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "data file unusable, trying backup");
                recover_from_backup(&store.data_path, &store.backup_path)
            }
        };
        debug!(
            path = %store.data_path.display(),
            entries = store.entries.len(),
            "entry store loaded"
        );
        store
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weight(&self, path: &str) -> Option<f64> {
        self.entries.get(path).copied()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.values().sum()
    }

    /// All entries, heaviest first; equal weights ordered by path.
    pub fn entries(&self) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .entries
            .iter()
            .map(|(path, weight)| Entry::new(path.clone(), *weight))
            .collect();
        entries.sort_by(|a, b| {
            b.weight
                .total_cmp(&a.weight)
                .then_with(|| a.path.cmp(&b.path))
        });
        entries
    }

    /// Record a visit: `weight[path] += increment`. Returns the new weight.
    pub fn add(&mut self, path: &str, increment: f64) -> Result<f64, StoreError> {
        if !increment.is_finite() || increment < 0.0 {
            return Err(StoreError::InvalidWeight(increment));
        }
        self.adjust(path, increment)
    }

    /// Add a signed amount to a path's weight, clamping at zero.
    pub fn adjust(&mut self, path: &str, delta: f64) -> Result<f64, StoreError> {
        if !is_storable_path(path) {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        if !delta.is_finite() {
            return Err(StoreError::InvalidWeight(delta));
        }
        let weight = self.entries.entry(path.to_string()).or_insert(0.0);
        *weight = (*weight + delta).max(0.0);
        Ok(*weight)
    }

    pub fn remove(&mut self, path: &str) -> Option<f64> {
        self.entries.remove(path)
    }

    /// Drop entries whose directories no longer exist. Returns the removed paths, sorted.
    pub fn purge_missing(&mut self) -> Vec<String> {
        let mut removed: Vec<String> = self
            .entries
            .keys()
            .filter(|path| !Path::new(path.as_str()).exists())
            .cloned()
            .collect();
        for path in &removed {
            self.remove(path);
        }
        removed.sort();
        removed
    }

    /// Multiply every weight by `factor`.
    pub fn decay(&mut self, factor: f64) {
        for weight in self.entries.values_mut() {
            *weight *= factor;
        }
    }

    /// Remove the lowest-weighted `ceil(len * percent / 100)` entries and return them,
    /// lightest first.
    pub fn trim(&mut self, percent: usize) -> Vec<Entry> {
        let count = self.entries.len();
        let remove_cnt = (count * percent.min(100)).div_ceil(100);
        let mut ranked = self.entries();
        let mut removed = ranked.split_off(count - remove_cnt);
        for entry in &removed {
            self.entries.remove(&entry.path);
        }
        removed.reverse();
        removed
    }

    /// Persist atomically, then refresh the backup if it is older than `backup_interval`.
    ///
    /// Never returns an error: failures are logged and reported through [`SaveOutcome`].
    pub fn save(&self, backup_interval: Duration) -> SaveOutcome {
        match ensure_owned(&self.data_path) {
            Ok(()) => {}
            Err(err @ StoreError::NotOwner { .. }) => {
                warn!(error = %err, "not saving");
                return SaveOutcome::Skipped;
            }
            Err(err) => {
                error!(error = %err, "cannot inspect data file, previous file kept");
                return SaveOutcome::Failed;
            }
        }

        if let Err(err) = self.write_atomic() {
            error!(error = %err, "failed to save data (disk full?), previous file kept");
            return SaveOutcome::Failed;
        }

        match self.refresh_backup(backup_interval) {
            Ok(true) => info!(path = %self.backup_path.display(), "backup refreshed"),
            Ok(false) => {}
            Err(err) => warn!(error = %err, "failed to refresh backup"),
        }
        SaveOutcome::Written
    }

    fn write_atomic(&self) -> Result<(), StoreError> {
        let parent = match self.data_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

        // Same directory as the target so the rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
        {
            let mut writer = BufWriter::new(&mut tmp);
            for entry in self.entries() {
                writeln!(writer, "{}", entry.to_line())
                    .map_err(|e| StoreError::io(&self.data_path, e))?;
            }
            writer
                .flush()
                .map_err(|e| StoreError::io(&self.data_path, e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        tmp.persist(&self.data_path)
            .map_err(|e| StoreError::io(&self.data_path, e.error))?;

        if let Ok(dir) = fs::File::open(parent) {
            let _ = dir.sync_all();
        }
        debug!(path = %self.data_path.display(), entries = self.entries.len(), "entry store saved");
        Ok(())
    }

    /// Copy the data file over the backup if the backup is missing or stale.
    fn refresh_backup(&self, backup_interval: Duration) -> Result<bool, StoreError> {
        let stale = match fs::metadata(&self.backup_path) {
            Ok(meta) => {
                let modified: DateTime<Utc> = meta
                    .modified()
                    .map_err(|e| StoreError::io(&self.backup_path, e))?
                    .into();
                Utc::now() - modified >= backup_interval
            }
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(StoreError::io(&self.backup_path, e)),
        };

        if stale {
            fs::copy(&self.data_path, &self.backup_path)
                .map_err(|e| StoreError::io(&self.backup_path, e))?;
        }
        Ok(stale)
    }
}

/// Read and parse a whole data file. A missing file is an empty store.
fn read_entries(path: &Path) -> Result<HashMap<String, f64>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let mut entries = HashMap::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry = parse_line(line).map_err(|reason| StoreError::Malformed {
            path: path.to_path_buf(),
            line: idx + 1,
            reason,
        })?;
        entries.insert(entry.path, entry.weight);
    }
    Ok(entries)
}

/// Copy the backup over the data file and read it once more.
fn recover_from_backup(data_path: &Path, backup_path: &Path) -> HashMap<String, f64> {
    if !backup_path.exists() {
        warn!("no backup at {}, starting empty", backup_path.display());
        return HashMap::new();
    }
    if let Err(e) = fs::copy(backup_path, data_path) {
        warn!(error = %e, "failed to restore backup, starting empty");
        return HashMap::new();
    }
    match read_entries(data_path) {
        Ok(entries) => {
            info!(entries = entries.len(), "restored entries from backup");
            entries
        }
        Err(err) => {
            warn!(error = %err, "backup unusable too, starting empty");
            HashMap::new()
        }
    }
}

#[cfg(unix)]
fn ensure_owned(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::MetadataExt;

    match fs::metadata(path) {
        Ok(meta) => {
            // SAFETY: geteuid has no preconditions and always succeeds.
            let euid = unsafe { libc::geteuid() };
            if meta.uid() == euid {
                Ok(())
            } else {
                Err(StoreError::NotOwner {
                    path: path.to_path_buf(),
                })
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

#[cfg(not(unix))]
fn ensure_owned(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}
