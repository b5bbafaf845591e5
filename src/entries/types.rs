//! Core entry type definitions.
//!
//! Defines [`Entry`] (one weighted path) and [`StoreError`] (what can go wrong
//! while reading, writing, or mutating the store).

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A remembered directory and its frecency weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Absolute filesystem path, the unique key.
    pub path: String,
    /// Accumulated visit weight, finite and never negative.
    pub weight: f64,
}

impl Entry {
    pub fn new(path: impl Into<String>, weight: f64) -> Self {
        Self {
            path: path.into(),
            weight,
        }
    }

    /// Render as a data-file line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{}\t{}", self.weight, self.path)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in {}: {reason}", path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("path cannot be stored: {0:?}")]
    InvalidPath(String),

    #[error("invalid weight {0}")]
    InvalidWeight(f64),

    #[error("{} is owned by another user", path.display())]
    NotOwner { path: PathBuf },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Parse one `"<weight>\t<path>"` line.
pub(crate) fn parse_line(line: &str) -> Result<Entry, String> {
    let (weight, path) = line
        .split_once('\t')
        .ok_or_else(|| "missing tab separator".to_string())?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|e| format!("bad weight {weight:?}: {e}"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight out of range: {weight}"));
    }
    if path.is_empty() {
        return Err("empty path".into());
    }
    Ok(Entry::new(path, weight))
}

/// Whether `path` survives a round trip through the line format.
pub(crate) fn is_storable_path(path: &str) -> bool {
    !path.is_empty() && !path.contains(['\n', '\r'])
}
