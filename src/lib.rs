//! Frecency-based directory jumping.
//!
//! waymark remembers the directories a shell visits, each with a weight that
//! grows on every visit and decays as the store fills up, and resolves a few
//! typed fragments ("needles") to the best-weighted matching directory.
//!
//! | Pass | Strategy | Example: needles `["proj"]` |
//! |------|----------|-----------------------------|
//! | 1 | case-sensitive, last needle in the final segment, then anywhere | `/home/me/proj`, then `/proj/src` |
//! | 2 | case-insensitive, same order | `/home/me/Proj` |
//! | 3 | fuzzy, similarity ≥ 0.6 against the final segment | `/home/me/prjo` |
//!
//! # Storage
//!
//! A flat text file, one `"<weight>\t<path>"` line per directory, replaced
//! atomically on every save, with a `.bak` copy refreshed at most once a day.
//! A corrupt file is restored from the backup; if that fails too, history
//! starts over rather than breaking the shell.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`entries`] — The weighted entry store: load, save, backup, decay, trim, stats
//! - [`matching`] — Matcher strategies, query resolution, and the tab-completion protocol

pub mod config;
pub mod entries;
pub mod matching;
