//! Pure path-vs-needles predicates.
//!
//! Needles are consumed left to right: each one has to appear in what is left
//! of the path after the previous needle matched, so `["foo", "bar"]` accepts
//! `/home/foo/bar/baz` but not `/home/bar/foo/baz`.

use std::borrow::Cow;
use similar::TextDiff;
use std::path::MAIN_SEPARATOR;

/// Matching strategies, in the order the resolver tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Earlier needles anywhere, last needle inside the final path segment.
    Consecutive,
    /// All needles anywhere, in order.
    Anywhere,
    /// Last needle approximately equal to the final path segment.
    Fuzzy,
}

impl Strategy {
    pub fn matches(
        self,
        needles: &[&str],
        path: &str,
        ignore_case: bool,
        fuzzy_threshold: f64,
    ) -> bool {
        match self {
            Self::Consecutive => match_consecutive(needles, path, ignore_case),
            Self::Anywhere => match_anywhere(needles, path, ignore_case),
            Self::Fuzzy => match_fuzzy(needles, path, ignore_case, fuzzy_threshold),
        }
    }
}

fn fold(s: &str, ignore_case: bool) -> Cow<'_, str> {
    if ignore_case {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

/// Find `needle` in `haystack` and return what follows the match.
pub fn eat<'a>(haystack: &'a str, needle: &str) -> Option<&'a str> {
    haystack
        .find(needle)
        .map(|idx| &haystack[idx + needle.len()..])
}

/// Byte offset where the final path segment starts, and the segment's end
/// (trailing separators excluded).
fn leaf_bounds(path: &str) -> (usize, usize) {
    let trimmed = path.trim_end_matches(MAIN_SEPARATOR);
    let end = trimmed.len();
    let start = trimmed.rfind(MAIN_SEPARATOR).map(|i| i + 1).unwrap_or(0);
    (start, end)
}

/// The final path segment, e.g. `baz` for `/foo/bar/baz/`.
pub fn leaf(path: &str) -> &str {
    let (start, end) = leaf_bounds(path);
    &path[start..end]
}

/// Do all needles occur in `path`, in order, without overlapping?
pub fn match_anywhere(needles: &[&str], path: &str, ignore_case: bool) -> bool {
    let path = fold(path, ignore_case);
    let mut rest: &str = &path;
    for needle in needles {
        let needle = fold(needle, ignore_case);
        match eat(rest, &needle) {
            Some(remainder) => rest = remainder,
            None => return false,
        }
    }
    true
}

/// Like [`match_anywhere`], but the last needle must land in the final path segment.
pub fn match_consecutive(needles: &[&str], path: &str, ignore_case: bool) -> bool {
    let Some((last, earlier)) = needles.split_last() else {
        return true;
    };

    let path = fold(path, ignore_case);
    let (leaf_start, leaf_end) = leaf_bounds(&path);

    let mut cursor = 0;
    for needle in earlier {
        let needle = fold(needle, ignore_case);
        match path[cursor..].find(&*needle) {
            Some(idx) => cursor += idx + needle.len(),
            None => return false,
        }
    }

    let from = cursor.max(leaf_start);
    if from > leaf_end {
        return false;
    }
    let last = fold(last, ignore_case);
    path[from..leaf_end].contains(&*last)
}

/// Is the last needle similar enough to the final path segment?
pub fn match_fuzzy(needles: &[&str], path: &str, ignore_case: bool, threshold: f64) -> bool {
    let Some(last) = needles.last() else {
        return true;
    };
    let needle = fold(last, ignore_case);
    let path = fold(path, ignore_case);
    similarity(&needle, leaf(&path)) >= threshold
}

/// Similarity ratio `2 * matched / (len(a) + len(b))`, over chars, where
/// `matched` is what a char-level diff keeps in common.
///
/// Identical strings (including two empty ones) score 1.0; strings with no
/// common character score 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}
