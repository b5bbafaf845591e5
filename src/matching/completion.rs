//! Stateless tab-completion protocol.
//!
//! The shell gets menu entries shaped `needle__3__/full/path`. When one of them
//! (or a prefix of one) comes back as a needle, the selection is recovered from
//! the token itself, so nothing has to survive between invocations.

use super::resolve::{find_matches, MatchOptions};
use crate::entries::Entry;

pub const TAB_SEPARATOR: &str = "__";

/// A needle decoded against the completion token shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabToken<'a> {
    /// `needle__n__/abs/path`: a concrete path was already picked.
    Path(&'a str),
    /// `needle__n` or `needle__n__`: the n-th (1-based) menu entry.
    Index { needle: &'a str, index: usize },
    /// `needle__`: separator typed but no index yet.
    Dangling { needle: &'a str },
    /// Anything else, including names that merely contain `__`.
    Plain(&'a str),
}

impl<'a> TabToken<'a> {
    pub fn decode(token: &'a str) -> Self {
        let Some((needle, rest)) = token.split_once(TAB_SEPARATOR) else {
            return Self::Plain(token);
        };
        if rest.is_empty() {
            return Self::Dangling { needle };
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let index = match rest[..digits].parse::<usize>() {
            Ok(index) if index > 0 => index,
            _ => return Self::Plain(token),
        };

        match rest[digits..].strip_prefix(TAB_SEPARATOR) {
            Some(path) if !path.is_empty() => Self::Path(path),
            Some(_) => Self::Index { needle, index },
            None if digits == rest.len() => Self::Index { needle, index },
            None => Self::Plain(token),
        }
    }

    /// Whether the token carries a selection rather than a search term.
    pub fn is_selection(&self) -> bool {
        !matches!(self, Self::Plain(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabResolution {
    Selected(String),
    Menu(Vec<String>),
    NoMatch,
}

/// Apply the completion rules to a decoded token.
///
/// `options` should come from [`MatchOptions::for_completion`]; the same options
/// build the menu and resolve an index, so `__n` always points at the n-th line
/// the shell was shown.
pub fn resolve_token(token: &TabToken, entries: &[Entry], options: &MatchOptions) -> TabResolution {
    match *token {
        TabToken::Path(path) => TabResolution::Selected(path.to_string()),
        TabToken::Index { needle, index } => select(entries, needle, index, options),
        TabToken::Dangling { needle } => select(entries, needle, 1, options),
        TabToken::Plain(needle) => {
            let matches = find_matches(entries, &[needle], options);
            if matches.is_empty() {
                TabResolution::NoMatch
            } else {
                TabResolution::Menu(render_menu(needle, &matches.paths))
            }
        }
    }
}

/// The `index`-th (1-based) candidate for `needle`; past the end picks the last one.
fn select(entries: &[Entry], needle: &str, index: usize, options: &MatchOptions) -> TabResolution {
    let matches = find_matches(entries, &[needle], options);
    let pick = index.min(matches.paths.len());
    match pick.checked_sub(1).and_then(|i| matches.paths.get(i)) {
        Some(path) => TabResolution::Selected(path.clone()),
        None => TabResolution::NoMatch,
    }
}

/// `needle__1__/path/one`, `needle__2__/path/two`, ...
pub fn render_menu(needle: &str, paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{needle}{TAB_SEPARATOR}{}{TAB_SEPARATOR}{path}", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> MatchOptions<'static> {
        MatchOptions {
            max_matches: 9,
            current_dir: None,
            completion: true,
            check_exists: false,
            fuzzy_threshold: 0.6,
        }
    }

    fn menu_entries() -> Vec<Entry> {
        vec![
            Entry::new("/w/proj-a", 40.0),
            Entry::new("/w/proj-b", 30.0),
            Entry::new("/w/proj-c", 20.0),
            Entry::new("/w/proj-d", 10.0),
        ]
    }

    #[test]
    fn decode_shapes() {
        assert_eq!(TabToken::decode("proj"), TabToken::Plain("proj"));
        assert_eq!(
            TabToken::decode("proj__"),
            TabToken::Dangling { needle: "proj" }
        );
        assert_eq!(
            TabToken::decode("proj__3"),
            TabToken::Index {
                needle: "proj",
                index: 3
            }
        );
        assert_eq!(
            TabToken::decode("proj__3__"),
            TabToken::Index {
                needle: "proj",
                index: 3
            }
        );
        assert_eq!(
            TabToken::decode("proj__1__/abs/path"),
            TabToken::Path("/abs/path")
        );
    }

    #[test]
    fn double_underscore_names_stay_plain() {
        assert_eq!(TabToken::decode("__pycache__"), TabToken::Plain("__pycache__"));
        assert_eq!(TabToken::decode("foo__bar"), TabToken::Plain("foo__bar"));
        assert_eq!(TabToken::decode("v__0__x"), TabToken::Plain("v__0__x"));
        assert!(!TabToken::decode("foo__bar").is_selection());
    }

    #[test]
    fn path_with_separator_inside_is_kept_whole() {
        assert_eq!(
            TabToken::decode("p__2__/srv/a__b"),
            TabToken::Path("/srv/a__b")
        );
    }

    #[test]
    fn index_selects_nth_candidate() {
        let token = TabToken::decode("proj__3__");
        assert_eq!(
            resolve_token(&token, &menu_entries(), &options()),
            TabResolution::Selected("/w/proj-c".into())
        );
    }

    #[test]
    fn dangling_separator_selects_first() {
        let token = TabToken::decode("proj__");
        assert_eq!(
            resolve_token(&token, &menu_entries(), &options()),
            TabResolution::Selected("/w/proj-a".into())
        );
    }

    #[test]
    fn literal_path_is_returned_verbatim() {
        let token = TabToken::decode("proj__1__/abs/path");
        assert_eq!(
            resolve_token(&token, &[], &options()),
            TabResolution::Selected("/abs/path".into())
        );
    }

    #[test]
    fn index_past_end_picks_last() {
        let token = TabToken::decode("proj__9");
        assert_eq!(
            resolve_token(&token, &menu_entries(), &options()),
            TabResolution::Selected("/w/proj-d".into())
        );
    }

    #[test]
    fn plain_needle_renders_menu() {
        let token = TabToken::decode("proj");
        let TabResolution::Menu(lines) = resolve_token(&token, &menu_entries(), &options()) else {
            panic!("expected a menu");
        };
        assert_eq!(
            lines,
            vec![
                "proj__1__/w/proj-a",
                "proj__2__/w/proj-b",
                "proj__3__/w/proj-c",
                "proj__4__/w/proj-d",
            ]
        );
    }

    #[test]
    fn menu_is_capped() {
        let entries: Vec<Entry> = (0..12)
            .map(|i| Entry::new(format!("/m/dir{i:02}"), 100.0 - i as f64))
            .collect();
        let token = TabToken::decode("dir");
        let TabResolution::Menu(lines) = resolve_token(&token, &entries, &options()) else {
            panic!("expected a menu");
        };
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[8], "dir__9__/m/dir08");
    }

    #[test]
    fn unknown_needle_has_no_menu() {
        let token = TabToken::decode("zzz");
        assert_eq!(
            resolve_token(&token, &menu_entries(), &options()),
            TabResolution::NoMatch
        );
    }
}
