//! Per-action glue between the flag parser and the library.
//!
//! Every action loads the store itself and decides its own exit status: success
//! when something was printed or done, failure when a jump found nothing.

pub mod add;
pub mod complete;
pub mod jump;
pub mod purge;
pub mod stats;

use std::path::{Component, Path, PathBuf};

/// The shell's idea of the current directory.
///
/// `$PWD` keeps symlinked paths the way the shell hook recorded them; fall back
/// to the resolved working directory.
pub fn current_dir() -> Option<String> {
    std::env::var("PWD")
        .ok()
        .filter(|pwd| Path::new(pwd).is_absolute())
        .or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|dir| dir.to_str().map(String::from))
        })
}

/// Make `dir` absolute against the current directory, dropping `.` segments and
/// trailing separators. Symlinks and `..` are left alone.
pub fn absolute(dir: &Path) -> std::io::Result<PathBuf> {
    let joined = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        let base = match current_dir() {
            Some(cwd) => PathBuf::from(cwd),
            None => std::env::current_dir()?,
        };
        base.join(dir)
    };
    Ok(joined
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect())
}

/// Wrap in single quotes for `eval`-style shell consumption.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Print one line for the shell.
pub fn emit(line: &str, quotes: bool) {
    if quotes {
        println!("{}", shell_quote(line));
    } else {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoting_escapes_single_quotes() {
        assert_eq!(shell_quote("/plain"), "'/plain'");
        assert_eq!(shell_quote("/it's"), r"'/it'\''s'");
    }

    #[test]
    fn absolute_normalizes_without_resolving() {
        assert_eq!(
            absolute(Path::new("/a/./b/")).unwrap(),
            PathBuf::from("/a/b")
        );
        assert_eq!(
            absolute(Path::new("/a/../b")).unwrap(),
            PathBuf::from("/a/../b")
        );
        assert!(absolute(Path::new("rel")).unwrap().is_absolute());
    }
}
