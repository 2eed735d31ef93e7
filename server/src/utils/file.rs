//! File utility functions

use std::path::PathBuf;

/// Expand a user-supplied path string to an absolute path.
///
/// Handles `~` and `~/...` via the home directory, and resolves relative
/// paths (including bare names) against the current directory. Absolute
/// paths pass through unchanged. Surrounding whitespace is ignored.
///
/// ```text
/// expand_path("~/.estate")    // -> /home/user/.estate
/// expand_path("./estate.json") // -> /current/dir/estate.json
/// expand_path("/etc/estate")  // -> /etc/estate
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') => match dirs::home_dir() {
            Some(home) => home.join(&rest[1..]),
            None => PathBuf::from(path),
        },
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}
