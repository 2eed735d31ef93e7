//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Pair the resulting pattern with `ESCAPE '\'` in the query.
///
/// ```
/// use estate_server::utils::sql::escape_like_pattern;
///
/// assert_eq!(escape_like_pattern("100% match_test"), "100\\% match\\_test");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a case-folded substring LIKE pattern matching `needle` literally
pub fn contains_pattern(needle: &str) -> String {
    format!("%{}%", escape_like_pattern(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_plain() {
        assert_eq!(escape_like_pattern("austin"), "austin");
        assert_eq!(escape_like_pattern(""), "");
    }

    #[test]
    fn test_escape_like_pattern_metacharacters() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("lot_size"), "lot\\_size");
        assert_eq!(escape_like_pattern("a\\b"), "a\\\\b");
        assert_eq!(escape_like_pattern("100%_\\x"), "100\\%\\_\\\\x");
    }

    #[test]
    fn test_contains_pattern_lowercases_and_wraps() {
        assert_eq!(contains_pattern("Loft"), "%loft%");
        assert_eq!(contains_pattern("50%_OFF"), "%50\\%\\_off%");
    }

    #[test]
    fn test_contains_pattern_leaves_regex_chars() {
        assert_eq!(contains_pattern("a.b*(c)"), "%a.b*(c)%");
    }
}
