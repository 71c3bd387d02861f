//! Literal word-boundary matching
//!
//! Boundaries follow ASCII word characters (`[A-Za-z0-9_]`), the same rule a
//! browser applies to `\b`. Tokens are always escaped, so `c++` or `node.js`
//! match as literal text.

use regex::{Regex, RegexBuilder};

/// How a token is anchored to word boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Boundary on both sides: `cat` matches "the cat sat" but not "category"
    WholeWord,
    /// Boundary at the start only: `cat` matches "category" but not "concat"
    Prefix,
}

/// A single query token compiled for case-insensitive literal matching
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    token: String,
    regex: Regex,
}

impl TokenMatcher {
    /// Compile `token`; `None` only if the pattern exceeds the regex size limit
    pub fn new(token: &str, anchor: Anchor) -> Option<Self> {
        let escaped = regex::escape(token);
        let pattern = match anchor {
            Anchor::WholeWord => format!(r"(?-u:\b){}(?-u:\b)", escaped),
            Anchor::Prefix => format!(r"(?-u:\b){}", escaped),
        };

        match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => Some(TokenMatcher {
                token: token.to_string(),
                regex,
            }),
            Err(e) => {
                tracing::warn!("Skipping query token {:?}: {}", token, e);
                None
            }
        }
    }

    /// The token as it appeared in the query
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(token: &str) -> TokenMatcher {
        TokenMatcher::new(token, Anchor::WholeWord).unwrap()
    }

    fn prefix(token: &str) -> TokenMatcher {
        TokenMatcher::new(token, Anchor::Prefix).unwrap()
    }

    #[test]
    fn test_whole_word_boundaries() {
        let m = whole("cat");
        assert!(m.is_match("cat"));
        assert!(m.is_match("The Cat sat"));
        assert!(m.is_match("dog,cat."));
        assert!(!m.is_match("category"));
        assert!(!m.is_match("concat"));
        assert!(!m.is_match("cat_food"));
    }

    #[test]
    fn test_prefix_boundary() {
        let m = prefix("cat");
        assert!(m.is_match("category"));
        assert!(m.is_match("Big Categories"));
        assert!(!m.is_match("concatenate"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let m = whole("node.js");
        assert!(m.is_match("built with node.js today"));
        assert!(!m.is_match("built with nodexjs today"));

        let m = whole("a|b");
        assert!(!m.is_match("a"));
        assert!(m.is_match("x a|b y"));
    }

    #[test]
    fn test_non_ascii_letters_are_not_word_chars() {
        // ASCII boundaries: "é" counts as a separator, as it does for `\b` in a browser
        assert!(whole("caf").is_match("café"));
    }
}
