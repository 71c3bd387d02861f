//! Query suggestions from page keywords and titles

use crate::loader::Corpus;
use crate::search::matcher::{Anchor, TokenMatcher};
use std::collections::HashSet;

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 5;

/// Partial queries this short (in characters) get no suggestions
pub const MIN_QUERY_CHARS: usize = 3;

/// Candidates must be longer than this many characters
const MIN_CANDIDATE_CHARS: usize = 4;

/// Receives suggestion lists for display
///
/// The engine never renders anything itself; the presentation layer decides
/// how a list of clickable items looks.
pub trait SuggestionSink {
    /// Show these suggestions (never empty)
    fn show(&mut self, suggestions: &[String]);
    /// Hide any visible suggestions
    fn hide(&mut self);
}

/// Suggest completions for a partial query
///
/// Candidates are meta keywords (comma separated, trimmed) and title words,
/// scanned in document order with keywords first. A candidate matches when the
/// partial query appears in it starting at a word boundary, so `cat` suggests
/// "category". Duplicates are dropped and the list is capped at
/// [`MAX_SUGGESTIONS`].
pub fn suggest(partial: &str, corpus: &Corpus) -> Vec<String> {
    if partial.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let Some(matcher) = TokenMatcher::new(&partial.to_lowercase(), Anchor::Prefix) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut suggestions = Vec::new();

    for doc in corpus.iter() {
        let keywords = doc.meta_keywords().split(',').map(str::trim);
        let title_words = doc.title().split_whitespace();

        for candidate in keywords.chain(title_words) {
            if candidate.chars().count() < MIN_CANDIDATE_CHARS || !matcher.is_match(candidate) {
                continue;
            }
            if seen.insert(candidate) {
                suggestions.push(candidate.to_string());
                if suggestions.len() == MAX_SUGGESTIONS {
                    return suggestions;
                }
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Document;

    fn doc(id: u32) -> crate::extractor::DocumentBuilder {
        Document::builder(id, format!("pages/page{}.html", id))
    }

    #[test]
    fn test_prefix_boundary_matches_longer_word() {
        let corpus = Corpus::from_documents(vec![doc(1).meta_keywords("category, pets").build()]);

        assert_eq!(suggest("cat", &corpus), vec!["category"]);
    }

    #[test]
    fn test_no_match_inside_word() {
        let corpus = Corpus::from_documents(vec![doc(1)
            .meta_keywords("concatenate")
            .title("Bobcat Habitats")
            .build()]);

        assert!(suggest("cat", &corpus).is_empty());
    }

    #[test]
    fn test_match_at_inner_word_boundary() {
        let corpus =
            Corpus::from_documents(vec![doc(1).meta_keywords("mountain trails, rivers").build()]);

        assert_eq!(suggest("trai", &corpus), vec!["mountain trails"]);
    }

    #[test]
    fn test_short_queries_and_candidates() {
        let corpus = Corpus::from_documents(vec![doc(1)
            .meta_keywords("art, arts")
            .title("Art Artwork")
            .build()]);

        assert!(suggest("ar", &corpus).is_empty());
        // "art" and "Art" are too short as candidates
        assert_eq!(suggest("art", &corpus), vec!["arts", "Artwork"]);
    }

    #[test]
    fn test_keywords_before_title_and_case_sensitive_dedup() {
        let corpus = Corpus::from_documents(vec![
            doc(1).meta_keywords("hiking").title("Hiking Trails").build(),
            doc(2).meta_keywords("hiking, hikers").title("hiking").build(),
        ]);

        assert_eq!(
            suggest("hik", &corpus),
            vec!["hiking", "Hiking", "hikers"]
        );
    }

    #[test]
    fn test_capped_at_five_in_scan_order() {
        let corpus = Corpus::from_documents(vec![
            doc(1).meta_keywords("river one, river two, river three").build(),
            doc(2).meta_keywords("river four").title("Rivers Riverside").build(),
            doc(3).meta_keywords("river five, river six").build(),
        ]);

        assert_eq!(
            suggest("riv", &corpus),
            vec!["river one", "river two", "river three", "river four", "Rivers"]
        );
    }

    #[test]
    fn test_query_metacharacters_are_literal() {
        let corpus = Corpus::from_documents(vec![doc(1).meta_keywords("c++ guide, cxx guide").build()]);

        assert_eq!(suggest("c++", &corpus), vec!["c++ guide"]);
    }
}
