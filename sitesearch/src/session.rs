//! Query session state
//!
//! A [`Session`] owns everything the widget tracks between user actions: the
//! loaded corpus, the current query, the category filter and the last result
//! set. Each new search replaces the results wholesale; changing the filter only
//! changes which of them are visible.

use crate::loader::Corpus;
use crate::search::{filter_results, rank, CategoryFilter, MatchResult};
use crate::suggest::{suggest, SuggestionSink, MIN_QUERY_CHARS};

/// What a call to [`Session::search`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Query was empty or whitespace; nothing changed
    Ignored,
    /// Search ran and nothing matched
    NoResults,
    /// Search ran and produced `total` results (before filtering)
    Results { total: usize },
}

/// Search state for one corpus
#[derive(Debug, Clone)]
pub struct Session {
    corpus: Corpus,
    query: String,
    filter: CategoryFilter,
    results: Vec<MatchResult>,
}

impl Session {
    pub fn new(corpus: Corpus) -> Self {
        Session {
            corpus,
            query: String::new(),
            filter: CategoryFilter::All,
            results: Vec::new(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The query of the last search (trimmed)
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// All results of the last search, unfiltered
    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    /// Run a search and replace the result set
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome::Ignored;
        }

        self.query = query.to_string();
        self.results = rank(query, &self.corpus);

        if self.results.is_empty() {
            SearchOutcome::NoResults
        } else {
            SearchOutcome::Results {
                total: self.results.len(),
            }
        }
    }

    /// Change the category filter; results are not re-scored
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    /// Results selected by the current filter, in ranked order
    pub fn visible(&self) -> Vec<&MatchResult> {
        filter_results(&self.results, self.filter)
    }

    /// Reset query, results and filter
    pub fn clear(&mut self, sink: &mut dyn SuggestionSink) {
        self.query.clear();
        self.results.clear();
        self.filter = CategoryFilter::All;
        sink.hide();
    }

    /// React to the input text changing: show or hide suggestions
    pub fn input(&self, text: &str, sink: &mut dyn SuggestionSink) {
        if text.chars().count() < MIN_QUERY_CHARS {
            sink.hide();
            return;
        }

        let suggestions = suggest(text, &self.corpus);
        if suggestions.is_empty() {
            sink.hide();
        } else {
            sink.show(&suggestions);
        }
    }

    /// Accept a suggestion: it becomes the query and is searched immediately
    pub fn select_suggestion(
        &mut self,
        suggestion: &str,
        sink: &mut dyn SuggestionSink,
    ) -> SearchOutcome {
        sink.hide();
        self.search(suggestion)
    }
}
