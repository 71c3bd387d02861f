//! Weighted-field ranking
//!
//! Every query token is tested against six fields in a fixed priority order.
//! Each (field, token) hit adds that field's weight; image alt text scores per
//! (image, token) pair. The first field that hits decides the category.

pub mod matcher;

use crate::error::{Error, Result};
use crate::extractor::Document;
use crate::loader::Corpus;
use matcher::{Anchor, TokenMatcher};
use std::fmt;
use std::sync::Arc;

pub const TITLE_WEIGHT: u32 = 100;
pub const HEADING1_WEIGHT: u32 = 80;
pub const META_WEIGHT: u32 = 50;
pub const IMAGE_ALT_WEIGHT: u32 = 40;
pub const HEADING2_WEIGHT: u32 = 30;
pub const BODY_WEIGHT: u32 = 20;

/// Where a document matched first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Title or first heading
    Title,
    /// Meta description, keywords or image alt text
    Meta,
    /// Second heading or body text
    Content,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Title => "title",
            Category::Meta => "meta",
            Category::Content => "content",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selector for the results view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Title,
    Meta,
    Content,
}

impl CategoryFilter {
    pub fn accepts(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Title => category == Category::Title,
            CategoryFilter::Meta => category == Category::Meta,
            CategoryFilter::Content => category == Category::Content,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Title => "title",
            CategoryFilter::Meta => "meta",
            CategoryFilter::Content => "content",
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(CategoryFilter::All),
            "title" => Ok(CategoryFilter::Title),
            "meta" => Ok(CategoryFilter::Meta),
            "content" => Ok(CategoryFilter::Content),
            _ => Err(Error::InvalidFilter(s.to_string())),
        }
    }
}

/// A ranked document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub document: Arc<Document>,
    /// Sum of field weights over all hits; always > 0
    pub score: u32,
    pub category: Category,
    /// Human-readable explanations, e.g. `Title contains "rust"`
    pub details: Vec<String>,
}

/// Scored fields in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Heading1,
    Meta,
    ImageAlt,
    Heading2,
    Body,
}

impl Field {
    const PRIORITY: [Field; 6] = [
        Field::Title,
        Field::Heading1,
        Field::Meta,
        Field::ImageAlt,
        Field::Heading2,
        Field::Body,
    ];

    fn weight(self) -> u32 {
        match self {
            Field::Title => TITLE_WEIGHT,
            Field::Heading1 => HEADING1_WEIGHT,
            Field::Meta => META_WEIGHT,
            Field::ImageAlt => IMAGE_ALT_WEIGHT,
            Field::Heading2 => HEADING2_WEIGHT,
            Field::Body => BODY_WEIGHT,
        }
    }

    fn category(self) -> Category {
        match self {
            Field::Title | Field::Heading1 => Category::Title,
            Field::Meta | Field::ImageAlt => Category::Meta,
            Field::Heading2 | Field::Body => Category::Content,
        }
    }

    /// Label used in match explanations; heading and image hits carry none
    fn label(self) -> Option<&'static str> {
        match self {
            Field::Title => Some("Title"),
            Field::Meta => Some("Meta"),
            Field::Body => Some("Content"),
            Field::Heading1 | Field::ImageAlt | Field::Heading2 => None,
        }
    }

    fn texts<'d>(self, doc: &'d Document, meta: &'d str) -> Vec<&'d str> {
        match self {
            Field::Title => vec![doc.title()],
            Field::Heading1 => vec![doc.heading1()],
            Field::Meta => vec![meta],
            Field::ImageAlt => doc.images().iter().map(|img| img.alt.as_str()).collect(),
            Field::Heading2 => vec![doc.heading2()],
            Field::Body => vec![doc.body_text()],
        }
    }
}

/// Compiled whole-word matchers for every token of a query
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    tokens: Vec<TokenMatcher>,
}

impl QueryMatcher {
    /// Split on whitespace and lowercase; duplicate tokens are kept and score twice
    pub fn new(query: &str) -> Self {
        let tokens = query
            .split_whitespace()
            .map(str::to_lowercase)
            .filter_map(|t| TokenMatcher::new(&t, Anchor::WholeWord))
            .collect();
        QueryMatcher { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Score one document; `None` when nothing matched
    pub fn score(&self, doc: &Arc<Document>) -> Option<MatchResult> {
        let meta = format!("{} {}", doc.meta_description(), doc.meta_keywords());
        let mut score = 0;
        let mut category = None;
        let mut details = Vec::new();

        for field in Field::PRIORITY {
            for text in field.texts(doc, &meta) {
                for token in &self.tokens {
                    if !token.is_match(text) {
                        continue;
                    }
                    score = accumulate(score, field.weight());
                    category.get_or_insert(field.category());
                    if let Some(label) = field.label() {
                        details.push(format!("{} contains \"{}\"", label, token.token()));
                    }
                }
            }
        }

        match category {
            Some(category) if score > 0 => Some(MatchResult {
                document: Arc::clone(doc),
                score,
                category,
                details,
            }),
            _ => None,
        }
    }
}

/// Add one hit's weight, pinning at `u32::MAX` instead of wrapping
fn accumulate(score: u32, weight: u32) -> u32 {
    score.saturating_add(weight)
}

/// Rank the corpus against a free-text query
///
/// Results are sorted by descending score; equal scores keep corpus order.
/// An empty or whitespace-only query yields no results.
pub fn rank(query: &str, corpus: &Corpus) -> Vec<MatchResult> {
    let matcher = QueryMatcher::new(query);
    if matcher.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<MatchResult> = corpus
        .iter()
        .filter_map(|doc| matcher.score(doc))
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        "Query {:?} matched {} of {} documents",
        query,
        results.len(),
        corpus.len()
    );

    results
}

/// The subsequence of `results` a filter selects, in ranked order
pub fn filter_results(results: &[MatchResult], filter: CategoryFilter) -> Vec<&MatchResult> {
    results
        .iter()
        .filter(|r| filter.accepts(r.category))
        .collect()
}
