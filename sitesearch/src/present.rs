//! Display model for ranked results

use crate::extractor::Image;
use crate::search::{Category, CategoryFilter, MatchResult};

/// Descriptions longer than this are cut and get `...` appended
pub const DESCRIPTION_MAX_CHARS: usize = 150;

/// Number of keyword tags shown per card
pub const MAX_TAGS: usize = 5;

/// Everything needed to render one result
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultCard {
    pub url: String,
    /// First heading, or the title when the page has none
    pub heading: String,
    pub badge: Category,
    pub description: String,
    pub tags: Vec<String>,
    pub image: Image,
    pub score: u32,
}

impl ResultCard {
    pub fn from_match(result: &MatchResult) -> Self {
        let doc = &result.document;

        let heading = if doc.heading1().is_empty() {
            doc.title()
        } else {
            doc.heading1()
        };

        let tags = doc
            .meta_keywords()
            .split(',')
            .take(MAX_TAGS)
            .map(|k| k.trim().to_string())
            .collect();

        let image = doc
            .images()
            .first()
            .cloned()
            .unwrap_or_else(|| Image::new("", "No image"));

        ResultCard {
            url: doc.url().to_string(),
            heading: heading.to_string(),
            badge: result.category,
            description: truncate(doc.meta_description(), DESCRIPTION_MAX_CHARS),
            tags,
            image,
            score: result.score,
        }
    }
}

/// `Found N result(s)`, with the filter named when one is active
pub fn stats_line(count: usize, filter: CategoryFilter) -> String {
    let plural = if count == 1 { "" } else { "s" };
    match filter {
        CategoryFilter::All => format!("Found {} result{}", count, plural),
        other => format!("Found {} result{} (filtered by {})", count, plural, other),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Document;
    use std::sync::Arc;

    fn card(doc: Document) -> ResultCard {
        ResultCard::from_match(&MatchResult {
            document: Arc::new(doc),
            score: 100,
            category: Category::Title,
            details: Vec::new(),
        })
    }

    #[test]
    fn test_heading_prefers_h1() {
        let with_h1 = Document::builder(1, "pages/page1.html")
            .title("Title")
            .heading1("Heading")
            .build();
        let without_h1 = Document::builder(2, "pages/page2.html").title("Title").build();

        assert_eq!(card(with_h1).heading, "Heading");
        assert_eq!(card(without_h1).heading, "Title");
    }

    #[test]
    fn test_description_truncated() {
        let long = "x".repeat(151);
        let exact = "y".repeat(150);

        let c = card(Document::builder(1, "u").meta_description(long).build());
        assert_eq!(c.description, format!("{}...", "x".repeat(150)));

        let c = card(Document::builder(1, "u").meta_description(exact.clone()).build());
        assert_eq!(c.description, exact);
    }

    #[test]
    fn test_tags_and_placeholder_image() {
        let c = card(
            Document::builder(1, "u")
                .meta_keywords("a, b ,c,d,e,f,g")
                .build(),
        );

        assert_eq!(c.tags, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(c.image, Image::new("", "No image"));
    }

    #[test]
    fn test_first_image_used() {
        let c = card(
            Document::builder(1, "u")
                .image("one.png", "first")
                .image("two.png", "second")
                .build(),
        );
        assert_eq!(c.image, Image::new("one.png", "first"));
    }

    #[test]
    fn test_stats_line() {
        assert_eq!(stats_line(1, CategoryFilter::All), "Found 1 result");
        assert_eq!(stats_line(4, CategoryFilter::All), "Found 4 results");
        assert_eq!(
            stats_line(2, CategoryFilter::Meta),
            "Found 2 results (filtered by meta)"
        );
    }
}
