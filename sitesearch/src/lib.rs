//! # SiteSearch
//!
//! Weighted-field search and query suggestions over a fixed set of static pages.
//!
//! SiteSearch provides:
//! - **Batch loading** of pages `1..=N` from a directory or (with the `http`
//!   feature) a web server, tolerating individual failures
//! - **Field extraction** of title, headings, meta tags, paragraphs and images
//! - **Ranking** with fixed per-field weights and whole-word matching
//! - **Suggestions** from page keywords and title words
//! - **Sessions** holding query, category filter and results
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sitesearch::{load_corpus, CategoryFilter, FsPageSource, Session};
//!
//! let source = FsPageSource::new("site", "pages/");
//! let (corpus, stats) = load_corpus(&source, 75).await;
//!
//! let mut session = Session::new(corpus);
//! session.search("hiking trails");
//! session.set_filter(CategoryFilter::Title);
//! for result in session.visible() {
//!     println!("{} ({})", result.document.title(), result.score);
//! }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod present;
pub mod search;
pub mod session;
pub mod suggest;

// Re-exports for convenience
pub use config::SiteConfig;
pub use error::{Error, Result};
pub use extractor::{extract_document, Document, Image};
#[cfg(feature = "http")]
pub use loader::HttpPageSource;
pub use loader::{
    load_corpus, load_corpus_with_progress, Corpus, FsPageSource, LoadProgress, LoadStats,
    MemoryPageSource, PageSource, PageStatus,
};
pub use present::{stats_line, ResultCard};
pub use search::{filter_results, rank, Category, CategoryFilter, MatchResult};
pub use session::{SearchOutcome, Session};
pub use suggest::{suggest, SuggestionSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
