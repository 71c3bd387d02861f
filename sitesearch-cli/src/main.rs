//! SiteSearch CLI - search a fixed set of static pages from the command line

mod repl;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sitesearch::loader::source_from_config;
use sitesearch::{
    load_corpus_with_progress, stats_line, CategoryFilter, Corpus, LoadProgress, LoadStats,
    PageStatus, ResultCard, SearchOutcome, Session, SiteConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sitesearch")]
#[command(
    author,
    version,
    about = "SiteSearch - search and suggestions over a fixed set of static pages"
)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (default: ~/.config/sitesearch/config.yaml if present)
    #[arg(long, short = 'c', env = "SITESEARCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Site root directory containing the pages
    #[arg(long, short = 'r', env = "SITESEARCH_ROOT", global = true)]
    root: Option<PathBuf>,

    /// Site root URL (requires the http feature)
    #[arg(long, env = "SITESEARCH_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Path prefix of page files, e.g. "pages/"
    #[arg(long, global = true)]
    pages_path: Option<String>,

    /// Number of pages to load (ids 1..=N)
    #[arg(long, short = 'n', env = "SITESEARCH_TOTAL_PAGES", global = true)]
    total_pages: Option<u32>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search pages
    Search {
        /// Search query
        query: String,

        /// Category filter (all, title, meta, content)
        #[arg(long, short = 'f', default_value = "all")]
        filter: String,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Suggest completions for a partial query
    Suggest {
        /// Partial query (at least 3 characters)
        partial: String,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// List loaded pages
    Pages {
        /// Only pages whose text contains this (case-insensitive)
        #[arg(long)]
        contains: Option<String>,

        /// Output format (text, json)
        #[arg(long, short = 'o', default_value = "text")]
        format: String,
    },

    /// Interactive search session on stdin
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr keeps JSON output on stdout clean)
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = resolve_config(&cli)?;

    match cli.command {
        Commands::Search {
            query,
            filter,
            format,
        } => cmd_search(&config, &query, &filter, &format).await,
        Commands::Suggest { partial, format } => cmd_suggest(&config, &partial, &format).await,
        Commands::Pages { contains, format } => {
            cmd_pages(&config, contains.as_deref(), &format).await
        }
        Commands::Repl => {
            let (corpus, _) = load(&config, &mut QuietProgress).await?;
            repl::run(Session::new(corpus))
        }
    }
}

/// Config file first, then command-line and environment overrides
fn resolve_config(cli: &Cli) -> Result<SiteConfig> {
    let mut config = match cli.config {
        Some(ref path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SiteConfig::load_default()?,
    };

    if let Some(ref root) = cli.root {
        config.root = root.clone();
    }
    if let Some(ref base_url) = cli.base_url {
        config.base_url = Some(base_url.clone());
    }
    if let Some(ref pages_path) = cli.pages_path {
        config.pages_path = pages_path.clone();
    }
    if let Some(total_pages) = cli.total_pages {
        config.total_pages = total_pages;
    }

    config.validate()?;
    Ok(config)
}

async fn load(config: &SiteConfig, progress: &mut dyn LoadProgress) -> Result<(Corpus, LoadStats)> {
    let source = source_from_config(config)?;
    Ok(load_corpus_with_progress(source.as_ref(), config.total_pages, progress).await)
}

async fn cmd_search(config: &SiteConfig, query: &str, filter: &str, format: &str) -> Result<()> {
    let filter: CategoryFilter = filter.parse()?;
    let (corpus, _) = load(config, &mut QuietProgress).await?;

    let mut session = Session::new(corpus);
    session.set_filter(filter);
    let outcome = session.search(query);

    if format == "json" {
        let cards: Vec<ResultCard> = session
            .visible()
            .into_iter()
            .map(ResultCard::from_match)
            .collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    match outcome {
        SearchOutcome::Ignored => println!("Enter a search query."),
        SearchOutcome::NoResults => println!("No results found for '{}'", query.trim()),
        SearchOutcome::Results { .. } => print_results(&session),
    }
    Ok(())
}

/// Print the visible results of a session as text
pub(crate) fn print_results(session: &Session) {
    let visible = session.visible();
    if visible.is_empty() {
        println!("No results found for '{}'", session.query());
        return;
    }

    println!(
        "{} for '{}':\n",
        stats_line(visible.len(), session.filter()),
        session.query()
    );
    for (i, result) in visible.into_iter().enumerate() {
        let card = ResultCard::from_match(result);
        println!("{}. {} [{}]", i + 1, card.heading.trim(), card.badge);
        println!("   {}", card.url);
        if !card.description.is_empty() {
            println!("   {}", card.description);
        }
        let tags: Vec<&str> = card
            .tags
            .iter()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            println!("   tags: {}", tags.join(", "));
        }
        for detail in &result.details {
            println!("   - {}", detail);
        }
        println!();
    }
}

async fn cmd_suggest(config: &SiteConfig, partial: &str, format: &str) -> Result<()> {
    let (corpus, _) = load(config, &mut QuietProgress).await?;
    let suggestions = sitesearch::suggest(partial, &corpus);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else if suggestions.is_empty() {
        println!("No suggestions for '{}'", partial);
    } else {
        for s in suggestions {
            println!("{}", s);
        }
    }
    Ok(())
}

async fn cmd_pages(config: &SiteConfig, contains: Option<&str>, format: &str) -> Result<()> {
    let mut report = FailureReport::default();
    let (corpus, stats) = load(config, &mut report).await?;

    let documents: Vec<_> = match contains {
        Some(text) => corpus.containing(text).collect(),
        None => corpus.iter().collect(),
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    println!(
        "Loaded {} of {} pages ({} failed) in {:?}\n",
        stats.loaded, stats.requested, stats.failed, stats.duration
    );
    for doc in documents {
        println!("{:>4}  {}  {}", doc.id(), doc.url(), doc.title().trim());
    }
    if !report.failed.is_empty() {
        println!("\nFailed:");
        for (url, error) in &report.failed {
            println!("  {}: {}", url, error);
        }
    }
    Ok(())
}

/// Progress reporter that ignores everything (failures are already logged)
struct QuietProgress;

impl LoadProgress for QuietProgress {
    fn on_page(&mut self, _id: u32, _url: &str, _status: PageStatus) {}
    fn on_complete(&mut self, _stats: &LoadStats) {}
}

/// Collects failed pages for the `pages` listing
#[derive(Default)]
struct FailureReport {
    failed: Vec<(String, String)>,
}

impl LoadProgress for FailureReport {
    fn on_page(&mut self, _id: u32, url: &str, status: PageStatus) {
        if let PageStatus::Failed(error) = status {
            self.failed.push((url.to_string(), error));
        }
    }

    fn on_complete(&mut self, _stats: &LoadStats) {}
}
