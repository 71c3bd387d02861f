//! Page corpus loading
//!
//! Pages are addressed by sequential ids `1..=N`. All fetches are issued at
//! once and joined before a [`Corpus`] exists, so nothing downstream can ever
//! observe a partially loaded corpus. A page that fails to fetch is logged and
//! left out; it never fails the batch.

use crate::config::{page_url, SiteConfig};
use crate::error::{Error, Result};
use crate::extractor::{extract_document, Document};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// A fixed-size collection of pages retrievable as markup by id
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Page URL relative to the site root
    fn url_for(&self, id: u32) -> String;

    /// Base that relative image sources resolve against, if known
    fn base_url(&self) -> Option<&Url> {
        None
    }

    /// Fetch the raw markup of one page
    async fn fetch(&self, id: u32) -> Result<String>;
}

/// Pages stored under a local site root
#[derive(Debug, Clone)]
pub struct FsPageSource {
    root: PathBuf,
    pages_path: String,
}

impl FsPageSource {
    pub fn new<P: AsRef<Path>>(root: P, pages_path: impl Into<String>) -> Self {
        FsPageSource {
            root: root.as_ref().to_path_buf(),
            pages_path: pages_path.into(),
        }
    }
}

#[async_trait]
impl PageSource for FsPageSource {
    fn url_for(&self, id: u32) -> String {
        page_url(&self.pages_path, id)
    }

    async fn fetch(&self, id: u32) -> Result<String> {
        let path = self.root.join(self.url_for(id));
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// Pages served over HTTP
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    base_url: Url,
    pages_path: String,
}

#[cfg(feature = "http")]
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[cfg(feature = "http")]
impl HttpPageSource {
    pub fn new(base_url: &str, pages_path: impl Into<String>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        // Without a trailing slash `join` would replace the last segment
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;

        Ok(HttpPageSource {
            client,
            base_url,
            pages_path: pages_path.into(),
        })
    }

    /// Replace the HTTP client, e.g. to change timeouts or proxy settings
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Absolute URL of one page
    pub fn page_location(&self, id: u32) -> Result<Url> {
        Ok(self.base_url.join(&self.url_for(id))?)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl PageSource for HttpPageSource {
    fn url_for(&self, id: u32) -> String {
        page_url(&self.pages_path, id)
    }

    fn base_url(&self) -> Option<&Url> {
        Some(&self.base_url)
    }

    async fn fetch(&self, id: u32) -> Result<String> {
        let url = self.page_location(id)?;
        let response = self.client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(Error::Fetch(format!("{} returned {}", url, response.status())));
        }
        Ok(response.text().await?)
    }
}

/// Pages held in memory, keyed by id
#[derive(Debug, Clone, Default)]
pub struct MemoryPageSource {
    pages: HashMap<u32, String>,
}

impl MemoryPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, id: u32, html: impl Into<String>) -> Self {
        self.pages.insert(id, html.into());
        self
    }
}

#[async_trait]
impl PageSource for MemoryPageSource {
    fn url_for(&self, id: u32) -> String {
        page_url(crate::config::DEFAULT_PAGES_PATH, id)
    }

    async fn fetch(&self, id: u32) -> Result<String> {
        self.pages
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Fetch(format!("no page with id {}", id)))
    }
}

/// Build the page source a config describes
pub fn source_from_config(config: &SiteConfig) -> Result<Box<dyn PageSource>> {
    match config.base_url {
        #[cfg(feature = "http")]
        Some(ref base) => Ok(Box::new(HttpPageSource::new(base, config.pages_path.clone())?)),
        #[cfg(not(feature = "http"))]
        Some(_) => Err(Error::Config(
            "base_url requires the `http` feature".to_string(),
        )),
        None => Ok(Box::new(FsPageSource::new(
            &config.root,
            config.pages_path.clone(),
        ))),
    }
}

/// The loaded documents of a session, in id order
///
/// Read-only once built. Absent pages are simply not in it.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Arc<Document>>,
}

impl Corpus {
    /// Build a corpus from already extracted documents
    pub fn from_documents<I: IntoIterator<Item = Document>>(documents: I) -> Self {
        Corpus {
            documents: documents.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Arc<Document>> {
        self.documents.iter().find(|d| d.id() == id)
    }

    /// Documents whose text fields contain `text` anywhere (case-insensitive substring)
    pub fn containing<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Arc<Document>> + 'a {
        let needle = text.to_lowercase();
        self.documents
            .iter()
            .filter(move |d| d.search_blob().contains(&needle))
    }
}

/// Statistics from a batch load
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Number of pages requested
    pub requested: usize,
    /// Number of pages loaded into the corpus
    pub loaded: usize,
    /// Number of pages that failed and are absent
    pub failed: usize,
    /// Time taken
    pub duration: Duration,
}

/// Outcome of loading one page
#[derive(Debug, Clone)]
pub enum PageStatus {
    /// Page was fetched and extracted
    Loaded,
    /// Page is absent for this session
    Failed(String),
}

/// Progress callback for loading
pub trait LoadProgress: Send {
    /// Called once per page, in id order, after the batch has joined
    fn on_page(&mut self, id: u32, url: &str, status: PageStatus);
    /// Called when loading is complete
    fn on_complete(&mut self, stats: &LoadStats);
}

/// Load pages `1..=total_pages` from `source`
pub async fn load_corpus(source: &dyn PageSource, total_pages: u32) -> (Corpus, LoadStats) {
    load_corpus_with_progress(source, total_pages, &mut NoopProgress).await
}

/// Load pages `1..=total_pages` from `source` with progress reporting
pub async fn load_corpus_with_progress(
    source: &dyn PageSource,
    total_pages: u32,
    progress: &mut dyn LoadProgress,
) -> (Corpus, LoadStats) {
    let start = Instant::now();
    tracing::info!("Preloading {} pages", total_pages);

    let outcomes = join_all((1..=total_pages).map(|id| load_page(source, id))).await;

    let mut stats = LoadStats {
        requested: outcomes.len(),
        ..Default::default()
    };
    let mut documents = Vec::with_capacity(outcomes.len());

    for (id, outcome) in (1..=total_pages).zip(outcomes) {
        let url = source.url_for(id);
        match outcome {
            Ok(document) => {
                stats.loaded += 1;
                progress.on_page(id, &url, PageStatus::Loaded);
                documents.push(document);
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!("Error loading page {} ({}): {}", id, url, e);
                progress.on_page(id, &url, PageStatus::Failed(e.to_string()));
            }
        }
    }

    stats.duration = start.elapsed();
    tracing::info!(
        "Loaded {} of {} pages in {:?}",
        stats.loaded,
        stats.requested,
        stats.duration
    );
    progress.on_complete(&stats);

    (Corpus::from_documents(documents), stats)
}

async fn load_page(source: &dyn PageSource, id: u32) -> Result<Document> {
    let html = source.fetch(id).await?;
    Ok(extract_document(
        id,
        &source.url_for(id),
        &html,
        source.base_url(),
    ))
}

/// No-op progress reporter
struct NoopProgress;

impl LoadProgress for NoopProgress {
    fn on_page(&mut self, _id: u32, _url: &str, _status: PageStatus) {}
    fn on_complete(&mut self, _stats: &LoadStats) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn page(title: &str) -> String {
        format!("<html><head><title>{}</title></head><body></body></html>", title)
    }

    #[derive(Default)]
    struct Recorder {
        pages: Vec<(u32, bool)>,
        completed: bool,
    }

    impl LoadProgress for Recorder {
        fn on_page(&mut self, id: u32, _url: &str, status: PageStatus) {
            self.pages.push((id, matches!(status, PageStatus::Loaded)));
        }
        fn on_complete(&mut self, _stats: &LoadStats) {
            self.completed = true;
        }
    }

    #[tokio::test]
    async fn test_load_from_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        for id in 1..=3 {
            fs::write(
                dir.path().join(format!("pages/page{}.html", id)),
                page(&format!("Page {}", id)),
            )
            .unwrap();
        }

        let source = FsPageSource::new(dir.path(), "pages/");
        let (corpus, stats) = load_corpus(&source, 3).await;

        assert_eq!(stats.requested, 3);
        assert_eq!(stats.loaded, 3);
        assert_eq!(stats.failed, 0);
        let titles: Vec<_> = corpus.iter().map(|d| d.title().to_string()).collect();
        assert_eq!(titles, vec!["Page 1", "Page 2", "Page 3"]);
        assert_eq!(corpus.get(2).unwrap().url(), "pages/page2.html");
    }

    #[tokio::test]
    async fn test_missing_page_is_absent_not_fatal() {
        let source = MemoryPageSource::new()
            .with_page(1, page("One"))
            .with_page(3, page("Three"));

        let mut recorder = Recorder::default();
        let (corpus, stats) = load_corpus_with_progress(&source, 3, &mut recorder).await;

        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(corpus.len(), 2);
        assert!(corpus.get(2).is_none());
        assert_eq!(corpus.documents()[1].id(), 3);
        assert_eq!(recorder.pages, vec![(1, true), (2, false), (3, true)]);
        assert!(recorder.completed);
    }

    #[tokio::test]
    async fn test_all_pages_missing_gives_empty_corpus() {
        let dir = tempdir().unwrap();
        let source = FsPageSource::new(dir.path(), "pages/");

        let (corpus, stats) = load_corpus(&source, 4).await;

        assert!(corpus.is_empty());
        assert_eq!(stats.failed, 4);
    }

    #[test]
    fn test_containing_uses_lowercase_blob() {
        let corpus = Corpus::from_documents(vec![
            Document::builder(1, "pages/page1.html").title("Rust Guide").build(),
            Document::builder(2, "pages/page2.html").body_text("nothing here").build(),
        ]);

        let ids: Vec<_> = corpus.containing("RUST").map(|d| d.id()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_non_utf8_page_is_absent() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("pages")).unwrap();
        fs::write(dir.path().join("pages/page1.html"), page("Cafe")).unwrap();
        fs::write(
            dir.path().join("pages/page2.html"),
            b"<html><head><title>caf\xE9</title></head></html>",
        )
        .unwrap();

        let source = FsPageSource::new(dir.path(), "pages/");
        let (corpus, stats) = load_corpus(&source, 2).await;

        assert_eq!(stats.loaded, 1);
        assert_eq!(stats.failed, 1);
        let ids: Vec<_> = corpus.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![1]);
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn test_base_url_without_http_feature() {
        let config = SiteConfig {
            base_url: Some("https://example.com/".to_string()),
            ..Default::default()
        };
        assert!(matches!(source_from_config(&config), Err(Error::Config(_))));
    }

    #[cfg(feature = "http")]
    mod http {
        use super::*;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        /// Serve `pages/page1.html` and answer 404 for everything else
        async fn serve_site() -> String {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            tokio::spawn(async move {
                loop {
                    let (mut socket, _) = match listener.accept().await {
                        Ok(conn) => conn,
                        Err(_) => break,
                    };
                    tokio::spawn(async move {
                        let mut request = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => return,
                                Ok(n) => request.extend_from_slice(&buf[..n]),
                            }
                        }
                        let request = String::from_utf8_lossy(&request);
                        let path = request.split_whitespace().nth(1).unwrap_or("/");

                        let (status, body) = if path == "/site/pages/page1.html" {
                            ("200 OK", page("Served Page"))
                        } else {
                            ("404 Not Found", "not found".to_string())
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
            });

            format!("http://{}/site", addr)
        }

        #[test]
        fn test_base_url_gets_trailing_slash() {
            let source = HttpPageSource::new("http://h/site", "pages/").unwrap();

            assert_eq!(
                source.page_location(1).unwrap().as_str(),
                "http://h/site/pages/page1.html"
            );
            assert_eq!(source.base_url().unwrap().as_str(), "http://h/site/");
        }

        #[tokio::test]
        async fn test_http_error_status_is_absent() {
            let base = serve_site().await;
            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            let source = HttpPageSource::new(&base, "pages/")
                .unwrap()
                .with_client(client);

            let mut recorder = Recorder::default();
            let (corpus, stats) = load_corpus_with_progress(&source, 2, &mut recorder).await;

            assert_eq!(stats.loaded, 1);
            assert_eq!(stats.failed, 1);
            assert_eq!(corpus.get(1).unwrap().title(), "Served Page");
            assert!(corpus.get(2).is_none());
            assert_eq!(recorder.pages, vec![(1, true), (2, false)]);
        }

        #[tokio::test]
        async fn test_unreachable_host_is_absent() {
            // Bind then drop to get a port nothing listens on
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let client = reqwest::Client::builder().no_proxy().build().unwrap();
            let source = HttpPageSource::new(&format!("http://{}/", addr), "pages/")
                .unwrap()
                .with_client(client);

            let (corpus, stats) = load_corpus(&source, 1).await;

            assert!(corpus.is_empty());
            assert_eq!(stats.failed, 1);
        }
    }
}
