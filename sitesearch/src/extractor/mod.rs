//! Field extraction from page markup

use scraper::{Html, Selector};
use url::Url;

/// An image found in a page, in document order
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Image {
    /// Image source (resolved against the source base URL when one is known)
    pub src: String,
    /// Alt text (empty when missing)
    pub alt: String,
}

impl Image {
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Image {
            src: src.into(),
            alt: alt.into(),
        }
    }
}

/// A loaded page with its extracted text fields
///
/// Documents are immutable once built. Every text field is present; a missing
/// element in the markup yields an empty string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: u32,
    url: String,
    title: String,
    heading1: String,
    heading2: String,
    meta_description: String,
    meta_keywords: String,
    body_text: String,
    images: Vec<Image>,
    #[serde(skip)]
    search_blob: String,
}

impl Document {
    /// Start building a document by hand
    pub fn builder(id: u32, url: impl Into<String>) -> DocumentBuilder {
        DocumentBuilder {
            id,
            url: url.into(),
            title: String::new(),
            heading1: String::new(),
            heading2: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            body_text: String::new(),
            images: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Text of the first `<h1>`
    pub fn heading1(&self) -> &str {
        &self.heading1
    }

    /// Text of the first `<h2>`
    pub fn heading2(&self) -> &str {
        &self.heading2
    }

    pub fn meta_description(&self) -> &str {
        &self.meta_description
    }

    /// Raw comma-separated keywords
    pub fn meta_keywords(&self) -> &str {
        &self.meta_keywords
    }

    /// All paragraph text joined by single spaces
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// Lowercase concatenation of title, headings, meta fields and body
    pub fn search_blob(&self) -> &str {
        &self.search_blob
    }
}

/// Builder for [`Document`]; computes the search blob on `build`
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    id: u32,
    url: String,
    title: String,
    heading1: String,
    heading2: String,
    meta_description: String,
    meta_keywords: String,
    body_text: String,
    images: Vec<Image>,
}

impl DocumentBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn heading1(mut self, text: impl Into<String>) -> Self {
        self.heading1 = text.into();
        self
    }

    pub fn heading2(mut self, text: impl Into<String>) -> Self {
        self.heading2 = text.into();
        self
    }

    pub fn meta_description(mut self, text: impl Into<String>) -> Self {
        self.meta_description = text.into();
        self
    }

    pub fn meta_keywords(mut self, text: impl Into<String>) -> Self {
        self.meta_keywords = text.into();
        self
    }

    pub fn body_text(mut self, text: impl Into<String>) -> Self {
        self.body_text = text.into();
        self
    }

    pub fn image(mut self, src: impl Into<String>, alt: impl Into<String>) -> Self {
        self.images.push(Image::new(src, alt));
        self
    }

    pub fn build(self) -> Document {
        let search_blob = [
            self.title.as_str(),
            self.heading1.as_str(),
            self.heading2.as_str(),
            self.meta_description.as_str(),
            self.meta_keywords.as_str(),
            self.body_text.as_str(),
        ]
        .join(" ")
        .to_lowercase();

        Document {
            id: self.id,
            url: self.url,
            title: self.title,
            heading1: self.heading1,
            heading2: self.heading2,
            meta_description: self.meta_description,
            meta_keywords: self.meta_keywords,
            body_text: self.body_text,
            images: self.images,
            search_blob,
        }
    }
}

/// Extract a document record from raw page markup
///
/// Parsing is lenient: malformed markup still produces a record, with empty
/// strings for anything that could not be found. Relative image sources are
/// resolved against `base` when given.
pub fn extract_document(id: u32, url: &str, html: &str, base: Option<&Url>) -> Document {
    let doc = Html::parse_document(html);

    let paragraphs = select_all(&doc, "p")
        .into_iter()
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    let mut builder = Document::builder(id, url)
        .title(first_text(&doc, "title"))
        .meta_description(first_attr(&doc, r#"meta[name="description"]"#, "content"))
        .meta_keywords(first_attr(&doc, r#"meta[name="keywords"]"#, "content"))
        .heading1(first_text(&doc, "h1"))
        .heading2(first_text(&doc, "h2"))
        .body_text(paragraphs);

    for img in select_all(&doc, "img") {
        let src = img
            .value()
            .attr("src")
            .map(|raw| resolve_src(raw, base))
            .unwrap_or_default();
        let alt = img.value().attr("alt").unwrap_or_default();
        builder = builder.image(src, alt);
    }

    builder.build()
}

fn select_all<'a>(doc: &'a Html, selector: &str) -> Vec<scraper::ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => doc.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// textContent of the first matching element
fn first_text(doc: &Html, selector: &str) -> String {
    select_all(doc, selector)
        .first()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default()
}

fn first_attr(doc: &Html, selector: &str, attr: &str) -> String {
    select_all(doc, selector)
        .first()
        .and_then(|el| el.value().attr(attr))
        .map(String::from)
        .unwrap_or_default()
}

fn resolve_src(raw: &str, base: Option<&Url>) -> String {
    if raw.is_empty() {
        return String::new();
    }
    match base {
        Some(base) => base
            .join(raw)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => raw.to_string(),
    }
}
