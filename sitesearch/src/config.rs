//! Site configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of pages the widget ships with
pub const DEFAULT_TOTAL_PAGES: u32 = 75;

/// Directory (or URL path segment) holding `page{N}.html`
pub const DEFAULT_PAGES_PATH: &str = "pages/";

/// Where pages come from and how many there are
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Number of pages, loaded as ids 1..=total_pages
    pub total_pages: u32,
    /// Prefix for page paths, e.g. `pages/` gives `pages/page1.html`
    pub pages_path: String,
    /// Site root on the local filesystem
    pub root: PathBuf,
    /// Site root over HTTP; takes precedence over `root` when set
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            total_pages: DEFAULT_TOTAL_PAGES,
            pages_path: DEFAULT_PAGES_PATH.to_string(),
            root: PathBuf::from("."),
            base_url: None,
        }
    }
}

impl SiteConfig {
    /// Load a config file (YAML)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file at the default location, or defaults if there is none
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("Loading config from {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.total_pages == 0 {
            return Err(Error::Config("total_pages must be at least 1".to_string()));
        }
        if let Some(ref base) = self.base_url {
            url::Url::parse(base)?;
        }
        Ok(())
    }

    /// URL of a page relative to the site root
    pub fn page_url(&self, id: u32) -> String {
        page_url(&self.pages_path, id)
    }
}

/// `{pages_path}page{id}.html`
pub fn page_url(pages_path: &str, id: u32) -> String {
    format!("{}page{}.html", pages_path, id)
}

/// Default config path (`~/.config/sitesearch/config.yaml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sitesearch").join("config.yaml"))
}
