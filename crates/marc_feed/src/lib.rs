use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use marc_core::query::{DEFAULT_BASE_URL, DEFAULT_COUNTRY};
use marc_core::{Error, NewsFeed, QueryBuilder, Result};

use tracing::info;

pub mod sources;

pub use sources::newsapi::NewsApiFeed;
pub use sources::memory::StaticFeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    NewsApi,
    Static,
}

impl FromStr for FeedKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "newsapi" => Ok(FeedKind::NewsApi),
            "static" | "memory" => Ok(FeedKind::Static),
            other => Err(Error::Config(format!(
                "Unknown feed: {}. Available feeds: newsapi (default), static",
                other
            ))),
        }
    }
}

#[derive(Clone)]
pub struct FeedConfig {
    pub kind: FeedKind,
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    /// JSON articles served by the static feed; empty when unset.
    pub articles_path: Option<PathBuf>,
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .field("articles_path", &self.articles_path)
            .finish()
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            kind: FeedKind::NewsApi,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            articles_path: None,
        }
    }
}

impl FeedConfig {
    pub fn query_builder(&self) -> Result<QueryBuilder> {
        Ok(QueryBuilder::new(&self.base_url)?.with_country(self.country.clone()))
    }
}

pub fn create_feed(config: &FeedConfig) -> Result<Arc<dyn NewsFeed>> {
    match config.kind {
        FeedKind::NewsApi => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| Error::Config("NEWS_API_KEY is required for the newsapi feed".to_string()))?;
            Ok(Arc::new(NewsApiFeed::new(api_key, config.query_builder()?)?))
        }
        FeedKind::Static => match &config.articles_path {
            Some(path) => {
                let feed = StaticFeed::from_json(&std::fs::read_to_string(path)?)?;
                info!("Loaded static articles from {}", path.display());
                Ok(Arc::new(feed))
            }
            None => Ok(Arc::new(StaticFeed::new(Vec::new()))),
        },
    }
}

pub mod prelude {
    pub use super::{create_feed, FeedConfig, FeedKind, NewsApiFeed, StaticFeed};
    pub use marc_core::{ArticleRecord, Error, NewsFeed, NewsQuery, Result};
}
