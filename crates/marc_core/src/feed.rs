use async_trait::async_trait;

use crate::query::NewsQuery;
use crate::types::ArticleRecord;
use crate::Result;

/// Source of article listings.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    fn name(&self) -> &str;

    /// Fetches one listing. Called once per page render; no retries.
    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<ArticleRecord>>;
}
