use std::fmt;

use async_trait::async_trait;
use marc_core::{ArticleRecord, Error, NewsFeed, NewsQuery, QueryBuilder, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "X-Api-Key";
const USER_AGENT: &str = concat!("marc-portal/", env!("CARGO_PKG_VERSION"));

#[derive(Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    articles: Vec<ArticleRecord>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for `newsapi.org`. The key travels in a header so locators never
/// carry it.
pub struct NewsApiFeed {
    client: Client,
    api_key: String,
    builder: QueryBuilder,
}

impl fmt::Debug for NewsApiFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiFeed")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.builder.base().as_str())
            .finish()
    }
}

impl NewsApiFeed {
    pub fn new(api_key: String, builder: QueryBuilder) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, api_key, builder })
    }

    pub fn builder(&self) -> &QueryBuilder {
        &self.builder
    }
}

#[async_trait]
impl NewsFeed for NewsApiFeed {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<ArticleRecord>> {
        let url = self.builder.locate(query);
        debug!("📰 Fetching {}", url);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<NewsApiResponse>(&body).ok();
            let code = parsed.as_ref().and_then(|r| r.code.clone());
            warn!("News API returned {} ({:?})", status, code);
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: parsed.and_then(|r| r.message),
            });
        }

        let parsed: NewsApiResponse = serde_json::from_str(&body)?;
        if parsed.status != "ok" {
            warn!("News API reported status {:?} ({:?})", parsed.status, parsed.code);
            return Err(Error::Upstream { status: status.as_u16(), message: parsed.message });
        }

        debug!("Received {} articles", parsed.articles.len());
        Ok(parsed.articles)
    }
}
