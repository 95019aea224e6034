use async_trait::async_trait;
use marc_core::{ArticleRecord, Error, NewsFeed, NewsQuery, Result};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Seed files hold either a saved NewsAPI response or a bare article array.
#[derive(Deserialize)]
#[serde(untagged)]
enum Seed {
    Response { articles: Vec<ArticleRecord> },
    Articles(Vec<ArticleRecord>),
}

/// In-memory feed for offline runs and tests.
///
/// Headlines return every article; a search keeps the ones whose title or
/// description contains the term, ignoring case.
pub struct StaticFeed {
    articles: Vec<ArticleRecord>,
    failure: Option<(u16, Option<String>)>,
    queries: RwLock<Vec<NewsQuery>>,
}

impl StaticFeed {
    pub fn new(articles: Vec<ArticleRecord>) -> Self {
        Self { articles, failure: None, queries: RwLock::new(Vec::new()) }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let articles = match serde_json::from_str::<Seed>(json)? {
            Seed::Response { articles } | Seed::Articles(articles) => articles,
        };
        Ok(Self::new(articles))
    }

    /// A feed whose every fetch fails the way an upstream error would.
    pub fn failing(status: u16, message: Option<&str>) -> Self {
        Self {
            articles: Vec::new(),
            failure: Some((status, message.map(str::to_string))),
            queries: RwLock::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first.
    pub async fn queries(&self) -> Vec<NewsQuery> {
        self.queries.read().await.clone()
    }

    fn matches(article: &ArticleRecord, term: &str) -> bool {
        let term = term.to_lowercase();
        [article.title.as_deref(), article.description.as_deref()]
            .into_iter()
            .flatten()
            .any(|text| text.to_lowercase().contains(&term))
    }
}

#[async_trait]
impl NewsFeed for StaticFeed {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch(&self, query: &NewsQuery) -> Result<Vec<ArticleRecord>> {
        self.queries.write().await.push(query.clone());

        if let Some((status, message)) = &self.failure {
            return Err(Error::Upstream { status: *status, message: message.clone() });
        }

        Ok(match query {
            NewsQuery::Search { term, .. } => self
                .articles
                .iter()
                .filter(|a| Self::matches(a, term))
                .cloned()
                .collect(),
            NewsQuery::TopHeadlines { .. } => self.articles.clone(),
        })
    }
}
