//! Passing a selected article from the list page to the detail page.
//!
//! The detail page has no access to the upstream response, so every field it
//! shows travels in the query string of its locator. Parameter names and order
//! are fixed: `title`, `description`, `content`, `urlToImage`, `url`,
//! `sourceName`, `author`, `publishedAt`.

use url::form_urlencoded;

use crate::types::{non_empty, ArticleRecord};

pub const DETAIL_PATH: &str = "/article";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleHandoff {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url_to_image: Option<String>,
    pub url: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
}

fn field(value: Option<&str>) -> Option<String> {
    non_empty(value).map(str::to_string)
}

impl From<&ArticleRecord> for ArticleHandoff {
    fn from(article: &ArticleRecord) -> Self {
        Self {
            title: field(article.title.as_deref()),
            description: field(article.description.as_deref()),
            content: field(article.content.as_deref()),
            url_to_image: field(article.url_to_image.as_deref()),
            url: field(article.url.as_deref()),
            source_name: field(article.source_name()),
            author: field(article.author.as_deref()),
            published_at: field(article.published_at.as_deref()),
        }
    }
}

impl ArticleHandoff {
    fn fields(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("title", self.title.as_deref()),
            ("description", self.description.as_deref()),
            ("content", self.content.as_deref()),
            ("urlToImage", self.url_to_image.as_deref()),
            ("url", self.url.as_deref()),
            ("sourceName", self.source_name.as_deref()),
            ("author", self.author.as_deref()),
            ("publishedAt", self.published_at.as_deref()),
        ]
    }

    /// Encoded query string, without the leading `?`. Absent fields are sent
    /// as empty values rather than left out.
    pub fn to_query(&self) -> String {
        self.fields()
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value.unwrap_or_default())))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Same-origin locator of the detail page for this article.
    pub fn locator(&self) -> String {
        format!("{}?{}", DETAIL_PATH, self.to_query())
    }

    /// Reads a raw query string back. Unknown keys are ignored, `+` is a
    /// space, and empty values count as absent. A repeated key keeps its
    /// first value.
    pub fn decode(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut handoff = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "title" => &mut handoff.title,
                "description" => &mut handoff.description,
                "content" => &mut handoff.content,
                "urlToImage" => &mut handoff.url_to_image,
                "url" => &mut handoff.url,
                "sourceName" => &mut handoff.source_name,
                "author" => &mut handoff.author,
                "publishedAt" => &mut handoff.published_at,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        handoff
    }
}

/// Detail-page locator for an article straight from the feed.
pub fn encode(article: &ArticleRecord) -> String {
    ArticleHandoff::from(article).locator()
}
