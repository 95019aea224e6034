use crate::date::{DateFormatter, DisplayDate};
use crate::handoff::ArticleHandoff;

/// What the detail page shows for a decoded hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    /// No title arrived; the page offers a way back instead of a partial render.
    NotFound,
    Article(ArticleDetail),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetail {
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub published: DisplayDate,
}

impl DetailView {
    pub fn from_handoff(handoff: ArticleHandoff, dates: &DateFormatter) -> Self {
        let title = match handoff.title.filter(|t| !t.is_empty()) {
            Some(title) => title,
            None => return DetailView::NotFound,
        };
        DetailView::Article(ArticleDetail {
            title,
            published: dates.format(handoff.published_at.as_deref()),
            description: handoff.description,
            content: handoff.content,
            image_url: handoff.url_to_image,
            url: handoff.url,
            source_name: handoff.source_name,
            author: handoff.author,
        })
    }

    /// Decodes a raw detail-page query string.
    pub fn decode(query: &str, dates: &DateFormatter) -> Self {
        Self::from_handoff(ArticleHandoff::decode(query), dates)
    }

    pub fn article(&self) -> Option<&ArticleDetail> {
        match self {
            DetailView::Article(detail) => Some(detail),
            DetailView::NotFound => None,
        }
    }
}
