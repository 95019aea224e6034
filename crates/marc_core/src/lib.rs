pub mod date;
pub mod detail;
pub mod error;
pub mod feed;
pub mod handoff;
pub mod query;
pub mod types;

pub use date::{DateFormatter, DisplayDate};
pub use detail::{ArticleDetail, DetailView};
pub use error::{Error, Result};
pub use feed::NewsFeed;
pub use handoff::ArticleHandoff;
pub use query::{Category, NewsQuery, QueryBuilder, QuerySpec};
pub use types::{ArticleRecord, ArticleSource, Identity, SessionStatus};

pub mod prelude {
    pub use crate::{ArticleRecord, Error, NewsFeed, NewsQuery, Result};
}
