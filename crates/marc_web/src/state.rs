use std::sync::Arc;

use marc_core::{DateFormatter, NewsFeed};

use crate::session::SessionProvider;

/// Everything a handler needs, passed explicitly through axum state.
pub struct AppState {
    pub feed: Arc<dyn NewsFeed>,
    pub sessions: Arc<dyn SessionProvider>,
    pub dates: DateFormatter,
}

impl AppState {
    pub fn new(feed: Arc<dyn NewsFeed>, sessions: Arc<dyn SessionProvider>) -> Self {
        Self { feed, sessions, dates: DateFormatter::default() }
    }

    pub fn with_dates(mut self, dates: DateFormatter) -> Self {
        self.dates = dates;
        self
    }
}
