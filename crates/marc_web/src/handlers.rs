use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use marc_core::{DetailView, Identity, NewsFeed, NewsQuery, QuerySpec, SessionStatus};
use tracing::{debug, error};

use crate::render::{self, IndexView};
use crate::session::SessionProvider;
use crate::{AppState, HOME_PATH, LOGIN_PATH};

/// Resolves the session, or the response to send instead of the page.
async fn require_identity(state: &AppState, headers: &HeaderMap) -> Result<Identity, Response> {
    match state.sessions.status(headers).await {
        SessionStatus::Authenticated(identity) => Ok(identity),
        SessionStatus::Pending => Err(render::loading_page().into_response()),
        SessionStatus::Unauthenticated => Err(Redirect::to(LOGIN_PATH).into_response()),
    }
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    let identity = match require_identity(&state, &headers).await {
        Ok(identity) => identity,
        Err(response) => return response,
    };

    let spec = QuerySpec::from_query(raw.as_deref().unwrap_or_default());
    let query = NewsQuery::from_spec(&spec);
    if let Some(category) = query.ignored_category() {
        debug!("Category {:?} not applied to search {:?}", category, spec.term);
    }

    match state.feed.fetch(&query).await {
        Ok(articles) => {
            debug!("🗞️ {} articles from {}", articles.len(), state.feed.name());
            let view = IndexView {
                identity: &identity,
                spec: &spec,
                query: &query,
                articles: &articles,
            };
            render::index_page(&view, &state.dates).into_response()
        }
        Err(e) => {
            error!("Error fetching news from {}: {}", state.feed.name(), e);
            (StatusCode::BAD_GATEWAY, render::error_page(&e.user_message())).into_response()
        }
    }
}

pub async fn article(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> Response {
    if let Err(response) = require_identity(&state, &headers).await {
        return response;
    }

    let view = DetailView::decode(raw.as_deref().unwrap_or_default(), &state.dates);
    if matches!(view, DetailView::NotFound) {
        debug!("Article hand-off without a title");
    }
    render::detail_page(&view).into_response()
}

pub async fn login(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.sessions.status(&headers).await {
        SessionStatus::Authenticated(_) => Redirect::to(HOME_PATH).into_response(),
        SessionStatus::Pending => render::loading_page().into_response(),
        SessionStatus::Unauthenticated => {
            render::login_page(state.sessions.sign_in_url()).into_response()
        }
    }
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::to(state.sessions.sign_out_url())
}
