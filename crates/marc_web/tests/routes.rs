use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use marc_core::handoff::encode;
use marc_core::{ArticleRecord, ArticleSource, DateFormatter, NewsFeed, NewsQuery};
use marc_feed::StaticFeed;
use marc_web::{create_app, AppState, ProxySession, SessionProvider, StaticSession};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

fn articles() -> Vec<ArticleRecord> {
    vec![
        ArticleRecord {
            source: Some(ArticleSource { id: None, name: Some("Kompas".to_string()) }),
            author: Some("Budi".to_string()),
            title: Some("50% Café & Co".to_string()),
            description: Some("Kedai kopi baru".to_string()),
            url: Some("https://example.com/kopi".to_string()),
            url_to_image: None,
            published_at: Some("2024-05-01T10:30:00Z".to_string()),
            content: None,
        },
        ArticleRecord {
            title: Some("Tanpa tautan".to_string()),
            ..Default::default()
        },
    ]
}

fn app_with(feed: Arc<StaticFeed>, sessions: Arc<dyn SessionProvider>) -> Router {
    let feed: Arc<dyn NewsFeed> = feed;
    create_app(AppState::new(feed, sessions).with_dates(DateFormatter::utc()))
}

fn signed_in_app(feed: Arc<StaticFeed>) -> Router {
    app_with(feed, Arc::new(StaticSession::signed_in("Rina")))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_unauthenticated_is_redirected_to_login() {
    let feed = Arc::new(StaticFeed::new(articles()));
    for uri in ["/", "/?q=kopi", "/article?title=x"] {
        let app = app_with(feed.clone(), Arc::new(StaticSession::signed_out()));
        let (status, location, _) = get(app, uri).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/login"));
    }
    assert!(feed.queries().await.is_empty());
}

#[tokio::test]
async fn test_pending_session_renders_loading_without_fetching() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let app = app_with(feed.clone(), Arc::new(StaticSession::pending()));
    let (status, _, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Loading session..."));
    assert!(!body.contains("Kedai kopi"));
    assert!(feed.queries().await.is_empty());
}

#[tokio::test]
async fn test_index_lists_headlines() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let (status, _, body) = get(signed_in_app(feed.clone()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Selamat datang, Rina!"));
    assert!(body.contains("50% Café &amp; Co"));
    assert!(body.contains("Tanpa tautan"));
    assert_eq!(body.matches("Baca Selengkapnya").count(), 1);

    let expected_link = encode(&articles()[0]).replace('&', "&amp;");
    assert!(body.contains(&expected_link));
    assert_eq!(feed.queries().await, vec![NewsQuery::TopHeadlines { category: None }]);
}

#[tokio::test]
async fn test_index_passes_category_to_headlines() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let (_, _, body) = get(signed_in_app(feed.clone()), "/?q=&category=technology").await;
    assert!(body.contains("Filter Kategori: <strong>technology</strong>"));
    assert!(!body.contains("Filter kategori tidak diterapkan"));
    assert_eq!(
        feed.queries().await,
        vec![NewsQuery::TopHeadlines { category: Some("technology".to_string()) }]
    );
}

#[tokio::test]
async fn test_search_says_category_is_not_applied() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let (_, _, body) = get(signed_in_app(feed.clone()), "/?q=kopi&category=sports").await;
    assert!(body.contains("Menampilkan hasil pencarian untuk: <strong>kopi</strong>"));
    assert!(body.contains("Filter kategori tidak diterapkan selama pencarian."));
    assert!(body.contains("Kedai kopi baru"));
    assert!(!body.contains("Tanpa tautan"));
    assert_eq!(
        feed.queries().await,
        vec![NewsQuery::Search {
            term: "kopi".to_string(),
            ignored_category: Some("sports".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_empty_results() {
    let feed = Arc::new(StaticFeed::new(Vec::new()));
    let (_, _, body) = get(signed_in_app(feed), "/?q=nothing").await;
    assert!(body.contains("Tidak ada berita yang tersedia saat ini."));
}

#[tokio::test]
async fn test_upstream_failure_renders_error_only() {
    let feed = Arc::new(StaticFeed::failing(401, Some("Your API key is invalid or incorrect.")));
    let (status, _, body) = get(signed_in_app(feed), "/").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Error: Failed to fetch news: Your API key is invalid or incorrect."));
    assert!(!body.contains("Berita Terbaru"));
}

#[tokio::test]
async fn test_detail_round_trip_from_list_link() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let locator = encode(&articles()[0]);
    let (status, _, body) = get(signed_in_app(feed), &locator).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>50% Café &amp; Co</h1>"));
    assert!(body.contains("Sumber: Kompas"));
    assert!(body.contains("Penulis: Budi"));
    assert!(body.contains("Mei 2024"));
    assert!(body.contains("href=\"https://example.com/kopi\""));
}

#[tokio::test]
async fn test_detail_not_found() {
    let feed = Arc::new(StaticFeed::new(Vec::new()));
    let (status, _, body) = get(signed_in_app(feed), "/article?description=x").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Data artikel tidak ditemukan."));
    assert!(body.contains("Kembali ke Beranda"));
}

#[tokio::test]
async fn test_detail_date_placeholders() {
    let feed = Arc::new(StaticFeed::new(Vec::new()));
    let (_, _, invalid) = get(
        signed_in_app(feed.clone()),
        "/article?title=Breaking%20News&publishedAt=not-a-date",
    )
    .await;
    let (_, _, missing) = get(signed_in_app(feed), "/article?title=Breaking%20News").await;
    assert!(invalid.contains("Dipublikasikan: Tanggal tidak valid"));
    assert!(missing.contains("Dipublikasikan: Tanggal tidak tersedia"));
}

#[tokio::test]
async fn test_login_page() {
    let feed = Arc::new(StaticFeed::new(Vec::new()));
    let sessions = Arc::new(ProxySession::new().with_sign_in_url("/oauth2/start?rd=/&x=1"));
    let (status, _, body) = get(app_with(feed.clone(), sessions), "/login").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Login dengan Google"));
    assert!(body.contains("href=\"/oauth2/start?rd=/&amp;x=1\""));

    let (status, location, _) = get(signed_in_app(feed), "/login").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/"));
}

#[tokio::test]
async fn test_proxy_headers_sign_in() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let app = app_with(feed, Arc::new(ProxySession::new()));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .header("X-Forwarded-Preferred-Username", "Andi")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("Selamat datang, Andi!"));
}

#[tokio::test]
async fn test_logout_redirects_to_provider() {
    let feed = Arc::new(StaticFeed::new(Vec::new()));
    let (status, location, _) = get(app_with(feed, Arc::new(ProxySession::new())), "/logout").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/oauth2/sign_out"));
}

#[tokio::test]
async fn test_repeated_keys_still_redirect_when_signed_out() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let app = app_with(feed.clone(), Arc::new(StaticSession::signed_out()));
    let (status, location, _) = get(app, "/?q=a&q=b").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/login"));
    assert!(feed.queries().await.is_empty());
}

#[tokio::test]
async fn test_repeated_keys_use_first_value() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let (status, _, body) =
        get(signed_in_app(feed.clone()), "/?q=kopi&q=b&category=sports&category=health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Menampilkan hasil pencarian untuk: <strong>kopi</strong>"));
    assert_eq!(
        feed.queries().await,
        vec![NewsQuery::Search {
            term: "kopi".to_string(),
            ignored_category: Some("sports".to_string()),
        }]
    );
}

#[tokio::test]
async fn test_padded_term_reaches_feed_unchanged() {
    let feed = Arc::new(StaticFeed::new(articles()));
    let (status, _, _) = get(signed_in_app(feed.clone()), "/?q=%20kopi%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        feed.queries().await,
        vec![NewsQuery::Search { term: " kopi ".to_string(), ignored_category: None }]
    );
}
