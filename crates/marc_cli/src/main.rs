use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use chrono::FixedOffset;
use clap::Parser;
use marc_core::handoff::encode;
use marc_core::query::{DEFAULT_BASE_URL, DEFAULT_COUNTRY};
use marc_core::{DateFormatter, NewsFeed, NewsQuery, QuerySpec};
use marc_feed::{create_feed, FeedConfig, FeedKind};
use marc_web::session::{DEFAULT_SIGN_IN_URL, DEFAULT_SIGN_OUT_URL};
use marc_web::{AppState, ProxySession, SessionProvider, StaticSession};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Display offset for publish dates: whole hours (`7`, `-3`) or `±HH:MM`.
#[derive(Debug, Clone, Copy)]
struct UtcOffset(FixedOffset);

impl FromStr for UtcOffset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(hours) = s.parse::<i32>() {
            return hours
                .checked_mul(3600)
                .and_then(FixedOffset::east_opt)
                .map(UtcOffset)
                .ok_or_else(|| format!("UTC offset out of range: {}", s));
        }
        s.parse::<FixedOffset>()
            .map(UtcOffset)
            .map_err(|e| format!("Invalid UTC offset {:?}: {}", s, e))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "MARC PORTAL news reader", long_about = None)]
pub struct Cli {
    #[arg(long, env = "MARC_FEED", default_value = "newsapi", help = "News feed to use. Available feeds: newsapi (default), static")]
    feed: String,
    /// JSON file of articles served by the static feed
    #[arg(long, env = "MARC_ARTICLES")]
    articles: Option<PathBuf>,
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[arg(long, env = "MARC_NEWS_API_URL", default_value = DEFAULT_BASE_URL)]
    news_api_url: String,
    /// Country used for top headlines
    #[arg(long, env = "MARC_COUNTRY", default_value = DEFAULT_COUNTRY)]
    country: String,
    /// Offset used when showing publish dates (e.g. 7, -3, +05:30)
    #[arg(long, env = "MARC_UTC_OFFSET", default_value = "7", allow_hyphen_values = true)]
    utc_offset: UtcOffset,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the portal web server
    Serve {
        #[arg(long, env = "MARC_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,
        /// Treat every request as signed in under this name (development only)
        #[arg(long, env = "MARC_DEV_USER")]
        dev_user: Option<String>,
        #[arg(long, env = "MARC_SIGN_IN_URL", default_value = DEFAULT_SIGN_IN_URL)]
        sign_in_url: String,
        #[arg(long, env = "MARC_SIGN_OUT_URL", default_value = DEFAULT_SIGN_OUT_URL)]
        sign_out_url: String,
    },
    /// Print the upstream locator for a search term and category
    Query {
        #[arg(default_value = "")]
        term: String,
        #[arg(long, default_value = "")]
        category: String,
    },
    /// Fetch one listing and print it with detail-page links
    Fetch {
        #[arg(default_value = "")]
        term: String,
        #[arg(long, default_value = "")]
        category: String,
    },
}

impl Cli {
    fn feed_config(&self) -> anyhow::Result<FeedConfig> {
        Ok(FeedConfig {
            kind: self.feed.parse::<FeedKind>()?,
            api_key: self.news_api_key.clone(),
            base_url: self.news_api_url.clone(),
            country: self.country.clone(),
            articles_path: self.articles.clone(),
        })
    }
}

fn session_provider(
    dev_user: Option<String>,
    sign_in_url: String,
    sign_out_url: String,
) -> Arc<dyn SessionProvider> {
    match dev_user {
        Some(name) => {
            warn!("🔓 Development sign-in enabled: every request is {:?}", name);
            Arc::new(
                StaticSession::signed_in(name)
                    .with_sign_in_url(sign_in_url)
                    .with_sign_out_url(sign_out_url),
            )
        }
        None => Arc::new(
            ProxySession::new()
                .with_sign_in_url(sign_in_url)
                .with_sign_out_url(sign_out_url),
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    let dates = DateFormatter::with_offset(cli.utc_offset.0);
    let config = cli.feed_config()?;

    match cli.command {
        Commands::Serve { bind, dev_user, sign_in_url, sign_out_url } => {
            let feed = create_feed(&config).context("Failed to initialize news feed")?;
            info!("📰 News feed initialized (using {})", feed.name());
            let sessions = session_provider(dev_user, sign_in_url, sign_out_url);
            let state = AppState::new(feed, sessions).with_dates(dates);
            marc_web::serve(state, bind).await?;
        }
        Commands::Query { term, category } => {
            let query = NewsQuery::from_spec(&QuerySpec::new(term, category));
            println!("{}", config.query_builder()?.locate(&query));
            if let Some(category) = query.ignored_category() {
                eprintln!("Category {:?} is not applied to keyword searches", category);
            }
        }
        Commands::Fetch { term, category } => {
            let feed = create_feed(&config).context("Failed to initialize news feed")?;
            let query = NewsQuery::from_spec(&QuerySpec::new(term, category));
            let articles = match feed.fetch(&query).await {
                Ok(articles) => articles,
                Err(e) => {
                    tracing::error!("Error fetching news: {}", e);
                    anyhow::bail!(e.user_message());
                }
            };
            println!("Found {} articles", articles.len());
            for article in &articles {
                println!(
                    "- {} ({})",
                    article.title().unwrap_or("(untitled)"),
                    dates.format(article.published_at.as_deref()).as_str()
                );
                println!("  {}", encode(article));
            }
        }
    }

    Ok(())
}
