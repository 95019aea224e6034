use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("News API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Upstream { status: u16, message: Option<String> },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

impl Error {
    /// Reduces a fetch failure to the single string shown to the reader.
    ///
    /// An upstream-provided message wins, then the HTTP reason phrase; a
    /// failure that never got a response collapses to a generic notice.
    pub fn user_message(&self) -> String {
        match self {
            Error::Upstream { message: Some(message), .. } if !message.is_empty() => {
                format!("Failed to fetch news: {}", message)
            }
            Error::Upstream { status, .. } => {
                let reason = reqwest::StatusCode::from_u16(*status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status));
                format!("Failed to fetch news: {}", reason)
            }
            Error::Http(err) => match err.status() {
                Some(status) => format!(
                    "Failed to fetch news: {}",
                    status.canonical_reason().unwrap_or(status.as_str())
                ),
                None => GENERIC_FETCH_FAILURE.to_string(),
            },
            _ => GENERIC_FETCH_FAILURE.to_string(),
        }
    }
}

pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch news. Please try again later.";

pub type Result<T> = std::result::Result<T, Error>;
