use std::fmt;
use std::str::FromStr;

use url::{form_urlencoded, Url};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/";
pub const DEFAULT_COUNTRY: &str = "us";

const SEARCH_ENDPOINT: &str = "everything";
const HEADLINES_ENDPOINT: &str = "top-headlines";

/// Categories offered by the filter selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Indonesian label shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Business => "Bisnis",
            Category::Entertainment => "Hiburan",
            Category::General => "Umum",
            Category::Health => "Kesehatan",
            Category::Science => "Sains",
            Category::Sports => "Olahraga",
            Category::Technology => "Teknologi",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::Config(format!("Unknown category: {}", s)))
    }
}

/// Search term and category selector taken from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pub term: String,
    pub category: String,
}

impl QuerySpec {
    /// Values are kept verbatim; only an empty term selects headlines.
    pub fn new(term: impl Into<String>, category: impl Into<String>) -> Self {
        Self { term: term.into(), category: category.into() }
    }

    /// Reads `q` and `category` from a raw query string. A repeated key keeps
    /// its first value and unknown keys are ignored.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut term = None;
        let mut category = None;
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "q" => &mut term,
                "category" => &mut category,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        Self::new(term.unwrap_or_default(), category.unwrap_or_default())
    }
}

/// What gets asked of the news API for a given [`QuerySpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsQuery {
    /// Keyword search. The category filter is not applied in this mode; it is
    /// kept here so the page can say so.
    Search {
        term: String,
        ignored_category: Option<String>,
    },
    TopHeadlines {
        category: Option<String>,
    },
}

impl NewsQuery {
    pub fn from_spec(spec: &QuerySpec) -> Self {
        let category = Some(spec.category.clone()).filter(|c| !c.is_empty());
        if spec.term.is_empty() {
            NewsQuery::TopHeadlines { category }
        } else {
            NewsQuery::Search {
                term: spec.term.clone(),
                ignored_category: category,
            }
        }
    }

    pub fn ignored_category(&self) -> Option<&str> {
        match self {
            NewsQuery::Search { ignored_category, .. } => ignored_category.as_deref(),
            NewsQuery::TopHeadlines { .. } => None,
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, NewsQuery::Search { .. })
    }
}

/// Turns queries into news API locators.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base: Url,
    country: String,
}

impl QueryBuilder {
    /// Builder for the public `newsapi.org` endpoint.
    pub fn newsapi() -> Result<Self> {
        Self::new(DEFAULT_BASE_URL)
    }

    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(Error::InvalidUrl(format!("{} cannot carry a path", base)));
        }
        Ok(Self { base, country: DEFAULT_COUNTRY.to_string() })
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Builds the locator for a raw term and category pair.
    pub fn build(&self, term: &str, category: &str) -> Url {
        self.locate(&NewsQuery::from_spec(&QuerySpec::new(term, category)))
    }

    pub fn locate(&self, query: &NewsQuery) -> Url {
        match query {
            NewsQuery::Search { term, .. } => {
                self.endpoint(SEARCH_ENDPOINT, &format!("q={}", urlencoding::encode(term)))
            }
            NewsQuery::TopHeadlines { category } => {
                let mut params = format!("country={}", urlencoding::encode(&self.country));
                if let Some(category) = category {
                    params.push_str(&format!("&category={}", urlencoding::encode(category)));
                }
                self.endpoint(HEADLINES_ENDPOINT, &params)
            }
        }
    }

    fn endpoint(&self, name: &str, params: &str) -> Url {
        let mut url = self.base.clone();
        // `new` rejects cannot-be-a-base URLs, so the segments are always there.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url.set_query(Some(params));
        url
    }
}
