use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// TMDB rejects page numbers above 500 regardless of how many results exist.
pub const PAGE_CAP: u32 = 500;

/// A fixed named result bucket, as opposed to a free-text search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Popular,
    TopRated,
    Upcoming,
}

impl Category {
    pub fn as_api_path(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Popular => write!(f, "Popular"),
            Category::TopRated => write!(f, "Top Rated"),
            Category::Upcoming => write!(f, "Upcoming"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "popular" => Ok(Category::Popular),
            "top-rated" | "top_rated" => Ok(Category::TopRated),
            "upcoming" => Ok(Category::Upcoming),
            other => Err(format!(
                "unknown category '{}' (expected popular, top-rated, or upcoming)",
                other
            )),
        }
    }
}

/// The discriminated choice between browsing a bucket and running a search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Category(Category),
    Search(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Category(category) => write!(f, "{}", category),
            Selector::Search(term) => write!(f, "search \"{}\"", term),
        }
    }
}

/// The single source of truth for "what is being browsed" in paged mode.
/// Mirrored 1:1 into the shareable position string (see `link`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search: String,
    pub page: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

/// One page of catalog results, as returned by the TMDB list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultsPage {
    #[serde(rename = "results")]
    pub items: Vec<Movie>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
}

/// Movie summary (list view).
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "de_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub overview: String,
}

/// Movie detail (full record behind `/movie/{id}`).
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "de_release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// TMDB sends release dates as "YYYY-MM-DD", but unreleased or obscure
/// titles carry "" or omit the field entirely.
fn de_release_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
}
