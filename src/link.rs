//! Shareable browsing positions.
//!
//! The paged view's position serializes to the same two query parameters the
//! TMDB website uses: `search` (omitted when empty) and `page` (omitted when
//! 1). The encoded string shows up in the header, restores a session via
//! `--link`, and anchors the web URLs behind yank/open.

use crate::types::{Category, QueryState};

/// Encode a position as a query string. Both defaults omitted yields "".
pub fn encode(query: &QueryState) -> String {
    let mut parts = Vec::new();
    if !query.search.is_empty() {
        parts.push(format!("search={}", urlencoding::encode(&query.search)));
    }
    if query.page > 1 {
        parts.push(format!("page={}", query.page));
    }
    parts.join("&")
}

/// Parse a position string back into a `QueryState`.
///
/// Total over arbitrary input: unknown keys are ignored, an unparsable or
/// out-of-range page falls back to 1, and a leading '?' is tolerated so a
/// query string pasted straight out of a browser URL works.
pub fn parse(input: &str) -> QueryState {
    let mut query = QueryState::default();
    for pair in input
        .trim_start_matches('?')
        .split('&')
        .filter(|p| !p.is_empty())
    {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "search" => {
                query.search = urlencoding::decode(value)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_default();
            }
            "page" => {
                query.page = value.parse().ok().filter(|&p| p >= 1).unwrap_or(1);
            }
            _ => {}
        }
    }
    query
}

/// TMDB website URL for a browsing position, for yank/open-in-browser.
pub fn web_url(category: Category, query: &QueryState) -> String {
    if !query.search.is_empty() {
        let mut url = format!(
            "https://www.themoviedb.org/search/movie?query={}",
            urlencoding::encode(&query.search)
        );
        if query.page > 1 {
            url.push_str(&format!("&page={}", query.page));
        }
        return url;
    }

    let path = match category {
        Category::Popular => "movie",
        Category::TopRated => "movie/top-rated",
        Category::Upcoming => "movie/upcoming",
    };
    if query.page > 1 {
        format!("https://www.themoviedb.org/{}?page={}", path, query.page)
    } else {
        format!("https://www.themoviedb.org/{}", path)
    }
}

/// TMDB website URL for a single movie.
pub fn movie_url(id: u64) -> String {
    format!("https://www.themoviedb.org/movie/{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_encode_to_empty() {
        assert_eq!(encode(&QueryState::default()), "");
    }

    #[test]
    fn search_and_page_both_encode() {
        let query = QueryState {
            search: "blade runner".to_string(),
            page: 3,
        };
        assert_eq!(encode(&query), "search=blade%20runner&page=3");
    }

    #[test]
    fn page_one_is_omitted() {
        let query = QueryState {
            search: "dune".to_string(),
            page: 1,
        };
        assert_eq!(encode(&query), "search=dune");
    }

    #[test]
    fn parse_round_trips_encode() {
        let query = QueryState {
            search: "the good, the bad & the ugly".to_string(),
            page: 7,
        };
        assert_eq!(parse(&encode(&query)), query);
    }

    #[test]
    fn parse_ignores_junk() {
        let query = parse("?sort=desc&page=banana&search=dune&view=grid");
        assert_eq!(query.search, "dune");
        assert_eq!(query.page, 1);
    }

    #[test]
    fn parse_of_empty_is_default() {
        assert_eq!(parse(""), QueryState::default());
        assert_eq!(parse("?"), QueryState::default());
    }

    #[test]
    fn parse_rejects_page_zero() {
        assert_eq!(parse("page=0").page, 1);
    }

    #[test]
    fn category_web_urls() {
        let home = QueryState::default();
        assert_eq!(
            web_url(Category::Popular, &home),
            "https://www.themoviedb.org/movie"
        );
        let deep = QueryState {
            search: String::new(),
            page: 12,
        };
        assert_eq!(
            web_url(Category::TopRated, &deep),
            "https://www.themoviedb.org/movie/top-rated?page=12"
        );
    }

    #[test]
    fn search_web_url_takes_precedence_over_category() {
        let query = QueryState {
            search: "akira".to_string(),
            page: 2,
        };
        assert_eq!(
            web_url(Category::Upcoming, &query),
            "https://www.themoviedb.org/search/movie?query=akira&page=2"
        );
    }
}
