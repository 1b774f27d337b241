use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::catalog::Catalog;
use crate::error::{ReelError, Result};
use crate::types::{MovieDetail, ResultsPage, Selector};

const BASE_URL: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/500x750?text=No+Image";

pub struct Tmdb {
    client: Client,
    api_key: String,
    language: String,
}

impl std::fmt::Debug for Tmdb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tmdb").finish_non_exhaustive()
    }
}

impl Tmdb {
    pub fn new(api_key: String, language: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| ReelError::Api(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            language,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", BASE_URL, path);
        tracing::debug!(%url, "catalog request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", self.language.as_str()),
            ])
            .query(params)
            .send()
            .await
            .map_err(|e| ReelError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // TMDB error bodies carry a human-readable status_message.
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("status_message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(ReelError::Api(message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ReelError::Api(e.to_string()))
    }
}

#[async_trait]
impl Catalog for Tmdb {
    async fn fetch_page(&self, selector: &Selector, page: u32) -> Result<ResultsPage> {
        let page_param = page.to_string();
        match selector {
            Selector::Category(category) => {
                let path = format!("/movie/{}", category.as_api_path());
                self.get_json(&path, &[("page", page_param.as_str())]).await
            }
            Selector::Search(term) => {
                self.get_json(
                    "/search/movie",
                    &[
                        ("query", term.as_str()),
                        ("include_adult", "false"),
                        ("page", page_param.as_str()),
                    ],
                )
                .await
            }
        }
    }

    async fn movie(&self, id: u64) -> Result<MovieDetail> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }
}

/// Full image URL for a TMDB image path, with a placeholder for movies
/// that have no artwork.
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) => format!("{}/{}{}", IMAGE_BASE_URL, size, p),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}
