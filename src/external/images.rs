//! Recipe image lookup
//!
//! Best-effort image search: Google Custom Search first, Pexels as a
//! fallback. Either provider may be unconfigured, in which case it is
//! skipped. Absence of an image is never an error.

use serde::Deserialize;

use crate::config::Config;

const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";

/// Image search over the configured providers
#[derive(Clone)]
pub struct ImageSearch {
    http: reqwest::Client,
    google_api_key: Option<String>,
    google_cx: Option<String>,
    pexels_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    link: String,
}

#[derive(Debug, Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    large: String,
}

impl ImageSearch {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            google_api_key: config.google_api_key.clone(),
            google_cx: config.google_cx.clone(),
            pexels_api_key: config.pexels_api_key.clone(),
        }
    }

    /// Find one image URL for the query, or None
    pub async fn find_image(&self, query: &str) -> Option<String> {
        if let Some(url) = self.google_image(query).await {
            return Some(url);
        }
        self.pexels_image(query).await
    }

    async fn google_image(&self, query: &str) -> Option<String> {
        let (key, cx) = match (&self.google_api_key, &self.google_cx) {
            (Some(key), Some(cx)) => (key, cx),
            _ => return None,
        };

        let result = self
            .http
            .get(GOOGLE_SEARCH_URL)
            .query(&[
                ("key", key.as_str()),
                ("cx", cx.as_str()),
                ("q", query),
                ("searchType", "image"),
                ("num", "1"),
            ])
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Google image search returned {} for '{}'", r.status(), query);
                return None;
            }
            Err(e) => {
                tracing::warn!("Google image search failed for '{}': {}", query, e);
                return None;
            }
        };

        match response.json::<GoogleSearchResponse>().await {
            Ok(payload) => payload.items.into_iter().next().map(|i| i.link),
            Err(e) => {
                tracing::warn!("Google image search response unreadable: {}", e);
                None
            }
        }
    }

    async fn pexels_image(&self, query: &str) -> Option<String> {
        let key = self.pexels_api_key.as_ref()?;

        let result = self
            .http
            .get(PEXELS_SEARCH_URL)
            .header("Authorization", key)
            .query(&[("query", query), ("per_page", "1")])
            .send()
            .await;

        let response = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                tracing::warn!("Pexels search returned {} for '{}'", r.status(), query);
                return None;
            }
            Err(e) => {
                tracing::warn!("Pexels search failed for '{}': {}", query, e);
                return None;
            }
        };

        match response.json::<PexelsResponse>().await {
            Ok(payload) => payload.photos.into_iter().next().map(|p| p.src.large),
            Err(e) => {
                tracing::warn!("Pexels response unreadable: {}", e);
                None
            }
        }
    }
}
