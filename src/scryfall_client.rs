use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::cards::scryfallcard::ScryfallCard;
use crate::utilities::constants::{
    REQUEST_DELAY_MS, SCRYFALL_API_URL, SCRYFALL_SEARCH_PATH, USER_AGENT as AGENT,
};

/// `Network` and `HttpStatus` are both transport failures from the caller's
/// point of view. Neither is retried.
#[derive(Debug, Error)]
pub enum ScryfallError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} returned status {status}")]
    HttpStatus { url: String, status: StatusCode },
    #[error("response from {url} was not valid json: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CardSource: Send + Sync {
    /// Every printing matching `query`, across all result pages, in the
    /// order the service returned them.
    async fn search(&self, query: &str) -> Result<Vec<ScryfallCard>, ScryfallError>;
}

pub struct ScryfallClient {
    client: reqwest::Client,
    base_url: String,
    request_delay: Duration,
}

impl ScryfallClient {
    pub fn new(base_url: Option<&str>, client: reqwest::Client, request_delay_ms: Option<u64>) -> Self {
        ScryfallClient {
            client,
            base_url: base_url
                .unwrap_or(SCRYFALL_API_URL)
                .trim_end_matches('/')
                .to_string(),
            request_delay: Duration::from_millis(request_delay_ms.unwrap_or(REQUEST_DELAY_MS)),
        }
    }

    fn setup_http_headers() -> HeaderMap {
        let mut header_map = HeaderMap::new();
        header_map.insert(ACCEPT, HeaderValue::from_static("application/json;q=0.9,*/*;q=0.8"));
        header_map.insert(USER_AGENT, HeaderValue::from_static(AGENT));
        header_map
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/{}?unique=prints&q={}",
            self.base_url,
            SCRYFALL_SEARCH_PATH,
            urlencoding::encode(query)
        )
    }

    /// Fetches one result page. `Ok(None)` means the service found nothing,
    /// which it reports as a 404 on the first page.
    async fn fetch_page(&self, url: &str, first_page: bool) -> Result<Option<Value>, ScryfallError> {
        debug!("Fetching search page {}", url);
        let response = self
            .client
            .get(url)
            .headers(Self::setup_http_headers())
            .send()
            .await
            .map_err(|source| ScryfallError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if first_page && status == StatusCode::NOT_FOUND {
            info!("No cards matched {}", url);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ScryfallError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| ScryfallError::Network {
            url: url.to_string(),
            source,
        })?;
        let json = serde_json::from_str(&body).map_err(|source| ScryfallError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(Some(json))
    }

    fn parse_cards(data: &[Value]) -> Vec<ScryfallCard> {
        data.iter()
            .filter_map(|obj| match ScryfallCard::from_value(obj.clone()) {
                Ok(card) => Some(card),
                Err(e) => {
                    debug!("Skipping card record: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl CardSource for ScryfallClient {
    async fn search(&self, query: &str) -> Result<Vec<ScryfallCard>, ScryfallError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut cards = Vec::new();
        let mut next_url = Some(self.search_url(query));
        let mut visited = HashSet::new();
        let mut page_number = 0;

        while let Some(url) = next_url.take() {
            if !visited.insert(url.clone()) {
                warn!("Search page {} was already fetched, stopping", url);
                break;
            }
            if page_number > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            page_number += 1;

            let page = match self.fetch_page(&url, page_number == 1).await? {
                Some(page) => page,
                None => break,
            };

            match page.get("data").and_then(Value::as_array) {
                Some(data) => cards.extend(Self::parse_cards(data)),
                None => {
                    warn!(
                        "Page {} of search '{}' had no card list, returning {} cards found so far",
                        page_number,
                        query,
                        cards.len()
                    );
                    break;
                }
            }

            next_url = page
                .get("next_page")
                .and_then(Value::as_str)
                .map(str::to_string);

            if next_url.is_none() && page.get("has_more").and_then(Value::as_bool) == Some(true) {
                warn!("Search page {} has more results but no next_page link", url);
            }
        }

        info!(
            "Search '{}' returned {} cards over {} pages",
            query,
            cards.len(),
            page_number
        );
        Ok(cards)
    }
}
