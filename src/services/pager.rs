// src/services/pager.rs

//! Paginated scraping of the search endpoint.
//!
//! The pager drives repeated fetches of the search endpoint, one page at a
//! time with a polite inter-request delay, until a page yields zero records.
//! Page fetching sits behind the [`PageFetcher`] trait so the pagination
//! logic can be exercised against canned pages in tests.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AnimalRecord, ScraperConfig, SearchQuery};
use crate::services::extract::extract_records;

/// Fetches one result page as raw HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// HTTP page fetcher with bounded retry and doubling backoff.
///
/// A non-success status or transport error is retried up to
/// `retry_attempts` times; exhausting the retries surfaces the error to the
/// pager, which aborts the whole scan.
pub struct HttpFetcher {
    client: Client,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn try_fetch(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.as_str()).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let mut delay = self.retry_delay;
        let mut attempt = 0;
        loop {
            match self.try_fetch(url).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.retry_attempts => {
                    attempt += 1;
                    log::warn!(
                        "Fetch failed for {} (attempt {}/{}): {}. Retrying in {:?}.",
                        url,
                        attempt,
                        self.retry_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Drives pagination over search results for one query.
pub struct Pager<F> {
    fetcher: F,
    page_delay: Duration,
    max_pages: u32,
}

impl Pager<HttpFetcher> {
    /// Pager backed by a live HTTP fetcher.
    pub fn from_config(config: &ScraperConfig) -> Result<Self> {
        Ok(Self::new(HttpFetcher::new(config)?, config))
    }
}

impl<F: PageFetcher> Pager<F> {
    pub fn new(fetcher: F, config: &ScraperConfig) -> Self {
        Self {
            fetcher,
            page_delay: Duration::from_millis(config.page_delay_ms),
            max_pages: config.max_pages,
        }
    }

    /// Fetch and extract all result pages for the query.
    ///
    /// Stops at the first page that yields zero records. Records are
    /// aggregated in page order with cross-page id dedup. Any page fetch
    /// failure aborts the scan: a partial page set must never be mistaken
    /// downstream for the full result set.
    pub async fn fetch_all(&self, query: &SearchQuery) -> Result<Vec<AnimalRecord>> {
        let mut all = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut page: u32 = 1;

        loop {
            if page > self.max_pages {
                return Err(AppError::scrape(
                    query.describe(),
                    format!("exceeded page limit of {}", self.max_pages),
                ));
            }

            let url = query.page_url(page)?;
            let html = self.fetcher.fetch(&url).await?;
            let records = extract_records(&html, query)?;

            if records.is_empty() {
                break;
            }

            log::debug!("Page {}: {} records", page, records.len());
            for record in records {
                if seen_ids.insert(record.id) {
                    all.push(record);
                }
            }

            page += 1;
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        log::info!("Scan found {} records for {}", all.len(), query.describe());
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::models::AnimalType;

    fn page_with(ids: &[u64]) -> String {
        let cards: String = ids
            .iter()
            .map(|id| {
                format!(
                    r#"<article data-v-2f76df55><a href="/asieldier/katten/{id}-dier-{id}"></a></article>"#
                )
            })
            .collect();
        format!("<html><body>{}</body></html>", cards)
    }

    /// Returns queued responses in order; an exhausted queue yields empty pages.
    struct StubFetcher {
        responses: Mutex<VecDeque<Result<String>>>,
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(responses: Vec<Result<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch(&self, url: &Url) -> Result<String> {
            self.calls.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn test_config() -> ScraperConfig {
        ScraperConfig {
            page_delay_ms: 0,
            retry_delay_ms: 0,
            ..ScraperConfig::default()
        }
    }

    fn query() -> SearchQuery {
        SearchQuery::for_site(AnimalType::Katten, "deKuipershoek")
    }

    #[tokio::test]
    async fn test_stops_one_page_after_first_empty_page() {
        let fetcher = StubFetcher::new(vec![
            Ok(page_with(&[1, 2, 3])),
            Ok(page_with(&[4, 5])),
            Ok(page_with(&[6])),
            Ok(page_with(&[])),
        ]);
        let pager = Pager::new(fetcher, &test_config());

        let records = pager.fetch_all(&query()).await.unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

        // Page 4 (the empty one) was requested, page 5 was not.
        assert_eq!(pager.fetcher.calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_page_param_progression() {
        let fetcher = StubFetcher::new(vec![Ok(page_with(&[1])), Ok(page_with(&[2]))]);
        let pager = Pager::new(fetcher, &test_config());

        pager.fetch_all(&query()).await.unwrap();
        let calls = pager.fetcher.calls.lock().unwrap();
        assert!(!calls[0].contains("page="));
        assert!(calls[1].contains("page=2"));
        assert!(calls[2].contains("page=3"));
    }

    #[tokio::test]
    async fn test_cross_page_dedup() {
        let fetcher = StubFetcher::new(vec![Ok(page_with(&[1, 2])), Ok(page_with(&[2, 3]))]);
        let pager = Pager::new(fetcher, &test_config());

        let records = pager.fetch_all(&query()).await.unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_scan() {
        // Earlier pages succeeded, but the scan must not surface partial
        // results when a later page fails.
        let fetcher = StubFetcher::new(vec![
            Ok(page_with(&[1, 2])),
            Err(AppError::scrape("page 2", "connection reset")),
        ]);
        let pager = Pager::new(fetcher, &test_config());

        assert!(pager.fetch_all(&query()).await.is_err());
    }

    #[tokio::test]
    async fn test_page_limit_is_an_error() {
        let responses: Vec<Result<String>> =
            (1u64..=5).map(|id| Ok(page_with(&[id]))).collect();
        let fetcher = StubFetcher::new(responses);
        let config = ScraperConfig {
            max_pages: 3,
            ..test_config()
        };
        let pager = Pager::new(fetcher, &config);

        let err = pager.fetch_all(&query()).await.unwrap_err();
        assert!(matches!(err, AppError::Scrape { .. }));
    }
}
