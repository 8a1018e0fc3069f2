//! HTTP Benchmark Client
//!
//! reqwest client for the benchmark REST API. Returns domain values or a
//! classified `BenchError`; never retries on its own.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::wire::{ComparisonResponse, InsightsResponse};
use super::{ComparisonQuery, ComparisonSource, InsightQuery, InsightSource};
use crate::config::ApiConfig;
use crate::constants::network;
use crate::types::{AnalysisRecord, BenchError, ErrorClassifier, FetchResult, Result};

/// Client for the comparison, insights, and status endpoints
pub struct HttpClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = Self::validate_base_url(&config.base_url)?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(network::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| BenchError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    /// Validate the API base URL.
    ///
    /// Only http/https are allowed. A trailing slash is added so relative
    /// endpoint paths join under the base instead of replacing its last segment.
    fn validate_base_url(raw: &str) -> Result<Url> {
        let mut url = Url::parse(raw.trim()).map_err(|e| {
            BenchError::Config(format!("Invalid API base URL '{}': {}", raw, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(BenchError::Config(format!(
                "API base URL must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BenchError::Config(format!("Invalid endpoint '{}': {}", path, e)))
    }

    /// GET an endpoint and decode its JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let start = Instant::now();

        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(url.clone())
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_request(&e, url.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(status.as_u16(), &body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ErrorClassifier::classify_request(&e, url.as_str()))?;

        debug!(
            "Received {} bytes from {} in {}ms",
            body.len(),
            url,
            start.elapsed().as_millis()
        );

        serde_json::from_slice(&body).map_err(|e| BenchError::MalformedResponse(e.to_string()))
    }

    /// Check the backend status endpoint
    pub async fn health_check(&self) -> Result<bool> {
        let url = self.endpoint(network::STATUS_PATH)?;

        match self.client.get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Benchmark API is available at {}", self.base_url);
                Ok(true)
            }
            Ok(resp) => {
                warn!("Benchmark API status check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Benchmark API not reachable at {}: {}", url, e);
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl ComparisonSource for HttpClient {
    async fn fetch_comparison(&self, query: &ComparisonQuery) -> Result<FetchResult> {
        let response: ComparisonResponse =
            self.get_json(network::COMPARE_PATH, &query.params()).await?;

        Ok(response.into_fetch_result(Utc::now()))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[async_trait]
impl InsightSource for HttpClient {
    async fn fetch_insights(&self, query: &InsightQuery) -> Result<Vec<AnalysisRecord>> {
        let response: InsightsResponse =
            self.get_json(network::INSIGHTS_PATH, &query.params()).await?;

        Ok(response.into_records())
    }
}
