// src/services/fetch.rs
use log::{error, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::cancel::CancelSignal;
use super::upstream::{CpiDocument, HistoricalDocument, RankingsDocument};

pub const COMPUTE_CPI_PATH: &str = "/data/compute-cpi.json";
pub const HISTORICAL_PATH: &str = "/data/historical.json";
pub const RANKINGS_PATH: &str = "/data/rankings/latest.json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to fetch {url}: {status} {status_text}")]
    HttpStatus {
        url: String,
        status: u16,
        status_text: String,
    },
    #[error("invalid JSON from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result of a fetch that was allowed to run. A canceled fetch is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Completed(T),
    Canceled,
}

impl<T> FetchOutcome<T> {
    pub fn is_canceled(&self) -> bool {
        matches!(self, FetchOutcome::Canceled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            FetchOutcome::Completed(value) => Some(value),
            FetchOutcome::Canceled => None,
        }
    }
}

/// Single-attempt GET client for the three published data files.
#[derive(Debug, Clone)]
pub struct DataClient {
    client: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        DataClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the CPI document with no way to cancel it.
    pub async fn compute_cpi(&self) -> Result<CpiDocument, FetchError> {
        self.request(&self.url(COMPUTE_CPI_PATH)).await
    }

    pub async fn historical(&self) -> Result<HistoricalDocument, FetchError> {
        self.request(&self.url(HISTORICAL_PATH)).await
    }

    pub async fn rankings(&self) -> Result<RankingsDocument, FetchError> {
        self.request(&self.url(RANKINGS_PATH)).await
    }

    pub async fn fetch_compute_cpi(
        &self,
        cancel: Option<&CancelSignal>,
    ) -> Result<FetchOutcome<CpiDocument>, FetchError> {
        self.get_json(COMPUTE_CPI_PATH, cancel).await
    }

    pub async fn fetch_historical(
        &self,
        cancel: Option<&CancelSignal>,
    ) -> Result<FetchOutcome<HistoricalDocument>, FetchError> {
        self.get_json(HISTORICAL_PATH, cancel).await
    }

    pub async fn fetch_rankings(
        &self,
        cancel: Option<&CancelSignal>,
    ) -> Result<FetchOutcome<RankingsDocument>, FetchError> {
        self.get_json(RANKINGS_PATH, cancel).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<&CancelSignal>,
    ) -> Result<FetchOutcome<T>, FetchError> {
        let url = self.url(path);

        let signal = match cancel {
            Some(signal) if signal.is_canceled() => {
                info!("Skipping {}: already canceled", url);
                return Ok(FetchOutcome::Canceled);
            }
            Some(signal) => signal,
            None => return self.request(&url).await.map(FetchOutcome::Completed),
        };

        // Dropping the request future aborts the in-flight request.
        tokio::select! {
            biased;
            _ = signal.canceled() => {
                info!("Request to {} canceled", url);
                Ok(FetchOutcome::Canceled)
            }
            result = self.request(&url) => result.map(FetchOutcome::Completed),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn request<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        info!("Fetching JSON from URL: {}", url);

        let response = self.client.get(url).send().await.map_err(|source| {
            error!("Request to {} failed: {}", url, source);
            FetchError::Network {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("").to_string();
            error!("Fetching {} returned {}", url, status);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                status_text,
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| {
            error!("Body from {} is not the expected JSON: {}", url, source);
            FetchError::Parse {
                url: url.to_string(),
                source,
            }
        })
    }
}
