// src/services/store.rs
use log::{error, info};
use std::time::Duration;
use thiserror::Error;

use super::adapter::{adapt_compute_cpi, AdapterError};
use super::cache::SnapshotCache;
use super::fetch::{DataClient, FetchError};
use super::rankings::{normalize_historical, normalize_rankings};
use crate::config::AppConfig;
use crate::models::{ComputeCpiData, HistoricalSeries, Rankings};

const COMPUTE_CPI_KEY: &str = "compute-cpi";
const HISTORICAL_KEY: &str = "historical";
const RANKINGS_KEY: &str = "rankings";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
}

/// Fetch client plus one snapshot cache per resource. Shared by handlers behind an `Arc`.
///
/// Refreshes are never canceled: one refresh serves every request that missed
/// at the same time, so no single caller may abort it. Callers that want to
/// cancel their own fetch use `DataClient::fetch_*` directly.
pub struct DataStore {
    client: DataClient,
    ttl: Duration,
    compute_cpi: SnapshotCache<ComputeCpiData>,
    historical: SnapshotCache<HistoricalSeries>,
    rankings: SnapshotCache<Rankings>,
}

impl DataStore {
    pub fn new(client: DataClient, ttl: Duration) -> Self {
        DataStore {
            client,
            ttl,
            compute_cpi: SnapshotCache::new(),
            historical: SnapshotCache::new(),
            rankings: SnapshotCache::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(DataClient::new(config.data_base_url.clone()), config.cache_ttl)
    }

    pub fn client(&self) -> &DataClient {
        &self.client
    }

    pub async fn get_compute_cpi(&self) -> Result<ComputeCpiData, ServiceError> {
        self.compute_cpi
            .get_or_try_fill(COMPUTE_CPI_KEY, self.ttl, move || async move {
                info!("CPI cache expired, fetching new snapshot");
                let document = self.client.compute_cpi().await?;
                let data = adapt_compute_cpi(document).map_err(|e| {
                    error!("Failed to adapt CPI document: {}", e);
                    e
                })?;
                Ok::<_, ServiceError>(data)
            })
            .await
    }

    pub async fn get_historical(&self) -> Result<HistoricalSeries, ServiceError> {
        self.historical
            .get_or_try_fill(HISTORICAL_KEY, self.ttl, move || async move {
                info!("Historical cache expired, fetching new series");
                let document = self.client.historical().await?;
                Ok::<_, ServiceError>(normalize_historical(document))
            })
            .await
    }

    pub async fn get_rankings(&self) -> Result<Rankings, ServiceError> {
        self.rankings
            .get_or_try_fill(RANKINGS_KEY, self.ttl, move || async move {
                info!("Rankings cache expired, fetching latest rankings");
                let document = self.client.rankings().await?;
                Ok::<_, ServiceError>(normalize_rankings(document))
            })
            .await
    }
}
