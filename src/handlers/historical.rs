// src/handlers/historical.rs
use log::{error, info};
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::models::HistoricalSeries;
use crate::services::store::DataStore;

async fn load_series(store: &DataStore) -> Result<HistoricalSeries, Rejection> {
    store.get_historical().await.map_err(|e| {
        error!("Failed to load historical series: {}", e);
        warp::reject::custom(ApiError::from(e))
    })
}

pub async fn get_historical(store: Arc<DataStore>) -> Result<Json, Rejection> {
    info!("Handling request to get historical series");
    let series = load_series(&store).await?;
    Ok(warp::reply::json(&series))
}

/// Last `count` points, newest first.
pub async fn get_recent_historical(count: usize, store: Arc<DataStore>) -> Result<Json, Rejection> {
    info!("Handling request for the {} most recent historical points", count);
    let series = load_series(&store).await?;
    Ok(warp::reply::json(&json!({
        "meta": series.meta,
        "historical_series": series.recent(count),
    })))
}
