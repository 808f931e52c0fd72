// src/handlers/cpi.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::store::DataStore;

pub async fn get_compute_cpi(store: Arc<DataStore>) -> Result<Json, Rejection> {
    info!("Handling request to get Compute CPI data");

    let data = store.get_compute_cpi().await.map_err(|e| {
        error!("Failed to load Compute CPI data: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    match &data.compute_cpi {
        Some(headline) => info!("Serving Compute CPI {} = {}", headline.ticker, headline.value),
        None => info!("Serving Compute CPI data without a headline index"),
    }
    Ok(warp::reply::json(&data))
}
