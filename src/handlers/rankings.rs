// src/handlers/rankings.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::store::DataStore;

pub async fn get_rankings(store: Arc<DataStore>) -> Result<Json, Rejection> {
    info!("Handling request to get model rankings");

    let rankings = store.get_rankings().await.map_err(|e| {
        error!("Failed to load rankings: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    Ok(warp::reply::json(&rankings))
}
