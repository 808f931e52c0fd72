// src/handlers/calculator.rs
use log::{info, warn};
use serde::Deserialize;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::calculator::estimate_savings;

fn default_monthly_spend() -> f64 {
    10_000.0
}

fn default_workload() -> String {
    "startup".to_string()
}

fn default_model() -> String {
    "gpt4".to_string()
}

/// Query string of `/api/v1/calculator`; defaults match the calculator page.
#[derive(Debug, Deserialize)]
pub struct CalculatorQuery {
    #[serde(default = "default_monthly_spend")]
    pub monthly_spend: f64,
    #[serde(default = "default_workload")]
    pub workload: String,
    #[serde(default = "default_model")]
    pub model: String,
}

pub async fn get_savings_estimate(query: CalculatorQuery) -> Result<Json, Rejection> {
    info!("Handling savings estimate request: {:?}", query);

    let estimate = estimate_savings(query.monthly_spend, &query.workload, &query.model).map_err(|e| {
        warn!("Rejected savings estimate request: {}", e);
        warp::reject::custom(ApiError::from(e))
    })?;

    Ok(warp::reply::json(&estimate))
}
