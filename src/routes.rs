// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::calculator::{get_savings_estimate, CalculatorQuery};
use crate::handlers::cpi::get_compute_cpi;
use crate::handlers::error::ApiError;
use crate::handlers::historical::{get_historical, get_recent_historical};
use crate::handlers::rankings::get_rankings;
use crate::services::store::DataStore;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(store: Arc<DataStore>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let store_filter = warp::any().map(move || store.clone());

    let compute_cpi_route = warp::path!("api" / "v1" / "compute-cpi")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_compute_cpi);

    let historical_route = warp::path!("api" / "v1" / "historical")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_historical);

    let recent_historical_route = warp::path!("api" / "v1" / "historical" / "recent" / usize)
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_recent_historical);

    let rankings_route = warp::path!("api" / "v1" / "rankings")
        .and(warp::get())
        .and(store_filter.clone())
        .and_then(get_rankings);

    let calculator_route = warp::path!("api" / "v1" / "calculator")
        .and(warp::get())
        .and(warp::query::<CalculatorQuery>())
        .and_then(get_savings_estimate);

    info!("All routes configured successfully.");

    compute_cpi_route
        .or(historical_route)
        .or(recent_historical_route)
        .or(rankings_route)
        .or(calculator_route)
        .recover(handle_rejection)
}
