use compute_cpi_data::config::AppConfig;
use compute_cpi_data::routes;
use compute_cpi_data::services::store::DataStore;
use log::{error, info};
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use warp::Filter;

#[tokio::main]
async fn main() {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            process::exit(2);
        }
    };

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let store = Arc::new(DataStore::from_config(&config));
    info!("Reading upstream data from {}", store.client().base_url());

    // The site is served from a different origin
    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(store).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
}
