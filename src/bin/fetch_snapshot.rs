// src/bin/fetch_snapshot.rs
use compute_cpi_data::config::AppConfig;
use compute_cpi_data::services::adapter::adapt_compute_cpi;
use compute_cpi_data::services::cancel::cancel_pair;
use compute_cpi_data::services::fetch::{DataClient, FetchOutcome};
use compute_cpi_data::services::rankings::{normalize_historical, normalize_rankings};
use compute_cpi_data::BoxError;
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    env_logger::init();
    let config = AppConfig::from_env()?;
    let client = DataClient::new(config.data_base_url);

    // Ctrl-C aborts whatever is still in flight.
    let (handle, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    info!("Fetching all three data files from {}", client.base_url());
    let (cpi, historical, rankings) = tokio::join!(
        client.fetch_compute_cpi(Some(&signal)),
        client.fetch_historical(Some(&signal)),
        client.fetch_rankings(Some(&signal)),
    );

    let (cpi, historical, rankings) = match (cpi?, historical?, rankings?) {
        (FetchOutcome::Completed(c), FetchOutcome::Completed(h), FetchOutcome::Completed(r)) => (c, h, r),
        _ => {
            warn!("Fetch canceled before all documents arrived");
            return Ok(());
        }
    };

    let data = adapt_compute_cpi(cpi)?;
    match &data.compute_cpi {
        Some(headline) => println!("{} ({}): {:.2}", headline.name, headline.ticker, headline.value),
        None => println!("No headline index published"),
    }
    for (key, sub) in data.ordered_subindices() {
        let flag = if sub.is_estimated { " (estimated)" } else { "" };
        println!("  {:<10} {:>8.2}  weight {:>5.1}{}", key, sub.value, sub.weight, flag);
    }
    for (key, spread) in data.ordered_spreads() {
        println!("  {:<18} {:>+8.2} {}", key, spread.value, spread.unit);
    }
    for (key, persona) in data.ordered_personas() {
        println!("  {:<10} {:>8.2}  {}", key, persona.cpi, persona.name);
    }

    let series = normalize_historical(historical);
    println!("Historical points: {}", series.historical_series.len());
    for point in series.recent(3) {
        println!("  {} {:.2}", point.period, point.value);
    }

    let rankings = normalize_rankings(rankings);
    if let Some(top) = rankings.by_market_share.first() {
        println!("Market share leader: {} ({}) {:.1}%", top.model, top.provider, top.metric_value);
    }
    if let Some(top) = rankings.by_quality_adjusted_price.first() {
        println!("Best quality-adjusted price: {} score {:.1}", top.model, top.metric_value);
    }

    Ok(())
}
