// src/bin/adapt_file.rs
// Usage: adapt_file <compute-cpi.json>
use anyhow::{Context, Result};
use compute_cpi_data::services::adapter::adapt_compute_cpi;
use compute_cpi_data::services::upstream::CpiDocument;
use log::info;
use std::{env, fs};

fn main() -> Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .context("usage: adapt_file <compute-cpi.json>")?;

    let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
    let document: CpiDocument =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path))?;
    info!("Read {} document from {}", document.shape_name(), path);

    let data = adapt_compute_cpi(document)?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
