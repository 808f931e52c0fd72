// src/services/calculator.rs
//! Savings estimate for routing a workload across model tiers instead of
//! sending every token to one model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Best-in-class $/1M tokens per tier, used for the optimized spend.
const FRONTIER_PRICE: f64 = 10.0;
const GENERAL_PRICE: f64 = 3.0;
const BUDGET_PRICE: f64 = 0.25;

const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Frontier,
    General,
    Budget,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPrice {
    pub id: &'static str,
    pub name: &'static str,
    pub price_per_1m: f64,
    pub tier: Tier,
}

pub const MODEL_PRICES: &[ModelPrice] = &[
    ModelPrice { id: "gpt4", name: "GPT-4", price_per_1m: 10.0, tier: Tier::Frontier },
    ModelPrice { id: "claude-opus", name: "Claude Opus", price_per_1m: 15.0, tier: Tier::Frontier },
    ModelPrice { id: "gemini-ultra", name: "Gemini Ultra", price_per_1m: 12.5, tier: Tier::Frontier },
    ModelPrice { id: "claude-sonnet", name: "Claude Sonnet 3.5", price_per_1m: 3.0, tier: Tier::General },
    ModelPrice { id: "gpt-3.5", name: "GPT-3.5 Turbo", price_per_1m: 0.5, tier: Tier::Budget },
    ModelPrice { id: "claude-haiku", name: "Claude Haiku", price_per_1m: 0.25, tier: Tier::Budget },
];

/// Token share per tier for a workload; each row sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Allocation {
    pub frontier: f64,
    pub general: f64,
    pub budget: f64,
}

pub const WORKLOADS: &[(&str, Allocation)] = &[
    ("startup", Allocation { frontier: 0.15, general: 0.35, budget: 0.50 }),
    ("agentic", Allocation { frontier: 0.40, general: 0.45, budget: 0.15 }),
    ("throughput", Allocation { frontier: 0.05, general: 0.25, budget: 0.70 }),
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculatorError {
    #[error("unknown model `{0}`")]
    UnknownModel(String),
    #[error("unknown workload `{0}`")]
    UnknownWorkload(String),
    #[error("monthly spend must be a non-negative number, got {0}")]
    InvalidSpend(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsEstimate {
    pub monthly_spend: f64,
    pub model: ModelPrice,
    pub allocation: Allocation,
    pub optimized_spend: f64,
    pub monthly_savings: f64,
    pub annual_savings: f64,
    pub savings_percent: f64,
}

pub fn find_model(id: &str) -> Option<&'static ModelPrice> {
    MODEL_PRICES.iter().find(|model| model.id == id)
}

pub fn find_workload(name: &str) -> Option<Allocation> {
    WORKLOADS
        .iter()
        .find(|(workload, _)| *workload == name)
        .map(|(_, allocation)| *allocation)
}

pub fn estimate_savings(
    monthly_spend: f64,
    workload: &str,
    model_id: &str,
) -> Result<SavingsEstimate, CalculatorError> {
    if !monthly_spend.is_finite() || monthly_spend < 0.0 {
        return Err(CalculatorError::InvalidSpend(monthly_spend));
    }
    let model = *find_model(model_id).ok_or_else(|| CalculatorError::UnknownModel(model_id.to_string()))?;
    let allocation =
        find_workload(workload).ok_or_else(|| CalculatorError::UnknownWorkload(workload.to_string()))?;

    // Token volume if the whole spend goes to the current model.
    let tokens_per_month = monthly_spend / model.price_per_1m * TOKENS_PER_PRICE_UNIT;

    let frontier_cost = tokens_per_month * allocation.frontier / TOKENS_PER_PRICE_UNIT * FRONTIER_PRICE;
    let general_cost = tokens_per_month * allocation.general / TOKENS_PER_PRICE_UNIT * GENERAL_PRICE;
    let budget_cost = tokens_per_month * allocation.budget / TOKENS_PER_PRICE_UNIT * BUDGET_PRICE;
    let optimized_spend = frontier_cost + general_cost + budget_cost;

    let monthly_savings = monthly_spend - optimized_spend;
    let savings_percent = if monthly_spend > 0.0 {
        monthly_savings / monthly_spend * 100.0
    } else {
        0.0
    };

    Ok(SavingsEstimate {
        monthly_spend,
        model,
        allocation,
        optimized_spend,
        monthly_savings,
        annual_savings: monthly_savings * 12.0,
        savings_percent,
    })
}
