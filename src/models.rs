// src/models.rs
//! Canonical view-model served to the site.
//!
//! Every value here is an immutable snapshot rebuilt from a fetch response.
//! Wire keys are snake_case to match the upstream JSON files.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Meta = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexTrend {
    Up,
    Down,
    #[serde(other)]
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadTrend {
    Widening,
    Narrowing,
    #[serde(other)]
    Stable,
}

/// Headline index at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    #[serde(default)]
    pub ticker: String,
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub mom_change: Option<f64>,
    #[serde(default)]
    pub yoy_change: Option<f64>,
    #[serde(default = "stable_index")]
    pub trend: IndexTrend,
    #[serde(default)]
    pub basket_cost: f64,
}

fn stable_index() -> IndexTrend {
    IndexTrend::Stable
}

fn stable_spread() -> SpreadTrend {
    SpreadTrend::Stable
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubIndex {
    pub ticker: String,
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mom_change: f64,
    /// Share of the basket, 0 to 100.
    #[serde(default)]
    pub weight: f64,
    /// Set when `value` or `mom_change` is a placeholder rather than upstream data.
    #[serde(default)]
    pub is_estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spread {
    pub ticker: String,
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "stable_spread")]
    pub trend: SpreadTrend,
    #[serde(default)]
    pub is_estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaCpi {
    pub ticker: String,
    pub name: String,
    pub cpi: f64,
    #[serde(default)]
    pub mom_change: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketComponent {
    pub category: String,
    pub weight: f64,
    #[serde(default)]
    pub examples: String,
    pub avg_cost_per_1m_tokens: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub period: String,
    pub date: String,
    pub value: f64,
    #[serde(default)]
    pub mom_change: Option<f64>,
    #[serde(default)]
    pub yoy_change: Option<f64>,
}

/// One row of a ranking table. `metric_value` is the market share or the
/// quality-adjusted price score depending on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub model: String,
    pub provider: String,
    pub metric_value: f64,
    pub secondary_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityEntry {
    pub model: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketVelocity {
    pub fastest_growing: Vec<VelocityEntry>,
    pub declining: Vec<VelocityEntry>,
}

/// The canonical CPI document every page renders from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputeCpiData {
    pub meta: Meta,
    /// Headline index; absent when upstream published only the breakdowns.
    #[serde(default)]
    pub compute_cpi: Option<IndexSnapshot>,
    pub subindices: BTreeMap<String, SubIndex>,
    pub spreads: BTreeMap<String, Spread>,
    pub persona_cpis: BTreeMap<String, PersonaCpi>,
    pub basket_components: Vec<BasketComponent>,
    pub trend_analysis: Option<Value>,
    pub yield_curve: Option<Value>,
    pub exchange_rates: BTreeMap<String, Value>,
}

impl ComputeCpiData {
    /// Sub-indices in display order: known keys first, then anything extra upstream sent.
    pub fn ordered_subindices(&self) -> Vec<(&str, &SubIndex)> {
        ordered_by_keys(&self.subindices, SubIndexKey::ALL.iter().map(|k| k.as_str()))
    }

    pub fn ordered_spreads(&self) -> Vec<(&str, &Spread)> {
        ordered_by_keys(&self.spreads, SpreadKey::ALL.iter().map(|k| k.as_str()))
    }

    pub fn ordered_personas(&self) -> Vec<(&str, &PersonaCpi)> {
        ordered_by_keys(&self.persona_cpis, PersonaKey::ALL.iter().map(|k| k.as_str()))
    }
}

fn ordered_by_keys<'a, T>(
    map: &'a BTreeMap<String, T>,
    known: impl Iterator<Item = &'static str>,
) -> Vec<(&'a str, &'a T)> {
    let known: Vec<&'static str> = known.collect();
    let mut out: Vec<(&'a str, &'a T)> = known
        .iter()
        .filter_map(|key| map.get_key_value(*key).map(|(k, v)| (k.as_str(), v)))
        .collect();
    out.extend(
        map.iter()
            .filter(|(k, _)| !known.iter().any(|known_key| *known_key == k.as_str()))
            .map(|(k, v)| (k.as_str(), v)),
    );
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    pub meta: Meta,
    pub historical_series: Vec<HistoricalPoint>,
}

impl HistoricalSeries {
    /// The last `n` points, newest first.
    pub fn recent(&self, n: usize) -> Vec<HistoricalPoint> {
        self.historical_series.iter().rev().take(n).cloned().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    pub meta: Meta,
    pub by_market_share: Vec<RankingEntry>,
    pub by_quality_adjusted_price: Vec<RankingEntry>,
    pub market_velocity: MarketVelocity,
}

macro_rules! key_enum {
    ($(#[$doc:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }
    };
}

key_enum! {
    /// Sub-index keys in display order.
    SubIndexKey {
        Frontier => "frontier",
        Bulk => "bulk",
        Reason => "reason",
        LongContext => "lctx",
        Embedding => "embedding",
    }
}

key_enum! {
    SpreadKey {
        CognitionPremium => "cognition_premium",
        JudgmentPremium => "judgment_premium",
        ContextPremium => "context_premium",
    }
}

key_enum! {
    PersonaKey {
        Startup => "startup",
        Agentic => "agentic",
        Throughput => "throughput",
    }
}
