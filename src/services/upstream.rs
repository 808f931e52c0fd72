// src/services/upstream.rs
//! Raw shapes of the three upstream JSON documents.
//!
//! Nothing here is validated beyond what serde needs to build the structs;
//! optional upstream fields default and the adapter decides what to do with gaps.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{BasketComponent, HistoricalPoint, IndexSnapshot, Meta, PersonaCpi, Spread, SubIndex};

/// The CPI document arrives either as methodology-variant buckets (Shape A)
/// or already in canonical form (Shape B).
#[derive(Debug, Clone, PartialEq)]
pub enum CpiDocument {
    Variants(VariantDocument),
    Canonical(CanonicalDocument),
}

impl CpiDocument {
    /// Discriminates on `methodology_variants` first, then `subindices`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let shape = match value.as_object() {
            Some(obj) if obj.contains_key("methodology_variants") => Shape::Variants,
            Some(obj) if obj.contains_key("subindices") => Shape::Canonical,
            Some(_) => {
                return Err(de::Error::custom(
                    "CPI document has neither `methodology_variants` nor `subindices`",
                ))
            }
            None => return Err(de::Error::custom("CPI document must be a JSON object")),
        };

        match shape {
            Shape::Variants => serde_json::from_value(value).map(CpiDocument::Variants),
            Shape::Canonical => serde_json::from_value(value).map(CpiDocument::Canonical),
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            CpiDocument::Variants(_) => "methodology_variants",
            CpiDocument::Canonical(_) => "canonical",
        }
    }
}

enum Shape {
    Variants,
    Canonical,
}

impl<'de> Deserialize<'de> for CpiDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        CpiDocument::from_value(value).map_err(de::Error::custom)
    }
}

/// One methodology-variant pricing bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantBucket {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub basket_cost: Option<f64>,
}

/// Buckets are optional at the serde level so the adapter can name the one
/// that is missing instead of failing with a generic parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodologyVariants {
    pub general: Option<VariantBucket>,
    pub frontier_heavy: Option<VariantBucket>,
    pub budget_heavy: Option<VariantBucket>,
    pub reasoning_focus: Option<VariantBucket>,
    pub enterprise: Option<VariantBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantDocument {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub compute_cpi: Option<IndexSnapshot>,
    #[serde(default)]
    pub index_series: Option<Value>,
    pub methodology_variants: MethodologyVariants,
    #[serde(default)]
    pub spreads: Option<BTreeMap<String, Spread>>,
    #[serde(default)]
    pub trend_analysis: Option<Value>,
    #[serde(default)]
    pub yield_curve: Option<Value>,
    #[serde(default)]
    pub market_data: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub basket_components: Option<Vec<BasketComponent>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalDocument {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub compute_cpi: Option<IndexSnapshot>,
    pub subindices: BTreeMap<String, SubIndex>,
    #[serde(default)]
    pub spreads: BTreeMap<String, Spread>,
    #[serde(default)]
    pub persona_cpis: BTreeMap<String, PersonaCpi>,
    #[serde(default)]
    pub basket_components: Vec<BasketComponent>,
    #[serde(default)]
    pub trend_analysis: Option<Value>,
    #[serde(default)]
    pub yield_curve: Option<Value>,
    #[serde(default)]
    pub exchange_rates: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub market_data: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDocument {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub historical_series: Vec<HistoricalPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingsDocument {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub rankings: RawRankings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRankings {
    #[serde(default)]
    pub by_market_share: Vec<MarketShareRow>,
    #[serde(default)]
    pub by_quality_adjusted_price: Vec<QualityAdjustedRow>,
    #[serde(default)]
    pub market_velocity: RawMarketVelocity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketShareRow {
    pub rank: u32,
    pub model: String,
    #[serde(default)]
    pub provider: String,
    pub market_share: f64,
    #[serde(default)]
    pub mom_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAdjustedRow {
    pub rank: u32,
    pub model: String,
    #[serde(default)]
    pub provider: String,
    pub qap_score: f64,
    #[serde(default)]
    pub cost_per_1m: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMarketVelocity {
    #[serde(default)]
    pub fastest_growing: Vec<GrowthRow>,
    #[serde(default)]
    pub declining: Vec<DeclineRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRow {
    pub model: String,
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineRow {
    pub model: String,
    pub decline_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> Value {
        json!({ "ticker": "$CPI", "name": "Compute CPI", "value": 100.0, "trend": "stable", "basket_cost": 0.01 })
    }

    #[test]
    fn picks_variant_shape_when_methodology_variants_present() {
        let doc: CpiDocument = serde_json::from_value(json!({
            "compute_cpi": snapshot(),
            "methodology_variants": {
                "general": { "ticker": "$GEN", "name": "General", "value": 3.0 }
            },
            "subindices": {}
        }))
        .unwrap();
        match doc {
            CpiDocument::Variants(v) => {
                assert_eq!(v.methodology_variants.general.unwrap().value, 3.0);
                assert!(v.methodology_variants.reasoning_focus.is_none());
            }
            other => panic!("expected variant shape, got {}", other.shape_name()),
        }
    }

    #[test]
    fn picks_canonical_shape_when_only_subindices_present() {
        let doc: CpiDocument = serde_json::from_value(json!({
            "compute_cpi": snapshot(),
            "subindices": {}
        }))
        .unwrap();
        assert_eq!(doc.shape_name(), "canonical");
    }

    #[test]
    fn headline_index_is_optional_in_both_shapes() {
        let doc: CpiDocument = serde_json::from_value(json!({
            "methodology_variants": {
                "general": { "value": 3.0 }
            }
        }))
        .unwrap();
        match doc {
            CpiDocument::Variants(v) => {
                assert_eq!(v.compute_cpi, None);
                assert_eq!(v.methodology_variants.general.unwrap().basket_cost, None);
            }
            other => panic!("expected variant shape, got {}", other.shape_name()),
        }

        let doc: CpiDocument = serde_json::from_value(json!({ "subindices": {} })).unwrap();
        match doc {
            CpiDocument::Canonical(c) => assert_eq!(c.compute_cpi, None),
            other => panic!("expected canonical shape, got {}", other.shape_name()),
        }
    }

    #[test]
    fn rejects_documents_with_neither_shape() {
        let err = serde_json::from_value::<CpiDocument>(json!({ "compute_cpi": snapshot() })).unwrap_err();
        assert!(err.to_string().contains("methodology_variants"));

        assert!(serde_json::from_value::<CpiDocument>(json!([1, 2, 3])).is_err());
    }
}
