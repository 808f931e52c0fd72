// src/services/adapter.rs
//! Normalizes either upstream CPI shape into [`ComputeCpiData`].
//!
//! The methodology-variant shape has no per-variant month-over-month deltas,
//! no long-context or embedding buckets and no context-premium source, so
//! those fields are filled with placeholders and marked `is_estimated`.

use log::{debug, warn};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{
    BasketComponent, ComputeCpiData, PersonaCpi, PersonaKey, Spread, SpreadKey, SpreadTrend, SubIndex,
    SubIndexKey,
};
use crate::services::upstream::{CanonicalDocument, CpiDocument, MethodologyVariants, VariantBucket, VariantDocument};

/// Basket weights for the synthesized sub-indices. Upstream does not publish
/// them, so a weighting change upstream will not show up here.
pub const FRONTIER_WEIGHT: f64 = 25.0;
pub const BULK_WEIGHT: f64 = 35.0;
pub const REASON_WEIGHT: f64 = 20.0;
pub const LONG_CONTEXT_WEIGHT: f64 = 10.0;
pub const EMBEDDING_WEIGHT: f64 = 10.0;

const MULTIMODAL_WEIGHT: f64 = 10.0;
const EMBEDDING_COST_PER_1M: f64 = 0.15;
const MULTIMODAL_COST_PER_1M: f64 = 8.7;
const SPREAD_UNIT: &str = "pts";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("methodology variant bucket `{bucket}` is missing from the CPI document")]
    MissingField { bucket: &'static str },
}

/// Builds the canonical view-model. All or nothing: a missing primary bucket
/// fails the whole transform.
pub fn adapt_compute_cpi(document: CpiDocument) -> Result<ComputeCpiData, AdapterError> {
    debug!("Adapting CPI document of shape {}", document.shape_name());
    match document {
        CpiDocument::Variants(doc) => adapt_variants(doc),
        CpiDocument::Canonical(doc) => Ok(adapt_canonical(doc)),
    }
}

/// The four buckets every derived field depends on.
struct PrimaryBuckets<'a> {
    general: &'a VariantBucket,
    frontier_heavy: &'a VariantBucket,
    budget_heavy: &'a VariantBucket,
    reasoning_focus: &'a VariantBucket,
}

impl<'a> PrimaryBuckets<'a> {
    fn from_variants(variants: &'a MethodologyVariants) -> Result<Self, AdapterError> {
        fn require<'b>(
            bucket: &'b Option<VariantBucket>,
            name: &'static str,
        ) -> Result<&'b VariantBucket, AdapterError> {
            bucket.as_ref().ok_or(AdapterError::MissingField { bucket: name })
        }

        Ok(PrimaryBuckets {
            general: require(&variants.general, "general")?,
            frontier_heavy: require(&variants.frontier_heavy, "frontier_heavy")?,
            budget_heavy: require(&variants.budget_heavy, "budget_heavy")?,
            reasoning_focus: require(&variants.reasoning_focus, "reasoning_focus")?,
        })
    }
}

fn adapt_variants(doc: VariantDocument) -> Result<ComputeCpiData, AdapterError> {
    let buckets = PrimaryBuckets::from_variants(&doc.methodology_variants)?;

    let subindices = synthesize_subindices(&buckets);
    let persona_cpis = synthesize_personas(&buckets);

    let spreads = match doc.spreads {
        Some(spreads) => spreads,
        None => derive_spreads(&buckets),
    };

    let basket_components = match doc.basket_components {
        Some(components) => components,
        None => synthesize_basket(&buckets),
    };

    let exchange_rates = doc.market_data.unwrap_or_else(|| {
        warn!("CPI document has no market_data, serving empty exchange rates");
        BTreeMap::new()
    });

    Ok(ComputeCpiData {
        meta: doc.meta,
        compute_cpi: doc.compute_cpi,
        subindices,
        spreads,
        persona_cpis,
        basket_components,
        trend_analysis: doc.trend_analysis,
        yield_curve: doc.yield_curve,
        exchange_rates,
    })
}

fn adapt_canonical(doc: CanonicalDocument) -> ComputeCpiData {
    let exchange_rates = doc.exchange_rates.or(doc.market_data).unwrap_or_default();

    ComputeCpiData {
        meta: doc.meta,
        compute_cpi: doc.compute_cpi,
        subindices: doc.subindices,
        spreads: doc.spreads,
        persona_cpis: doc.persona_cpis,
        basket_components: doc.basket_components,
        trend_analysis: doc.trend_analysis,
        yield_curve: doc.yield_curve,
        exchange_rates,
    }
}

fn copied_subindex(bucket: &VariantBucket, weight: f64) -> SubIndex {
    SubIndex {
        ticker: bucket.ticker.clone(),
        name: bucket.name.clone(),
        value: bucket.value,
        description: bucket.description.clone(),
        mom_change: 0.0,
        weight,
        // mom_change is a placeholder
        is_estimated: true,
    }
}

fn synthesize_subindices(buckets: &PrimaryBuckets<'_>) -> BTreeMap<String, SubIndex> {
    let placeholder_value = buckets.general.value;

    SubIndexKey::ALL
        .iter()
        .map(|key| {
            let sub = match key {
                SubIndexKey::Frontier => copied_subindex(buckets.frontier_heavy, FRONTIER_WEIGHT),
                SubIndexKey::Bulk => copied_subindex(buckets.general, BULK_WEIGHT),
                SubIndexKey::Reason => copied_subindex(buckets.budget_heavy, REASON_WEIGHT),
                SubIndexKey::LongContext => SubIndex {
                    ticker: "$LCTX".to_string(),
                    name: "Long Context CPI".to_string(),
                    value: placeholder_value,
                    description: "Cost per 1M tokens for extended context windows".to_string(),
                    mom_change: 0.0,
                    weight: LONG_CONTEXT_WEIGHT,
                    is_estimated: true,
                },
                SubIndexKey::Embedding => SubIndex {
                    ticker: "$EMBED".to_string(),
                    name: "Embedding CPI".to_string(),
                    value: placeholder_value,
                    description: "Cost of embedding models".to_string(),
                    mom_change: 0.0,
                    weight: EMBEDDING_WEIGHT,
                    is_estimated: true,
                },
            };
            (key.as_str().to_string(), sub)
        })
        .collect()
}

fn derive_spreads(buckets: &PrimaryBuckets<'_>) -> BTreeMap<String, Spread> {
    SpreadKey::ALL
        .iter()
        .map(|key| {
            let spread = match key {
                SpreadKey::CognitionPremium => Spread {
                    ticker: "$COGPREM".to_string(),
                    name: "Cognition Premium".to_string(),
                    value: buckets.frontier_heavy.value - buckets.budget_heavy.value,
                    unit: SPREAD_UNIT.to_string(),
                    description: "Cost delta between frontier reasoning models and budget alternatives"
                        .to_string(),
                    trend: SpreadTrend::Stable,
                    is_estimated: false,
                },
                SpreadKey::JudgmentPremium => Spread {
                    ticker: "$JUDGPREM".to_string(),
                    name: "Judgment Premium".to_string(),
                    value: buckets.reasoning_focus.value - buckets.general.value,
                    unit: SPREAD_UNIT.to_string(),
                    description: "Additional cost for models with reliable judgment vs raw capability"
                        .to_string(),
                    trend: SpreadTrend::Stable,
                    is_estimated: false,
                },
                // no upstream source yet
                SpreadKey::ContextPremium => Spread {
                    ticker: "$CTXPREM".to_string(),
                    name: "Context Premium".to_string(),
                    value: 0.0,
                    unit: SPREAD_UNIT.to_string(),
                    description: "Extended context vs standard".to_string(),
                    trend: SpreadTrend::Narrowing,
                    is_estimated: true,
                },
            };
            (key.as_str().to_string(), spread)
        })
        .collect()
}

fn synthesize_personas(buckets: &PrimaryBuckets<'_>) -> BTreeMap<String, PersonaCpi> {
    PersonaKey::ALL
        .iter()
        .map(|key| {
            let (ticker, name, cpi, description) = match key {
                PersonaKey::Startup => (
                    "$START",
                    "Startup Persona CPI",
                    buckets.general.value,
                    "Optimized for prototyping and rapid iteration",
                ),
                PersonaKey::Agentic => (
                    "$AGENT",
                    "Agentic Persona CPI",
                    buckets.frontier_heavy.value,
                    "Autonomous systems requiring reliable judgment",
                ),
                PersonaKey::Throughput => (
                    "$THRU",
                    "Throughput Persona CPI",
                    buckets.budget_heavy.value,
                    "High-volume processing at scale",
                ),
            };
            let persona = PersonaCpi {
                ticker: ticker.to_string(),
                name: name.to_string(),
                cpi,
                mom_change: 0.0,
                description: description.to_string(),
                is_estimated: true,
            };
            (key.as_str().to_string(), persona)
        })
        .collect()
}

/// Per-1M-token cost of a bucket. A bucket without `basket_cost` prices at zero.
fn bucket_cost_per_1m(bucket: &VariantBucket, name: &str) -> f64 {
    match bucket.basket_cost {
        Some(cost) => cost * 1000.0,
        None => {
            warn!("Bucket {} has no basket_cost, pricing its basket row at 0", name);
            0.0
        }
    }
}

/// Rows are ordered by the methodology's basket segments.
fn synthesize_basket(buckets: &PrimaryBuckets<'_>) -> Vec<BasketComponent> {
    let row = |category: &str, weight: f64, examples: &str, avg_cost_per_1m_tokens: f64| BasketComponent {
        category: category.to_string(),
        weight,
        examples: examples.to_string(),
        avg_cost_per_1m_tokens,
    };

    vec![
        row(
            "Frontier Reasoning",
            FRONTIER_WEIGHT,
            "o1, Claude Opus, Gemini Ultra",
            bucket_cost_per_1m(buckets.frontier_heavy, "frontier_heavy"),
        ),
        row(
            "General Purpose",
            BULK_WEIGHT,
            "GPT-4, Claude Sonnet, Gemini Pro",
            bucket_cost_per_1m(buckets.general, "general"),
        ),
        row(
            "Budget Inference",
            REASON_WEIGHT,
            "GPT-3.5, Claude Haiku, open-source",
            bucket_cost_per_1m(buckets.budget_heavy, "budget_heavy"),
        ),
        row("Embedding & Search", EMBEDDING_WEIGHT, "Ada, Voyage, Cohere", EMBEDDING_COST_PER_1M),
        row("Multimodal", MULTIMODAL_WEIGHT, "Vision models, audio, video", MULTIMODAL_COST_PER_1M),
    ]
}
