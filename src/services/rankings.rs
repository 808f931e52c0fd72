// src/services/rankings.rs
use log::warn;

use crate::models::{HistoricalSeries, MarketVelocity, RankingEntry, Rankings, VelocityEntry};
use crate::services::upstream::{HistoricalDocument, RankingsDocument};

/// Flattens both ranking tables into [`RankingEntry`] rows ordered by rank.
///
/// Market share rows carry the month-over-month change as the secondary
/// value; quality-adjusted rows carry the cost per 1M tokens.
pub fn normalize_rankings(document: RankingsDocument) -> Rankings {
    let raw = document.rankings;

    let mut by_market_share: Vec<RankingEntry> = raw
        .by_market_share
        .into_iter()
        .map(|row| RankingEntry {
            rank: row.rank,
            model: row.model,
            provider: row.provider,
            metric_value: row.market_share,
            secondary_value: row.mom_change,
        })
        .collect();
    by_market_share.sort_by_key(|entry| entry.rank);

    let mut by_quality_adjusted_price: Vec<RankingEntry> = raw
        .by_quality_adjusted_price
        .into_iter()
        .map(|row| RankingEntry {
            rank: row.rank,
            model: row.model,
            provider: row.provider,
            metric_value: row.qap_score,
            secondary_value: row.cost_per_1m,
        })
        .collect();
    by_quality_adjusted_price.sort_by_key(|entry| entry.rank);

    let market_velocity = MarketVelocity {
        fastest_growing: raw
            .market_velocity
            .fastest_growing
            .into_iter()
            .map(|row| VelocityEntry {
                model: row.model,
                rate: row.growth_rate,
            })
            .collect(),
        declining: raw
            .market_velocity
            .declining
            .into_iter()
            .map(|row| VelocityEntry {
                model: row.model,
                rate: row.decline_rate,
            })
            .collect(),
    };

    Rankings {
        meta: document.meta,
        by_market_share,
        by_quality_adjusted_price,
        market_velocity,
    }
}

/// Keeps the series chronological. ISO dates sort lexically; the sort is
/// stable so points sharing a date keep upstream order.
pub fn normalize_historical(document: HistoricalDocument) -> HistoricalSeries {
    let mut series = document.historical_series;
    if !series.windows(2).all(|pair| pair[0].date <= pair[1].date) {
        warn!("Historical series arrived out of order, sorting by date");
        series.sort_by(|a, b| a.date.cmp(&b.date));
    }

    HistoricalSeries {
        meta: document.meta,
        historical_series: series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_both_tables_and_orders_by_rank() {
        let doc: RankingsDocument = serde_json::from_value(json!({
            "meta": { "period": "2025-05", "models_ranked": 3 },
            "rankings": {
                "by_market_share": [
                    { "rank": 2, "model": "Claude Sonnet", "provider": "Anthropic", "market_share": 21.5, "mom_change": 1.2 },
                    { "rank": 1, "model": "GPT-4o", "provider": "OpenAI", "market_share": 34.0, "mom_change": -0.8 }
                ],
                "by_quality_adjusted_price": [
                    { "rank": 1, "model": "Claude Haiku", "provider": "Anthropic", "qap_score": 92.1, "cost_per_1m": 0.25 }
                ],
                "market_velocity": {
                    "fastest_growing": [ { "model": "Gemini Flash", "growth_rate": 18.0 } ],
                    "declining": [ { "model": "GPT-3.5", "decline_rate": -7.5 } ]
                }
            }
        }))
        .unwrap();

        let rankings = normalize_rankings(doc);
        assert_eq!(rankings.by_market_share[0].model, "GPT-4o");
        assert_eq!(rankings.by_market_share[0].metric_value, 34.0);
        assert_eq!(rankings.by_market_share[1].secondary_value, Some(1.2));

        let qap = &rankings.by_quality_adjusted_price[0];
        assert_eq!(qap.metric_value, 92.1);
        assert_eq!(qap.secondary_value, Some(0.25));

        assert_eq!(rankings.market_velocity.fastest_growing[0].rate, 18.0);
        assert_eq!(rankings.market_velocity.declining[0].model, "GPT-3.5");
        assert_eq!(rankings.meta["models_ranked"], json!(3));
    }

    #[test]
    fn missing_tables_become_empty() {
        let doc: RankingsDocument = serde_json::from_value(json!({ "meta": {} })).unwrap();
        let rankings = normalize_rankings(doc);
        assert!(rankings.by_market_share.is_empty());
        assert!(rankings.market_velocity.declining.is_empty());
    }

    #[test]
    fn historical_series_is_sorted_by_date() {
        let doc: HistoricalDocument = serde_json::from_value(json!({
            "meta": { "data_points": 3 },
            "historical_series": [
                { "period": "Mar 2025", "date": "2025-03-01", "value": 96.0, "mom_change": -1.0, "yoy_change": null },
                { "period": "Jan 2025", "date": "2025-01-01", "value": 100.0, "mom_change": null, "yoy_change": null },
                { "period": "Feb 2025", "date": "2025-02-01", "value": 97.0, "mom_change": -3.0, "yoy_change": null }
            ]
        }))
        .unwrap();

        let series = normalize_historical(doc);
        let periods: Vec<&str> = series.historical_series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(periods, vec!["Jan 2025", "Feb 2025", "Mar 2025"]);
        assert_eq!(series.historical_series[0].mom_change, None);
    }
}
