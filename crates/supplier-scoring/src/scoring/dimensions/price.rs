use std::collections::BTreeMap;

use super::{round2, Dimension, DimensionDetails, DimensionResult};
use crate::scoring::domain::{CatalogPrice, ProductId};

/// Compares the supplier's active prices against the tenant-wide market mean.
///
/// `market` holds the catalog prices of every supplier for the products the
/// supplier offers; inactive entries are ignored on both sides. The mean is the
/// one current at calculation time. Several own rows for one product are
/// averaged and scored once.
pub fn calculate(own: &[CatalogPrice], market: &[CatalogPrice]) -> DimensionResult {
    let market_totals = totals_by_product(market);
    let own_totals = totals_by_product(own);
    let products_offered = own_totals.len() as u32;

    let mut scores = Vec::new();
    let mut deviations = Vec::new();
    for (product_id, (own_total, own_count)) in &own_totals {
        let Some((total, count)) = market_totals.get(product_id) else {
            continue;
        };
        let mean = total / f64::from(*count);
        if mean == 0.0 || !mean.is_finite() {
            continue;
        }

        let unit_price = own_total / f64::from(*own_count);
        let deviation = (unit_price - mean) / mean * 100.0;
        deviations.push(deviation);
        scores.push((100.0 - deviation * 2.0).clamp(0.0, 100.0));
    }

    let products_scored = scores.len() as u32;
    let score = mean(&scores).map(round2);
    let average_deviation_pct = mean(&deviations).map(round2);

    DimensionResult {
        score,
        weight: Dimension::PriceCompetitiveness.nominal_weight(),
        sample_size: products_scored,
        details: DimensionDetails::PriceCompetitiveness {
            products_offered,
            products_scored,
            average_deviation_pct,
        },
    }
}

fn totals_by_product(prices: &[CatalogPrice]) -> BTreeMap<&ProductId, (f64, u32)> {
    let mut totals: BTreeMap<&ProductId, (f64, u32)> = BTreeMap::new();
    for price in prices.iter().filter(|price| price.active) {
        let entry = totals.entry(&price.product_id).or_insert((0.0, 0));
        entry.0 += price.unit_price;
        entry.1 += 1;
    }
    totals
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}
