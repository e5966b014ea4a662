use super::dimensions::{round2, DimensionResult};

/// Effective weights after redistributing the weight of dimensions without data.
///
/// Aligned with `results`; dimensions without a score get `None`. Surviving
/// dimensions keep their relative proportions and sum to 100.
pub fn effective_weights(results: &[&DimensionResult]) -> Vec<Option<f64>> {
    let available: u32 = results
        .iter()
        .filter(|result| result.has_data())
        .map(|result| u32::from(result.weight))
        .sum();

    results
        .iter()
        .map(|result| {
            (result.has_data() && available > 0)
                .then(|| f64::from(result.weight) / f64::from(available) * 100.0)
        })
        .collect()
}

/// Weighted average of the scored dimensions, rounded to two decimals.
pub fn composite_score(results: &[&DimensionResult]) -> Option<f64> {
    let weights = effective_weights(results);
    let mut weighted = None;

    for (result, weight) in results.iter().zip(weights) {
        if let (Some(score), Some(weight)) = (result.score, weight) {
            *weighted.get_or_insert(0.0) += score * weight;
        }
    }

    weighted.map(|total: f64| round2(total / 100.0).clamp(0.0, 100.0))
}
