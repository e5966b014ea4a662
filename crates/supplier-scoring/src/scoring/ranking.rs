use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dimensions::Dimension;
use super::domain::{SupplierId, SupplierRecord};
use super::snapshot::ScoreSnapshot;

/// Value a ranking is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Composite,
    Punctuality,
    Conformity,
    PriceCompetitiveness,
    Reliability,
}

impl SortKey {
    pub fn value(self, snapshot: &ScoreSnapshot) -> Option<f64> {
        match self.dimension() {
            None => snapshot.composite_score,
            Some(dimension) => snapshot.dimension(dimension).score,
        }
    }

    pub const fn dimension(self) -> Option<Dimension> {
        match self {
            SortKey::Composite => None,
            SortKey::Punctuality => Some(Dimension::Punctuality),
            SortKey::Conformity => Some(Dimension::Conformity),
            SortKey::PriceCompetitiveness => Some(Dimension::PriceCompetitiveness),
            SortKey::Reliability => Some(Dimension::Reliability),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Composite => "composite",
            SortKey::Punctuality => "punctuality",
            SortKey::Conformity => "conformity",
            SortKey::PriceCompetitiveness => "price_competitiveness",
            SortKey::Reliability => "reliability",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected composite, punctuality, conformity, price_competitiveness or reliability)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "composite" => Ok(SortKey::Composite),
            "punctuality" => Ok(SortKey::Punctuality),
            "conformity" => Ok(SortKey::Conformity),
            "price_competitiveness" | "pricecompetitiveness" | "price" => {
                Ok(SortKey::PriceCompetitiveness)
            }
            "reliability" => Ok(SortKey::Reliability),
            _ => Err(UnknownSortKey(raw.to_string())),
        }
    }
}

/// One row of a supplier ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub supplier_id: SupplierId,
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub punctuality: Option<f64>,
    pub conformity: Option<f64>,
    pub price_competitiveness: Option<f64>,
    pub reliability: Option<f64>,
    pub composite_score: Option<f64>,
    pub calculated_at: DateTime<Utc>,
}

/// Orders suppliers by `sort_key`, highest first, unscored last.
///
/// Equal values fall back to the supplier id so the order is stable across
/// stores. Ranks are sequential even for ties.
pub fn build_ranking(
    rows: Vec<(SupplierRecord, ScoreSnapshot)>,
    category: Option<&str>,
    sort_key: SortKey,
) -> Vec<RankedEntry> {
    let mut rows: Vec<_> = rows
        .into_iter()
        .filter(|(supplier, _)| match category {
            Some(wanted) => supplier.category() == Some(wanted.trim()),
            None => true,
        })
        .map(|(supplier, snapshot)| (sort_key.value(&snapshot), supplier, snapshot))
        .collect();

    rows.sort_by(|(left_value, left, _), (right_value, right, _)| {
        compare_desc_nulls_last(*left_value, *right_value).then_with(|| left.id.cmp(&right.id))
    });

    rows.into_iter()
        .enumerate()
        .map(|(idx, (_, supplier, snapshot))| RankedEntry {
            rank: idx + 1,
            category: supplier.category().map(str::to_string),
            supplier_id: supplier.id,
            business_name: supplier.business_name,
            punctuality: snapshot.punctuality.score,
            conformity: snapshot.conformity.score,
            price_competitiveness: snapshot.price_competitiveness.score,
            reliability: snapshot.reliability.score,
            composite_score: snapshot.composite_score,
            calculated_at: snapshot.calculated_at,
        })
        .collect()
}

fn compare_desc_nulls_last(left: Option<f64>, right: Option<f64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
