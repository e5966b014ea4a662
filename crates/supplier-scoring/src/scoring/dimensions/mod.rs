//! Per-supplier quality dimensions.
//!
//! Every calculator is a pure function over one slice of historical facts and
//! returns a [`DimensionResult`]. Missing data is a regular `(None, 0)` result.

pub mod conformity;
pub mod price;
pub mod punctuality;
pub mod reliability;

use serde::{Deserialize, Serialize};

/// The four scored quality axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Punctuality,
    Conformity,
    PriceCompetitiveness,
    Reliability,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Punctuality,
        Dimension::Conformity,
        Dimension::PriceCompetitiveness,
        Dimension::Reliability,
    ];

    /// Nominal weight out of 100.
    pub const fn nominal_weight(self) -> u8 {
        match self {
            Dimension::Punctuality => 30,
            Dimension::Conformity => 30,
            Dimension::PriceCompetitiveness => 25,
            Dimension::Reliability => 15,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Dimension::Punctuality => "Punctuality",
            Dimension::Conformity => "Conformity",
            Dimension::PriceCompetitiveness => "Price competitiveness",
            Dimension::Reliability => "Reliability",
        }
    }
}

/// Score of one dimension together with the evidence behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    pub score: Option<f64>,
    pub weight: u8,
    pub sample_size: u32,
    pub details: DimensionDetails,
}

impl DimensionResult {
    /// Result for a dimension with no observations.
    pub fn empty(dimension: Dimension) -> Self {
        Self {
            score: None,
            weight: dimension.nominal_weight(),
            sample_size: 0,
            details: DimensionDetails::empty(dimension),
        }
    }

    /// Success ratio scaled to 0-100; `None` when nothing was observed.
    pub(crate) fn from_ratio(
        dimension: Dimension,
        successes: u32,
        observations: u32,
        details: DimensionDetails,
    ) -> Self {
        let score = (observations > 0)
            .then(|| round2(f64::from(successes) / f64::from(observations) * 100.0));
        Self {
            score,
            weight: dimension.nominal_weight(),
            sample_size: observations,
            details,
        }
    }

    pub fn has_data(&self) -> bool {
        self.score.is_some()
    }
}

/// Audit counters, one shape per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DimensionDetails {
    Punctuality {
        on_time: u32,
        late: u32,
        missing_expected_date: u32,
    },
    Conformity {
        conforming_lines: u32,
        non_conforming_lines: u32,
    },
    PriceCompetitiveness {
        products_offered: u32,
        products_scored: u32,
        average_deviation_pct: Option<f64>,
    },
    Reliability {
        completed_orders: u32,
        open_orders: u32,
    },
}

impl DimensionDetails {
    pub fn empty(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Punctuality => DimensionDetails::Punctuality {
                on_time: 0,
                late: 0,
                missing_expected_date: 0,
            },
            Dimension::Conformity => DimensionDetails::Conformity {
                conforming_lines: 0,
                non_conforming_lines: 0,
            },
            Dimension::PriceCompetitiveness => DimensionDetails::PriceCompetitiveness {
                products_offered: 0,
                products_scored: 0,
                average_deviation_pct: None,
            },
            Dimension::Reliability => DimensionDetails::Reliability {
                completed_orders: 0,
                open_orders: 0,
            },
        }
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
