use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::composite::{composite_score, effective_weights};
use super::dimensions::{Dimension, DimensionResult};
use super::domain::SupplierId;

/// Schema version written with every serialized snapshot.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Full score breakdown for one supplier, replaced wholesale on recalculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub version: u16,
    pub supplier_id: SupplierId,
    pub composite_score: Option<f64>,
    pub punctuality: DimensionResult,
    pub conformity: DimensionResult,
    pub price_competitiveness: DimensionResult,
    pub reliability: DimensionResult,
    pub calculated_at: DateTime<Utc>,
}

impl ScoreSnapshot {
    /// Builds a snapshot from the four dimension results, deriving the composite.
    pub fn assemble(
        supplier_id: SupplierId,
        punctuality: DimensionResult,
        conformity: DimensionResult,
        price_competitiveness: DimensionResult,
        reliability: DimensionResult,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        let composite_score = composite_score(&[
            &punctuality,
            &conformity,
            &price_competitiveness,
            &reliability,
        ]);

        Self {
            version: SNAPSHOT_VERSION,
            supplier_id,
            composite_score,
            punctuality,
            conformity,
            price_competitiveness,
            reliability,
            calculated_at,
        }
    }

    /// Placeholder returned for suppliers that were never scored. Never persisted.
    pub fn unscored(supplier_id: SupplierId, at: DateTime<Utc>) -> Self {
        Self::assemble(
            supplier_id,
            DimensionResult::empty(Dimension::Punctuality),
            DimensionResult::empty(Dimension::Conformity),
            DimensionResult::empty(Dimension::PriceCompetitiveness),
            DimensionResult::empty(Dimension::Reliability),
            at,
        )
    }

    pub fn dimension(&self, dimension: Dimension) -> &DimensionResult {
        match dimension {
            Dimension::Punctuality => &self.punctuality,
            Dimension::Conformity => &self.conformity,
            Dimension::PriceCompetitiveness => &self.price_competitiveness,
            Dimension::Reliability => &self.reliability,
        }
    }

    /// Effective weight per dimension, `None` for dimensions without data.
    pub fn effective_weights(&self) -> Vec<(Dimension, Option<f64>)> {
        let results: Vec<&DimensionResult> = Dimension::ALL
            .iter()
            .map(|dimension| self.dimension(*dimension))
            .collect();
        Dimension::ALL
            .into_iter()
            .zip(effective_weights(&results))
            .collect()
    }

    pub fn is_scored(&self) -> bool {
        self.composite_score.is_some()
    }

    /// Serialized single-document form used by stores.
    pub fn to_document(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_document(document: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(document)
    }
}

/// Persistence for the snapshot attached to each supplier.
///
/// `write` must replace the whole record atomically so readers never see
/// dimensions from two different calculations.
pub trait SnapshotStore: Send + Sync {
    fn write(&self, supplier_id: &SupplierId, snapshot: &ScoreSnapshot) -> Result<(), StoreError>;
    fn read(&self, supplier_id: &SupplierId) -> Result<Option<ScoreSnapshot>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
    #[error("snapshot for supplier {supplier_id} could not be encoded or decoded")]
    Codec {
        supplier_id: SupplierId,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn unscored_snapshot_is_all_null() {
        let at = Utc.with_ymd_and_hms(2025, 9, 30, 8, 0, 0).unwrap();
        let snapshot = ScoreSnapshot::unscored(SupplierId::new("sup-1"), at);

        assert_eq!(snapshot.composite_score, None);
        assert_eq!(snapshot.calculated_at, at);
        for dimension in Dimension::ALL {
            let result = snapshot.dimension(dimension);
            assert_eq!(result.score, None);
            assert_eq!(result.sample_size, 0);
            assert_eq!(result.weight, dimension.nominal_weight());
        }
    }

    #[test]
    fn document_round_trip_keeps_version_and_breakdown() {
        let at = Utc.with_ymd_and_hms(2025, 9, 30, 8, 0, 0).unwrap();
        let snapshot = ScoreSnapshot::unscored(SupplierId::new("sup-1"), at);
        let document = snapshot.to_document().expect("serializes");
        assert!(document.contains("\"version\":1"));
        let decoded = ScoreSnapshot::from_document(&document).expect("deserializes");
        assert_eq!(decoded, snapshot);
    }
}
