//! Supplier performance scoring and category supply-risk ranking.
//!
//! Four dimension calculators feed a composite aggregator; the resulting
//! snapshot is stored per supplier and projected into rankings and a
//! category risk map on demand.

mod composite;
pub mod config;
pub mod dimensions;
pub mod domain;
mod engine;
pub mod import;
pub mod memory;
pub mod ranking;
pub mod risk;
pub mod router;
pub mod service;
pub mod snapshot;
pub mod source;
pub mod window;

#[cfg(test)]
mod tests;

pub use composite::{composite_score, effective_weights};
pub use config::ScoringConfig;
pub use dimensions::{Dimension, DimensionDetails, DimensionResult};
pub use domain::{
    CatalogPrice, DeliveryReceipt, OrderId, OrderStatus, ProductId, PurchaseOrder, ReceiptLine,
    ReceiptStatus, SupplierDocument, SupplierId, SupplierRecord, TenantId,
};
pub use engine::{ScoringEngine, SupplierFacts};
pub use import::{FactImportError, FactImporter};
pub use memory::{InMemorySnapshotStore, InMemorySupplierData};
pub use ranking::{build_ranking, RankedEntry, SortKey, UnknownSortKey};
pub use risk::{build_risk_map, CategoryRisk, RiskLevel, UNCATEGORIZED};
pub use router::scoring_router;
pub use service::{
    RecalculationFailure, RecalculationReport, ScoringServiceError, SupplierScoringService,
};
pub use snapshot::{ScoreSnapshot, SnapshotStore, StoreError, SNAPSHOT_VERSION};
pub use source::{HistoricalFacts, SourceError, SupplierDirectory};
pub use window::{Clock, FixedClock, ScoringWindow, SystemClock};

/// Service wired to the in-memory collaborators.
pub type InMemoryScoringService =
    SupplierScoringService<InMemorySupplierData, InMemorySupplierData, InMemorySnapshotStore>;
