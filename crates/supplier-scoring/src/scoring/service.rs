use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::config::ScoringConfig;
use super::domain::{ProductId, SupplierId, SupplierRecord, TenantId};
use super::engine::{ScoringEngine, SupplierFacts};
use super::ranking::{build_ranking, RankedEntry, SortKey};
use super::risk::{build_risk_map, CategoryRisk};
use super::snapshot::{ScoreSnapshot, SnapshotStore, StoreError};
use super::source::{HistoricalFacts, SourceError, SupplierDirectory};
use super::window::{Clock, ScoringWindow, SystemClock};

/// Service composing the supplier directory, fact source, scoring engine and
/// snapshot store.
pub struct SupplierScoringService<D, F, S> {
    directory: Arc<D>,
    facts: Arc<F>,
    store: Arc<S>,
    engine: ScoringEngine,
    clock: Arc<dyn Clock>,
}

/// Outcome of a tenant-wide recalculation.
#[derive(Debug, Clone, Serialize)]
pub struct RecalculationReport {
    /// Suppliers whose snapshot was successfully written; failures are not
    /// counted here.
    pub suppliers_processed: usize,
    pub results: Vec<ScoreSnapshot>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RecalculationFailure>,
}

/// Supplier whose recalculation failed; its previous snapshot is untouched.
#[derive(Debug, Clone, Serialize)]
pub struct RecalculationFailure {
    pub supplier_id: SupplierId,
    pub error: String,
}

impl<D, F, S> SupplierScoringService<D, F, S>
where
    D: SupplierDirectory + 'static,
    F: HistoricalFacts + 'static,
    S: SnapshotStore + 'static,
{
    pub fn new(directory: Arc<D>, facts: Arc<F>, store: Arc<S>, config: ScoringConfig) -> Self {
        Self {
            directory,
            facts,
            store,
            engine: ScoringEngine::new(config),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock used for windows and synthesized snapshots.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        self.engine.config()
    }

    /// Recompute and persist the snapshot of one supplier.
    pub fn calculate_score(
        &self,
        supplier_id: &SupplierId,
        tenant_id: &TenantId,
    ) -> Result<ScoreSnapshot, ScoringServiceError> {
        let supplier = self
            .directory
            .supplier(supplier_id)?
            .filter(|supplier| supplier.active && supplier.belongs_to(tenant_id))
            .ok_or_else(|| ScoringServiceError::NotFound(supplier_id.clone()))?;

        let window = self.engine.window_at(self.clock.now());
        self.score_supplier(&supplier, &window)
    }

    /// Recompute every active supplier of the tenant.
    ///
    /// Suppliers are processed independently; failures are reported without
    /// touching the snapshots of other suppliers.
    pub fn recalculate_all(
        &self,
        tenant_id: &TenantId,
    ) -> Result<RecalculationReport, ScoringServiceError> {
        let suppliers = self.directory.active_suppliers(tenant_id)?;
        let window = self.engine.window_at(self.clock.now());

        let outcomes: Vec<(SupplierId, Result<ScoreSnapshot, ScoringServiceError>)> = suppliers
            .par_iter()
            .map(|supplier| (supplier.id.clone(), self.score_supplier(supplier, &window)))
            .collect();

        let mut results = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (supplier_id, outcome) in outcomes {
            match outcome {
                Ok(snapshot) => results.push(snapshot),
                Err(err) => {
                    warn!(%supplier_id, %tenant_id, error = %err, "supplier recalculation failed");
                    failures.push(RecalculationFailure {
                        supplier_id,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            %tenant_id,
            processed = results.len(),
            failed = failures.len(),
            "recalculated supplier scores"
        );

        Ok(RecalculationReport {
            suppliers_processed: results.len(),
            results,
            failures,
        })
    }

    /// Stored snapshot, or the unscored placeholder when none was written yet.
    pub fn get_score(&self, supplier_id: &SupplierId) -> Result<ScoreSnapshot, ScoringServiceError> {
        let known = self
            .directory
            .supplier(supplier_id)?
            .is_some_and(|supplier| supplier.active);
        if !known {
            return Err(ScoringServiceError::NotFound(supplier_id.clone()));
        }
        self.stored_or_default(supplier_id)
    }

    pub fn get_ranking(
        &self,
        tenant_id: &TenantId,
        category: Option<&str>,
        sort_by: Option<SortKey>,
    ) -> Result<Vec<RankedEntry>, ScoringServiceError> {
        let rows = self
            .directory
            .active_suppliers(tenant_id)?
            .into_iter()
            .map(|supplier| -> Result<_, ScoringServiceError> {
                let snapshot = self.stored_or_default(&supplier.id)?;
                Ok((supplier, snapshot))
            })
            .collect::<Result<Vec<_>, ScoringServiceError>>()?;

        Ok(build_ranking(rows, category, sort_by.unwrap_or_default()))
    }

    pub fn get_risk_map(
        &self,
        tenant_id: &TenantId,
    ) -> Result<Vec<CategoryRisk>, ScoringServiceError> {
        let rows = self
            .directory
            .active_suppliers(tenant_id)?
            .into_iter()
            .map(|supplier| -> Result<_, ScoringServiceError> {
                let composite = self
                    .store
                    .read(&supplier.id)?
                    .and_then(|snapshot| snapshot.composite_score);
                Ok((supplier, composite))
            })
            .collect::<Result<Vec<_>, ScoringServiceError>>()?;

        let (from, until) = self.expiry_horizon();
        build_risk_map(&rows, |category| {
            self.directory
                .expiring_documents(tenant_id, category, from, until)
                .map_err(ScoringServiceError::from)
        })
    }

    fn score_supplier(
        &self,
        supplier: &SupplierRecord,
        window: &ScoringWindow,
    ) -> Result<ScoreSnapshot, ScoringServiceError> {
        let facts = self.gather_facts(supplier, window)?;
        let snapshot = self.engine.score(supplier.id.clone(), &facts, window);
        self.store.write(&supplier.id, &snapshot)?;

        debug!(
            supplier_id = %supplier.id,
            composite = ?snapshot.composite_score,
            "stored supplier score snapshot"
        );
        Ok(snapshot)
    }

    fn gather_facts(
        &self,
        supplier: &SupplierRecord,
        window: &ScoringWindow,
    ) -> Result<SupplierFacts, SourceError> {
        let tenant_id = &supplier.tenant_id;
        let since = window.since();

        let receipts = self.facts.delivery_receipts(tenant_id, &supplier.id, since)?;
        let orders = self.facts.purchase_orders(tenant_id, &supplier.id, since)?;
        let own_prices = self.facts.catalog_prices(tenant_id, &supplier.id)?;

        let products: Vec<ProductId> = own_prices
            .iter()
            .filter(|price| price.active)
            .map(|price| price.product_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let market_prices = if products.is_empty() {
            Vec::new()
        } else {
            self.facts.market_prices(tenant_id, &products)?
        };

        Ok(SupplierFacts {
            receipts,
            orders,
            own_prices,
            market_prices,
        })
    }

    fn stored_or_default(
        &self,
        supplier_id: &SupplierId,
    ) -> Result<ScoreSnapshot, ScoringServiceError> {
        Ok(self
            .store
            .read(supplier_id)?
            .unwrap_or_else(|| ScoreSnapshot::unscored(supplier_id.clone(), self.clock.now())))
    }

    fn expiry_horizon(&self) -> (NaiveDate, NaiveDate) {
        let today = self.clock.now().date_naive();
        let until = today
            .checked_add_days(Days::new(u64::from(self.config().document_expiry_days)))
            .unwrap_or(NaiveDate::MAX);
        (today, until)
    }
}

/// Error raised by the scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("supplier {0} not found")]
    NotFound(SupplierId),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
