use chrono::{DateTime, Utc};

use super::config::ScoringConfig;
use super::dimensions::{conformity, price, punctuality, reliability};
use super::domain::{CatalogPrice, DeliveryReceipt, PurchaseOrder, SupplierId};
use super::snapshot::ScoreSnapshot;
use super::window::ScoringWindow;

/// Historical facts gathered for one supplier before scoring.
#[derive(Debug, Clone, Default)]
pub struct SupplierFacts {
    pub receipts: Vec<DeliveryReceipt>,
    pub orders: Vec<PurchaseOrder>,
    pub own_prices: Vec<CatalogPrice>,
    pub market_prices: Vec<CatalogPrice>,
}

/// Stateless scorer running the four dimension calculators and the aggregator.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn window_at(&self, now: DateTime<Utc>) -> ScoringWindow {
        ScoringWindow::new(now, self.config.lookback_months)
    }

    pub fn score(
        &self,
        supplier_id: SupplierId,
        facts: &SupplierFacts,
        window: &ScoringWindow,
    ) -> ScoreSnapshot {
        let ((punctuality, conformity), (price, reliability)) = rayon::join(
            || {
                (
                    punctuality::calculate(
                        &facts.receipts,
                        window,
                        self.config.delivery_grace_days,
                    ),
                    conformity::calculate(&facts.receipts, window),
                )
            },
            || {
                (
                    price::calculate(&facts.own_prices, &facts.market_prices),
                    reliability::calculate(&facts.orders, window),
                )
            },
        );

        ScoreSnapshot::assemble(
            supplier_id,
            punctuality,
            conformity,
            price,
            reliability,
            window.now(),
        )
    }
}
