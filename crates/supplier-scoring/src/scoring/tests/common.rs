use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::scoring::domain::{
    CatalogPrice, DeliveryReceipt, OrderId, OrderStatus, ProductId, PurchaseOrder, ReceiptLine,
    ReceiptStatus, SupplierDocument, SupplierId, SupplierRecord, TenantId,
};
use crate::scoring::memory::{InMemorySnapshotStore, InMemorySupplierData};
use crate::scoring::service::SupplierScoringService;
use crate::scoring::snapshot::{ScoreSnapshot, SnapshotStore, StoreError};
use crate::scoring::source::{HistoricalFacts, SourceError};
use crate::scoring::window::FixedClock;
use crate::scoring::{InMemoryScoringService, ScoringConfig};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 30, 12, 0, 0).unwrap()
}

pub(super) fn tenant() -> TenantId {
    TenantId::new("trattoria-group")
}

pub(super) fn supplier(id: &str, category: Option<&str>) -> SupplierRecord {
    SupplierRecord {
        id: SupplierId::new(id),
        tenant_id: tenant(),
        business_name: format!("{id} S.r.l."),
        category: category.map(str::to_string),
        active: true,
    }
}

pub(super) fn order(
    id: &str,
    supplier_id: &str,
    status: OrderStatus,
    days_ago: i64,
    expected: Option<NaiveDate>,
) -> PurchaseOrder {
    PurchaseOrder {
        id: OrderId::new(id),
        tenant_id: tenant(),
        supplier_id: SupplierId::new(supplier_id),
        status,
        placed_at: now() - Duration::days(days_ago),
        expected_delivery: expected,
    }
}

/// Completed receipt delivered `delay_days` after the expected date.
pub(super) fn receipt(
    id: &str,
    supplier_id: &str,
    days_ago: i64,
    delay_days: i64,
    conforming_lines: &[bool],
) -> DeliveryReceipt {
    let received_at = now() - Duration::days(days_ago);
    DeliveryReceipt {
        id: id.to_string(),
        tenant_id: tenant(),
        supplier_id: SupplierId::new(supplier_id),
        order_id: OrderId::new(format!("po-{id}")),
        status: ReceiptStatus::Completed,
        received_at,
        expected_delivery: Some(received_at.date_naive() - Duration::days(delay_days)),
        lines: conforming_lines
            .iter()
            .enumerate()
            .map(|(idx, conforming)| ReceiptLine {
                product_id: ProductId::new(format!("prd-{idx}")),
                conforming: *conforming,
            })
            .collect(),
    }
}

pub(super) fn price(supplier_id: &str, product: &str, unit_price: f64) -> CatalogPrice {
    CatalogPrice {
        tenant_id: tenant(),
        supplier_id: SupplierId::new(supplier_id),
        product_id: ProductId::new(product),
        unit_price,
        active: true,
    }
}

pub(super) fn document(supplier_id: &str, expires_in_days: i64) -> SupplierDocument {
    SupplierDocument {
        tenant_id: tenant(),
        supplier_id: SupplierId::new(supplier_id),
        name: "HACCP certificate".to_string(),
        expires_on: now().date_naive() + Duration::days(expires_in_days),
    }
}

/// Tenant with a punctual fish supplier, a pricier one, a dormant one, a
/// single cheese supplier and one supplier in another tenant.
pub(super) fn seeded_data() -> InMemorySupplierData {
    let data = InMemorySupplierData::default();

    data.add_supplier(supplier("ittico-mare", Some("Ittico")));
    data.add_supplier(supplier("ittico-porto", Some("Ittico")));
    data.add_supplier(supplier("ittico-nuovo", Some("Ittico")));
    data.add_supplier(supplier("caseificio", Some("Latticini")));
    let mut retired = supplier("retired", Some("Ittico"));
    retired.active = false;
    data.add_supplier(retired);
    let mut foreign = supplier("foreign", Some("Ittico"));
    foreign.tenant_id = TenantId::new("other-tenant");
    data.add_supplier(foreign);

    for idx in 0..10 {
        let delay = if idx < 8 { 0 } else { 3 };
        data.add_receipt(receipt(
            &format!("mare-{idx}"),
            "ittico-mare",
            10 + idx,
            delay,
            &[true, true],
        ));
    }
    for idx in 0..4 {
        data.add_order(order(
            &format!("mare-po-{idx}"),
            "ittico-mare",
            OrderStatus::Received,
            20 + idx,
            None,
        ));
    }
    data.add_price(price("ittico-mare", "orata", 10.0));
    data.add_price(price("ittico-porto", "orata", 12.0));
    data.add_price(price("ittico-porto", "spigola", 20.0));

    data.add_order(order("porto-1", "ittico-porto", OrderStatus::Closed, 30, None));
    data.add_order(order("porto-2", "ittico-porto", OrderStatus::InDelivery, 5, None));
    data.add_order(order("porto-3", "ittico-porto", OrderStatus::Draft, 2, None));

    data.add_document(document("caseificio", 10));
    data.add_document(document("caseificio", 45));
    data.add_document(document("ittico-porto", -3));

    data
}

pub(super) fn build_service(
    data: InMemorySupplierData,
) -> (InMemoryScoringService, Arc<InMemorySnapshotStore>) {
    let data = Arc::new(data);
    let store = Arc::new(InMemorySnapshotStore::default());
    let service =
        SupplierScoringService::new(data.clone(), data, store.clone(), ScoringConfig::default())
            .with_clock(Arc::new(FixedClock(now())));
    (service, store)
}

/// Fact source that fails for one supplier and delegates otherwise.
pub(super) struct FlakyFacts {
    pub(super) inner: InMemorySupplierData,
    pub(super) failing: SupplierId,
}

impl HistoricalFacts for FlakyFacts {
    fn delivery_receipts(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
        since: DateTime<Utc>,
    ) -> Result<Vec<DeliveryReceipt>, SourceError> {
        if supplier_id == &self.failing {
            return Err(SourceError::Unavailable("receipts replica offline".to_string()));
        }
        self.inner.delivery_receipts(tenant_id, supplier_id, since)
    }

    fn purchase_orders(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PurchaseOrder>, SourceError> {
        self.inner.purchase_orders(tenant_id, supplier_id, since)
    }

    fn catalog_prices(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
    ) -> Result<Vec<CatalogPrice>, SourceError> {
        self.inner.catalog_prices(tenant_id, supplier_id)
    }

    fn market_prices(
        &self,
        tenant_id: &TenantId,
        products: &[ProductId],
    ) -> Result<Vec<CatalogPrice>, SourceError> {
        self.inner.market_prices(tenant_id, products)
    }
}

pub(super) struct UnavailableStore;

impl SnapshotStore for UnavailableStore {
    fn write(&self, _supplier_id: &SupplierId, _snapshot: &ScoreSnapshot) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn read(&self, _supplier_id: &SupplierId) -> Result<Option<ScoreSnapshot>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
