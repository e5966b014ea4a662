use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    CatalogPrice, DeliveryReceipt, ProductId, PurchaseOrder, SupplierDocument, SupplierId,
    SupplierRecord, TenantId,
};
use super::snapshot::{ScoreSnapshot, SnapshotStore, StoreError};
use super::source::{HistoricalFacts, SourceError, SupplierDirectory};

/// In-process supplier directory and fact source, used by the CLI, the demo
/// server and tests.
#[derive(Debug, Default)]
pub struct InMemorySupplierData {
    inner: RwLock<FactTables>,
}

#[derive(Debug, Default)]
struct FactTables {
    suppliers: Vec<SupplierRecord>,
    orders: Vec<PurchaseOrder>,
    receipts: Vec<DeliveryReceipt>,
    prices: Vec<CatalogPrice>,
    documents: Vec<SupplierDocument>,
}

fn poisoned<T>(_: PoisonError<T>) -> SourceError {
    SourceError::Unavailable("fact tables lock poisoned".to_string())
}

impl InMemorySupplierData {
    pub fn add_supplier(&self, supplier: SupplierRecord) {
        self.write(|tables| tables.suppliers.push(supplier));
    }

    pub fn add_order(&self, order: PurchaseOrder) {
        self.write(|tables| tables.orders.push(order));
    }

    pub fn add_receipt(&self, receipt: DeliveryReceipt) {
        self.write(|tables| tables.receipts.push(receipt));
    }

    pub fn add_price(&self, price: CatalogPrice) {
        self.write(|tables| tables.prices.push(price));
    }

    pub fn add_document(&self, document: SupplierDocument) {
        self.write(|tables| tables.documents.push(document));
    }

    pub fn supplier_count(&self) -> usize {
        self.inner
            .read()
            .map(|tables| tables.suppliers.len())
            .unwrap_or_default()
    }

    fn write(&self, apply: impl FnOnce(&mut FactTables)) {
        let mut tables = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        apply(&mut tables);
    }
}

impl SupplierDirectory for InMemorySupplierData {
    fn supplier(&self, id: &SupplierId) -> Result<Option<SupplierRecord>, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .suppliers
            .iter()
            .find(|supplier| &supplier.id == id)
            .cloned())
    }

    fn active_suppliers(&self, tenant_id: &TenantId) -> Result<Vec<SupplierRecord>, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .suppliers
            .iter()
            .filter(|supplier| supplier.active && supplier.belongs_to(tenant_id))
            .cloned()
            .collect())
    }

    fn expiring_documents(
        &self,
        tenant_id: &TenantId,
        category: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<usize, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        let in_category: Vec<&SupplierId> = tables
            .suppliers
            .iter()
            .filter(|supplier| {
                supplier.active
                    && supplier.belongs_to(tenant_id)
                    && supplier.category() == Some(category)
            })
            .map(|supplier| &supplier.id)
            .collect();

        Ok(tables
            .documents
            .iter()
            .filter(|document| {
                &document.tenant_id == tenant_id
                    && in_category.contains(&&document.supplier_id)
                    && (from..=until).contains(&document.expires_on)
            })
            .count())
    }
}

impl HistoricalFacts for InMemorySupplierData {
    fn delivery_receipts(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
        since: DateTime<Utc>,
    ) -> Result<Vec<DeliveryReceipt>, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .receipts
            .iter()
            .filter(|receipt| {
                &receipt.tenant_id == tenant_id
                    && &receipt.supplier_id == supplier_id
                    && receipt.received_at >= since
            })
            .cloned()
            .collect())
    }

    fn purchase_orders(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PurchaseOrder>, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .orders
            .iter()
            .filter(|order| {
                &order.tenant_id == tenant_id
                    && &order.supplier_id == supplier_id
                    && order.placed_at >= since
            })
            .cloned()
            .collect())
    }

    fn catalog_prices(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
    ) -> Result<Vec<CatalogPrice>, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        Ok(tables
            .prices
            .iter()
            .filter(|price| &price.tenant_id == tenant_id && &price.supplier_id == supplier_id)
            .cloned()
            .collect())
    }

    fn market_prices(
        &self,
        tenant_id: &TenantId,
        products: &[ProductId],
    ) -> Result<Vec<CatalogPrice>, SourceError> {
        let tables = self.inner.read().map_err(poisoned)?;
        let offering: Vec<&SupplierId> = tables
            .suppliers
            .iter()
            .filter(|supplier| supplier.active && supplier.belongs_to(tenant_id))
            .map(|supplier| &supplier.id)
            .collect();

        Ok(tables
            .prices
            .iter()
            .filter(|price| {
                &price.tenant_id == tenant_id
                    && products.contains(&price.product_id)
                    && offering.contains(&&price.supplier_id)
            })
            .cloned()
            .collect())
    }
}

/// Snapshot store keeping one serialized document per supplier.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    documents: RwLock<HashMap<SupplierId, String>>,
}

impl InMemorySnapshotStore {
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .map(|documents| documents.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn write(&self, supplier_id: &SupplierId, snapshot: &ScoreSnapshot) -> Result<(), StoreError> {
        let document = snapshot.to_document().map_err(|source| StoreError::Codec {
            supplier_id: supplier_id.clone(),
            source,
        })?;
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StoreError::Unavailable("snapshot lock poisoned".to_string()))?;
        documents.insert(supplier_id.clone(), document);
        Ok(())
    }

    fn read(&self, supplier_id: &SupplierId) -> Result<Option<ScoreSnapshot>, StoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StoreError::Unavailable("snapshot lock poisoned".to_string()))?;
        documents
            .get(supplier_id)
            .map(|document| {
                ScoreSnapshot::from_document(document).map_err(|source| StoreError::Codec {
                    supplier_id: supplier_id.clone(),
                    source,
                })
            })
            .transpose()
    }
}
