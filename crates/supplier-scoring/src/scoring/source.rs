use chrono::{DateTime, NaiveDate, Utc};

use super::domain::{
    CatalogPrice, DeliveryReceipt, ProductId, PurchaseOrder, SupplierId, SupplierRecord, TenantId,
};

/// Supplier directory owned by the surrounding application.
pub trait SupplierDirectory: Send + Sync {
    fn supplier(&self, id: &SupplierId) -> Result<Option<SupplierRecord>, SourceError>;

    /// Active (non-deleted) suppliers of a tenant.
    fn active_suppliers(&self, tenant_id: &TenantId) -> Result<Vec<SupplierRecord>, SourceError>;

    /// Documents of the category's suppliers expiring within `[from, until]`.
    fn expiring_documents(
        &self,
        tenant_id: &TenantId,
        category: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<usize, SourceError>;
}

/// Read-only historical facts consumed by the dimension calculators.
///
/// `since` lets backing stores narrow their queries; calculators re-apply the
/// window themselves.
pub trait HistoricalFacts: Send + Sync {
    fn delivery_receipts(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
        since: DateTime<Utc>,
    ) -> Result<Vec<DeliveryReceipt>, SourceError>;

    fn purchase_orders(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
        since: DateTime<Utc>,
    ) -> Result<Vec<PurchaseOrder>, SourceError>;

    fn catalog_prices(
        &self,
        tenant_id: &TenantId,
        supplier_id: &SupplierId,
    ) -> Result<Vec<CatalogPrice>, SourceError>;

    /// Catalog prices of every active supplier in the tenant for the given
    /// products. Deleted suppliers offer nothing.
    fn market_prices(
        &self,
        tenant_id: &TenantId,
        products: &[ProductId],
    ) -> Result<Vec<CatalogPrice>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("historical data source unavailable: {0}")]
    Unavailable(String),
}
