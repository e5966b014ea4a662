use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// Identifier of a supplier in the directory.
    SupplierId
);
identifier!(
    /// Tenant scope every supplier and fact belongs to.
    TenantId
);
identifier!(
    /// Catalog product identifier.
    ProductId
);
identifier!(
    /// Purchase order identifier.
    OrderId
);

/// Read-only view of a supplier owned by the supplier directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRecord {
    pub id: SupplierId,
    pub tenant_id: TenantId,
    pub business_name: String,
    pub category: Option<String>,
    pub active: bool,
}

impl SupplierRecord {
    /// Category with blank values treated as missing.
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn belongs_to(&self, tenant_id: &TenantId) -> bool {
        &self.tenant_id == tenant_id
    }
}

/// Lifecycle of a purchase order as tracked by the ordering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Draft,
    PendingApproval,
    Approved,
    Sent,
    Confirmed,
    InDelivery,
    PartiallyReceived,
    Received,
    Closed,
    Cancelled,
}

impl OrderStatus {
    /// Orders that have left the buyer and are now the supplier's responsibility.
    pub const fn is_in_flight(self) -> bool {
        matches!(
            self,
            OrderStatus::Sent
                | OrderStatus::Confirmed
                | OrderStatus::InDelivery
                | OrderStatus::PartiallyReceived
                | OrderStatus::Received
                | OrderStatus::Closed
        )
    }

    pub const fn is_completed(self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::Closed)
    }

    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::PendingApproval => "pending_approval",
            OrderStatus::Approved => "approved",
            OrderStatus::Sent => "sent",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InDelivery => "in_delivery",
            OrderStatus::PartiallyReceived => "partially_received",
            OrderStatus::Received => "received",
            OrderStatus::Closed => "closed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: OrderId,
    pub tenant_id: TenantId,
    pub supplier_id: SupplierId,
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
    pub expected_delivery: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStatus {
    Draft,
    Completed,
}

/// Goods receipt for an order, already paired with the order's expected delivery date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    pub id: String,
    pub tenant_id: TenantId,
    pub supplier_id: SupplierId,
    pub order_id: OrderId,
    pub status: ReceiptStatus,
    pub received_at: DateTime<Utc>,
    pub expected_delivery: Option<NaiveDate>,
    pub lines: Vec<ReceiptLine>,
}

impl DeliveryReceipt {
    pub fn is_completed(&self) -> bool {
        self.status == ReceiptStatus::Completed
    }
}

/// Inspected line of a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: ProductId,
    pub conforming: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPrice {
    pub tenant_id: TenantId,
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
    pub unit_price: f64,
    pub active: bool,
}

/// Compliance document (certificates, insurance, ...) filed for a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDocument {
    pub tenant_id: TenantId,
    pub supplier_id: SupplierId,
    pub name: String,
    pub expires_on: NaiveDate,
}
