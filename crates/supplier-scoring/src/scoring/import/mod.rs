//! Loads CSV exports of the surrounding purchasing system into an in-memory
//! fact set.
//!
//! Expected files (only `suppliers.csv` is mandatory):
//! `suppliers.csv`, `orders.csv`, `receipts.csv`, `receipt_lines.csv`,
//! `prices.csv`, `documents.csv`.

mod parser;

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::domain::{
    CatalogPrice, DeliveryReceipt, OrderId, ProductId, PurchaseOrder, ReceiptLine,
    SupplierDocument, SupplierId, SupplierRecord, TenantId,
};
use super::memory::InMemorySupplierData;
use parser::{
    parse_date, parse_timestamp, read_rows, DocumentRow, OrderRow, PriceRow, ReceiptLineRow,
    ReceiptRow, SupplierRow,
};

#[derive(Debug, thiserror::Error)]
pub enum FactImportError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV data in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{file}: invalid {field} '{value}'")]
    InvalidValue {
        file: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("receipt {receipt_id} references unknown order {order_id}")]
    UnknownOrder { receipt_id: String, order_id: String },
    #[error("receipt line references unknown receipt {0}")]
    UnknownReceipt(String),
}

pub struct FactImporter;

impl FactImporter {
    /// Reads every known export found in `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<InMemorySupplierData, FactImportError> {
        let dir = dir.as_ref();
        let data = InMemorySupplierData::default();

        let suppliers: Vec<SupplierRow> = load(dir, "suppliers.csv", true)?;
        let orders: Vec<OrderRow> = load(dir, "orders.csv", false)?;
        let receipts: Vec<ReceiptRow> = load(dir, "receipts.csv", false)?;
        let lines: Vec<ReceiptLineRow> = load(dir, "receipt_lines.csv", false)?;
        let prices: Vec<PriceRow> = load(dir, "prices.csv", false)?;
        let documents: Vec<DocumentRow> = load(dir, "documents.csv", false)?;

        for row in suppliers {
            data.add_supplier(SupplierRecord {
                id: SupplierId(row.id),
                tenant_id: TenantId(row.tenant_id),
                business_name: row.business_name,
                category: row.category,
                active: row.active,
            });
        }

        let mut orders_by_id = HashMap::new();
        for row in orders {
            let order = order_from_row(row)?;
            orders_by_id.insert(order.id.clone(), order.clone());
            data.add_order(order);
        }

        let mut lines_by_receipt: HashMap<String, Vec<ReceiptLine>> = HashMap::new();
        for row in lines {
            lines_by_receipt
                .entry(row.receipt_id)
                .or_default()
                .push(ReceiptLine {
                    product_id: ProductId(row.product_id),
                    conforming: row.conforming,
                });
        }

        let receipt_count = receipts.len();
        for row in receipts {
            let order = orders_by_id.get(&OrderId(row.order_id.clone())).ok_or_else(|| {
                FactImportError::UnknownOrder {
                    receipt_id: row.id.clone(),
                    order_id: row.order_id.clone(),
                }
            })?;
            let received_at =
                parse_timestamp(&row.received_at).ok_or_else(|| FactImportError::InvalidValue {
                    file: "receipts.csv",
                    field: "received_at",
                    value: row.received_at.clone(),
                })?;

            data.add_receipt(DeliveryReceipt {
                lines: lines_by_receipt.remove(&row.id).unwrap_or_default(),
                id: row.id,
                tenant_id: order.tenant_id.clone(),
                supplier_id: order.supplier_id.clone(),
                order_id: order.id.clone(),
                status: row.status,
                received_at,
                expected_delivery: order.expected_delivery,
            });
        }

        if let Some(orphan) = lines_by_receipt.into_keys().min() {
            return Err(FactImportError::UnknownReceipt(orphan));
        }

        for row in prices {
            data.add_price(CatalogPrice {
                tenant_id: TenantId(row.tenant_id),
                supplier_id: SupplierId(row.supplier_id),
                product_id: ProductId(row.product_id),
                unit_price: row.unit_price,
                active: row.active,
            });
        }

        for row in documents {
            let expires_on =
                parse_date(&row.expires_on).ok_or_else(|| FactImportError::InvalidValue {
                    file: "documents.csv",
                    field: "expires_on",
                    value: row.expires_on.clone(),
                })?;
            data.add_document(SupplierDocument {
                tenant_id: TenantId(row.tenant_id),
                supplier_id: SupplierId(row.supplier_id),
                name: row.name,
                expires_on,
            });
        }

        info!(
            dir = %dir.display(),
            suppliers = data.supplier_count(),
            orders = orders_by_id.len(),
            receipts = receipt_count,
            "imported supplier facts"
        );
        Ok(data)
    }
}

fn order_from_row(row: OrderRow) -> Result<PurchaseOrder, FactImportError> {
    let placed_at =
        parse_timestamp(&row.placed_at).ok_or_else(|| FactImportError::InvalidValue {
            file: "orders.csv",
            field: "placed_at",
            value: row.placed_at.clone(),
        })?;
    let expected_delivery = match row.expected_delivery {
        Some(raw) => Some(
            parse_date(&raw).ok_or_else(|| FactImportError::InvalidValue {
                file: "orders.csv",
                field: "expected_delivery",
                value: raw.clone(),
            })?,
        ),
        None => None,
    };

    Ok(PurchaseOrder {
        id: OrderId(row.id),
        tenant_id: TenantId(row.tenant_id),
        supplier_id: SupplierId(row.supplier_id),
        status: row.status,
        placed_at,
        expected_delivery,
    })
}

fn load<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    required: bool,
) -> Result<Vec<T>, FactImportError> {
    let path = dir.join(file);
    if !required && !path.exists() {
        return Ok(Vec::new());
    }

    let handle = File::open(&path).map_err(|source| FactImportError::Io {
        path: path.clone(),
        source,
    })?;
    read_rows(handle).map_err(|source| FactImportError::Csv { path, source })
}
