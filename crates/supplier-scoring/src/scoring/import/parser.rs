use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::io::Read;

use crate::scoring::domain::{OrderStatus, ReceiptStatus};

pub(crate) fn read_rows<T, R>(reader: R) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<T>()
        .collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct SupplierRow {
    pub(crate) id: String,
    pub(crate) tenant_id: String,
    pub(crate) business_name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) category: Option<String>,
    #[serde(default = "default_active")]
    pub(crate) active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderRow {
    pub(crate) id: String,
    pub(crate) tenant_id: String,
    pub(crate) supplier_id: String,
    pub(crate) status: OrderStatus,
    pub(crate) placed_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub(crate) expected_delivery: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptRow {
    pub(crate) id: String,
    pub(crate) order_id: String,
    pub(crate) status: ReceiptStatus,
    pub(crate) received_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReceiptLineRow {
    pub(crate) receipt_id: String,
    pub(crate) product_id: String,
    pub(crate) conforming: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PriceRow {
    pub(crate) tenant_id: String,
    pub(crate) supplier_id: String,
    pub(crate) product_id: String,
    pub(crate) unit_price: f64,
    #[serde(default = "default_active")]
    pub(crate) active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DocumentRow {
    pub(crate) tenant_id: String,
    pub(crate) supplier_id: String,
    pub(crate) name: String,
    pub(crate) expires_on: String,
}

fn default_active() -> bool {
    true
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` (UTC) or bare dates (midnight UTC).
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }

    parse_date(trimmed)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_accept_offsets_and_bare_dates() {
        assert_eq!(
            parse_timestamp("2025-09-01T10:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-09-01 07:30:00"),
            Some(Utc.with_ymd_and_hms(2025, 9, 1, 7, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2025-09-01"),
            Some(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("next tuesday"), None);
    }

    #[test]
    fn order_rows_parse_snake_case_statuses() {
        let csv = "id,tenant_id,supplier_id,status,placed_at,expected_delivery\n\
po-1,acme,sup-1,partially_received,2025-08-01,\n";
        let rows: Vec<OrderRow> = read_rows(csv.as_bytes()).expect("rows parse");
        assert_eq!(rows[0].status, OrderStatus::PartiallyReceived);
        assert!(rows[0].expected_delivery.is_none());
    }
}
