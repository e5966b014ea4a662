use super::{Dimension, DimensionDetails, DimensionResult};
use crate::scoring::domain::DeliveryReceipt;
use crate::scoring::window::ScoringWindow;

/// Share of inspected receipt lines flagged as conforming.
pub fn calculate(receipts: &[DeliveryReceipt], window: &ScoringWindow) -> DimensionResult {
    let (conforming_lines, non_conforming_lines) = receipts
        .iter()
        .filter(|receipt| receipt.is_completed() && window.contains(receipt.received_at))
        .flat_map(|receipt| receipt.lines.iter())
        .fold((0u32, 0u32), |(ok, ko), line| {
            if line.conforming {
                (ok + 1, ko)
            } else {
                (ok, ko + 1)
            }
        });

    DimensionResult::from_ratio(
        Dimension::Conformity,
        conforming_lines,
        conforming_lines + non_conforming_lines,
        DimensionDetails::Conformity {
            conforming_lines,
            non_conforming_lines,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{
        OrderId, ProductId, ReceiptLine, ReceiptStatus, SupplierId, TenantId,
    };
    use chrono::{TimeZone, Utc};

    fn receipt(flags: &[bool], status: ReceiptStatus) -> DeliveryReceipt {
        DeliveryReceipt {
            id: "rcv-1".to_string(),
            tenant_id: TenantId::new("acme"),
            supplier_id: SupplierId::new("sup-1"),
            order_id: OrderId::new("po-1"),
            status,
            received_at: Utc.with_ymd_and_hms(2025, 9, 2, 8, 0, 0).unwrap(),
            expected_delivery: None,
            lines: flags
                .iter()
                .enumerate()
                .map(|(idx, conforming)| ReceiptLine {
                    product_id: ProductId::new(format!("prd-{idx}")),
                    conforming: *conforming,
                })
                .collect(),
        }
    }

    fn window() -> ScoringWindow {
        ScoringWindow::new(Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap(), 6)
    }

    #[test]
    fn counts_lines_across_completed_receipts() {
        let receipts = vec![
            receipt(&[true, true, false], ReceiptStatus::Completed),
            receipt(&[true], ReceiptStatus::Completed),
            receipt(&[false, false], ReceiptStatus::Draft),
        ];

        let result = calculate(&receipts, &window());
        assert_eq!(result.score, Some(75.0));
        assert_eq!(result.sample_size, 4);
        assert_eq!(
            result.details,
            DimensionDetails::Conformity {
                conforming_lines: 3,
                non_conforming_lines: 1
            }
        );
    }

    #[test]
    fn receipts_without_lines_yield_no_score() {
        let receipts = vec![receipt(&[], ReceiptStatus::Completed)];
        let result = calculate(&receipts, &window());
        assert_eq!(result.score, None);
        assert_eq!(result.sample_size, 0);
    }
}
