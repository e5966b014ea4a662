use super::{Dimension, DimensionDetails, DimensionResult};
use crate::scoring::domain::PurchaseOrder;
use crate::scoring::window::ScoringWindow;

/// Share of dispatched orders that reached a completed state.
pub fn calculate(orders: &[PurchaseOrder], window: &ScoringWindow) -> DimensionResult {
    let dispatched = orders
        .iter()
        .filter(|order| order.status.is_in_flight() && window.contains(order.placed_at));

    let mut completed_orders = 0u32;
    let mut open_orders = 0u32;
    for order in dispatched {
        if order.status.is_completed() {
            completed_orders += 1;
        } else {
            open_orders += 1;
        }
    }

    DimensionResult::from_ratio(
        Dimension::Reliability,
        completed_orders,
        completed_orders + open_orders,
        DimensionDetails::Reliability {
            completed_orders,
            open_orders,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{OrderId, OrderStatus, SupplierId, TenantId};
    use chrono::{TimeZone, Utc};

    fn order(status: OrderStatus, month: u32) -> PurchaseOrder {
        PurchaseOrder {
            id: OrderId::new(format!("po-{month}-{}", status.label())),
            tenant_id: TenantId::new("acme"),
            supplier_id: SupplierId::new("sup-1"),
            status,
            placed_at: Utc.with_ymd_and_hms(2025, month, 10, 9, 0, 0).unwrap(),
            expected_delivery: None,
        }
    }

    fn window() -> ScoringWindow {
        ScoringWindow::new(Utc.with_ymd_and_hms(2025, 9, 30, 0, 0, 0).unwrap(), 6)
    }

    #[test]
    fn drafts_and_pending_approval_are_not_in_flight() {
        let orders = vec![
            order(OrderStatus::Draft, 9),
            order(OrderStatus::PendingApproval, 9),
            order(OrderStatus::Received, 8),
            order(OrderStatus::Closed, 7),
            order(OrderStatus::Sent, 8),
            order(OrderStatus::InDelivery, 9),
        ];

        let result = calculate(&orders, &window());
        assert_eq!(result.score, Some(50.0));
        assert_eq!(result.sample_size, 4);
    }

    #[test]
    fn orders_outside_window_are_ignored() {
        let orders = vec![
            order(OrderStatus::Received, 1),
            order(OrderStatus::Cancelled, 9),
            order(OrderStatus::Received, 10),
        ];
        let result = calculate(&orders, &window());
        assert_eq!(result.score, None);
        assert_eq!(
            result.details,
            DimensionDetails::Reliability {
                completed_orders: 0,
                open_orders: 0
            }
        );
    }
}
