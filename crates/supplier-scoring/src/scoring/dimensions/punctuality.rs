use chrono::Days;

use super::{Dimension, DimensionDetails, DimensionResult};
use crate::scoring::domain::DeliveryReceipt;
use crate::scoring::window::ScoringWindow;

/// Share of completed receipts delivered no later than expected date + grace.
///
/// Receipts whose order carries no expected delivery date are left out of
/// both sides of the ratio.
pub fn calculate(
    receipts: &[DeliveryReceipt],
    window: &ScoringWindow,
    grace_days: u32,
) -> DimensionResult {
    let mut on_time = 0u32;
    let mut late = 0u32;
    let mut missing_expected_date = 0u32;

    for receipt in receipts
        .iter()
        .filter(|receipt| receipt.is_completed() && window.contains(receipt.received_at))
    {
        let Some(expected) = receipt.expected_delivery else {
            missing_expected_date += 1;
            continue;
        };

        let deadline = expected
            .checked_add_days(Days::new(u64::from(grace_days)))
            .unwrap_or(expected);
        if receipt.received_at.date_naive() <= deadline {
            on_time += 1;
        } else {
            late += 1;
        }
    }

    DimensionResult::from_ratio(
        Dimension::Punctuality,
        on_time,
        on_time + late,
        DimensionDetails::Punctuality {
            on_time,
            late,
            missing_expected_date,
        },
    )
}
