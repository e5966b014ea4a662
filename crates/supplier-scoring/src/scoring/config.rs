use serde::{Deserialize, Serialize};

/// Tunables shared by the dimension calculators and the risk map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Trailing window of historical facts, in calendar months.
    pub lookback_months: u32,
    /// Days a delivery may arrive after the expected date and still count as on time.
    pub delivery_grace_days: u32,
    /// Horizon for counting supplier documents as "expiring soon".
    pub document_expiry_days: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lookback_months: 6,
            delivery_grace_days: 1,
            document_expiry_days: 30,
        }
    }
}
