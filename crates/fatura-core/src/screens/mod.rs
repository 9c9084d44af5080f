//! Screen view models
//!
//! Each screen owns one [`RemoteResource`](crate::resource::RemoteResource)
//! per independent fetch, loads on entry or parameter change, and derives
//! what a renderer needs (category grouping, totals, risk level). Nothing
//! here prints; the CLI is the renderer.
//!
//! ## Flow
//!
//! ```text
//! UserSelection → Dashboard → { BillDetail, Anomalies, WhatIfSimulator → Checkout }
//! ```
//!
//! Parameters come from [`Navigator`](crate::session::Navigator).

pub mod anomalies;
pub mod bill_detail;
pub mod checkout;
pub mod dashboard;
pub mod user_selection;
pub mod whatif;

pub use anomalies::{AnomaliesScreen, RiskLevel};
pub use bill_detail::BillDetailScreen;
pub use checkout::{CheckoutScreen, OrderConfirmation, OrderSummary};
pub use dashboard::{CategoryTotal, DashboardScreen};
pub use user_selection::UserSelectionScreen;
pub use whatif::{ScenarioSummary, WhatIfCatalog, WhatIfScreen};

/// Short label for a bill item category
pub fn category_label(category: &str) -> &str {
    match category {
        "data" => "Data",
        "voice" => "Voice",
        "sms" => "SMS",
        "roaming" => "Roaming",
        "premium_sms" => "Premium SMS",
        "vas" => "VAS",
        "one_off" => "One-off",
        "discount" => "Discount",
        "tax" => "Tax",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_passthrough() {
        assert_eq!(category_label("premium_sms"), "Premium SMS");
        assert_eq!(category_label("satellite"), "satellite");
    }
}
