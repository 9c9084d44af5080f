//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `anomalies` - Anomaly analysis commands (period, detailed, history)
//! - `app` - Interactive walkthrough driven by the navigator
//! - `bills` - Bill commands (dashboard, bill, history, periods)
//! - `catalog` - Catalog browsing and recommendations
//! - `core` - Shared utilities (config, connection, period resolution)
//! - `explain` - Plain-language bill explanations
//! - `orders` - Order commands (list, status, cancel)
//! - `users` - Subscriber commands (list, show, profile, stats)
//! - `whatif` - What-if simulation and checkout

pub mod anomalies;
pub mod app;
pub mod bills;
pub mod catalog;
pub mod core;
pub mod explain;
pub mod orders;
pub mod users;
pub mod whatif;

// Re-export command functions for main.rs
pub use anomalies::*;
pub use app::*;
pub use bills::*;
pub use catalog::*;
pub use core::*;
pub use explain::*;
pub use orders::*;
pub use users::*;
pub use whatif::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
