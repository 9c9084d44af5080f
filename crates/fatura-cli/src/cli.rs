//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fatura - Understand and trim your phone bill
#[derive(Parser)]
#[command(name = "fatura")]
#[command(about = "Telecom billing assistant client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Billing API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Config file path (default: ~/.config/fatura/client.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List subscribers
    Users {
        /// Account type: postpaid or prepaid
        #[arg(long = "type")]
        account_type: Option<String>,

        /// Maximum number of users to show
        #[arg(short, long, default_value = "50")]
        limit: u32,
    },

    /// Show one subscriber with active services
    User {
        /// Subscriber id
        #[arg(required_unless_present = "msisdn")]
        id: Option<i64>,

        /// Look the subscriber up by phone number instead
        #[arg(long, conflicts_with = "id")]
        msisdn: Option<String>,
    },

    /// Show a subscriber profile summary
    Profile {
        /// Subscriber id
        id: i64,
    },

    /// Show subscriber population statistics
    Stats,

    /// Show the bill summary and anomalies for a period
    Dashboard {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Billing period (YYYY-MM, default: config or current month)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Show a bill with its items
    Bill {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Billing period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,

        /// Include category breakdown, commentary and alternative plans
        #[arg(long)]
        details: bool,
    },

    /// Show bill totals over recent months
    History {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Number of months
        #[arg(short, long, default_value = "6")]
        months: u32,
    },

    /// List periods with a bill
    Periods {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,
    },

    /// Show anomalies for a period
    Anomalies {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Billing period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,

        /// Request the detailed analysis
        #[arg(long)]
        detailed: bool,

        /// Show past analyses instead of one period
        #[arg(long, conflicts_with_all = ["period", "detailed"])]
        history: bool,
    },

    /// Browse the product catalog
    Catalog {
        /// What to list: plans, addons, vas, premium-sms, stats, all
        #[arg(default_value = "all")]
        kind: String,

        /// Only plans for this account type (postpaid or prepaid)
        #[arg(long = "type")]
        account_type: Option<String>,
    },

    /// Simulate changes to a bill, optionally checking them out
    Whatif {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Billing period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,

        /// Switch to this plan id
        #[arg(long)]
        plan: Option<i64>,

        /// Add this addon id (repeatable)
        #[arg(long = "addon")]
        addons: Vec<i64>,

        /// Cancel this VAS id (repeatable)
        #[arg(long = "vas")]
        vas: Vec<String>,

        /// Cancel every value-added service
        #[arg(long)]
        disable_vas: bool,

        /// Block premium SMS
        #[arg(long)]
        block_premium_sms: bool,

        /// Block roaming usage
        #[arg(long)]
        block_roaming: bool,

        /// Place the order after a successful simulation
        #[arg(long)]
        checkout: bool,
    },

    /// List a subscriber's orders
    Orders {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Maximum number of orders
        #[arg(short, long, default_value = "10")]
        limit: u32,

        /// Only orders with this status
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one order
    Order {
        /// Order id
        id: String,
    },

    /// Cancel an order
    CancelOrder {
        /// Order id
        id: String,
    },

    /// Suggest plans and addons for a subscriber
    Recommend {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Highest monthly price to consider
        #[arg(long)]
        max_price: Option<f64>,
    },

    /// Explain a bill in plain language
    Explain {
        /// Subscriber id
        #[arg(short, long)]
        user: i64,

        /// Billing period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,

        /// Explain usage in one category (data, voice, sms, roaming, ...)
        #[arg(long, conflicts_with = "costs")]
        usage: Option<String>,

        /// Explain the cost structure
        #[arg(long)]
        costs: bool,
    },

    /// Interactive walkthrough: pick a user, review the bill, simulate, check out
    App {
        /// Start with this subscriber selected
        #[arg(short, long)]
        user: Option<i64>,
    },
}
