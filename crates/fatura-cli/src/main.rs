//! Fatura CLI - Telecom billing assistant client
//!
//! Usage:
//!   fatura users                          List subscribers
//!   fatura dashboard --user 1001          Bill summary and anomalies
//!   fatura whatif --user 1001 --plan 3    Simulate a plan change
//!   fatura app                            Interactive walkthrough

mod cli;
mod commands;


use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;
use commands::WhatIfArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref(), cli.api_url.as_deref(), cli.timeout)?;
    let service = commands::connect(&config)?;

    match cli.command {
        Commands::Users {
            account_type,
            limit,
        } => commands::cmd_users(&service, account_type.as_deref(), limit).await,
        Commands::User { id, msisdn } => {
            commands::cmd_user(&service, id, msisdn.as_deref()).await
        }
        Commands::Profile { id } => commands::cmd_profile(&service, id).await,
        Commands::Stats => commands::cmd_stats(&service).await,
        Commands::Dashboard { user, period } => {
            let period = commands::resolve_period(period.as_deref(), &config)?;
            commands::cmd_dashboard(&service, user, &period).await
        }
        Commands::Bill {
            user,
            period,
            details,
        } => {
            let period = commands::resolve_period(period.as_deref(), &config)?;
            commands::cmd_bill(&service, user, &period, details).await
        }
        Commands::History { user, months } => {
            commands::cmd_history(&service, user, months).await
        }
        Commands::Periods { user } => commands::cmd_periods(&service, user).await,
        Commands::Anomalies {
            user,
            period,
            detailed,
            history,
        } => {
            if history {
                commands::cmd_anomaly_history(&service, user).await
            } else {
                let period = commands::resolve_period(period.as_deref(), &config)?;
                commands::cmd_anomalies(&service, user, &period, detailed).await
            }
        }
        Commands::Catalog { kind, account_type } => {
            commands::cmd_catalog(&service, &kind, account_type.as_deref()).await
        }
        Commands::Whatif {
            user,
            period,
            plan,
            addons,
            vas,
            disable_vas,
            block_premium_sms,
            block_roaming,
            checkout,
        } => {
            let period = commands::resolve_period(period.as_deref(), &config)?;
            let args = WhatIfArgs {
                plan,
                addons,
                vas,
                disable_vas,
                block_premium_sms,
                block_roaming,
            };
            commands::cmd_whatif(&service, user, &period, &args, checkout).await
        }
        Commands::Orders {
            user,
            limit,
            status,
        } => commands::cmd_orders(&service, user, limit, status.as_deref()).await,
        Commands::Order { id } => commands::cmd_order(&service, &id).await,
        Commands::CancelOrder { id } => commands::cmd_cancel_order(&service, &id).await,
        Commands::Recommend { user, max_price } => {
            commands::cmd_recommend(&service, user, max_price).await
        }
        Commands::Explain {
            user,
            period,
            usage,
            costs,
        } => {
            let period = commands::resolve_period(period.as_deref(), &config)?;
            commands::cmd_explain(&service, user, &period, usage.as_deref(), costs).await
        }
        Commands::App { user } => {
            let period = commands::resolve_period(None, &config)?;
            let stdin = io::stdin();
            commands::cmd_app(&service, &period, user, stdin.lock()).await
        }
    }
}
