//! What-if simulation and checkout commands

use anyhow::{bail, Result};
use fatura_core::format::{money, percent};
use fatura_core::screens::{CheckoutScreen, WhatIfScreen};
use fatura_core::session::{CheckoutParams, WhatIfParams};
use fatura_core::{ApiService, SimulationResult};
use tracing::warn;

/// Scenario options from the command line
#[derive(Debug, Clone, Default)]
pub struct WhatIfArgs {
    pub plan: Option<i64>,
    pub addons: Vec<i64>,
    pub vas: Vec<String>,
    pub disable_vas: bool,
    pub block_premium_sms: bool,
    pub block_roaming: bool,
}

impl WhatIfArgs {
    /// Apply the options to a loaded simulator screen
    pub fn apply(&self, screen: &mut WhatIfScreen) {
        if let Some(plan_id) = self.plan {
            screen.select_plan(plan_id);
        }
        for &addon_id in &self.addons {
            screen.toggle_addon(addon_id);
        }
        for vas_id in &self.vas {
            screen.toggle_vas(vas_id);
        }
        if self.disable_vas {
            screen.toggle_disable_vas();
        }
        if self.block_premium_sms {
            screen.toggle_block_premium_sms();
        }
        if self.block_roaming {
            screen.toggle_roaming_block();
        }
    }
}

pub async fn cmd_whatif(
    service: &ApiService,
    user_id: i64,
    period: &str,
    args: &WhatIfArgs,
    checkout: bool,
) -> Result<()> {
    let params = WhatIfParams {
        user_id,
        user_name: format!("#{}", user_id),
        period: period.to_string(),
    };
    let mut screen = WhatIfScreen::new(service.clone(), params.clone());
    screen.load().await;
    if let Some(err) = screen.catalog().error() {
        warn!("Catalog unavailable: {}", err);
    }

    args.apply(&mut screen);
    screen.run_simulation().await?;
    print_simulation(&screen)?;

    if checkout {
        let (scenario, result) = screen.checkout_handoff()?;
        let params = CheckoutParams {
            user_id,
            user_name: params.user_name,
            period: params.period,
            scenario,
            result,
        };
        run_checkout(service, params).await?;
    }

    Ok(())
}

/// Print the scenario and its simulation outcome
pub fn print_simulation(screen: &WhatIfScreen) -> Result<()> {
    let Some(result) = screen.result().data() else {
        match screen.result().error() {
            Some(err) => bail!("{}", err),
            None => bail!("No simulation has been run"),
        }
    };

    let summary = screen.summary();
    println!();
    println!("🧮 What-if for {}", screen.params().period);
    println!("   ─────────────────────────────────────────────────────────────");
    if screen.scenario().selected_plan().is_some() {
        println!("   Plan:    {}", summary.plan_name);
    }
    if !summary.addon_names.is_empty() {
        println!("   Addons:  {}", summary.addon_names.join(", "));
    }
    if screen.scenario().disable_vas {
        println!("   VAS:     cancel all");
    } else if !summary.vas_names.is_empty() {
        println!("   VAS:     cancel {}", summary.vas_names.join(", "));
    }
    if screen.scenario().block_premium_sms {
        println!("   Premium SMS blocked");
    }
    if screen.scenario().enable_roaming_block {
        println!("   Roaming blocked");
    }
    println!();
    println!("   Current: {}", money(result.current_total));
    println!("   New:     {}", money(result.new_total));
    println!("   {}", saving_text(result));

    for line in &result.details {
        println!("     • {}", line);
    }
    for rec in &result.recommendations {
        println!("     → {}", rec);
    }
    println!();
    Ok(())
}

/// One-line verdict on a simulation
pub fn saving_text(result: &SimulationResult) -> String {
    if result.saving >= 0.0 {
        format!(
            "💰 Saving {} ({})",
            money(result.saving),
            percent(result.saving_percent)
        )
    } else {
        format!("⚠️  Costs {} more", money(result.saving.abs()))
    }
}

/// Show the order summary, submit it and print the confirmation
pub async fn run_checkout(service: &ApiService, params: CheckoutParams) -> Result<()> {
    let mut screen = CheckoutScreen::new(service.clone(), params);
    print_checkout_summary(&screen);
    submit_checkout(&mut screen).await
}

pub fn print_checkout_summary(screen: &CheckoutScreen) {
    let summary = screen.summary();

    println!();
    println!("🛒 Checkout");
    println!("   ─────────────────────────────");
    for action in screen.actions() {
        println!("   • {}", action.describe());
    }
    println!(
        "   {} → {}  ({} {})",
        summary.current_total,
        summary.new_total,
        if summary.is_saving { "saving" } else { "extra" },
        summary.saving
    );
    println!();
}

pub async fn submit_checkout(screen: &mut CheckoutScreen) -> Result<()> {
    screen.submit().await?;

    let Some(confirmation) = screen.confirmation() else {
        match screen.order().error() {
            Some(err) => bail!("Checkout failed: {}", err),
            None => bail!("Checkout did not complete"),
        }
    };

    println!("✅ Order {} placed", confirmation.order_id);
    if let Some(status) = &confirmation.status {
        println!("   Status: {}", status);
    }
    if let Some(date) = &confirmation.effective_date {
        println!("   Effective from {}", date);
    }
    if let Some(estimate) = &confirmation.next_bill_estimate {
        println!("   Next bill estimate: {}", estimate);
    }
    if let Some(saving) = &confirmation.total_saving {
        println!("   Total saving: {}", saving);
    }
    println!();
    Ok(())
}
