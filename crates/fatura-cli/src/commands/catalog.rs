//! Catalog browsing

use anyhow::{bail, Context, Result};
use fatura_core::format::money;
use fatura_core::models::{Addon, Plan, PremiumSms, Vas};
use fatura_core::{AddonQuery, ApiService, PlanQuery, PremiumSmsQuery, VasQuery};
use serde_json::{json, Map, Value};

use super::{parse_account_type, truncate};

fn print_plans(plans: &[Plan]) {
    println!("  📶 Plans");
    for plan in plans {
        println!(
            "    #{:<4} {:<20} {:<9} {:>10}  {} GB · {} min · {} SMS",
            plan.plan_id,
            truncate(&plan.plan_name, 20),
            plan.account_type,
            money(plan.monthly_price),
            plan.quota_gb,
            plan.quota_min,
            plan.quota_sms
        );
    }
    println!();
}

fn print_addons(addons: &[Addon]) {
    println!("  ➕ Addons");
    for addon in addons {
        println!(
            "    #{:<4} {:<20} {:<6} {:>10}",
            addon.addon_id,
            truncate(&addon.name, 20),
            addon.addon_type,
            money(addon.price)
        );
    }
    println!();
}

fn print_vas(services: &[Vas]) {
    println!("  🎵 Value-added services");
    for vas in services {
        println!(
            "    {:<12} {:<20} {:<14} {:>10}/mo",
            vas.vas_id,
            truncate(&vas.name, 20),
            vas.category,
            money(vas.monthly_fee)
        );
    }
    println!();
}

fn print_premium_sms(entries: &[PremiumSms]) {
    println!("  ✉️  Premium SMS");
    for sms in entries {
        println!(
            "    {:<6} {:<20} {:>10}  risk {}",
            sms.shortcode,
            truncate(&sms.service_name, 20),
            money(sms.price),
            sms.risk_level
        );
    }
    println!();
}

pub async fn cmd_catalog(service: &ApiService, kind: &str, account_type: Option<&str>) -> Result<()> {
    let account_type = parse_account_type(account_type)?;
    println!();

    match kind {
        "plans" => {
            let query = PlanQuery {
                account_type,
                ..Default::default()
            };
            let plans = service
                .get_plans(&query)
                .await
                .context("Failed to load plans")?;
            print_plans(&plans);
        }
        "addons" => {
            let addons = service
                .get_addons(&AddonQuery::default())
                .await
                .context("Failed to load addons")?;
            print_addons(&addons);
        }
        "vas" => {
            let services = service
                .get_vas(&VasQuery::default())
                .await
                .context("Failed to load value-added services")?;
            print_vas(&services);
        }
        "premium-sms" => {
            let entries = service
                .get_premium_sms(&PremiumSmsQuery::default())
                .await
                .context("Failed to load premium SMS services")?;
            print_premium_sms(&entries);
        }
        "stats" => {
            let stats = service
                .get_catalog_stats()
                .await
                .context("Failed to load catalog statistics")?;
            let ranges = &stats.price_ranges;
            println!("  📦 Catalog");
            println!(
                "    Plans:       {:>3}  {} – {}",
                stats.total_plans,
                money(ranges.plans.min),
                money(ranges.plans.max)
            );
            println!(
                "    Addons:      {:>3}  {} – {}",
                stats.total_addons,
                money(ranges.addons.min),
                money(ranges.addons.max)
            );
            println!(
                "    VAS:         {:>3}  {} – {}",
                stats.total_vas,
                money(ranges.vas.min),
                money(ranges.vas.max)
            );
            println!("    Premium SMS: {:>3}", stats.total_premium_sms);
            println!();
        }
        "all" => {
            let catalog = service
                .get_catalog(account_type)
                .await
                .context("Failed to load catalog")?;
            print_plans(&catalog.plans);
            print_addons(&catalog.addons);
            print_vas(&catalog.vas);
            print_premium_sms(&catalog.premium_sms);
        }
        other => bail!(
            "Unknown catalog section '{}'. Use: plans, addons, vas, premium-sms, stats, all",
            other
        ),
    }

    Ok(())
}

/// Plan and addon suggestions for one subscriber
pub async fn cmd_recommend(service: &ApiService, user_id: i64, max_price: Option<f64>) -> Result<()> {
    let mut preferences = Map::new();
    if let Some(max) = max_price {
        preferences.insert("max_price".to_string(), json!(max));
    }

    let value = service
        .get_recommendations(user_id, &Value::Object(preferences))
        .await
        .with_context(|| format!("Failed to load recommendations for user {}", user_id))?;

    let plans: Vec<Plan> = value
        .get("recommended_plans")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .context("Unexpected recommended plan format")?
        .unwrap_or_default();
    let addons: Vec<Addon> = value
        .get("recommended_addons")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .context("Unexpected recommended addon format")?
        .unwrap_or_default();

    println!();
    println!("💡 Recommendations for user {}", user_id);
    println!();
    if plans.is_empty() && addons.is_empty() {
        println!("  Nothing to recommend right now.");
        println!();
    }
    if !plans.is_empty() {
        print_plans(&plans);
    }
    if !addons.is_empty() {
        print_addons(&addons);
    }
    if let Some(reason) = value.get("reasoning").and_then(Value::as_str) {
        println!("  {}", reason);
        println!();
    }
    Ok(())
}
