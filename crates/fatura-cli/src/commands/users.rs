//! Subscriber command implementations (users, user, profile, stats)

use anyhow::{anyhow, bail, Context, Result};
use fatura_core::format::money;
use fatura_core::models::{AccountType, UserDetails};
use fatura_core::ApiService;

use super::truncate;

/// Parse a `--type` value
pub fn parse_account_type(value: Option<&str>) -> Result<Option<AccountType>> {
    value
        .map(|s| s.parse::<AccountType>().map_err(|e| anyhow!(e)))
        .transpose()
}

pub async fn cmd_users(service: &ApiService, account_type: Option<&str>, limit: u32) -> Result<()> {
    let account_type = parse_account_type(account_type)?;
    let users = service
        .get_all_users(account_type, limit)
        .await
        .context("Failed to list users")?;

    if users.is_empty() {
        println!("No users found.");
        return Ok(());
    }

    println!();
    println!("👥 Users ({})", users.len());
    println!("   ─────────────────────────────────────────────────────────────");

    for user in users {
        let plan = user
            .current_plan
            .as_ref()
            .map(|p| p.plan_name.as_str())
            .unwrap_or("-");
        println!(
            "   {:>6}  {:<24} {:<9} {:<13} {}",
            user.user_id,
            truncate(&user.name, 24),
            user.account_type,
            user.msisdn,
            plan
        );
    }

    println!();
    Ok(())
}

pub async fn cmd_user(service: &ApiService, id: Option<i64>, msisdn: Option<&str>) -> Result<()> {
    let user = match (id, msisdn) {
        (_, Some(msisdn)) => service
            .get_user_by_msisdn(msisdn)
            .await
            .with_context(|| format!("Failed to find user with MSISDN {}", msisdn))?,
        (Some(id), None) => service
            .get_user(id)
            .await
            .with_context(|| format!("Failed to load user {}", id))?,
        (None, None) => bail!("Give a user id or --msisdn"),
    };

    print_user(&user);
    Ok(())
}

fn print_user(user: &UserDetails) {
    println!();
    println!("👤 {} (#{})", user.name, user.user_id);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   MSISDN:  {}", user.msisdn);
    println!("   Type:    {}", user.account_type);

    match &user.current_plan {
        Some(plan) => println!(
            "   Plan:    {} ({}/mo, {} GB)",
            plan.plan_name,
            money(plan.monthly_price),
            plan.quota_gb
        ),
        None => println!("   Plan:    (none)"),
    }

    if !user.active_vas.is_empty() {
        println!();
        println!("   Value-added services:");
        for vas in &user.active_vas {
            println!("     {:<12} {:<24} {}", vas.vas_id, vas.name, money(vas.monthly_fee));
        }
    }

    if !user.active_addons.is_empty() {
        println!();
        println!("   Addons:");
        for addon in &user.active_addons {
            println!("     #{:<5} {:<24} {}", addon.addon_id, addon.name, money(addon.price));
        }
    }

    if let Some(summary) = &user.account_summary {
        println!();
        println!("   Monthly cost: {}", money(summary.total_monthly_cost));
    }
    println!();
}

pub async fn cmd_profile(service: &ApiService, id: i64) -> Result<()> {
    let profile = service
        .get_user_profile(id)
        .await
        .with_context(|| format!("Failed to load profile for user {}", id))?;

    let info = &profile.user_info;
    println!();
    println!("👤 {} ({})", info.name, info.account_type);
    println!("   MSISDN: {}", info.msisdn);

    if let Some(plan) = &profile.current_plan {
        println!(
            "   Plan:   {} {} · {} GB · {} min · {} SMS",
            plan.name,
            money(plan.monthly_price),
            plan.quotas.data_gb,
            plan.quotas.voice_min,
            plan.quotas.sms_count
        );
    }
    println!(
        "   Services: {} VAS, {} addons",
        profile.services.vas_count, profile.services.addon_count
    );
    if let Some(membership) = &profile.membership {
        println!("   Member since {}", membership.member_since);
    }
    println!();
    Ok(())
}

pub async fn cmd_stats(service: &ApiService) -> Result<()> {
    let stats = service
        .get_user_stats()
        .await
        .context("Failed to load user statistics")?;

    println!();
    println!("📊 Subscriber statistics ({})", stats.analysis_date);
    println!("   ─────────────────────────────");
    println!("   Total users: {}", stats.total_users);
    println!(
        "   Postpaid:    {} (%{})",
        stats.user_types.postpaid, stats.user_types.postpaid_percentage
    );
    println!(
        "   Prepaid:     {} (%{})",
        stats.user_types.prepaid, stats.user_types.prepaid_percentage
    );
    println!(
        "   VAS users:   {} (%{})",
        stats.service_adoption.vas_users, stats.service_adoption.vas_adoption_rate
    );
    println!(
        "   Addon users: {} (%{})",
        stats.service_adoption.addon_users, stats.service_adoption.addon_adoption_rate
    );
    println!();
    Ok(())
}
