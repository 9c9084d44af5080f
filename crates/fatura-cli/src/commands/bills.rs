//! Bill command implementations (dashboard, bill, history, periods)

use anyhow::{anyhow, bail, Context, Result};
use fatura_core::format::{money, percent, percent_change};
use fatura_core::models::BillData;
use fatura_core::screens::{category_label, BillDetailScreen, CategoryTotal, DashboardScreen};
use fatura_core::session::{DashboardParams, PeriodParams};
use fatura_core::{ApiService, ScreenError};

use super::truncate;

pub async fn cmd_dashboard(service: &ApiService, user_id: i64, period: &str) -> Result<()> {
    let params = DashboardParams {
        user_id,
        user_name: format!("#{}", user_id),
    };
    let mut screen = DashboardScreen::new(service.clone(), params, period);
    screen.load().await;
    print_dashboard(&screen)
}

/// Render both dashboard slices; a missing bill is reported once everything is shown
pub fn print_dashboard(screen: &DashboardScreen) -> Result<()> {
    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         📱 Fatura Dashboard {}     │", screen.period());
    println!("╰─────────────────────────────────────────╯");
    println!();

    match screen.bill_summary() {
        Some(bill) => {
            println!("  Bill:      {}", bill.bill_id);
            println!("  Total:     {}", money(bill.total_amount));
            println!(
                "  Subtotal:  {}   Taxes: {}",
                money(bill.subtotal),
                money(bill.taxes)
            );
            println!();
            print_breakdown(&screen.category_breakdown());
        }
        None => {
            match screen.bill().error() {
                Some(err) => println!("  ❌ Bill: {}", err),
                None => println!("  Bill is not loaded"),
            }
            println!();
        }
    }

    for line in anomaly_summary(screen) {
        println!("{}", line);
    }
    println!();

    if screen.bill_summary().is_none() {
        match screen.bill().error() {
            Some(err) => bail!("{}", err),
            None => bail!("Bill is not loaded"),
        }
    }
    Ok(())
}

/// Anomaly panel lines, independent of whether the bill loaded
pub fn anomaly_summary(screen: &DashboardScreen) -> Vec<String> {
    match (screen.anomalies().data(), screen.anomalies().error()) {
        (Some(analysis), _) => {
            let mut lines = vec![format!(
                "  ⚠️  Anomalies: {} (risk score {:.0})",
                analysis.anomaly_count(),
                analysis.risk_score
            )];
            if let Some(anomaly) = screen.headline_anomaly() {
                lines.push(format!(
                    "     {} {}: {}",
                    anomaly.delta, anomaly.category, anomaly.reason
                ));
            }
            lines
        }
        (None, Some(err)) => vec![format!("  ❌ Anomalies: {}", err)],
        (None, None) => Vec::new(),
    }
}

pub fn print_breakdown(breakdown: &[CategoryTotal]) {
    if breakdown.is_empty() {
        return;
    }
    println!("  By category:");
    for group in breakdown {
        println!(
            "    {:<14} {:>12}  {:>7}",
            group.label,
            money(group.total),
            percent(group.percentage)
        );
    }
    println!();
}

fn print_items(data: &BillData) {
    if data.items.is_empty() {
        return;
    }
    println!("  Items:");
    for item in &data.items {
        println!(
            "    {:<14} {:<32} {:>12}",
            category_label(&item.category),
            truncate(&item.description, 32),
            money(item.amount)
        );
    }
    println!();
}

pub async fn cmd_bill(service: &ApiService, user_id: i64, period: &str, details: bool) -> Result<()> {
    if !details {
        let data = service
            .get_bill(user_id, Some(period), true)
            .await
            .map_err(|e| anyhow!(ScreenError::for_bill(&e, period)))?;
        print_bill_header(&data, period);
        print_items(&data);
        return Ok(());
    }

    let params = PeriodParams {
        user_id,
        period: period.to_string(),
    };
    let mut screen = BillDetailScreen::new(service.clone(), params);
    screen.load().await;
    print_bill_detail(&screen)
}

fn print_bill_header(data: &BillData, period: &str) {
    let bill = &data.bill;
    println!();
    println!("🧾 Bill {} ({})", bill.bill_id, period);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {} → {}   issued {}",
        bill.period_start, bill.period_end, bill.issue_date
    );
    println!(
        "   Total {}  (subtotal {}, taxes {})",
        money(bill.total_amount),
        money(bill.subtotal),
        money(bill.taxes)
    );
    println!();
}

pub fn print_bill_detail(screen: &BillDetailScreen) -> Result<()> {
    let Some(data) = screen.bill().data() else {
        match screen.bill().error() {
            Some(err) => bail!("{}", err),
            None => bail!("Bill is not loaded"),
        }
    };

    print_bill_header(data, &screen.params().period);
    print_items(data);

    if let Some(details) = screen.details().data() {
        println!("  Breakdown:");
        for (category, group) in &details.breakdown {
            println!(
                "    {:<14} {:>12}  {:>7}",
                category_label(category),
                money(group.total),
                percent(group.percentage)
            );
        }
        if let Some(usage) = &details.usage_stats {
            println!(
                "  Usage: {} GB · {} min · {} SMS · {} premium SMS",
                usage.total_gb, usage.total_minutes, usage.total_sms, usage.premium_sms_count
            );
        }
        println!();
    } else if let Some(err) = screen.details().error() {
        println!("  ❌ Breakdown: {}", err);
    }

    match (screen.commentary().data(), screen.commentary().error()) {
        (Some(text), _) => println!("  💬 {}", text),
        (None, Some(err)) => println!("  ❌ Commentary: {}", err),
        (None, None) => {}
    }

    if let Some(plans) = screen.plans().data() {
        println!();
        println!("  Plans you could switch to:");
        for plan in plans {
            println!(
                "    #{:<4} {:<20} {:>10}  {} GB",
                plan.plan_id,
                truncate(&plan.plan_name, 20),
                money(plan.monthly_price),
                plan.quota_gb
            );
        }
    }
    println!();
    Ok(())
}

pub async fn cmd_history(service: &ApiService, user_id: i64, months: u32) -> Result<()> {
    let history = service
        .get_bill_history(user_id, months)
        .await
        .with_context(|| format!("Failed to load bill history for user {}", user_id))?;

    if history.is_empty() {
        println!("No bills in the last {} months.", months);
        return Ok(());
    }

    println!();
    println!("📈 Bill history");
    println!("   ─────────────────────────────");
    for entry in history {
        let change = if entry.change_percent == 0.0 {
            String::new()
        } else {
            percent_change(entry.change_percent)
        };
        println!(
            "   {}  {:>12}  {}",
            entry.period,
            money(entry.total_amount),
            change
        );
    }
    println!();
    Ok(())
}

pub async fn cmd_periods(service: &ApiService, user_id: i64) -> Result<()> {
    let periods = service
        .get_available_periods(user_id)
        .await
        .with_context(|| format!("Failed to load periods for user {}", user_id))?;

    if periods.is_empty() {
        println!("No bills found for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("📅 Periods with a bill");
    for p in periods {
        println!("   {}  {:>12}  {}", p.period, money(p.total_amount), p.bill_id);
    }
    println!();
    Ok(())
}
