//! Anomaly command implementations

use anyhow::{bail, Context, Result};
use fatura_core::format::money;
use fatura_core::models::{Anomaly, Severity};
use fatura_core::screens::{anomalies::anomaly_category_name, AnomaliesScreen};
use fatura_core::session::PeriodParams;
use fatura_core::ApiService;

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "🔴",
        Severity::Medium => "🟠",
        Severity::Low => "🟡",
    }
}

fn print_anomaly(anomaly: &Anomaly) {
    println!(
        "   {} {} ({})  {}",
        severity_icon(anomaly.severity),
        anomaly_category_name(&anomaly.category),
        anomaly.delta,
        anomaly.reason
    );
    if let (Some(current), Some(average)) = (anomaly.current_amount, anomaly.historical_average) {
        println!(
            "      {} this period vs {} on average",
            money(current),
            money(average)
        );
    }
    if let Some(action) = &anomaly.suggested_action {
        println!("      → {}", action);
    }
}

pub async fn cmd_anomalies(
    service: &ApiService,
    user_id: i64,
    period: &str,
    detailed: bool,
) -> Result<()> {
    let params = PeriodParams {
        user_id,
        period: period.to_string(),
    };
    let mut screen = AnomaliesScreen::new(service.clone(), params).detailed(detailed);
    screen.load().await;
    print_anomalies(&screen)
}

pub fn print_anomalies(screen: &AnomaliesScreen) -> Result<()> {
    let Some(analysis) = screen.analysis().data() else {
        match screen.analysis().error() {
            Some(err) => bail!("{}", err),
            None => bail!("Analysis is not loaded"),
        }
    };

    println!();
    println!("🔍 Anomalies for {}", screen.params().period);
    println!("   ─────────────────────────────────────────────────────────────");

    if let Some(level) = screen.risk_level() {
        println!(
            "   Risk: {} ({:.0}/100). {}",
            level.label(),
            analysis.risk_score,
            level.description()
        );
    }

    if screen.is_clean() {
        println!("   ✅ No anomalies found.");
        println!();
        return Ok(());
    }

    println!();
    for anomaly in screen.by_severity() {
        print_anomaly(anomaly);
    }

    if !analysis.recommendations.is_empty() {
        println!();
        println!("   Recommendations:");
        for rec in &analysis.recommendations {
            println!("     • {}", rec);
        }
    }
    println!();
    Ok(())
}

pub async fn cmd_anomaly_history(service: &ApiService, user_id: i64) -> Result<()> {
    let history = service
        .get_anomaly_history(user_id)
        .await
        .with_context(|| format!("Failed to load anomaly history for user {}", user_id))?;

    if history.is_empty() {
        println!("No past analyses for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("🕘 Anomaly history");
    for analysis in history {
        println!(
            "   {}  risk {:>3.0}  {} anomalies",
            analysis.period,
            analysis.risk_score,
            analysis.anomaly_count()
        );
    }
    println!();
    Ok(())
}
