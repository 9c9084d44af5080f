//! Plain-language bill explanations

use anyhow::{Context, Result};
use fatura_core::screens::bill_detail::commentary_text;
use fatura_core::ApiService;
use serde_json::Value;

/// Readable text for a usage or cost explanation
fn explanation_text(value: &Value) -> String {
    match value.get("explanation").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => commentary_text(value),
    }
}

pub async fn cmd_explain(
    service: &ApiService,
    user_id: i64,
    period: &str,
    usage: Option<&str>,
    costs: bool,
) -> Result<()> {
    let text = match (usage, costs) {
        (Some(category), _) => {
            let value = service
                .explain_usage(user_id, period, category)
                .await
                .with_context(|| format!("Failed to explain {} usage", category))?;
            explanation_text(&value)
        }
        (None, true) => {
            let value = service
                .explain_costs(user_id, period)
                .await
                .context("Failed to explain costs")?;
            explanation_text(&value)
        }
        (None, false) => {
            let value = service
                .explain_bill(user_id, period)
                .await
                .context("Failed to explain bill")?;
            commentary_text(&value)
        }
    };

    println!();
    println!("💬 {}", text);
    println!();
    Ok(())
}
