//! Order command implementations (orders, order, cancel-order)

use anyhow::{anyhow, bail, Context, Result};
use fatura_core::format::money;
use fatura_core::models::{Order, OrderStatus};
use fatura_core::ApiService;

fn print_order(order: &Order) {
    let status = order
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let total = order.total_amount.map(money).unwrap_or_default();
    println!(
        "   {:<10} {:<11} {:>12}  {}",
        order.order_id,
        status,
        total,
        order.created_at.as_deref().unwrap_or("")
    );
    for item in &order.items {
        println!(
            "      {:?} {:<8} {:<20} {}",
            item.kind,
            item.id,
            item.name,
            money(item.price)
        );
    }
}

pub async fn cmd_orders(
    service: &ApiService,
    user_id: i64,
    limit: u32,
    status: Option<&str>,
) -> Result<()> {
    // Validate locally so a typo is not sent as a filter
    if let Some(s) = status {
        s.parse::<OrderStatus>().map_err(|e| anyhow!(e))?;
    }

    let orders = service
        .get_order_history(user_id, limit, status)
        .await
        .with_context(|| format!("Failed to load orders for user {}", user_id))?;

    if orders.is_empty() {
        println!("No orders found.");
        return Ok(());
    }

    println!();
    println!("📦 Orders");
    println!("   ─────────────────────────────────────────────────────────────");
    for order in &orders {
        print_order(order);
    }
    println!();
    Ok(())
}

pub async fn cmd_order(service: &ApiService, order_id: &str) -> Result<()> {
    let order = service
        .get_order_status(order_id)
        .await
        .with_context(|| format!("Failed to load order {}", order_id))?;

    println!();
    print_order(&order);
    if let Some(eta) = &order.estimated_completion {
        println!("   Expected completion: {}", eta);
    }
    println!();
    Ok(())
}

pub async fn cmd_cancel_order(service: &ApiService, order_id: &str) -> Result<()> {
    let result = service
        .cancel_order(order_id)
        .await
        .with_context(|| format!("Failed to cancel order {}", order_id))?;

    if !result.success {
        bail!("Order {} was not cancelled: {}", order_id, result.message);
    }

    if result.message.is_empty() {
        println!("✅ Order {} cancelled", order_id);
    } else {
        println!("✅ {}", result.message);
    }
    Ok(())
}
