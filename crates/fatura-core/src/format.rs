//! Display formatting for amounts and percentages

/// Currency symbol for Turkish lira amounts
pub const CURRENCY_SYMBOL: &str = "₺";

/// Format an amount with two decimals, e.g. `₺42.50`
pub fn money(amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", CURRENCY_SYMBOL, amount.abs())
    } else {
        format!("{}{:.2}", CURRENCY_SYMBOL, amount)
    }
}

/// Format a percentage with one decimal, e.g. `%21.3`
pub fn percent(value: f64) -> String {
    format!("%{:.1}", value)
}

/// Signed percentage change, e.g. `+%233.3` or `-%12.0`
pub fn percent_change(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "+" };
    format!("{}{}", sign, percent(value.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_two_decimals() {
        assert_eq!(money(42.5), "₺42.50");
        assert_eq!(money(1000.0), "₺1000.00");
        assert_eq!(money(0.126), "₺0.13");
        assert_eq!(money(-3.2), "-₺3.20");
    }

    #[test]
    fn test_percent_one_decimal() {
        assert_eq!(percent(21.26), "%21.3");
        assert_eq!(percent(8.0), "%8.0");
    }

    #[test]
    fn test_percent_change_sign() {
        assert_eq!(percent_change(233.33), "+%233.3");
        assert_eq!(percent_change(-12.0), "-%12.0");
    }
}
