//! Domain models for Fatura
//!
//! All entities are owned by the billing backend. Field names follow the
//! backend's snake_case JSON so the types decode the `data` payload directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

// ========== Enums ==========

/// Subscriber account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Postpaid,
    Prepaid,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postpaid => "postpaid",
            Self::Prepaid => "prepaid",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postpaid" => Ok(Self::Postpaid),
            "prepaid" => Ok(Self::Prepaid),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Anomaly severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ========== Users ==========

/// Subscriber as listed on the user selection screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub msisdn: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub current_plan: Option<PlanSummary>,
    #[serde(default)]
    pub active_vas_count: u32,
    #[serde(default)]
    pub active_addons_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan_id: i64,
    pub plan_name: String,
    pub monthly_price: f64,
    #[serde(default)]
    pub quota_gb: f64,
}

/// Full subscriber record with active services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub user_id: i64,
    pub name: String,
    pub msisdn: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub current_plan: Option<UserPlan>,
    #[serde(default)]
    pub active_vas: Vec<ActiveVas>,
    #[serde(default)]
    pub active_addons: Vec<ActiveAddon>,
    pub account_summary: Option<AccountSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPlan {
    pub plan_id: i64,
    pub plan_name: String,
    #[serde(default)]
    pub quota_gb: f64,
    #[serde(default)]
    pub quota_min: f64,
    #[serde(default)]
    pub quota_sms: f64,
    pub monthly_price: f64,
    #[serde(default)]
    pub overage_gb: f64,
    #[serde(default)]
    pub overage_min: f64,
    #[serde(default)]
    pub overage_sms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveVas {
    pub vas_id: String,
    pub name: String,
    pub monthly_fee: f64,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveAddon {
    pub addon_id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub addon_type: String,
    pub price: f64,
    #[serde(default)]
    pub extra_gb: f64,
    #[serde(default)]
    pub extra_min: f64,
    #[serde(default)]
    pub extra_sms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub total_monthly_cost: f64,
    #[serde(default)]
    pub services_count: u32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_info: UserInfo,
    pub current_plan: Option<ProfilePlan>,
    pub services: ServiceCounts,
    pub membership: Option<Membership>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: i64,
    pub name: String,
    pub msisdn: String,
    pub account_type: AccountType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePlan {
    pub name: String,
    pub monthly_price: f64,
    pub quotas: Quotas,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotas {
    pub data_gb: f64,
    pub voice_min: f64,
    pub sms_count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCounts {
    pub vas_count: u32,
    pub addon_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub member_since: String,
    pub last_updated: String,
}

/// Subscriber population statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_users: u32,
    pub user_types: UserTypeStats,
    pub service_adoption: ServiceAdoption,
    pub analysis_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTypeStats {
    pub postpaid: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub postpaid_percentage: String,
    pub prepaid: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub prepaid_percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAdoption {
    pub vas_users: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub vas_adoption_rate: String,
    pub addon_users: u32,
    #[serde(deserialize_with = "lenient::string")]
    pub addon_adoption_rate: String,
}

// ========== Bills ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub bill_id: String,
    pub user_id: i64,
    pub period_start: String,
    pub period_end: String,
    #[serde(default)]
    pub issue_date: String,
    pub total_amount: f64,
    pub subtotal: f64,
    pub taxes: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "TRY".to_string()
}

/// One line on a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub item_id: String,
    pub category: String,
    #[serde(default)]
    pub subtype: String,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSummary {
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
    pub item_count: u32,
}

/// A bill with its items, as returned by `GET /bills/{user_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillData {
    pub bill: Bill,
    #[serde(default)]
    pub items: Vec<BillItem>,
    pub summary: Option<BillSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillHistoryItem {
    pub period: String,
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub change_percent: f64,
    #[serde(default)]
    pub issue_date: String,
    pub bill_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailablePeriod {
    pub period: String,
    pub period_start: String,
    pub period_end: String,
    #[serde(default)]
    pub issue_date: String,
    pub total_amount: f64,
    pub bill_id: String,
}

/// Bill with per-category breakdown and usage statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDetails {
    pub bill: Bill,
    #[serde(default)]
    pub items: Vec<BillItem>,
    pub summary: Option<BillSummary>,
    #[serde(default)]
    pub breakdown: BTreeMap<String, CategoryBreakdown>,
    pub usage_stats: Option<UsageStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub total: f64,
    #[serde(default)]
    pub items: Vec<BreakdownItem>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub total_gb: f64,
    pub total_minutes: f64,
    pub total_sms: f64,
    pub roaming_mb: f64,
    pub premium_sms_count: u32,
    pub vas_count: u32,
}

// ========== Catalog ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: i64,
    pub plan_name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub monthly_price: f64,
    #[serde(default)]
    pub quota_gb: f64,
    #[serde(default)]
    pub quota_min: f64,
    #[serde(default)]
    pub quota_sms: f64,
    #[serde(default)]
    pub overage_gb: f64,
    #[serde(default)]
    pub overage_min: f64,
    #[serde(default)]
    pub overage_sms: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addon {
    pub addon_id: i64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub addon_type: String,
    pub price: f64,
    #[serde(default)]
    pub extra_gb: f64,
    #[serde(default)]
    pub extra_min: f64,
    #[serde(default)]
    pub extra_sms: f64,
    #[serde(default)]
    pub description: String,
}

/// Value-added service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vas {
    pub vas_id: String,
    pub name: String,
    pub monthly_fee: f64,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumSms {
    pub shortcode: String,
    pub service_name: String,
    #[serde(default)]
    pub provider: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    pub risk_level: Severity,
}

/// Everything in the catalog, as returned by `GET /catalog`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub addons: Vec<Addon>,
    #[serde(default)]
    pub vas: Vec<Vas>,
    #[serde(default)]
    pub premium_sms: Vec<PremiumSms>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_plans: u32,
    pub total_addons: u32,
    pub total_vas: u32,
    pub total_premium_sms: u32,
    pub price_ranges: PriceRanges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRanges {
    pub plans: PriceRange,
    pub addons: PriceRange,
    pub vas: PriceRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

// ========== Anomalies ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub category: String,
    /// Signed change, e.g. "+%120" or "+45.00"
    #[serde(deserialize_with = "lenient::string")]
    pub delta: String,
    pub reason: String,
    pub severity: Severity,
    #[serde(default)]
    pub confidence: f64,
    pub current_amount: Option<f64>,
    pub historical_average: Option<f64>,
    pub suggested_action: Option<String>,
    #[serde(default)]
    pub first_occurrence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAnalysis {
    #[serde(default)]
    pub anomalies: Vec<Anomaly>,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub period: String,
    pub user_id: Option<i64>,
    pub total_anomalies: Option<u32>,
}

impl AnomalyAnalysis {
    /// Count reported by the backend, else the list length
    pub fn anomaly_count(&self) -> usize {
        self.total_anomalies
            .map(|n| n as usize)
            .unwrap_or(self.anomalies.len())
    }
}

// ========== What-if ==========

/// Raw what-if response; normalized by `scenario::SimulationResult`
///
/// The backend has shipped both `saving_percent` and `saving_percentage`,
/// as numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhatIfResponse {
    pub scenario_id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub current_total: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub new_total: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub saving: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub saving_percent: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub saving_percentage: Option<f64>,
    #[serde(default)]
    pub details: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub scenario_summary: Option<String>,
    pub effective_date: Option<String>,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    pub breakdown: Option<serde_json::Value>,
}

// ========== Checkout ==========

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutEstimate {
    pub estimated_total: f64,
    pub breakdown: EstimateBreakdown,
    #[serde(default)]
    pub savings: f64,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub plan_cost: f64,
    pub addons_cost: f64,
    pub vas_cost: f64,
    pub taxes: f64,
}

/// Item to price with `POST /checkout/estimate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateItem {
    #[serde(rename = "type")]
    pub kind: OrderItemKind,
    pub id: ItemId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderItemKind {
    Plan,
    Addon,
    Vas,
}

/// Catalog ids are numeric for plans/addons and strings for VAS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "type")]
    pub kind: OrderItemKind,
    pub id: ItemId,
    pub name: String,
    pub price: f64,
}

/// Order created by checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: Option<f64>,
    pub status: Option<OrderStatus>,
    pub created_at: Option<String>,
    pub estimated_completion: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_saving: Option<f64>,
    pub effective_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub next_bill_estimate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Deserializers for fields the backend sends as either numbers or strings
mod lenient {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    fn parse_number(s: &str) -> Option<f64> {
        s.trim()
            .trim_start_matches('%')
            .trim_end_matches('%')
            .trim()
            .parse()
            .ok()
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<NumOrStr>::deserialize(d)? {
            Some(NumOrStr::Num(n)) => Some(n),
            Some(NumOrStr::Str(s)) => parse_number(&s),
            None => None,
        })
    }

    pub fn f64_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        opt_f64(d).map(|v| v.unwrap_or(0.0))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match NumOrStr::deserialize(d)? {
            NumOrStr::Num(n) => n.to_string(),
            NumOrStr::Str(s) => s,
        })
    }
}
