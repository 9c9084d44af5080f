//! Typed service façade over the billing API
//!
//! One method per backend capability. Each performs exactly one request and
//! returns the unwrapped `data` payload; errors propagate unchanged from the
//! transport. There is no retry, batching or caching here: every call is a
//! fresh round trip.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{
    AccountType, Addon, AnomalyAnalysis, AvailablePeriod, BillData, BillDetails, BillHistoryItem,
    CancelResult, Catalog, CatalogStats, CheckoutEstimate, EstimateItem, Order, Plan, PremiumSms,
    Severity, User, UserDetails, UserProfile, UserStats, Vas, WhatIfResponse,
};
use crate::scenario::{CheckoutAction, ScenarioSubmission};
use crate::transport::{ApiClient, Endpoint};

/// Sort order for plan listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSort {
    PriceAsc,
    PriceDesc,
    GbAsc,
    GbDesc,
}

/// Sort order for addon listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddonSort {
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlanQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_gb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<PlanSort>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AddonQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub addon_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<AddonSort>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct VasQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PremiumSmsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<Severity>,
}

#[derive(Serialize)]
struct BillQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    period: Option<&'a str>,
    include_items: bool,
}

#[derive(Serialize)]
struct UserListQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    account_type: Option<AccountType>,
    limit: u32,
}

#[derive(Serialize)]
struct OrderHistoryQuery<'a> {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

#[derive(Serialize)]
struct UserPeriodBody<'a> {
    user_id: i64,
    period: &'a str,
}

#[derive(Serialize)]
struct WhatIfBody<'a> {
    user_id: i64,
    period: &'a str,
    scenario: &'a ScenarioSubmission,
}

#[derive(Serialize)]
struct CompareBody<'a> {
    user_id: i64,
    period: &'a str,
    scenarios: &'a [ScenarioSubmission],
}

#[derive(Serialize)]
struct CheckoutBody<'a> {
    user_id: i64,
    actions: &'a [CheckoutAction],
}

#[derive(Serialize)]
struct EstimateBody<'a> {
    user_id: i64,
    items: &'a [EstimateItem],
}

/// `data` of the VAS listing: `{services, grouped_by_category, categories}`
#[derive(Deserialize)]
struct VasListing {
    #[serde(default)]
    services: Vec<Vas>,
}

#[derive(Deserialize)]
struct AvailablePeriods {
    #[serde(default)]
    available_periods: Vec<AvailablePeriod>,
}

/// Billing API service
#[derive(Debug, Clone)]
pub struct ApiService {
    client: ApiClient,
}

impl ApiService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self::new(ApiClient::new(config)?))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ========== Bills ==========

    pub async fn get_bill(
        &self,
        user_id: i64,
        period: Option<&str>,
        include_items: bool,
    ) -> Result<BillData> {
        let query = BillQuery {
            period,
            include_items,
        };
        self.client
            .get_with_query(Endpoint::new("/bills").segment(user_id), &query)
            .await
    }

    pub async fn get_bill_history(&self, user_id: i64, months: u32) -> Result<Vec<BillHistoryItem>> {
        self.client
            .get_with_query(
                Endpoint::new("/bills").segment(user_id).segment("history"),
                &[("months", months)],
            )
            .await
    }

    pub async fn get_bill_details(&self, bill_id: &str) -> Result<BillDetails> {
        self.client
            .get(Endpoint::new("/bills/details").segment(bill_id))
            .await
    }

    pub async fn get_available_periods(&self, user_id: i64) -> Result<Vec<AvailablePeriod>> {
        let data: Option<AvailablePeriods> = self
            .client
            .get(Endpoint::new("/bills").segment(user_id).segment("available-periods"))
            .await?;
        Ok(data.map(|d| d.available_periods).unwrap_or_default())
    }

    // ========== Users ==========

    pub async fn get_all_users(
        &self,
        account_type: Option<AccountType>,
        limit: u32,
    ) -> Result<Vec<User>> {
        let query = UserListQuery {
            account_type,
            limit,
        };
        self.client.get_with_query("/users", &query).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<UserDetails> {
        self.client.get(Endpoint::new("/users").segment(user_id)).await
    }

    pub async fn get_user_by_msisdn(&self, msisdn: &str) -> Result<UserDetails> {
        self.client
            .get(Endpoint::new("/users/by-msisdn").segment(msisdn))
            .await
    }

    pub async fn get_user_profile(&self, user_id: i64) -> Result<UserProfile> {
        self.client
            .get(Endpoint::new("/users").segment(user_id).segment("profile"))
            .await
    }

    pub async fn get_user_stats(&self) -> Result<UserStats> {
        self.client.get("/users/stats").await
    }

    // ========== Catalog ==========

    pub async fn get_catalog(&self, account_type: Option<AccountType>) -> Result<Catalog> {
        #[derive(Serialize)]
        struct Query {
            #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
            account_type: Option<AccountType>,
        }
        self.client
            .get_with_query("/catalog", &Query { account_type })
            .await
    }

    pub async fn get_catalog_stats(&self) -> Result<CatalogStats> {
        self.client.get("/catalog/stats").await
    }

    pub async fn get_plans(&self, query: &PlanQuery) -> Result<Vec<Plan>> {
        self.client.get_with_query("/catalog/plans", query).await
    }

    pub async fn get_plan(&self, plan_id: i64) -> Result<Plan> {
        self.client
            .get(Endpoint::new("/catalog/plans").segment(plan_id))
            .await
    }

    pub async fn get_addons(&self, query: &AddonQuery) -> Result<Vec<Addon>> {
        self.client.get_with_query("/catalog/addons", query).await
    }

    /// VAS listing; the array is nested under `data.services`
    pub async fn get_vas(&self, query: &VasQuery) -> Result<Vec<Vas>> {
        let listing: Option<VasListing> =
            self.client.get_with_query("/catalog/vas", query).await?;
        Ok(listing.map(|l| l.services).unwrap_or_default())
    }

    /// VAS listing that resolves to an empty list on any failure
    ///
    /// For screens where VAS selection is optional and a missing list must
    /// not block the rest of the page.
    pub async fn get_vas_or_empty(&self, query: &VasQuery) -> Vec<Vas> {
        match self.get_vas(query).await {
            Ok(services) => services,
            Err(e) => {
                warn!("VAS catalog unavailable, continuing without it: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn get_premium_sms(&self, query: &PremiumSmsQuery) -> Result<Vec<PremiumSms>> {
        self.client
            .get_with_query("/catalog/premium-sms", query)
            .await
    }

    /// Plan/addon recommendations; `preferences` fields are merged into the body
    pub async fn get_recommendations(&self, user_id: i64, preferences: &Value) -> Result<Value> {
        let mut body = json!({ "user_id": user_id });
        if let (Some(target), Some(prefs)) = (body.as_object_mut(), preferences.as_object()) {
            for (key, value) in prefs {
                target.insert(key.clone(), value.clone());
            }
        }
        self.client.post("/catalog/recommendations", &body).await
    }

    // ========== Anomalies ==========

    pub async fn detect_anomalies(&self, user_id: i64, period: &str) -> Result<AnomalyAnalysis> {
        self.client
            .post("/anomalies", &UserPeriodBody { user_id, period })
            .await
    }

    pub async fn get_detailed_analysis(
        &self,
        user_id: i64,
        period: &str,
    ) -> Result<AnomalyAnalysis> {
        self.client
            .post("/anomalies/detailed", &UserPeriodBody { user_id, period })
            .await
    }

    pub async fn get_anomaly_history(&self, user_id: i64) -> Result<Vec<AnomalyAnalysis>> {
        self.client
            .get(Endpoint::new("/anomalies/history").segment(user_id))
            .await
    }

    // ========== What-if ==========

    pub async fn calculate_what_if(
        &self,
        user_id: i64,
        period: &str,
        scenario: &ScenarioSubmission,
    ) -> Result<WhatIfResponse> {
        self.client
            .post(
                "/whatif",
                &WhatIfBody {
                    user_id,
                    period,
                    scenario,
                },
            )
            .await
    }

    pub async fn compare_scenarios(
        &self,
        user_id: i64,
        period: &str,
        scenarios: &[ScenarioSubmission],
    ) -> Result<Vec<WhatIfResponse>> {
        self.client
            .post(
                "/whatif/compare",
                &CompareBody {
                    user_id,
                    period,
                    scenarios,
                },
            )
            .await
    }

    // ========== Checkout ==========

    pub async fn estimate_price(
        &self,
        user_id: i64,
        items: &[EstimateItem],
    ) -> Result<CheckoutEstimate> {
        self.client
            .post("/checkout/estimate", &EstimateBody { user_id, items })
            .await
    }

    pub async fn get_order_history(
        &self,
        user_id: i64,
        limit: u32,
        status: Option<&str>,
    ) -> Result<Vec<Order>> {
        self.client
            .get_with_query(
                Endpoint::new("/checkout/history").segment(user_id),
                &OrderHistoryQuery { limit, status },
            )
            .await
    }

    pub async fn process_checkout(&self, user_id: i64, actions: &[CheckoutAction]) -> Result<Order> {
        self.client
            .post("/checkout", &CheckoutBody { user_id, actions })
            .await
    }

    pub async fn get_order_status(&self, order_id: &str) -> Result<Order> {
        self.client.get(Endpoint::new("/checkout").segment(order_id)).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<CancelResult> {
        self.client.delete(Endpoint::new("/checkout").segment(order_id)).await
    }

    // ========== Explanations ==========

    pub async fn explain_bill(&self, user_id: i64, period: &str) -> Result<Value> {
        self.client
            .post("/explain", &UserPeriodBody { user_id, period })
            .await
    }

    pub async fn explain_usage(&self, user_id: i64, period: &str, category: &str) -> Result<Value> {
        self.client
            .post(
                Endpoint::new("/explain/usage").segment(category),
                &UserPeriodBody { user_id, period },
            )
            .await
    }

    pub async fn explain_costs(&self, user_id: i64, period: &str) -> Result<Value> {
        self.client
            .post("/explain/costs", &UserPeriodBody { user_id, period })
            .await
    }
}
