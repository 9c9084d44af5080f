//! Test utilities for fatura-core
//!
//! A mock billing backend serving canned `{success, data}` envelopes for
//! every endpoint the client uses. Tests can make individual endpoints fail
//! and inspect the request log, e.g. to assert that no request was sent.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::config::ClientConfig;
use crate::service::ApiService;

/// Period with a bill for every mock subscriber
pub const MOCK_PERIOD: &str = "2025-07";
/// Earlier period with a bill
pub const MOCK_PREVIOUS_PERIOD: &str = "2025-06";
/// Postpaid subscriber with a current plan
pub const MOCK_USER_ID: i64 = 1001;
/// Prepaid subscriber without a plan
pub const MOCK_PREPAID_USER_ID: i64 = 1002;

/// How an endpoint should fail
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// `{success: false, error: {code, message}}` with the given status
    Envelope {
        status: u16,
        code: String,
        message: String,
    },
    /// Plain status with a non-JSON body
    Status(u16),
    /// `{success: true, data}` with a payload the endpoint would never send
    Data(Value),
}

impl MockFailure {
    pub fn envelope(status: u16, code: &str, message: &str) -> Self {
        Self::Envelope {
            status,
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// One request as the mock server saw it
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path without the `/api` prefix, e.g. `/bills/1001`
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    failures: HashMap<String, MockFailure>,
    /// Paths whose failure is dropped after the first hit
    one_shot: HashSet<String>,
    requests: Vec<RecordedRequest>,
    order_seq: u32,
}

type Shared = Arc<Mutex<MockState>>;

/// Mock billing backend for tests
pub struct MockBillingServer {
    addr: SocketAddr,
    state: Shared,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBillingServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let api = Router::new()
            .route("/users", get(handle_users))
            .route("/users/stats", get(handle_user_stats))
            .route("/users/by-msisdn/:msisdn", get(handle_user_by_msisdn))
            .route("/users/:user_id", get(handle_user))
            .route("/users/:user_id/profile", get(handle_user_profile))
            .route("/bills/details/:bill_id", get(handle_bill_details))
            .route("/bills/:user_id", get(handle_bill))
            .route("/bills/:user_id/history", get(handle_bill_history))
            .route("/bills/:user_id/available-periods", get(handle_available_periods))
            .route("/catalog", get(handle_catalog))
            .route("/catalog/stats", get(handle_catalog_stats))
            .route("/catalog/plans", get(handle_plans))
            .route("/catalog/plans/:plan_id", get(handle_plan))
            .route("/catalog/addons", get(handle_addons))
            .route("/catalog/vas", get(handle_vas))
            .route("/catalog/premium-sms", get(handle_premium_sms))
            .route("/catalog/recommendations", post(handle_recommendations))
            .route("/anomalies", post(handle_anomalies))
            .route("/anomalies/detailed", post(handle_detailed_anomalies))
            .route("/anomalies/history/:user_id", get(handle_anomaly_history))
            .route("/whatif", post(handle_whatif))
            .route("/whatif/compare", post(handle_compare))
            .route("/checkout", post(handle_checkout))
            .route("/checkout/estimate", post(handle_estimate))
            .route("/checkout/history/:user_id", get(handle_order_history))
            .route(
                "/checkout/:order_id",
                get(handle_order_status).delete(handle_cancel_order),
            )
            .route("/explain", post(handle_explain))
            .route("/explain/costs", post(handle_explain_costs))
            .route("/explain/usage/:category", post(handle_explain_usage))
            .with_state(state.clone());

        let app = Router::new()
            .nest("/api", api)
            .layer(middleware::from_fn_with_state(state.clone(), record_and_fail));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL including the `/api` prefix
    pub fn url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(&self.url())
            .with_timeout(Duration::from_secs(5))
    }

    /// Service pointed at this server
    pub fn service(&self) -> ApiService {
        ApiService::from_config(&self.config()).unwrap()
    }

    /// Make every request to `path` (without `/api`) fail
    pub fn fail(&self, path: &str, failure: MockFailure) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(path.to_string(), failure);
    }

    /// Fail only the next request to `path`
    pub fn fail_once(&self, path: &str, failure: MockFailure) {
        let mut state = self.state.lock().unwrap();
        state.failures.insert(path.to_string(), failure);
        state.one_shot.insert(path.to_string());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.failures.clear();
        state.one_shot.clear();
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Requests whose path equals `path`
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBillingServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Log every request, then short-circuit configured failures
async fn record_and_fail(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();

    let path = parts
        .uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(parts.uri.path())
        .to_string();

    let failure = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: parts.method.to_string(),
            path: path.clone(),
            query: parts.uri.query().map(str::to_string),
            body: serde_json::from_slice(&bytes).ok(),
        });
        if state.one_shot.remove(&path) {
            state.failures.remove(&path)
        } else {
            state.failures.get(&path).cloned()
        }
    };

    match failure {
        Some(MockFailure::Envelope {
            status,
            code,
            message,
        }) => error_response(status, &code, &message),
        Some(MockFailure::Data(data)) => ok(data),
        Some(MockFailure::Status(status)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "upstream unavailable",
        )
            .into_response(),
        None => {
            next.run(Request::from_parts(parts, Body::from(bytes)))
                .await
        }
    }
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn error_response(status: u16, code: &str, message: &str) -> Response {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({
            "success": false,
            "error": { "code": code, "message": message }
        })),
    )
        .into_response()
}

fn not_found(code: &str, message: &str) -> Response {
    error_response(404, code, message)
}

// ========== Canned data ==========

fn plan_json(plan_id: i64) -> Option<Value> {
    let (name, kind, price, gb) = match plan_id {
        1 => ("Mini 5GB", "postpaid", 149.9, 5.0),
        2 => ("Standart 20GB", "postpaid", 249.9, 20.0),
        3 => ("Sınırsız 50GB", "postpaid", 349.9, 50.0),
        4 => ("Hazır Kart 10GB", "prepaid", 129.9, 10.0),
        _ => return None,
    };
    Some(json!({
        "plan_id": plan_id,
        "plan_name": name,
        "type": kind,
        "monthly_price": price,
        "quota_gb": gb,
        "quota_min": 1000,
        "quota_sms": 500,
        "overage_gb": 8.5,
        "overage_min": 0.5,
        "overage_sms": 0.25,
        "features": ["5G"]
    }))
}

fn plans_json() -> Vec<Value> {
    (1..=4).filter_map(plan_json).collect()
}

fn addons_json() -> Value {
    json!([
        {"addon_id": 11, "name": "Extra 5GB", "type": "data", "price": 49.9, "extra_gb": 5},
        {"addon_id": 12, "name": "Social 10GB", "type": "data", "price": 39.9, "extra_gb": 10},
        {"addon_id": 13, "name": "500 Minutes", "type": "voice", "price": 29.9, "extra_min": 500}
    ])
}

fn vas_json() -> Value {
    json!([
        {"vas_id": "VAS_MUSIC", "name": "Music Plus", "monthly_fee": 19.9, "provider": "Melodi", "category": "entertainment", "rating": 4.2},
        {"vas_id": "VAS_GAME", "name": "Game Club", "monthly_fee": 24.9, "provider": "Oyun", "category": "games", "rating": 3.8}
    ])
}

fn premium_sms_json() -> Value {
    json!([
        {"shortcode": "3311", "service_name": "Daily Horoscope", "provider": "Yıldız", "price": 9.9, "category": "content", "risk_level": "medium"},
        {"shortcode": "4455", "service_name": "Contest Line", "provider": "Yarışma", "price": 19.9, "category": "contest", "risk_level": "high"}
    ])
}

fn user_json(user_id: i64) -> Option<Value> {
    match user_id {
        MOCK_USER_ID => Some(json!({
            "user_id": MOCK_USER_ID,
            "name": "Ayşe Yılmaz",
            "msisdn": "905551112233",
            "type": "postpaid",
            "current_plan": plan_json(2),
            "active_vas": [
                {"vas_id": "VAS_MUSIC", "name": "Music Plus", "monthly_fee": 19.9, "provider": "Melodi", "category": "entertainment"}
            ],
            "active_addons": [],
            "account_summary": {"total_monthly_cost": 269.8, "services_count": 1}
        })),
        MOCK_PREPAID_USER_ID => Some(json!({
            "user_id": MOCK_PREPAID_USER_ID,
            "name": "Mehmet Demir",
            "msisdn": "905554445566",
            "type": "prepaid",
            "current_plan": null,
            "active_vas": [],
            "active_addons": []
        })),
        _ => None,
    }
}

fn bill_id(user_id: i64, period: &str) -> String {
    format!("B-{}-{}", user_id, period.replace('-', ""))
}

/// Bill data for a known subscriber and period
///
/// The current-period bill totals 1000.00 with items summing to the subtotal.
fn bill_json(user_id: i64, period: &str) -> Option<Value> {
    user_json(user_id)?;
    let (subtotal, taxes, items) = match period {
        MOCK_PERIOD => (
            800.0,
            200.0,
            json!([
                {"item_id": "I1", "category": "data", "subtype": "overage", "description": "Data overage 12GB", "amount": 400.0, "unit_price": 33.3333, "quantity": 12, "tax_rate": 0.25},
                {"item_id": "I2", "category": "voice", "subtype": "national", "description": "National calls", "amount": 150.0, "unit_price": 0.5, "quantity": 300, "tax_rate": 0.25},
                {"item_id": "I3", "category": "premium_sms", "subtype": "3311", "description": "Daily Horoscope", "amount": 90.0, "unit_price": 9.0, "quantity": 10, "tax_rate": 0.25},
                {"item_id": "I4", "category": "data", "subtype": "plan", "description": "Standart 20GB", "amount": 160.0, "unit_price": 160.0, "quantity": 1, "tax_rate": 0.25}
            ]),
        ),
        MOCK_PREVIOUS_PERIOD => (
            240.0,
            60.0,
            json!([
                {"item_id": "J1", "category": "data", "subtype": "plan", "description": "Standart 20GB", "amount": 240.0, "unit_price": 240.0, "quantity": 1, "tax_rate": 0.25}
            ]),
        ),
        _ => return None,
    };

    let item_count = items.as_array().map(Vec::len).unwrap_or(0);
    Some(json!({
        "bill": {
            "bill_id": bill_id(user_id, period),
            "user_id": user_id,
            "period_start": format!("{}-01", period),
            "period_end": format!("{}-28", period),
            "issue_date": format!("{}-28", period),
            "total_amount": subtotal + taxes,
            "subtotal": subtotal,
            "taxes": taxes,
            "currency": "TRY"
        },
        "items": items,
        "summary": {"subtotal": subtotal, "taxes": taxes, "total": subtotal + taxes, "item_count": item_count}
    }))
}

fn analysis_json(user_id: i64, period: &str) -> Value {
    json!({
        "user_id": user_id,
        "period": period,
        "risk_score": 75,
        "total_anomalies": 2,
        "anomalies": [
            {
                "category": "premium_sms",
                "delta": "+%250",
                "reason": "New premium SMS subscription",
                "severity": "high",
                "confidence": 0.92,
                "current_amount": 90.0,
                "historical_average": 0.0,
                "suggested_action": "Block premium SMS",
                "first_occurrence": true
            },
            {
                "category": "data",
                "delta": "+%66",
                "reason": "Data overage above usual",
                "severity": "medium",
                "confidence": 0.71,
                "current_amount": 560.0,
                "historical_average": 240.0,
                "suggested_action": "Consider a larger plan",
                "first_occurrence": false
            }
        ],
        "recommendations": ["Enable premium SMS block", "Review data plan"]
    })
}

fn whatif_result(scenario: &Value) -> Value {
    let name = match scenario.get("plan_id").and_then(Value::as_i64) {
        Some(id) => format!("Switch to plan {}", id),
        None => "Service changes".to_string(),
    };
    json!({
        "name": name,
        "current_total": 200.0,
        "new_total": 157.5,
        "saving": 42.5,
        "saving_percentage": "21.25",
        "details": [name],
        "recommendations": ["Block premium SMS to avoid surprise charges"]
    })
}

// ========== Handlers ==========

#[derive(Deserialize)]
struct UserListParams {
    #[serde(rename = "type")]
    account_type: Option<String>,
    limit: Option<usize>,
}

async fn handle_users(Query(params): Query<UserListParams>) -> Response {
    let users: Vec<Value> = [MOCK_USER_ID, MOCK_PREPAID_USER_ID]
        .into_iter()
        .filter_map(user_json)
        .filter(|u| match &params.account_type {
            Some(t) => u["type"] == *t,
            None => true,
        })
        .take(params.limit.unwrap_or(usize::MAX))
        .map(|u| {
            json!({
                "user_id": u["user_id"],
                "name": u["name"],
                "msisdn": u["msisdn"],
                "type": u["type"],
                "current_plan": u["current_plan"],
                "active_vas_count": u["active_vas"].as_array().map(Vec::len).unwrap_or(0),
                "active_addons_count": 0
            })
        })
        .collect();
    ok(json!(users))
}

async fn handle_user(Path(user_id): Path<i64>) -> Response {
    match user_json(user_id) {
        Some(user) => ok(user),
        None => not_found("USER_NOT_FOUND", "User not found"),
    }
}

async fn handle_user_by_msisdn(Path(msisdn): Path<String>) -> Response {
    [MOCK_USER_ID, MOCK_PREPAID_USER_ID]
        .into_iter()
        .filter_map(user_json)
        .find(|u| u["msisdn"] == msisdn.as_str())
        .map(ok)
        .unwrap_or_else(|| not_found("USER_NOT_FOUND", "User not found"))
}

async fn handle_user_profile(Path(user_id): Path<i64>) -> Response {
    let Some(user) = user_json(user_id) else {
        return not_found("USER_NOT_FOUND", "User not found");
    };
    let plan = &user["current_plan"];
    let current_plan = if plan.is_null() {
        Value::Null
    } else {
        json!({
            "name": plan["plan_name"],
            "monthly_price": plan["monthly_price"],
            "quotas": {"data_gb": plan["quota_gb"], "voice_min": plan["quota_min"], "sms_count": plan["quota_sms"]}
        })
    };
    ok(json!({
        "user_info": {
            "user_id": user_id,
            "name": user["name"],
            "msisdn": user["msisdn"],
            "account_type": user["type"]
        },
        "current_plan": current_plan,
        "services": {"vas_count": user["active_vas"].as_array().map(Vec::len).unwrap_or(0), "addon_count": 0},
        "membership": {"member_since": "2023-02-14", "last_updated": "2025-07-01"}
    }))
}

async fn handle_user_stats() -> Response {
    ok(json!({
        "total_users": 2,
        "user_types": {"postpaid": 1, "postpaid_percentage": "50.0", "prepaid": 1, "prepaid_percentage": "50.0"},
        "service_adoption": {"vas_users": 1, "vas_adoption_rate": "50.0", "addon_users": 0, "addon_adoption_rate": "0.0"},
        "analysis_date": "2025-07-31"
    }))
}

#[derive(Deserialize)]
struct BillParams {
    period: Option<String>,
}

async fn handle_bill(Path(user_id): Path<i64>, Query(params): Query<BillParams>) -> Response {
    let period = params.period.unwrap_or_else(|| MOCK_PERIOD.to_string());
    match bill_json(user_id, &period) {
        Some(bill) => ok(bill),
        None => not_found("BILL_NOT_FOUND", "Bill not found"),
    }
}

async fn handle_bill_history(Path(user_id): Path<i64>) -> Response {
    if user_json(user_id).is_none() {
        return not_found("USER_NOT_FOUND", "User not found");
    }
    ok(json!([
        {"period": MOCK_PERIOD, "total_amount": 1000.0, "change_percent": "233.3", "issue_date": "2025-07-28", "bill_id": bill_id(user_id, MOCK_PERIOD)},
        {"period": MOCK_PREVIOUS_PERIOD, "total_amount": 300.0, "change_percent": 0, "issue_date": "2025-06-28", "bill_id": bill_id(user_id, MOCK_PREVIOUS_PERIOD)}
    ]))
}

async fn handle_available_periods(Path(user_id): Path<i64>) -> Response {
    if user_json(user_id).is_none() {
        return not_found("USER_NOT_FOUND", "User not found");
    }
    let periods: Vec<Value> = [MOCK_PERIOD, MOCK_PREVIOUS_PERIOD]
        .into_iter()
        .filter_map(|p| {
            let bill = bill_json(user_id, p)?;
            Some(json!({
                "period": p,
                "period_start": bill["bill"]["period_start"],
                "period_end": bill["bill"]["period_end"],
                "issue_date": bill["bill"]["issue_date"],
                "total_amount": bill["bill"]["total_amount"],
                "bill_id": bill["bill"]["bill_id"]
            }))
        })
        .collect();
    ok(json!({ "available_periods": periods }))
}

async fn handle_bill_details(Path(id): Path<String>) -> Response {
    let bill = [MOCK_USER_ID, MOCK_PREPAID_USER_ID]
        .into_iter()
        .flat_map(|u| [MOCK_PERIOD, MOCK_PREVIOUS_PERIOD].map(|p| (u, p)))
        .find(|(u, p)| bill_id(*u, p) == id)
        .and_then(|(u, p)| bill_json(u, p));

    let Some(mut data) = bill else {
        return not_found("BILL_NOT_FOUND", "Bill not found");
    };

    let mut breakdown = serde_json::Map::new();
    let subtotal = data["bill"]["subtotal"].as_f64().unwrap_or(1.0);
    if let Some(items) = data["items"].as_array() {
        for item in items {
            let category = item["category"].as_str().unwrap_or("other").to_string();
            let amount = item["amount"].as_f64().unwrap_or(0.0);
            let entry = breakdown
                .entry(category)
                .or_insert_with(|| json!({"total": 0.0, "items": []}));
            let total = entry["total"].as_f64().unwrap_or(0.0) + amount;
            entry["total"] = json!(total);
            if let Some(list) = entry["items"].as_array_mut() {
                list.push(json!({"description": item["description"], "amount": amount}));
            }
        }
    }
    for entry in breakdown.values_mut() {
        let share = entry["total"].as_f64().unwrap_or(0.0) / subtotal * 100.0;
        entry["percentage"] = json!(format!("{:.1}", share));
    }

    data["breakdown"] = Value::Object(breakdown);
    data["usage_stats"] = json!({
        "total_gb": 32.0, "total_minutes": 300.0, "total_sms": 40.0,
        "roaming_mb": 0.0, "premium_sms_count": 10, "vas_count": 1
    });
    ok(data)
}

async fn handle_catalog() -> Response {
    ok(json!({
        "plans": plans_json(),
        "addons": addons_json(),
        "vas": vas_json(),
        "premium_sms": premium_sms_json()
    }))
}

async fn handle_catalog_stats() -> Response {
    ok(json!({
        "total_plans": 4,
        "total_addons": 3,
        "total_vas": 2,
        "total_premium_sms": 2,
        "price_ranges": {
            "plans": {"min": 129.9, "max": 349.9},
            "addons": {"min": 29.9, "max": 49.9},
            "vas": {"min": 19.9, "max": 24.9}
        }
    }))
}

#[derive(Deserialize)]
struct PlanParams {
    #[serde(rename = "type")]
    account_type: Option<String>,
    max_price: Option<f64>,
}

async fn handle_plans(Query(params): Query<PlanParams>) -> Response {
    let plans: Vec<Value> = plans_json()
        .into_iter()
        .filter(|p| match &params.account_type {
            Some(t) => p["type"] == *t,
            None => true,
        })
        .filter(|p| match params.max_price {
            Some(max) => p["monthly_price"].as_f64().unwrap_or(0.0) <= max,
            None => true,
        })
        .collect();
    ok(json!(plans))
}

async fn handle_plan(Path(plan_id): Path<i64>) -> Response {
    match plan_json(plan_id) {
        Some(plan) => ok(plan),
        None => not_found("PLAN_NOT_FOUND", "Plan not found"),
    }
}

async fn handle_addons() -> Response {
    ok(addons_json())
}

async fn handle_vas() -> Response {
    ok(json!({
        "services": vas_json(),
        "grouped_by_category": {},
        "categories": ["entertainment", "games"]
    }))
}

async fn handle_premium_sms() -> Response {
    ok(premium_sms_json())
}

async fn handle_recommendations(Json(body): Json<Value>) -> Response {
    ok(json!({
        "user_id": body["user_id"],
        "recommended_plans": [plan_json(3)],
        "recommended_addons": [],
        "reasoning": "Usage exceeds the current quota"
    }))
}

async fn handle_anomalies(Json(body): Json<Value>) -> Response {
    let user_id = body["user_id"].as_i64().unwrap_or_default();
    let period = body["period"].as_str().unwrap_or(MOCK_PERIOD);
    ok(analysis_json(user_id, period))
}

async fn handle_detailed_anomalies(Json(body): Json<Value>) -> Response {
    let user_id = body["user_id"].as_i64().unwrap_or_default();
    let period = body["period"].as_str().unwrap_or(MOCK_PERIOD);
    let mut analysis = analysis_json(user_id, period);
    analysis["detailed_analysis"] = json!({"trend": "rising"});
    ok(analysis)
}

async fn handle_anomaly_history(Path(user_id): Path<i64>) -> Response {
    ok(json!([
        analysis_json(user_id, MOCK_PERIOD),
        {"user_id": user_id, "period": MOCK_PREVIOUS_PERIOD, "risk_score": 10, "anomalies": [], "recommendations": []}
    ]))
}

async fn handle_whatif(Json(body): Json<Value>) -> Response {
    if body["scenario"].as_object().map(|s| s.is_empty()).unwrap_or(true) {
        return error_response(400, "INVALID_SCENARIO", "Scenario is empty");
    }
    ok(whatif_result(&body["scenario"]))
}

async fn handle_compare(Json(body): Json<Value>) -> Response {
    let results: Vec<Value> = body["scenarios"]
        .as_array()
        .map(|list| list.iter().map(whatif_result).collect())
        .unwrap_or_default();
    ok(json!(results))
}

async fn handle_checkout(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let actions = body["actions"].as_array().cloned().unwrap_or_default();
    if actions.is_empty() {
        return error_response(400, "NO_ACTIONS", "No actions to process");
    }
    let seq = {
        let mut state = state.lock().unwrap();
        state.order_seq += 1;
        state.order_seq
    };
    ok(json!({
        "order_id": format!("ORD-{:04}", seq),
        "user_id": body["user_id"],
        "status": "completed",
        "created_at": "2025-07-31T10:00:00Z",
        "total_saving": 42.5,
        "effective_date": "2025-08-01",
        "next_bill_estimate": "157.50"
    }))
}

async fn handle_estimate(Json(body): Json<Value>) -> Response {
    let count = body["items"].as_array().map(Vec::len).unwrap_or(0) as f64;
    ok(json!({
        "estimated_total": 200.0 + count * 10.0,
        "breakdown": {"plan_cost": 160.0, "addons_cost": count * 10.0, "vas_cost": 0.0, "taxes": 40.0},
        "savings": 42.5,
        "recommendations": []
    }))
}

async fn handle_order_history(Path(user_id): Path<i64>) -> Response {
    ok(json!([
        {
            "order_id": "ORD-0100",
            "user_id": user_id,
            "items": [{"type": "plan", "id": 3, "name": "Sınırsız 50GB", "price": 349.9}],
            "total_amount": 349.9,
            "status": "completed",
            "created_at": "2025-05-02T09:30:00Z"
        }
    ]))
}

async fn handle_order_status(Path(order_id): Path<String>) -> Response {
    if !order_id.starts_with("ORD-") {
        return not_found("ORDER_NOT_FOUND", "Order not found");
    }
    ok(json!({
        "order_id": order_id,
        "user_id": MOCK_USER_ID,
        "items": [{"type": "vas", "id": "VAS_GAME", "name": "Game Club", "price": 24.9}],
        "total_amount": 24.9,
        "status": "processing",
        "created_at": "2025-07-30T12:00:00Z",
        "estimated_completion": "2025-07-31T12:00:00Z"
    }))
}

async fn handle_cancel_order(Path(order_id): Path<String>) -> Response {
    if !order_id.starts_with("ORD-") {
        return not_found("ORDER_NOT_FOUND", "Order not found");
    }
    ok(json!({"success": true, "message": format!("Order {} cancelled", order_id)}))
}

async fn handle_explain(Json(body): Json<Value>) -> Response {
    ok(json!({
        "user_id": body["user_id"],
        "period": body["period"],
        "summary": {
            "natural_language": "Your bill is higher mainly because of data overage and premium SMS charges."
        }
    }))
}

async fn handle_explain_usage(Path(category): Path<String>, Json(body): Json<Value>) -> Response {
    ok(json!({
        "category": category,
        "period": body["period"],
        "explanation": format!("{} usage was above your monthly average.", category)
    }))
}

async fn handle_explain_costs(Json(body): Json<Value>) -> Response {
    ok(json!({
        "period": body["period"],
        "largest_cost": "data",
        "explanation": "Data overage accounts for 40% of the bill."
    }))
}
