//! End-to-end tests against the mock billing backend

use serde_json::json;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::models::{AccountType, Severity};
use crate::resource::ResourceState;
use crate::scenario::WhatIfScenario;
use crate::screens::{
    AnomaliesScreen, BillDetailScreen, CheckoutScreen, DashboardScreen, RiskLevel,
    UserSelectionScreen, WhatIfScreen,
};
use crate::service::{ApiService, PlanQuery, VasQuery};
use crate::session::{Navigator, Route};
use crate::test_utils::{
    MockBillingServer, MockFailure, MOCK_PERIOD, MOCK_PREPAID_USER_ID, MOCK_USER_ID,
};

// =============================================================================
// Transport and service
// =============================================================================

#[tokio::test]
async fn test_success_returns_data_payload() {
    let server = MockBillingServer::start().await;
    let service = server.service();

    let user = service.get_user(MOCK_USER_ID).await.unwrap();
    assert_eq!(user.name, "Ayşe Yılmaz");
    assert_eq!(user.account_type, AccountType::Postpaid);
    assert_eq!(user.current_plan.map(|p| p.plan_id), Some(2));

    // VAS is nested under data.services
    let vas = service.get_vas(&VasQuery::default()).await.unwrap();
    assert_eq!(vas.len(), 2);
    assert_eq!(vas[0].vas_id, "VAS_MUSIC");
}

#[tokio::test]
async fn test_failure_envelope_becomes_api_error() {
    let server = MockBillingServer::start().await;
    server.fail(
        "/catalog/plans",
        MockFailure::envelope(500, "INTERNAL", "Catalog service is offline"),
    );

    let err = server
        .service()
        .get_plans(&PlanQuery::default())
        .await
        .unwrap_err();

    match &err {
        Error::Api { code, message, .. } => {
            assert_eq!(code, "INTERNAL");
            assert_eq!(message, "Catalog service is offline");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.api_message(), Some("Catalog service is offline"));
}

#[tokio::test]
async fn test_failure_envelope_on_ok_status() {
    let server = MockBillingServer::start().await;
    server.fail(
        "/anomalies",
        MockFailure::envelope(200, "ANALYSIS_FAILED", "Not enough history to analyse"),
    );

    let err = server
        .service()
        .detect_anomalies(MOCK_USER_ID, MOCK_PERIOD)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { .. }));
    assert_eq!(err.status(), Some(200));
    assert_eq!(err.api_message(), Some("Not enough history to analyse"));
}

#[tokio::test]
async fn test_null_data_is_invalid_data() {
    let server = MockBillingServer::start().await;
    server.fail("/users", MockFailure::Data(json!(null)));

    let err = server
        .service()
        .get_all_users(None, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)), "got {:?}", err);
    assert_eq!(err.status(), None);

    server.fail("/users/stats", MockFailure::Data(json!({"total_users": "many"})));
    let err = server.service().get_user_stats().await.unwrap_err();
    assert!(matches!(err, Error::InvalidData(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_path_values_stay_one_segment() {
    let server = MockBillingServer::start().await;
    let service = server.service();

    let err = service.get_user_by_msisdn("90 555/1").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(server.requests_to("/users/by-msisdn/90%20555%2F1").len(), 1);

    let order = service.get_order_status("ORD-7?status=x").await.unwrap();
    assert_eq!(order.order_id, "ORD-7?status=x");
    let sent = &server.requests_to("/checkout/ORD-7%3Fstatus=x")[0];
    assert_eq!(sent.query, None);

    service
        .explain_usage(MOCK_USER_ID, MOCK_PERIOD, "data/roaming")
        .await
        .unwrap();
    assert_eq!(server.requests_to("/explain/usage/data%2Froaming").len(), 1);
}

#[tokio::test]
async fn test_bare_status_becomes_http_error() {
    let server = MockBillingServer::start().await;
    server.fail("/users/stats", MockFailure::Status(503));

    let err = server.service().get_user_stats().await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.api_message(), None);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9/api");
    let service = ApiService::from_config(&config).unwrap();

    let err = service.get_user(1).await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_vas_failure_propagates_but_call_site_falls_back() {
    let server = MockBillingServer::start().await;
    server.fail("/catalog/vas", MockFailure::Status(502));
    let service = server.service();

    assert!(service.get_vas(&VasQuery::default()).await.is_err());
    assert!(service.get_vas_or_empty(&VasQuery::default()).await.is_empty());
}

#[tokio::test]
async fn test_query_and_body_shapes() {
    let server = MockBillingServer::start().await;
    let service = server.service();

    service
        .get_bill(MOCK_USER_ID, Some(MOCK_PERIOD), true)
        .await
        .unwrap();
    let history = service.get_bill_history(MOCK_USER_ID, 6).await.unwrap();
    assert_eq!(history[0].change_percent, 233.3);
    service
        .get_all_users(Some(AccountType::Prepaid), 10)
        .await
        .unwrap();
    service
        .detect_anomalies(MOCK_USER_ID, MOCK_PERIOD)
        .await
        .unwrap();

    let bill = &server.requests_to(&format!("/bills/{}", MOCK_USER_ID))[0];
    assert_eq!(bill.method, "GET");
    assert_eq!(
        bill.query.as_deref(),
        Some("period=2025-07&include_items=true")
    );

    let history = &server.requests_to(&format!("/bills/{}/history", MOCK_USER_ID))[0];
    assert_eq!(history.query.as_deref(), Some("months=6"));

    let users = &server.requests_to("/users")[0];
    assert_eq!(users.query.as_deref(), Some("type=prepaid&limit=10"));

    let anomalies = &server.requests_to("/anomalies")[0];
    assert_eq!(anomalies.method, "POST");
    assert_eq!(
        anomalies.body,
        Some(json!({"user_id": MOCK_USER_ID, "period": "2025-07"}))
    );
}

#[tokio::test]
async fn test_available_periods_and_catalog() {
    let server = MockBillingServer::start().await;
    let service = server.service();

    let periods = service.get_available_periods(MOCK_USER_ID).await.unwrap();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0].total_amount, 1000.0);

    let catalog = service.get_catalog(None).await.unwrap();
    assert_eq!(catalog.plans.len(), 4);
    assert_eq!(catalog.premium_sms[1].risk_level, Severity::High);

    let stats = service.get_catalog_stats().await.unwrap();
    assert_eq!(stats.price_ranges.plans.max, 349.9);

    let profile = service.get_user_profile(MOCK_USER_ID).await.unwrap();
    assert_eq!(profile.services.vas_count, 1);

    let by_msisdn = service.get_user_by_msisdn("905554445566").await.unwrap();
    assert_eq!(by_msisdn.user_id, MOCK_PREPAID_USER_ID);
}

#[tokio::test]
async fn test_order_lifecycle_endpoints() {
    let server = MockBillingServer::start().await;
    let service = server.service();

    let history = service
        .get_order_history(MOCK_USER_ID, 5, Some("completed"))
        .await
        .unwrap();
    assert_eq!(history[0].items[0].name, "Sınırsız 50GB");
    assert_eq!(
        server.requests_to(&format!("/checkout/history/{}", MOCK_USER_ID))[0]
            .query
            .as_deref(),
        Some("limit=5&status=completed")
    );

    let order = service.get_order_status("ORD-0042").await.unwrap();
    assert_eq!(order.items[0].id.to_string(), "VAS_GAME");

    let cancelled = service.cancel_order("ORD-0042").await.unwrap();
    assert!(cancelled.success);
    assert_eq!(server.requests_to("/checkout/ORD-0042")[1].method, "DELETE");

    let missing = service.get_order_status("X-1").await.unwrap_err();
    assert!(missing.is_not_found());
}

// =============================================================================
// Screens
// =============================================================================

#[tokio::test]
async fn test_user_selection_lists_users() {
    let server = MockBillingServer::start().await;
    let mut screen = UserSelectionScreen::new(server.service());
    assert!(screen.users().is_idle());

    screen.load().await;
    assert_eq!(screen.users().data().map(Vec::len), Some(2));
    assert_eq!(
        screen.find(MOCK_PREPAID_USER_ID).map(|u| u.name.as_str()),
        Some("Mehmet Demir")
    );
}

#[tokio::test]
async fn test_dashboard_bill_survives_anomaly_failure() {
    let server = MockBillingServer::start().await;
    server.fail("/anomalies", MockFailure::Status(500));

    let mut nav = Navigator::new(MOCK_PERIOD);
    nav.select_user(MOCK_USER_ID, "Ayşe Yılmaz");
    let mut dashboard =
        DashboardScreen::new(server.service(), nav.dashboard_params().unwrap(), MOCK_PERIOD);
    dashboard.load().await;

    let bill = dashboard.bill_summary().expect("bill should be loaded");
    assert_eq!(bill.total_amount, 1000.0);
    assert_eq!(
        dashboard.anomalies().error().map(|e| e.message.as_str()),
        Some("Could not load anomalies")
    );

    let breakdown = dashboard.category_breakdown();
    assert_eq!(breakdown[0].category, "data");
    assert_eq!(breakdown[0].total, 560.0);
    assert_eq!(breakdown[0].percentage, 70.0);
}

#[tokio::test]
async fn test_dashboard_missing_period_names_period() {
    let server = MockBillingServer::start().await;
    let params = crate::session::DashboardParams {
        user_id: MOCK_USER_ID,
        user_name: "Ayşe Yılmaz".into(),
    };
    let mut dashboard = DashboardScreen::new(server.service(), params, MOCK_PERIOD);

    dashboard.select_period("2025-03").await.unwrap();

    let err = dashboard.bill().error().expect("bill should fail");
    assert!(err.message.contains("2025-03"));
    assert!(err.message.starts_with("No bill found"));
    assert_eq!(err.status, Some(404));
    // Anomalies are independent of the bill
    assert!(dashboard.anomalies().data().is_some());

    assert!(dashboard.select_period("March").await.is_err());
}

#[tokio::test]
async fn test_anomalies_screen_risk_view() {
    let server = MockBillingServer::start().await;
    let mut nav = Navigator::new(MOCK_PERIOD);
    nav.select_user(MOCK_USER_ID, "Ayşe Yılmaz");
    nav.navigate(Route::Anomalies).unwrap();

    let mut screen = AnomaliesScreen::new(server.service(), nav.period_params().unwrap());
    screen.load().await;

    assert_eq!(screen.risk_level(), Some(RiskLevel::High));
    assert_eq!(screen.highest_risk_category(), Some("premium_sms"));
    assert!(!screen.is_clean());
    let ordered = screen.by_severity();
    assert_eq!(ordered[0].severity, Severity::High);
    assert_eq!(screen.analysis().data().map(|a| a.anomaly_count()), Some(2));

    let mut detailed =
        AnomaliesScreen::new(server.service(), nav.period_params().unwrap()).detailed(true);
    detailed.load().await;
    assert_eq!(server.requests_to("/anomalies/detailed").len(), 1);
}

#[tokio::test]
async fn test_bill_detail_loads_all_slices() {
    let server = MockBillingServer::start().await;
    let params = crate::session::PeriodParams {
        user_id: MOCK_USER_ID,
        period: MOCK_PERIOD.into(),
    };
    let mut screen = BillDetailScreen::new(server.service(), params);
    screen.load().await;

    assert_eq!(screen.bill().data().map(|b| b.items.len()), Some(4));
    let details = screen.details().data().expect("details should load");
    assert_eq!(details.breakdown["data"].total, 560.0);
    assert_eq!(details.breakdown["data"].percentage, 70.0);
    assert!(screen
        .commentary()
        .data()
        .is_some_and(|c| c.contains("data overage")));
    assert_eq!(screen.plans().data().map(Vec::len), Some(4));
}

#[tokio::test]
async fn test_bill_detail_without_bill_skips_details() {
    let server = MockBillingServer::start().await;
    let params = crate::session::PeriodParams {
        user_id: MOCK_USER_ID,
        period: "2024-01".into(),
    };
    let mut screen = BillDetailScreen::new(server.service(), params);
    screen.load().await;

    assert!(screen.bill().error().is_some());
    assert!(screen.details().is_idle());
    assert!(server.requests_to("/bills/details/B-1001-202401").is_empty());
}

#[tokio::test]
async fn test_whatif_catalog_tolerates_vas_failure() {
    let server = MockBillingServer::start().await;
    server.fail(
        "/catalog/vas",
        MockFailure::envelope(500, "VAS_DOWN", "VAS catalog unavailable"),
    );

    let mut nav = Navigator::new(MOCK_PERIOD);
    nav.select_user(MOCK_USER_ID, "Ayşe Yılmaz");
    let mut screen = WhatIfScreen::new(server.service(), nav.whatif_params().unwrap());
    screen.load().await;

    let catalog = screen.catalog().data().expect("catalog should load");
    assert_eq!(catalog.plans.len(), 4);
    assert_eq!(catalog.addons.len(), 3);
    assert!(catalog.vas.is_empty());
    assert_eq!(screen.current_plan().map(|p| p.plan_id), Some(2));
}

#[tokio::test]
async fn test_whatif_catalog_fails_on_plans() {
    let server = MockBillingServer::start().await;
    server.fail(
        "/catalog/plans",
        MockFailure::envelope(500, "INTERNAL", "Plans unavailable"),
    );

    let params = crate::session::WhatIfParams {
        user_id: MOCK_PREPAID_USER_ID,
        user_name: "Mehmet Demir".into(),
        period: MOCK_PERIOD.into(),
    };
    let mut screen = WhatIfScreen::new(server.service(), params);
    screen.load().await;

    assert_eq!(
        screen.catalog().error().map(|e| e.message.as_str()),
        Some("Plans unavailable")
    );
    assert!(matches!(screen.catalog().state(), ResourceState::Failed(_)));
    // Prepaid subscriber without a plan
    assert!(screen.current_plan().is_none());
    assert_eq!(screen.summary().plan_name, "Current plan");
}

#[tokio::test]
async fn test_empty_scenario_sends_nothing() {
    let server = MockBillingServer::start().await;
    let params = crate::session::WhatIfParams {
        user_id: MOCK_USER_ID,
        user_name: "Ayşe Yılmaz".into(),
        period: MOCK_PERIOD.into(),
    };
    let mut screen = WhatIfScreen::new(server.service(), params);

    let before = server.request_count();
    let err = screen.run_simulation().await.unwrap_err();
    assert!(matches!(err, Error::Precondition(_)));
    assert_eq!(server.request_count(), before);
    assert!(screen.result().is_idle());
}

#[tokio::test]
async fn test_plan_change_submitted_as_plan_id() {
    let server = MockBillingServer::start().await;
    let params = crate::session::WhatIfParams {
        user_id: MOCK_USER_ID,
        user_name: "Ayşe Yılmaz".into(),
        period: MOCK_PERIOD.into(),
    };
    let mut screen = WhatIfScreen::new(server.service(), params);
    screen.load().await;
    screen.select_plan(3);
    assert_eq!(screen.scenario().plan_change.as_ref().and_then(|c| c.from), Some(2));

    screen.run_simulation().await.unwrap();

    let sent = &server.requests_to("/whatif")[0];
    let body = sent.body.as_ref().unwrap();
    assert_eq!(body["scenario"], json!({"plan_id": 3}));
    assert!(body["scenario"].get("plan_change").is_none());
    assert_eq!(body["period"], "2025-07");

    let result = screen.result().data().expect("simulation should succeed");
    assert_eq!(result.saving, 42.5);
    assert_eq!(result.saving_percent, 21.25);
    assert_eq!(screen.summary().plan_name, "Sınırsız 50GB");

    // Editing the scenario drops the stale result
    screen.toggle_roaming_block();
    assert!(screen.result().is_idle());
    assert!(screen.checkout_handoff().is_err());
}

#[tokio::test]
async fn test_compare_scenarios() {
    let server = MockBillingServer::start().await;
    let params = crate::session::WhatIfParams {
        user_id: MOCK_USER_ID,
        user_name: "Ayşe Yılmaz".into(),
        period: MOCK_PERIOD.into(),
    };
    let mut screen = WhatIfScreen::new(server.service(), params);

    let mut a = WhatIfScenario::new();
    a.select_plan(1, None);
    let mut b = WhatIfScenario::new();
    b.toggle_block_premium_sms();

    screen.compare(&[a, b]).await.unwrap();
    let results = screen.comparison().data().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].details, vec!["Switch to plan 1".to_string()]);

    assert!(screen.compare(&[WhatIfScenario::new()]).await.is_err());
}

#[tokio::test]
async fn test_full_flow_through_checkout() {
    let server = MockBillingServer::start().await;
    let service = server.service();
    let mut nav = Navigator::new(MOCK_PERIOD);
    nav.select_user(MOCK_USER_ID, "Ayşe Yılmaz");
    nav.navigate(Route::WhatIfSimulator).unwrap();

    let mut whatif = WhatIfScreen::new(service.clone(), nav.whatif_params().unwrap());
    whatif.load().await;
    whatif.select_plan(1);
    whatif.toggle_addon(12);
    whatif.toggle_vas("VAS_MUSIC");
    whatif.toggle_block_premium_sms();
    whatif.run_simulation().await.unwrap();

    let (scenario, result) = whatif.checkout_handoff().unwrap();
    nav.record_simulation(scenario, result);
    nav.navigate(Route::Checkout).unwrap();

    let mut checkout = CheckoutScreen::new(service, nav.checkout_params().unwrap());
    let summary = checkout.summary();
    assert_eq!(summary.saving, "₺42.50");
    assert_eq!(summary.current_total, "₺200.00");
    assert_eq!(summary.new_total, "₺157.50");

    checkout.load_estimate().await;
    assert_eq!(
        checkout.estimate().data().map(|e| e.estimated_total),
        Some(220.0)
    );

    // A second submit while the first is in flight is refused
    let (ticket, actions) = checkout.begin_submit().unwrap();
    assert!(checkout.is_submitting());
    assert!(matches!(
        checkout.begin_submit(),
        Err(Error::Precondition(_))
    ));
    assert_eq!(actions, checkout.actions());
    checkout.finish_submit(ticket, Err(Error::InvalidData("dropped".into())));
    assert_eq!(
        checkout.order().error().map(|e| e.message.as_str()),
        Some("Could not complete the order")
    );

    checkout.submit().await.unwrap();
    let confirmation = checkout.confirmation().expect("order should be placed");
    assert_eq!(confirmation.order_id, "ORD-0001");
    assert_eq!(confirmation.total_saving.as_deref(), Some("₺42.50"));
    assert_eq!(confirmation.next_bill_estimate.as_deref(), Some("₺157.50"));

    let sent = &server.requests_to("/checkout")[0];
    let body = sent.body.as_ref().unwrap();
    assert_eq!(
        body["actions"],
        json!([
            {"type": "change_plan", "payload": {"plan_id": 1}},
            {"type": "add_addon", "payload": {"addon_id": 12}},
            {"type": "cancel_vas", "payload": {"vas_id": "VAS_MUSIC"}},
            {"type": "block_premium_sms", "payload": {"enable": true}}
        ])
    );

    // Placed orders cannot be resubmitted
    assert!(checkout.submit().await.is_err());
    assert_eq!(server.requests_to("/checkout").len(), 1);

    nav.finish_checkout();
    assert_eq!(nav.current(), Route::Dashboard);
}

#[tokio::test]
async fn test_checkout_failure_keeps_backend_message() {
    let server = MockBillingServer::start().await;
    server.fail(
        "/checkout",
        MockFailure::envelope(409, "PLAN_LOCKED", "Plan changes are locked until 2025-08-01"),
    );

    let mut nav = Navigator::new(MOCK_PERIOD);
    nav.select_user(MOCK_USER_ID, "Ayşe Yılmaz");
    let mut scenario = WhatIfScenario::new();
    scenario.toggle_disable_vas();
    let result = crate::scenario::SimulationResult {
        current_total: 120.0,
        new_total: 100.0,
        saving: 20.0,
        saving_percent: 16.7,
        details: vec![],
        recommendations: vec![],
    };
    nav.record_simulation(scenario, result);

    let mut checkout = CheckoutScreen::new(server.service(), nav.checkout_params().unwrap());
    checkout.submit().await.unwrap();

    let err = checkout.order().error().unwrap();
    assert_eq!(err.message, "Plan changes are locked until 2025-08-01");
    assert_eq!(err.status, Some(409));
    assert!(!checkout.is_submitting());
    assert!(checkout.confirmation().is_none());
}
