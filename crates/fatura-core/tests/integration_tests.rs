//! Integration tests for fatura-core
//!
//! These tests exercise the public API without a backend: config loading,
//! period handling, scenario building and the navigation flow.

use std::io::Write;

use chrono::NaiveDate;
use fatura_core::{
    format::{money, percent},
    period::{parse_period, period_of},
    scenario::ALL_VAS,
    session::CheckoutParams,
    CheckoutAction, ClientConfig, Error, Navigator, Route, SimulationResult, WhatIfScenario,
};

fn simulation() -> SimulationResult {
    SimulationResult {
        current_total: 200.0,
        new_total: 157.5,
        saving: 42.5,
        saving_percent: 21.26,
        details: vec!["Switch to plan 3".to_string()],
        recommendations: vec![],
    }
}

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_config_file_overrides_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[api]\nbase_url = \"https://billing.internal/api/\"\ntimeout_secs = 4\n\n[session]\ndefault_period = \"2025-06\""
    )
    .unwrap();

    let config = ClientConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.base_url, "https://billing.internal/api");
    assert_eq!(config.timeout.as_secs(), 4);
    assert_eq!(config.default_period.as_deref(), Some("2025-06"));
}

#[test]
fn test_config_invalid_toml_is_config_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[api\nbase_url = ").unwrap();

    let err = ClientConfig::load(Some(file.path())).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

// =============================================================================
// Periods
// =============================================================================

#[test]
fn test_period_round_trip_and_rejection() {
    assert!(parse_period("2025-13").is_err());
    let date = NaiveDate::from_ymd_opt(2025, 7, 19).unwrap();
    assert_eq!(period_of(date), "2025-07");
    assert_eq!(period_of(parse_period("2025-07").unwrap()), "2025-07");
}

// =============================================================================
// Scenario → checkout
// =============================================================================

#[test]
fn test_scenario_to_checkout_actions() {
    let mut scenario = WhatIfScenario::new();
    scenario.select_plan(3, Some(2));
    scenario.toggle_addon(11);
    scenario.toggle_vas("VAS_MUSIC");
    scenario.toggle_roaming_block();

    let actions = scenario.to_checkout_actions();
    assert_eq!(
        actions,
        vec![
            CheckoutAction::ChangePlan { plan_id: 3 },
            CheckoutAction::AddAddon { addon_id: 11 },
            CheckoutAction::CancelVas {
                vas_id: "VAS_MUSIC".to_string()
            },
            CheckoutAction::EnableRoamingBlock { enable: true },
        ]
    );

    let submission = scenario.to_submission().unwrap();
    assert_eq!(submission.plan_id, Some(3));
    assert!(!submission.block_premium_sms);
}

#[test]
fn test_disable_vas_replaces_individual_cancellations() {
    let mut scenario = WhatIfScenario::new();
    scenario.toggle_vas("VAS_MUSIC");
    scenario.toggle_vas("VAS_GAME");
    scenario.toggle_disable_vas();

    assert_eq!(
        scenario.to_checkout_actions(),
        vec![CheckoutAction::CancelVas {
            vas_id: ALL_VAS.to_string()
        }]
    );
}

#[test]
fn test_empty_scenario_cannot_be_submitted() {
    let mut scenario = WhatIfScenario::new();
    scenario.toggle_addon(12);
    scenario.toggle_addon(12);

    assert!(scenario.is_empty());
    assert!(matches!(scenario.to_submission(), Err(Error::Precondition(_))));
    assert!(scenario.to_checkout_actions().is_empty());
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_navigation_requires_user_then_simulation() {
    let mut nav = Navigator::new("2025-07");
    assert_eq!(nav.current(), Route::UserSelection);
    assert!(nav.navigate(Route::Dashboard).is_err());

    nav.select_user(1001, "Ayşe Yılmaz");
    assert_eq!(nav.current(), Route::Dashboard);
    assert!(nav.navigate(Route::Checkout).is_err());

    nav.navigate(Route::WhatIfSimulator).unwrap();
    let mut scenario = WhatIfScenario::new();
    scenario.select_plan(3, Some(2));
    nav.record_simulation(scenario.clone(), simulation());
    nav.navigate(Route::Checkout).unwrap();

    let params: CheckoutParams = nav.checkout_params().unwrap();
    assert_eq!(params.user_id, 1001);
    assert_eq!(params.period, "2025-07");
    assert_eq!(params.scenario, scenario);

    assert_eq!(nav.back(), Route::WhatIfSimulator);
    assert_eq!(nav.back(), Route::Dashboard);
}

#[test]
fn test_switching_user_drops_simulation() {
    let mut nav = Navigator::new("2025-07");
    nav.select_user(1001, "Ayşe Yılmaz");
    let mut scenario = WhatIfScenario::new();
    scenario.toggle_block_premium_sms();
    nav.record_simulation(scenario, simulation());

    nav.select_user(1002, "Mehmet Demir");
    assert!(nav.session().scenario.is_none());
    assert!(nav.session().result.is_none());
    assert!(nav.checkout_params().is_err());
}

#[test]
fn test_currency_formatting() {
    assert_eq!(money(1000.0), "₺1000.00");
    assert_eq!(money(-12.4), "-₺12.40");
    assert_eq!(percent(simulation().saving_percent), "%21.3");
}
