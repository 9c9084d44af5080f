//! Session context and navigation
//!
//! The [`Navigator`] owns a [`Session`] holding everything screens forward to
//! each other (selected user, period, scenario, simulation result) and a
//! route stack. Screens ask the navigator for their parameters instead of
//! knowing every ancestor's parameter shape.
//!
//! Back navigation is flattened: detail screens always return to the
//! dashboard, checkout returns to the simulator.

use tracing::debug;

use crate::error::{Error, Result};
use crate::period::validate_period;
use crate::scenario::{SimulationResult, WhatIfScenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    UserSelection,
    Dashboard,
    BillDetail,
    Anomalies,
    WhatIfSimulator,
    Checkout,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserSelection => "user_selection",
            Self::Dashboard => "dashboard",
            Self::BillDetail => "bill_detail",
            Self::Anomalies => "anomalies",
            Self::WhatIfSimulator => "whatif_simulator",
            Self::Checkout => "checkout",
        }
    }

    /// Where the back action leads from this route
    pub fn back_target(&self) -> Option<Route> {
        match self {
            Self::UserSelection => None,
            Self::Dashboard => Some(Self::UserSelection),
            Self::BillDetail | Self::Anomalies | Self::WhatIfSimulator => Some(Self::Dashboard),
            Self::Checkout => Some(Self::WhatIfSimulator),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedUser {
    pub user_id: i64,
    pub name: String,
}

/// State that survives navigation
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: Option<SelectedUser>,
    pub period: String,
    pub scenario: Option<WhatIfScenario>,
    pub result: Option<SimulationResult>,
}

impl Session {
    pub fn new(period: &str) -> Self {
        Self {
            user: None,
            period: period.to_string(),
            scenario: None,
            result: None,
        }
    }

    fn require_user(&self) -> Result<&SelectedUser> {
        self.user
            .as_ref()
            .ok_or_else(|| Error::Precondition("Select a user first".to_string()))
    }
}

// Parameter contracts between screens

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardParams {
    pub user_id: i64,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParams {
    pub user_id: i64,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatIfParams {
    pub user_id: i64,
    pub user_name: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutParams {
    pub user_id: i64,
    pub user_name: String,
    pub period: String,
    pub scenario: WhatIfScenario,
    pub result: SimulationResult,
}

/// Route stack plus session
#[derive(Debug, Clone)]
pub struct Navigator {
    session: Session,
    stack: Vec<Route>,
}

impl Navigator {
    pub fn new(period: &str) -> Self {
        Self {
            session: Session::new(period),
            stack: vec![Route::UserSelection],
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current(&self) -> Route {
        self.stack.last().copied().unwrap_or(Route::UserSelection)
    }

    pub fn stack(&self) -> &[Route] {
        &self.stack
    }

    /// Pick a user and open their dashboard
    ///
    /// A different user starts from a clean scenario.
    pub fn select_user(&mut self, user_id: i64, name: &str) {
        if self.session.user.as_ref().map(|u| u.user_id) != Some(user_id) {
            self.session.scenario = None;
            self.session.result = None;
        }
        self.session.user = Some(SelectedUser {
            user_id,
            name: name.to_string(),
        });
        self.stack = vec![Route::UserSelection, Route::Dashboard];
        debug!("Selected user {} ({})", user_id, name);
    }

    pub fn set_period(&mut self, period: &str) -> Result<()> {
        validate_period(period)?;
        if self.session.period != period {
            self.session.period = period.to_string();
            self.session.result = None;
        }
        Ok(())
    }

    /// Store a simulation so checkout can be opened
    pub fn record_simulation(&mut self, scenario: WhatIfScenario, result: SimulationResult) {
        self.session.scenario = Some(scenario);
        self.session.result = Some(result);
    }

    /// Push a route after checking its preconditions
    pub fn navigate(&mut self, route: Route) -> Result<()> {
        match route {
            Route::UserSelection => {
                self.stack = vec![Route::UserSelection];
                return Ok(());
            }
            Route::Checkout => {
                self.checkout_params()?;
            }
            _ => {
                self.session.require_user()?;
            }
        }

        if self.current() != route {
            self.stack.push(route);
        }
        debug!("Navigated to {}", route);
        Ok(())
    }

    /// Go back to the fixed ancestor of the current route
    pub fn back(&mut self) -> Route {
        if let Some(target) = self.current().back_target() {
            self.reset_to(target);
        }
        self.current()
    }

    /// Replace the stack so `route` is on top of its canonical ancestors
    pub fn reset_to(&mut self, route: Route) {
        let mut chain = vec![route];
        while let Some(parent) = chain.last().and_then(Route::back_target) {
            chain.push(parent);
        }
        chain.reverse();
        self.stack = chain;
    }

    /// After a successful checkout: scenario is consumed, back to dashboard
    pub fn finish_checkout(&mut self) {
        self.session.scenario = None;
        self.session.result = None;
        self.reset_to(Route::Dashboard);
    }

    pub fn dashboard_params(&self) -> Result<DashboardParams> {
        let user = self.session.require_user()?;
        Ok(DashboardParams {
            user_id: user.user_id,
            user_name: user.name.clone(),
        })
    }

    pub fn period_params(&self) -> Result<PeriodParams> {
        let user = self.session.require_user()?;
        Ok(PeriodParams {
            user_id: user.user_id,
            period: self.session.period.clone(),
        })
    }

    pub fn whatif_params(&self) -> Result<WhatIfParams> {
        let user = self.session.require_user()?;
        Ok(WhatIfParams {
            user_id: user.user_id,
            user_name: user.name.clone(),
            period: self.session.period.clone(),
        })
    }

    pub fn checkout_params(&self) -> Result<CheckoutParams> {
        let user = self.session.require_user()?;
        let (scenario, result) = match (&self.session.scenario, &self.session.result) {
            (Some(s), Some(r)) => (s.clone(), r.clone()),
            _ => {
                return Err(Error::Precondition(
                    "Run a simulation before checkout".to_string(),
                ))
            }
        };
        Ok(CheckoutParams {
            user_id: user.user_id,
            user_name: user.name.clone(),
            period: self.session.period.clone(),
            scenario,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> SimulationResult {
        SimulationResult {
            current_total: 200.0,
            new_total: 150.0,
            saving: 50.0,
            saving_percent: 25.0,
            details: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn test_requires_user_before_dashboard() {
        let mut nav = Navigator::new("2025-07");
        assert!(matches!(
            nav.navigate(Route::Dashboard),
            Err(Error::Precondition(_))
        ));
        assert_eq!(nav.current(), Route::UserSelection);
    }

    #[test]
    fn test_params_follow_session() {
        let mut nav = Navigator::new("2025-07");
        nav.select_user(1001, "Ayşe");
        assert_eq!(nav.current(), Route::Dashboard);

        assert_eq!(
            nav.dashboard_params().unwrap(),
            DashboardParams {
                user_id: 1001,
                user_name: "Ayşe".into()
            }
        );

        nav.set_period("2025-06").unwrap();
        assert_eq!(nav.period_params().unwrap().period, "2025-06");
        assert_eq!(nav.whatif_params().unwrap().user_name, "Ayşe");
    }

    #[test]
    fn test_invalid_period_rejected() {
        let mut nav = Navigator::new("2025-07");
        assert!(nav.set_period("2025-7").is_err());
        assert_eq!(nav.session().period, "2025-07");
    }

    #[test]
    fn test_checkout_needs_simulation() {
        let mut nav = Navigator::new("2025-07");
        nav.select_user(7, "Mehmet");
        nav.navigate(Route::WhatIfSimulator).unwrap();
        assert!(nav.navigate(Route::Checkout).is_err());

        let mut scenario = WhatIfScenario::new();
        scenario.toggle_block_premium_sms();
        nav.record_simulation(scenario.clone(), sample_result());
        nav.navigate(Route::Checkout).unwrap();

        let params = nav.checkout_params().unwrap();
        assert_eq!(params.scenario, scenario);
        assert_eq!(params.result.saving, 50.0);
    }

    #[test]
    fn test_back_is_flattened() {
        let mut nav = Navigator::new("2025-07");
        nav.select_user(7, "Mehmet");
        nav.navigate(Route::Anomalies).unwrap();
        nav.navigate(Route::BillDetail).unwrap();

        // Not back to anomalies: detail screens always return to the dashboard
        assert_eq!(nav.back(), Route::Dashboard);
        assert_eq!(nav.stack(), &[Route::UserSelection, Route::Dashboard]);
        assert_eq!(nav.back(), Route::UserSelection);
        assert_eq!(nav.back(), Route::UserSelection);
    }

    #[test]
    fn test_checkout_back_and_finish() {
        let mut nav = Navigator::new("2025-07");
        nav.select_user(7, "Mehmet");
        nav.navigate(Route::WhatIfSimulator).unwrap();
        nav.record_simulation(WhatIfScenario::new(), sample_result());
        nav.navigate(Route::Checkout).unwrap();

        assert_eq!(nav.back(), Route::WhatIfSimulator);

        nav.navigate(Route::Checkout).unwrap();
        nav.finish_checkout();
        assert_eq!(nav.current(), Route::Dashboard);
        assert!(nav.session().scenario.is_none());
        assert!(nav.session().result.is_none());
    }

    #[test]
    fn test_switching_user_clears_scenario() {
        let mut nav = Navigator::new("2025-07");
        nav.select_user(1, "A");
        nav.record_simulation(WhatIfScenario::new(), sample_result());
        nav.select_user(1, "A");
        assert!(nav.session().result.is_some());
        nav.select_user(2, "B");
        assert!(nav.session().result.is_none());
    }
}
