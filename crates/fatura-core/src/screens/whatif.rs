//! What-if simulator
//!
//! Loads the catalog (plans, addons and VAS awaited together) and the
//! subscriber's current plan, lets the user toggle a [`WhatIfScenario`], and
//! submits it for simulation. VAS is optional here: a failing VAS listing
//! leaves an empty list rather than failing the catalog.

use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Addon, Plan, Vas};
use crate::resource::{RemoteResource, ScreenError};
use crate::scenario::{SimulationResult, WhatIfScenario};
use crate::service::{AddonQuery, ApiService, PlanQuery, VasQuery};
use crate::session::WhatIfParams;

/// Catalog entries offered by the simulator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhatIfCatalog {
    pub plans: Vec<Plan>,
    pub addons: Vec<Addon>,
    pub vas: Vec<Vas>,
}

/// Names of what the current scenario selects
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub plan_name: String,
    pub addon_names: Vec<String>,
    pub vas_names: Vec<String>,
}

pub struct WhatIfScreen {
    service: ApiService,
    params: WhatIfParams,
    catalog: RemoteResource<WhatIfCatalog>,
    current_plan: RemoteResource<Option<Plan>>,
    scenario: WhatIfScenario,
    result: RemoteResource<SimulationResult>,
    comparison: RemoteResource<Vec<SimulationResult>>,
}

impl WhatIfScreen {
    pub fn new(service: ApiService, params: WhatIfParams) -> Self {
        Self {
            service,
            params,
            catalog: RemoteResource::new(),
            current_plan: RemoteResource::new(),
            scenario: WhatIfScenario::new(),
            result: RemoteResource::new(),
            comparison: RemoteResource::new(),
        }
    }

    /// Start from a previously built scenario, e.g. when coming back from checkout
    pub fn with_scenario(mut self, scenario: WhatIfScenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn params(&self) -> &WhatIfParams {
        &self.params
    }

    /// Load the catalog and the current plan
    pub async fn load(&mut self) {
        let user_id = self.params.user_id;
        let service = &self.service;

        let catalog_ticket = self.catalog.begin();
        let plan_ticket = self.current_plan.begin();

        let plan_query = PlanQuery::default();
        let addon_query = AddonQuery::default();
        let vas_query = VasQuery::default();

        let catalog = async {
            let (plans, addons, vas) = tokio::join!(
                service.get_plans(&plan_query),
                service.get_addons(&addon_query),
                service.get_vas_or_empty(&vas_query),
            );
            Ok::<_, Error>(WhatIfCatalog {
                plans: plans?,
                addons: addons?,
                vas,
            })
        };

        let current_plan = async {
            let user = service.get_user(user_id).await?;
            let plan = match user.current_plan {
                Some(plan) => Some(service.get_plan(plan.plan_id).await?),
                None => None,
            };
            Ok::<_, Error>(plan)
        };

        let (catalog, current_plan) = tokio::join!(catalog, current_plan);

        let _ = self.catalog.complete(
            catalog_ticket,
            catalog.map_err(|e| ScreenError::from_error(&e, "Could not load the catalog")),
        );
        let _ = self.current_plan.complete(
            plan_ticket,
            current_plan.map_err(|e| ScreenError::from_error(&e, "Could not load the current plan")),
        );
    }

    pub fn catalog(&self) -> &RemoteResource<WhatIfCatalog> {
        &self.catalog
    }

    pub fn current_plan(&self) -> Option<&Plan> {
        self.current_plan.data().and_then(Option::as_ref)
    }

    pub fn scenario(&self) -> &WhatIfScenario {
        &self.scenario
    }

    pub fn result(&self) -> &RemoteResource<SimulationResult> {
        &self.result
    }

    pub fn comparison(&self) -> &RemoteResource<Vec<SimulationResult>> {
        &self.comparison
    }

    // Any edit invalidates the last simulation so checkout never pairs a
    // scenario with a result computed for a different one.

    pub fn select_plan(&mut self, plan_id: i64) {
        let current = self.current_plan().map(|p| p.plan_id);
        self.scenario.select_plan(plan_id, current);
        self.result.reset();
    }

    pub fn clear_plan(&mut self) {
        self.scenario.clear_plan();
        self.result.reset();
    }

    pub fn toggle_addon(&mut self, addon_id: i64) {
        self.scenario.toggle_addon(addon_id);
        self.result.reset();
    }

    pub fn toggle_vas(&mut self, vas_id: &str) {
        self.scenario.toggle_vas(vas_id);
        self.result.reset();
    }

    pub fn toggle_disable_vas(&mut self) {
        self.scenario.toggle_disable_vas();
        self.result.reset();
    }

    pub fn toggle_block_premium_sms(&mut self) {
        self.scenario.toggle_block_premium_sms();
        self.result.reset();
    }

    pub fn toggle_roaming_block(&mut self) {
        self.scenario.toggle_roaming_block();
        self.result.reset();
    }

    pub fn reset(&mut self) {
        self.scenario.reset();
        self.result.reset();
    }

    /// Submit the scenario
    ///
    /// An empty scenario is refused before any request is built.
    pub async fn run_simulation(&mut self) -> Result<()> {
        let submission = self.scenario.to_submission()?;
        let user_id = self.params.user_id;
        let period = self.params.period.as_str();
        let service = &self.service;
        debug!("Simulating scenario for user {} period {}", user_id, period);

        self.result
            .load(
                async move {
                    service
                        .calculate_what_if(user_id, period, &submission)
                        .await
                        .map(SimulationResult::from)
                },
                |e| ScreenError::from_error(e, "Could not run the simulation"),
            )
            .await;
        Ok(())
    }

    /// Simulate several scenarios side by side
    pub async fn compare(&mut self, scenarios: &[WhatIfScenario]) -> Result<()> {
        let submissions = scenarios
            .iter()
            .map(WhatIfScenario::to_submission)
            .collect::<Result<Vec<_>>>()?;
        let user_id = self.params.user_id;
        let period = self.params.period.as_str();
        let service = &self.service;

        self.comparison
            .load(
                async move {
                    service
                        .compare_scenarios(user_id, period, &submissions)
                        .await
                        .map(|list| list.into_iter().map(SimulationResult::from).collect())
                },
                |e| ScreenError::from_error(e, "Could not compare scenarios"),
            )
            .await;
        Ok(())
    }

    /// Scenario and result to hand to checkout
    pub fn checkout_handoff(&self) -> Result<(WhatIfScenario, SimulationResult)> {
        match self.result.data() {
            Some(result) => Ok((self.scenario.clone(), result.clone())),
            None => Err(Error::Precondition(
                "Run a simulation before checkout".to_string(),
            )),
        }
    }

    pub fn summary(&self) -> ScenarioSummary {
        let empty = WhatIfCatalog::default();
        let catalog = self.catalog.data().unwrap_or(&empty);

        let plan_name = match self.scenario.selected_plan() {
            Some(id) => catalog
                .plans
                .iter()
                .find(|p| p.plan_id == id)
                .map(|p| p.plan_name.clone())
                .unwrap_or_else(|| "Unknown plan".to_string()),
            None => self
                .current_plan()
                .map(|p| p.plan_name.clone())
                .unwrap_or_else(|| "Current plan".to_string()),
        };

        let addon_names = catalog
            .addons
            .iter()
            .filter(|a| self.scenario.addons.contains(&a.addon_id))
            .map(|a| a.name.clone())
            .collect();

        let vas_names = catalog
            .vas
            .iter()
            .filter(|v| self.scenario.vas_services.contains(&v.vas_id))
            .map(|v| v.name.clone())
            .collect();

        ScenarioSummary {
            plan_name,
            addon_names,
            vas_names,
        }
    }
}
