//! What-if scenarios
//!
//! A scenario is a sparse set of proposed changes built up from user toggles.
//! It is translated into two backend shapes:
//! - [`ScenarioSubmission`] for `POST /whatif`
//! - a list of [`CheckoutAction`]s for `POST /checkout`

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::WhatIfResponse;

/// Proposed plan change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<i64>,
    pub to: i64,
}

/// Sparse set of proposed billing changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatIfScenario {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_change: Option<PlanChange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vas_services: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_vas: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub block_premium_sms: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable_roaming_block: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl WhatIfScenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Propose switching to `to`, remembering the current plan when known
    pub fn select_plan(&mut self, to: i64, current: Option<i64>) {
        self.plan_change = Some(PlanChange { from: current, to });
    }

    pub fn clear_plan(&mut self) {
        self.plan_change = None;
    }

    pub fn toggle_addon(&mut self, addon_id: i64) {
        toggle(&mut self.addons, addon_id);
    }

    pub fn toggle_vas(&mut self, vas_id: &str) {
        toggle(&mut self.vas_services, vas_id.to_string());
    }

    pub fn toggle_disable_vas(&mut self) {
        self.disable_vas = !self.disable_vas;
    }

    pub fn toggle_block_premium_sms(&mut self) {
        self.block_premium_sms = !self.block_premium_sms;
    }

    pub fn toggle_roaming_block(&mut self) {
        self.enable_roaming_block = !self.enable_roaming_block;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn selected_plan(&self) -> Option<i64> {
        self.plan_change.as_ref().map(|c| c.to)
    }

    pub fn is_empty(&self) -> bool {
        self.plan_change.is_none()
            && self.addons.is_empty()
            && self.vas_services.is_empty()
            && !self.disable_vas
            && !self.block_premium_sms
            && !self.enable_roaming_block
    }

    /// Backend shape for `POST /whatif`
    ///
    /// Fails without building anything when no option is selected.
    pub fn to_submission(&self) -> Result<ScenarioSubmission> {
        if self.is_empty() {
            return Err(Error::Precondition(
                "Select at least one scenario option".to_string(),
            ));
        }

        Ok(ScenarioSubmission {
            plan_id: self.selected_plan(),
            addons: self.addons.clone(),
            vas_services: self.vas_services.clone(),
            disable_vas: self.disable_vas,
            block_premium_sms: self.block_premium_sms,
            enable_roaming_block: self.enable_roaming_block,
        })
    }

    /// Ordered action batch for `POST /checkout`
    pub fn to_checkout_actions(&self) -> Vec<CheckoutAction> {
        let mut actions = Vec::new();

        if let Some(plan_id) = self.selected_plan() {
            actions.push(CheckoutAction::ChangePlan { plan_id });
        }

        for &addon_id in &self.addons {
            actions.push(CheckoutAction::AddAddon { addon_id });
        }

        // Cancelling everything subsumes individual cancellations
        if self.disable_vas {
            actions.push(CheckoutAction::CancelVas {
                vas_id: ALL_VAS.to_string(),
            });
        } else {
            for vas_id in &self.vas_services {
                actions.push(CheckoutAction::CancelVas {
                    vas_id: vas_id.clone(),
                });
            }
        }

        if self.block_premium_sms {
            actions.push(CheckoutAction::BlockPremiumSms { enable: true });
        }

        if self.enable_roaming_block {
            actions.push(CheckoutAction::EnableRoamingBlock { enable: true });
        }

        actions
    }
}

fn toggle<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if let Some(pos) = list.iter().position(|v| *v == value) {
        list.remove(pos);
    } else {
        list.push(value);
    }
}

/// VAS id that cancels every active service
pub const ALL_VAS: &str = "all";

/// Scenario as the what-if endpoint expects it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSubmission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addons: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vas_services: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_vas: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub block_premium_sms: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub enable_roaming_block: bool,
}

/// One discrete change submitted at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CheckoutAction {
    ChangePlan { plan_id: i64 },
    AddAddon { addon_id: i64 },
    CancelVas { vas_id: String },
    BlockPremiumSms { enable: bool },
    EnableRoamingBlock { enable: bool },
}

impl CheckoutAction {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ChangePlan { .. } => "change_plan",
            Self::AddAddon { .. } => "add_addon",
            Self::CancelVas { .. } => "cancel_vas",
            Self::BlockPremiumSms { .. } => "block_premium_sms",
            Self::EnableRoamingBlock { .. } => "enable_roaming_block",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::ChangePlan { plan_id } => format!("Change plan to plan #{}", plan_id),
            Self::AddAddon { addon_id } => format!("Add addon #{}", addon_id),
            Self::CancelVas { vas_id } if vas_id == ALL_VAS => {
                "Cancel all value-added services".to_string()
            }
            Self::CancelVas { vas_id } => format!("Cancel value-added service {}", vas_id),
            Self::BlockPremiumSms { .. } => "Block premium SMS".to_string(),
            Self::EnableRoamingBlock { .. } => "Block roaming usage".to_string(),
        }
    }
}

/// Normalized what-if result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub current_total: f64,
    pub new_total: f64,
    pub saving: f64,
    pub saving_percent: f64,
    pub details: Vec<String>,
    pub recommendations: Vec<String>,
}

impl From<WhatIfResponse> for SimulationResult {
    fn from(response: WhatIfResponse) -> Self {
        let current_total = response
            .current_total
            .unwrap_or(response.new_total + response.saving);
        let saving_percent = response
            .saving_percent
            .or(response.saving_percentage)
            .unwrap_or(0.0);
        let details = if response.details.is_empty() {
            vec![response
                .name
                .unwrap_or_else(|| "Simulation complete".to_string())]
        } else {
            response.details
        };

        Self {
            current_total,
            new_total: response.new_total,
            saving: response.saving,
            saving_percent,
            details,
            recommendations: response.recommendations,
        }
    }
}
