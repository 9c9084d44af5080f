//! Checkout: order summary, action list and submission
//!
//! Submission is split into [`CheckoutScreen::begin_submit`] and
//! [`CheckoutScreen::finish_submit`] so a second submit while one is in
//! flight can be refused. [`CheckoutScreen::submit`] runs both.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::format::{money, percent};
use crate::models::{CheckoutEstimate, EstimateItem, ItemId, Order, OrderItemKind};
use crate::resource::{LoadTicket, RemoteResource, ScreenError};
use crate::scenario::{CheckoutAction, SimulationResult};
use crate::service::ApiService;
use crate::session::CheckoutParams;

/// Formatted totals for the order summary card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub current_total: String,
    pub new_total: String,
    /// Absolute saving; see `is_saving` for the sign
    pub saving: String,
    pub saving_percent: String,
    pub is_saving: bool,
    pub details: Vec<String>,
    pub recommendations: Vec<String>,
}

impl From<&SimulationResult> for OrderSummary {
    fn from(result: &SimulationResult) -> Self {
        Self {
            current_total: money(result.current_total),
            new_total: money(result.new_total),
            saving: money(result.saving.abs()),
            saving_percent: percent(result.saving_percent),
            is_saving: result.saving >= 0.0,
            details: result.details.clone(),
            recommendations: result.recommendations.clone(),
        }
    }
}

/// Formatted confirmation of a completed order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub order_id: String,
    pub status: Option<String>,
    pub total_saving: Option<String>,
    pub effective_date: Option<String>,
    pub next_bill_estimate: Option<String>,
}

impl From<&Order> for OrderConfirmation {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            status: order.status.map(|s| s.to_string()),
            total_saving: order.total_saving.map(money),
            effective_date: order.effective_date.clone(),
            next_bill_estimate: order.next_bill_estimate.map(money),
        }
    }
}

pub struct CheckoutScreen {
    service: ApiService,
    params: CheckoutParams,
    in_flight: bool,
    order: RemoteResource<Order>,
    estimate: RemoteResource<CheckoutEstimate>,
}

impl CheckoutScreen {
    pub fn new(service: ApiService, params: CheckoutParams) -> Self {
        Self {
            service,
            params,
            in_flight: false,
            order: RemoteResource::new(),
            estimate: RemoteResource::new(),
        }
    }

    pub fn params(&self) -> &CheckoutParams {
        &self.params
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from(&self.params.result)
    }

    /// Actions that will be submitted, in order
    pub fn actions(&self) -> Vec<CheckoutAction> {
        self.params.scenario.to_checkout_actions()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn order(&self) -> &RemoteResource<Order> {
        &self.order
    }

    pub fn estimate(&self) -> &RemoteResource<CheckoutEstimate> {
        &self.estimate
    }

    pub fn confirmation(&self) -> Option<OrderConfirmation> {
        self.order.data().map(OrderConfirmation::from)
    }

    /// Mark a submission as started
    ///
    /// Refused while another submission is in flight, after an order was
    /// placed, or when there is nothing to submit.
    pub fn begin_submit(&mut self) -> Result<(LoadTicket, Vec<CheckoutAction>)> {
        if self.in_flight {
            return Err(Error::Precondition(
                "Checkout is already in progress".to_string(),
            ));
        }
        if self.order.data().is_some() {
            return Err(Error::Precondition(
                "This order has already been placed".to_string(),
            ));
        }
        let actions = self.actions();
        if actions.is_empty() {
            return Err(Error::Precondition("Nothing to check out".to_string()));
        }
        self.in_flight = true;
        Ok((self.order.begin(), actions))
    }

    pub fn finish_submit(&mut self, ticket: LoadTicket, outcome: Result<Order>) {
        self.in_flight = false;
        let outcome =
            outcome.map_err(|e| ScreenError::from_error(&e, "Could not complete the order"));
        if let Ok(order) = &outcome {
            info!("Order {} placed for user {}", order.order_id, self.params.user_id);
        }
        let _ = self.order.complete(ticket, outcome);
    }

    /// Submit the action batch and record the outcome
    pub async fn submit(&mut self) -> Result<()> {
        let (ticket, actions) = self.begin_submit()?;
        debug!("Submitting {} checkout actions", actions.len());
        let outcome = self
            .service
            .process_checkout(self.params.user_id, &actions)
            .await;
        self.finish_submit(ticket, outcome);
        Ok(())
    }

    /// Items the backend can price: the target plan and added addons
    pub fn estimate_items(&self) -> Vec<EstimateItem> {
        let scenario = &self.params.scenario;
        scenario
            .selected_plan()
            .map(|id| EstimateItem {
                kind: OrderItemKind::Plan,
                id: ItemId::Number(id),
            })
            .into_iter()
            .chain(scenario.addons.iter().map(|&id| EstimateItem {
                kind: OrderItemKind::Addon,
                id: ItemId::Number(id),
            }))
            .collect()
    }

    pub async fn load_estimate(&mut self) {
        let items = self.estimate_items();
        let user_id = self.params.user_id;
        self.estimate
            .load(self.service.estimate_price(user_id, &items), |e| {
                ScreenError::from_error(e, "Could not estimate the new price")
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(saving: f64) -> SimulationResult {
        SimulationResult {
            current_total: 200.0,
            new_total: 200.0 - saving,
            saving,
            saving_percent: 21.3,
            details: vec![],
            recommendations: vec![],
        }
    }

    #[test]
    fn test_summary_formats_amounts() {
        let summary = OrderSummary::from(&result(42.5));
        assert_eq!(summary.current_total, "₺200.00");
        assert_eq!(summary.new_total, "₺157.50");
        assert_eq!(summary.saving, "₺42.50");
        assert_eq!(summary.saving_percent, "%21.3");
        assert!(summary.is_saving);
    }

    #[test]
    fn test_summary_shows_absolute_extra_cost() {
        let summary = OrderSummary::from(&result(-10.0));
        assert_eq!(summary.saving, "₺10.00");
        assert!(!summary.is_saving);
    }
}
