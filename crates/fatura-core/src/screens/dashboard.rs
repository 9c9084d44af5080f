//! Dashboard: bill summary, anomaly alert and category breakdown
//!
//! The bill and the anomaly analysis are independent slices fetched
//! concurrently. Either may fail without affecting the other, so the screen
//! can show a bill next to an anomaly error.

use tracing::debug;

use crate::error::Result;
use crate::models::{Anomaly, AnomalyAnalysis, Bill, BillData, BillItem};
use crate::period::{recent_periods, validate_period, PeriodOption};
use crate::resource::{RemoteResource, ScreenError};
use crate::screens::category_label;
use crate::service::ApiService;
use crate::session::DashboardParams;

/// Periods offered by the period selector
pub const SELECTABLE_PERIODS: usize = 12;

/// Bill items of one category, summed
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub label: String,
    pub total: f64,
    /// Share of the summed item amounts, 0 to 100
    pub percentage: f64,
    pub items: Vec<BillItem>,
}

/// Group items by category in order of first appearance
pub fn category_breakdown(items: &[BillItem]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => {
                group.total += item.amount;
                group.items.push(item.clone());
            }
            None => groups.push(CategoryTotal {
                category: item.category.clone(),
                label: category_label(&item.category).to_string(),
                total: item.amount,
                percentage: 0.0,
                items: vec![item.clone()],
            }),
        }
    }

    let grand_total: f64 = items.iter().map(|i| i.amount).sum();
    if grand_total != 0.0 {
        for group in &mut groups {
            group.percentage = group.total / grand_total * 100.0;
        }
    }

    groups
}

pub struct DashboardScreen {
    service: ApiService,
    params: DashboardParams,
    period: String,
    bill: RemoteResource<BillData>,
    anomalies: RemoteResource<AnomalyAnalysis>,
}

impl DashboardScreen {
    pub fn new(service: ApiService, params: DashboardParams, period: &str) -> Self {
        Self {
            service,
            params,
            period: period.to_string(),
            bill: RemoteResource::new(),
            anomalies: RemoteResource::new(),
        }
    }

    pub fn params(&self) -> &DashboardParams {
        &self.params
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    /// Fetch bill and anomalies for the current period
    pub async fn load(&mut self) {
        let user_id = self.params.user_id;
        let period = self.period.clone();
        debug!("Loading dashboard for user {} period {}", user_id, period);

        let bill_ticket = self.bill.begin();
        let anomaly_ticket = self.anomalies.begin();

        let (bill, anomalies) = tokio::join!(
            self.service.get_bill(user_id, Some(&period), true),
            self.service.detect_anomalies(user_id, &period),
        );

        let _ = self
            .bill
            .complete(bill_ticket, bill.map_err(|e| ScreenError::for_bill(&e, &period)));
        let _ = self.anomalies.complete(
            anomaly_ticket,
            anomalies.map_err(|e| ScreenError::from_error(&e, "Could not load anomalies")),
        );
    }

    /// Switch period and reload both slices
    pub async fn select_period(&mut self, period: &str) -> Result<()> {
        validate_period(period)?;
        self.period = period.to_string();
        self.load().await;
        Ok(())
    }

    pub fn bill(&self) -> &RemoteResource<BillData> {
        &self.bill
    }

    pub fn anomalies(&self) -> &RemoteResource<AnomalyAnalysis> {
        &self.anomalies
    }

    pub fn bill_summary(&self) -> Option<&Bill> {
        self.bill.data().map(|d| &d.bill)
    }

    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        self.bill
            .data()
            .map(|d| category_breakdown(&d.items))
            .unwrap_or_default()
    }

    /// Anomaly shown on the summary card, if any
    pub fn headline_anomaly(&self) -> Option<&Anomaly> {
        self.anomalies.data().and_then(|a| a.anomalies.first())
    }

    pub fn selectable_periods(&self, today: chrono::NaiveDate) -> Vec<PeriodOption> {
        recent_periods(today, SELECTABLE_PERIODS)
    }
}
