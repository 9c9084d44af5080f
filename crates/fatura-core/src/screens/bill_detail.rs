//! Itemized bill with commentary and alternative plans

use serde_json::Value;

use crate::models::{BillData, BillDetails, Plan};
use crate::resource::{RemoteResource, ScreenError};
use crate::service::ApiService;
use crate::session::PeriodParams;

/// Pull the readable summary out of an explanation payload
///
/// Falls back to a top-level `summary` string, then to the raw JSON.
pub fn commentary_text(explanation: &Value) -> String {
    if let Some(text) = explanation
        .pointer("/summary/natural_language")
        .and_then(Value::as_str)
    {
        return text.to_string();
    }
    match explanation.get("summary") {
        Some(Value::String(s)) => s.clone(),
        _ => explanation.to_string(),
    }
}

pub struct BillDetailScreen {
    service: ApiService,
    params: PeriodParams,
    bill: RemoteResource<BillData>,
    details: RemoteResource<BillDetails>,
    commentary: RemoteResource<String>,
    plans: RemoteResource<Vec<Plan>>,
}

impl BillDetailScreen {
    pub fn new(service: ApiService, params: PeriodParams) -> Self {
        Self {
            service,
            params,
            bill: RemoteResource::new(),
            details: RemoteResource::new(),
            commentary: RemoteResource::new(),
            plans: RemoteResource::new(),
        }
    }

    pub fn params(&self) -> &PeriodParams {
        &self.params
    }

    /// Bill, commentary and plans in parallel; details once the bill id is known
    pub async fn load(&mut self) {
        let user_id = self.params.user_id;
        let period = self.params.period.clone();

        let bill_ticket = self.bill.begin();
        let commentary_ticket = self.commentary.begin();
        let plans_ticket = self.plans.begin();

        let (bill, explanation, catalog) = tokio::join!(
            self.service.get_bill(user_id, Some(&period), true),
            self.service.explain_bill(user_id, &period),
            self.service.get_catalog(None),
        );

        let _ = self
            .bill
            .complete(bill_ticket, bill.map_err(|e| ScreenError::for_bill(&e, &period)));
        let _ = self.commentary.complete(
            commentary_ticket,
            explanation
                .map(|v| commentary_text(&v))
                .map_err(|e| ScreenError::from_error(&e, "Could not load the bill commentary")),
        );
        let _ = self.plans.complete(
            plans_ticket,
            catalog
                .map(|c| c.plans)
                .map_err(|e| ScreenError::from_error(&e, "Could not load plans")),
        );

        match self.bill.data().map(|d| d.bill.bill_id.clone()) {
            Some(bill_id) => {
                self.details
                    .load(self.service.get_bill_details(&bill_id), |e| {
                        ScreenError::from_error(e, "Could not load the bill breakdown")
                    })
                    .await;
            }
            None => self.details.reset(),
        }
    }

    pub fn bill(&self) -> &RemoteResource<BillData> {
        &self.bill
    }

    pub fn details(&self) -> &RemoteResource<BillDetails> {
        &self.details
    }

    pub fn commentary(&self) -> &RemoteResource<String> {
        &self.commentary
    }

    pub fn plans(&self) -> &RemoteResource<Vec<Plan>> {
        &self.plans
    }
}
