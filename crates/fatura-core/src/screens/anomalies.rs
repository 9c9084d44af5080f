//! Anomaly review

use crate::models::{Anomaly, AnomalyAnalysis, Severity};
use crate::resource::{RemoteResource, ScreenError};
use crate::service::ApiService;
use crate::session::PeriodParams;

/// Overall risk band for a 0-100 risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            Self::High
        } else if score >= 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "Serious anomalies detected on the bill. Action needed.",
            Self::Medium => "Moderate anomalies on the bill. Keep an eye on it.",
            Self::Low => "The bill looks normal overall.",
        }
    }
}

/// Long display name for an anomaly category
pub fn anomaly_category_name(category: &str) -> &str {
    match category {
        "data" => "Data usage",
        "voice" => "Voice calls",
        "sms" => "SMS",
        "roaming" => "Roaming usage",
        "premium_sms" => "Premium SMS",
        "vas" => "Value-added services",
        "one_off" => "One-off charges",
        "discount" => "Discounts",
        "tax" => "Taxes",
        other => other,
    }
}

pub struct AnomaliesScreen {
    service: ApiService,
    params: PeriodParams,
    detailed: bool,
    analysis: RemoteResource<AnomalyAnalysis>,
}

impl AnomaliesScreen {
    pub fn new(service: ApiService, params: PeriodParams) -> Self {
        Self {
            service,
            params,
            detailed: false,
            analysis: RemoteResource::new(),
        }
    }

    /// Use the detailed analysis endpoint instead of plain detection
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn params(&self) -> &PeriodParams {
        &self.params
    }

    pub async fn load(&mut self) {
        let PeriodParams { user_id, period } = &self.params;
        let fallback = |e: &crate::Error| ScreenError::from_error(e, "Could not load anomaly data");
        if self.detailed {
            self.analysis
                .load(self.service.get_detailed_analysis(*user_id, period), fallback)
                .await;
        } else {
            self.analysis
                .load(self.service.detect_anomalies(*user_id, period), fallback)
                .await;
        }
    }

    pub fn analysis(&self) -> &RemoteResource<AnomalyAnalysis> {
        &self.analysis
    }

    /// Loaded and nothing suspicious found
    pub fn is_clean(&self) -> bool {
        self.analysis
            .data()
            .map(|a| a.anomalies.is_empty())
            .unwrap_or(false)
    }

    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.analysis
            .data()
            .map(|a| RiskLevel::from_score(a.risk_score))
    }

    /// Category of the first high-severity anomaly
    pub fn highest_risk_category(&self) -> Option<&str> {
        self.analysis.data().and_then(|a| {
            a.anomalies
                .iter()
                .find(|x| x.severity == Severity::High)
                .map(|x| x.category.as_str())
        })
    }

    /// Anomalies ordered most severe first; stable within a severity
    pub fn by_severity(&self) -> Vec<&Anomaly> {
        let mut list: Vec<&Anomaly> = self
            .analysis
            .data()
            .map(|a| a.anomalies.iter().collect())
            .unwrap_or_default();
        list.sort_by(|a, b| b.severity.cmp(&a.severity));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(85.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69.9), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(12.0), RiskLevel::Low);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(anomaly_category_name("roaming"), "Roaming usage");
        assert_eq!(anomaly_category_name("unknown"), "unknown");
    }
}
