//! Fatura Core Library
//!
//! Client-side logic for the Fatura telecom billing assistant:
//! - HTTP transport with `{success, data, error}` envelope handling
//! - Typed billing API service (bills, users, catalog, anomalies, what-if, checkout)
//! - Remote resource state with stale-response protection
//! - What-if scenario builder and checkout action mapping
//! - Session state and navigation between screens
//! - Screen controllers for the six app screens

pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod period;
pub mod resource;
pub mod scenario;
pub mod screens;
pub mod service;
pub mod session;
pub mod transport;

/// Test utilities including mock billing backend
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod tests;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use resource::{LoadTicket, RemoteResource, ResourceState, ScreenError};
pub use scenario::{CheckoutAction, ScenarioSubmission, SimulationResult, WhatIfScenario};
pub use service::{AddonQuery, ApiService, PlanQuery, PremiumSmsQuery, VasQuery};
pub use session::{Navigator, Route, Session};
pub use transport::{ApiClient, Endpoint};
