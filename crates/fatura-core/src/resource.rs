//! Remote resource state machine
//!
//! Every data-bearing screen holds one [`RemoteResource`] per independent
//! fetch. States: `Idle → Loading → {Ready | Failed}`, re-entered on retry or
//! parameter change. Each load is tagged with a [`LoadTicket`]; completions
//! carrying a superseded ticket are dropped so a slow response for an old
//! parameter set cannot overwrite the current one.

use std::future::Future;

use tracing::debug;

use crate::error::Error;

/// Human-readable failure shown by a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenError {
    pub message: String,
    /// HTTP status when the failure came from a response
    pub status: Option<u16>,
}

impl ScreenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// Prefer the backend's message, else `fallback`
    ///
    /// Client-side precondition failures keep their own text.
    pub fn from_error(err: &Error, fallback: &str) -> Self {
        let message = match err {
            Error::Precondition(msg) => msg.clone(),
            _ => err
                .api_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        };
        Self {
            message,
            status: err.status(),
        }
    }

    /// Bill fetch failure; a 404 names the missing period
    pub fn for_bill(err: &Error, period: &str) -> Self {
        if err.is_not_found() {
            return Self {
                message: format!("No bill found for period {}", period),
                status: Some(404),
            };
        }
        Self::from_error(err, "Could not load bill information")
    }
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Current state of a remote resource
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(ScreenError),
}

/// Proof of which load a completion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct LoadTicket(u64);

#[derive(Debug, Clone)]
pub struct RemoteResource<T> {
    state: ResourceState<T>,
    generation: u64,
}

impl<T> Default for RemoteResource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RemoteResource<T> {
    pub fn new() -> Self {
        Self {
            state: ResourceState::Idle,
            generation: 0,
        }
    }

    /// Enter `Loading`, dropping any previous data or error
    pub fn begin(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ResourceState::Loading;
        LoadTicket(self.generation)
    }

    /// Whether `ticket` still belongs to the latest load
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Record the outcome of a load; returns false if it was superseded
    pub fn complete(&mut self, ticket: LoadTicket, outcome: Result<T, ScreenError>) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale load {} (current is {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.state = match outcome {
            Ok(data) => ResourceState::Ready(data),
            Err(err) => ResourceState::Failed(err),
        };
        true
    }

    /// Run one fetch end to end
    pub async fn load<F, M>(&mut self, fetch: F, map_err: M)
    where
        F: Future<Output = crate::Result<T>>,
        M: FnOnce(&Error) -> ScreenError,
    {
        let ticket = self.begin();
        let outcome = fetch.await.map_err(|e| {
            debug!("Load failed: {}", e);
            map_err(&e)
        });
        let _ = self.complete(ticket, outcome);
    }

    /// Back to `Idle`; in-flight loads become stale
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = ResourceState::Idle;
    }

    pub fn state(&self) -> &ResourceState<T> {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, ResourceState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ResourceState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            ResourceState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ScreenError> {
        match &self.state {
            ResourceState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self.state {
            ResourceState::Ready(data) => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut resource: RemoteResource<u32> = RemoteResource::new();
        assert!(resource.is_idle());

        let ticket = resource.begin();
        assert!(resource.is_loading());
        assert!(resource.complete(ticket, Ok(7)));
        assert_eq!(resource.data(), Some(&7));

        // Retry drops the old data while loading
        let ticket = resource.begin();
        assert_eq!(resource.data(), None);
        assert!(resource.complete(ticket, Err(ScreenError::new("offline"))));
        assert_eq!(resource.error().map(|e| e.message.as_str()), Some("offline"));
    }

    #[test]
    fn test_stale_completion_discarded() {
        let mut resource: RemoteResource<&str> = RemoteResource::new();

        let old = resource.begin();
        let new = resource.begin();

        assert!(resource.complete(new, Ok("2025-07")));
        assert!(!resource.complete(old, Ok("2025-06")));
        assert_eq!(resource.data(), Some(&"2025-07"));
    }

    #[test]
    fn test_reset_invalidates_in_flight() {
        let mut resource: RemoteResource<u8> = RemoteResource::new();
        let ticket = resource.begin();
        resource.reset();
        assert!(!resource.complete(ticket, Ok(1)));
        assert!(resource.is_idle());
    }

    #[tokio::test]
    async fn test_load_maps_errors() {
        let mut resource: RemoteResource<u8> = RemoteResource::new();
        resource
            .load(
                async {
                    Err(Error::Api {
                        status: Some(500),
                        code: "INTERNAL".into(),
                        message: "Billing engine unavailable".into(),
                        details: None,
                    })
                },
                |e| ScreenError::from_error(e, "Could not load"),
            )
            .await;

        let err = resource.error().unwrap();
        assert_eq!(err.message, "Billing engine unavailable");
        assert_eq!(err.status, Some(500));
    }

    #[test]
    fn test_bill_not_found_names_period() {
        let err = Error::Api {
            status: Some(404),
            code: "BILL_NOT_FOUND".into(),
            message: "Bill not found".into(),
            details: None,
        };
        let screen = ScreenError::for_bill(&err, "2025-03");
        assert_eq!(screen.message, "No bill found for period 2025-03");
    }

    #[test]
    fn test_generic_fallback_for_transport_errors() {
        let err = Error::InvalidData("garbled".into());
        let screen = ScreenError::from_error(&err, "Could not load users");
        assert_eq!(screen.message, "Could not load users");
        assert_eq!(screen.status, None);
    }
}
