//! Request manager: the registry of mocks for one test.
//!
//! `RequestManager` owns every mock registered during a test together with the
//! response settings. Among the active mocks matching a request, those restricted
//! by query params or body win over unrestricted ones; otherwise the most recently
//! registered wins, so a later mock shadows an earlier one for the same endpoint
//! until it is disabled or destroyed.

use crate::error::{MockError, RequestError};
use crate::mocks::request::{MockId, MockRequest, Responder};
use crate::types::request::Request;
use crate::types::settings::{Settings, SettingsUpdate};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Successful response delivered to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    pub status: u16,
    pub body: Value,
}

/// A matched request waiting out the simulated latency.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a pending response does nothing until settled"]
pub struct PendingResponse {
    mock_id: MockId,
    responder: Responder,
    delay: Duration,
}

impl PendingResponse {
    /// Mock that answered the request.
    pub fn mock_id(&self) -> MockId {
        self.mock_id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait for the configured latency, then resolve or reject.
    pub async fn settle(self) -> Result<MockResponse, RequestError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.responder {
            Responder::Success { status, body } => Ok(MockResponse { status, body }),
            Responder::Failure { status, payload } => Err(RequestError::Failed { status, payload }),
        }
    }
}

/// Registry of mocks and response settings, owned by a single test.
#[derive(Debug, Clone, Default)]
pub struct RequestManager {
    mocks: Vec<MockRequest>,
    settings: Settings,
    next_id: u32,
}

impl RequestManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Override the provided settings, keeping the others.
    pub fn update_settings(&mut self, update: SettingsUpdate) -> &Settings {
        self.settings.apply(update);
        debug!(
            response_time = self.settings.response_time,
            log_level = self.settings.log_level,
            "Updated mock settings"
        );
        &self.settings
    }

    /// Register a mock; it takes precedence over every earlier mock.
    pub fn register(&mut self, mut mock: MockRequest) -> &mut MockRequest {
        self.next_id += 1;
        let id = MockId(self.next_id);
        mock.set_id(id);
        debug!(mock = %id, method = %mock.method(), url = mock.url(), "Registered mock");
        self.mocks.push(mock);
        let index = self.mocks.len() - 1;
        &mut self.mocks[index]
    }

    pub fn mock(&self, id: MockId) -> Option<&MockRequest> {
        self.mocks.iter().find(|mock| mock.id() == id)
    }

    pub fn mock_mut(&mut self, id: MockId) -> Option<&mut MockRequest> {
        self.mocks.iter_mut().find(|mock| mock.id() == id)
    }

    /// Like `mock_mut`, failing for ids this manager never handed out.
    pub fn try_mock_mut(&mut self, id: MockId) -> Result<&mut MockRequest, MockError> {
        self.mock_mut(id).ok_or(MockError::UnknownMock(id))
    }

    /// All registered mocks in registration order, destroyed ones included.
    pub fn mocks(&self) -> &[MockRequest] {
        &self.mocks
    }

    /// Number of mocks that still take part in matching.
    pub fn active_count(&self) -> usize {
        self.mocks.iter().filter(|mock| mock.is_active()).count()
    }

    /// Active mock that would answer `request`.
    pub fn find_mock(&self, request: &Request) -> Option<&MockRequest> {
        self.select(request).map(|index| &self.mocks[index])
    }

    /// Index of the most specific matching mock. `max_by_key` keeps the last
    /// maximum, so ties go to the most recent registration.
    fn select(&self, request: &Request) -> Option<usize> {
        self.mocks
            .iter()
            .enumerate()
            .filter(|(_, mock)| mock.is_active() && mock.matches(request))
            .max_by_key(|(_, mock)| mock.specificity())
            .map(|(index, _)| index)
    }

    /// Select the mock answering `request` and count the call.
    ///
    /// Selection happens now; the returned response settles after the
    /// configured latency.
    pub fn dispatch(&mut self, request: &Request) -> Result<PendingResponse, RequestError> {
        let log_level = self.settings.log_level;
        let delay = self.settings.latency();

        let Some(index) = self.select(request) else {
            warn!(method = %request.method, url = %request.url, "No mock found for request");
            return Err(RequestError::NoMockFound {
                method: request.method,
                url: request.url.clone(),
            });
        };

        let mock = &mut self.mocks[index];
        let responder = mock.record_call();
        let status = responder.status();
        if log_level > 0 {
            info!(
                mock = %mock.id(),
                method = %request.method,
                url = %request.url,
                status,
                times_called = mock.times_called(),
                "Mocked request"
            );
        } else {
            debug!(mock = %mock.id(), url = %request.url, status, "Mocked request");
        }

        Ok(PendingResponse {
            mock_id: mock.id(),
            responder,
            delay,
        })
    }

    /// Dispatch `request` and wait for its response.
    pub async fn handle(&mut self, request: &Request) -> Result<MockResponse, RequestError> {
        self.dispatch(request)?.settle().await
    }

    /// Drop every mock and restore default settings.
    pub fn reset(&mut self) {
        debug!(mocks = self.mocks.len(), "Resetting request manager");
        self.mocks.clear();
        self.settings = Settings::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::errors::FailureOptions;
    use crate::types::method::HttpMethod;
    use crate::types::params::ParamsMatcher;
    use rstest::rstest;
    use serde_json::json;

    fn company_mock(name: &str) -> MockRequest {
        let mut mock = MockRequest::new(HttpMethod::Get, "/company");
        mock.returns(json!({"name": name}));
        mock
    }

    #[rstest]
    fn test_register_assigns_increasing_ids() {
        let mut manager = RequestManager::new();
        let first = manager.register(company_mock("A")).id();
        let second = manager.register(company_mock("B")).id();
        assert!(second > first);
        assert_eq!(manager.mocks().len(), 2);
        assert_eq!(manager.mock(first).map(|m| m.url()), Some("/company"));
    }

    #[rstest]
    fn test_most_recent_mock_wins() {
        let mut manager = RequestManager::new();
        let a = manager.register(company_mock("A")).id();
        let b = manager.register(company_mock("B")).id();

        let request = Request::get("/company");
        for _ in 0..2 {
            let pending = manager.dispatch(&request).unwrap();
            assert_eq!(pending.mock_id(), b);
        }
        assert_eq!(manager.mock(b).unwrap().times_called(), 2);
        assert_eq!(manager.mock(a).unwrap().times_called(), 0);
    }

    #[rstest]
    fn test_disabled_mock_is_skipped_then_resumes() {
        let mut manager = RequestManager::new();
        let a = manager.register(company_mock("A")).id();
        let b = manager.register(company_mock("B")).id();
        let request = Request::get("/company");

        manager.mock_mut(b).unwrap().disable();
        assert_eq!(manager.dispatch(&request).unwrap().mock_id(), a);
        assert_eq!(manager.mock(b).unwrap().times_called(), 0);

        manager.mock_mut(b).unwrap().enable();
        assert_eq!(manager.dispatch(&request).unwrap().mock_id(), b);
        assert_eq!(manager.mock(b).unwrap().times_called(), 1);
    }

    #[rstest]
    fn test_destroyed_mocks_leave_no_match() {
        let mut manager = RequestManager::new();
        let a = manager.register(company_mock("A")).id();
        let b = manager.register(company_mock("B")).id();
        let request = Request::get("/company");

        manager.mock_mut(b).unwrap().disable();
        manager.mock_mut(a).unwrap().destroy();

        let err = manager.dispatch(&request).unwrap_err();
        assert_eq!(
            err,
            RequestError::NoMockFound {
                method: HttpMethod::Get,
                url: "/company".to_string()
            }
        );
        assert_eq!(manager.active_count(), 0);
    }

    #[rstest]
    fn test_restricted_mock_wins_over_later_unrestricted() {
        let mut manager = RequestManager::new();
        let specific = manager
            .register(company_mock("A"))
            .with_params(ParamsMatcher::equals(&json!({"id": 1})))
            .id();
        let general = manager.register(company_mock("B")).id();

        assert_eq!(manager.dispatch(&Request::get("/company?id=1")).unwrap().mock_id(), specific);
        assert_eq!(manager.dispatch(&Request::get("/company?id=2")).unwrap().mock_id(), general);
    }

    #[rstest]
    #[case("/company", None)]
    #[case("/company?id=1", None)]
    #[case("/company?id=2", None)]
    #[case("/company", Some(json!({"name": "Acme"})))]
    #[case("/company?id=1", Some(json!({"name": "Acme"})))]
    #[case("/company?id=1", Some(json!({"name": "Other"})))]
    fn test_find_mock_agrees_with_dispatch(#[case] url: &str, #[case] body: Option<Value>) {
        let mut manager = RequestManager::new();
        manager.register(company_mock("A"));
        manager
            .register(company_mock("B"))
            .with_params(ParamsMatcher::equals(&json!({"id": 1})));
        manager.register(company_mock("C")).matching(json!({"name": "Acme"}));
        manager.register(company_mock("D"));
        manager
            .register(company_mock("E"))
            .with_params(ParamsMatcher::equals(&json!({"id": 1})))
            .matching(json!({"name": "Acme"}));

        let mut request = Request::get(url);
        request.payload = body;
        let found = manager.find_mock(&request).map(MockRequest::id);
        let answered = manager.dispatch(&request).unwrap().mock_id();
        assert_eq!(found, Some(answered));
    }

    #[rstest]
    fn test_dispatch_picks_most_specific_then_most_recent() {
        let mut manager = RequestManager::new();
        let by_params = manager
            .register(company_mock("A"))
            .with_params(ParamsMatcher::equals(&json!({"id": 1})))
            .id();
        let by_body = manager.register(company_mock("B")).matching(json!({"name": "Acme"})).id();
        let by_both = manager
            .register(company_mock("C"))
            .with_params(ParamsMatcher::equals(&json!({"id": 1})))
            .matching(json!({"name": "Acme"}))
            .id();
        let latest = manager.register(company_mock("D")).id();

        let acme = json!({"name": "Acme"});
        let other = json!({"name": "Other"});
        let pick = |manager: &mut RequestManager, url: &str, body: &Value| {
            manager
                .dispatch(&Request::get(url).with_payload(body.clone()))
                .unwrap()
                .mock_id()
        };
        assert_eq!(pick(&mut manager, "/company?id=1", &acme), by_both);
        assert_eq!(pick(&mut manager, "/company?id=1", &other), by_params);
        assert_eq!(pick(&mut manager, "/company", &acme), by_body);
        assert_eq!(pick(&mut manager, "/company", &other), latest);
    }

    #[rstest]
    fn test_find_mock_does_not_count() {
        let mut manager = RequestManager::new();
        let id = manager.register(company_mock("A")).id();
        assert!(manager.find_mock(&Request::get("/company?x=1")).is_some());
        assert!(manager.find_mock(&Request::get("/companies")).is_none());
        assert_eq!(manager.mock(id).unwrap().times_called(), 0);
    }

    #[rstest]
    fn test_try_mock_mut_unknown_id() {
        let mut manager = RequestManager::new();
        assert_eq!(
            manager.try_mock_mut(MockId(42)).map(|_| ()),
            Err(MockError::UnknownMock(MockId(42)))
        );
    }

    #[rstest]
    fn test_update_settings_is_partial() {
        let mut manager = RequestManager::new();
        manager.update_settings(SettingsUpdate::log_level(1));
        let settings = *manager.update_settings(SettingsUpdate::response_time(10));
        assert_eq!(settings.log_level, 1);
        assert_eq!(settings.response_time, 10);
    }

    #[rstest]
    fn test_reset_clears_mocks_and_settings() {
        let mut manager = RequestManager::new();
        manager.register(company_mock("A"));
        manager.update_settings(SettingsUpdate::response_time(10));
        manager.reset();
        assert!(manager.mocks().is_empty());
        assert_eq!(*manager.settings(), Settings::default());
        assert!(manager.dispatch(&Request::get("/company")).is_err());
    }

    #[tokio::test]
    async fn test_handle_resolves_success() {
        let mut manager = RequestManager::new();
        manager.register(company_mock("A"));
        let response = manager.handle(&Request::get("/company")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({"name": "A"}));
    }

    #[tokio::test]
    async fn test_handle_rejects_failure() {
        let mut manager = RequestManager::new();
        manager
            .register(company_mock("A"))
            .fails(FailureOptions::status(422).with_field_errors([("name", "is taken")]))
            .unwrap();

        let err = manager.handle(&Request::get("/company")).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(
            err.payload().unwrap()["errors"][0]["source"]["pointer"],
            "data/attributes/name"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_time_delays_settlement() {
        let mut manager = RequestManager::new();
        manager.register(company_mock("A"));
        manager.update_settings(SettingsUpdate::response_time(10));

        let start = tokio::time::Instant::now();
        let pending = manager.dispatch(&Request::get("/company")).unwrap();
        assert_eq!(pending.delay(), Duration::from_millis(10));
        pending.settle().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_delayed_too() {
        let mut manager = RequestManager::new();
        manager
            .register(company_mock("A"))
            .fails(FailureOptions::status(500))
            .unwrap();
        manager.update_settings(SettingsUpdate::response_time(25));

        let start = tokio::time::Instant::now();
        assert!(manager.handle(&Request::get("/company")).await.is_err());
        assert!(start.elapsed() >= Duration::from_millis(25));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_happens_at_dispatch() {
        let mut manager = RequestManager::new();
        let a = manager.register(company_mock("A")).id();
        manager.update_settings(SettingsUpdate::response_time(5));

        let pending = manager.dispatch(&Request::get("/company")).unwrap();
        manager.register(company_mock("B"));
        let response = pending.settle().await.unwrap();

        assert_eq!(response.body, json!({"name": "A"}));
        assert_eq!(manager.mock(a).unwrap().times_called(), 1);
    }
}
