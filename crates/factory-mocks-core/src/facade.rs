//! Mock helpers for data-layer tests.
//!
//! `FactoryGuy` bundles a [`RequestManager`] with the adapter conventions of the
//! application under test, so helpers can derive endpoint URLs and default
//! payloads from a model name alone:
//!
//! ```ignore
//! let mut guy = FactoryGuy::init(Adapter::new(SerializerKind::JsonApi));
//! let id = guy.mock_find_all("company").returns(json!({"data": []})).id();
//! guy.handle(&Request::get("/companies")).await?;
//! assert_eq!(guy.times_called(id), Some(1));
//! ```

use crate::config::MockFile;
use crate::error::RequestError;
use crate::mocks::registry::{MockResponse, PendingResponse, RequestManager};
use crate::mocks::request::{AnyRequestOptions, MockId, MockRequest};
use crate::serializer::Adapter;
use crate::types::method::HttpMethod;
use crate::types::params::ParamsMatcher;
use crate::types::request::Request;
use crate::types::settings::{Settings, SettingsUpdate};
use serde_json::{json, Value};
use tracing::debug;

/// Test context: adapter conventions plus the registry of mocks.
#[derive(Debug, Clone, Default)]
pub struct FactoryGuy {
    adapter: Adapter,
    requests: RequestManager,
}

impl FactoryGuy {
    /// Fresh context for one test.
    pub fn init(adapter: Adapter) -> Self {
        debug!(serializer = ?adapter.serializer, "Initialized mock context");
        Self {
            adapter,
            requests: RequestManager::new(),
        }
    }

    /// Drop all mocks and settings; call between tests.
    pub fn reset(&mut self) {
        self.requests.reset();
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    pub fn requests(&self) -> &RequestManager {
        &self.requests
    }

    pub fn requests_mut(&mut self) -> &mut RequestManager {
        &mut self.requests
    }

    pub fn settings(&self) -> &Settings {
        self.requests.settings()
    }

    pub fn mock(&self, id: MockId) -> Option<&MockRequest> {
        self.requests.mock(id)
    }

    pub fn mock_mut(&mut self, id: MockId) -> Option<&mut MockRequest> {
        self.requests.mock_mut(id)
    }

    pub fn times_called(&self, id: MockId) -> Option<u32> {
        self.mock(id).map(MockRequest::times_called)
    }

    /// Apply `responseTime` / `logLevel` settings.
    pub fn mock_setup(&mut self, update: SettingsUpdate) -> &Settings {
        self.requests.update_settings(update)
    }

    /// Same as [`reset`](Self::reset).
    pub fn mock_teardown(&mut self) {
        self.reset();
    }

    fn register(&mut self, mock: MockRequest) -> &mut MockRequest {
        self.requests.register(mock)
    }

    /// Mock `GET /models`, answering with an empty collection.
    pub fn mock_find_all(&mut self, model: &str) -> &mut MockRequest {
        let mut mock = MockRequest::new(HttpMethod::Get, self.adapter.build_url(model, None));
        mock.returns(self.adapter.wrap_collection(model, &[]));
        self.register(mock)
    }

    /// Mock `GET /models/:id`, answering with a bare record.
    pub fn mock_find_record(&mut self, model: &str, id: &str) -> &mut MockRequest {
        let mut mock = MockRequest::new(HttpMethod::Get, self.adapter.build_url(model, Some(id)));
        mock.returns(self.adapter.wrap_record(model, id, &json!({})));
        self.register(mock)
    }

    fn query_mock(&self, model: &str, params: &Value) -> MockRequest {
        let mut mock = MockRequest::new(HttpMethod::Get, self.adapter.build_url(model, None));
        if params.as_object().is_some_and(|map| !map.is_empty()) {
            mock.with_params(ParamsMatcher::equals(params));
        }
        mock
    }

    /// Mock `GET /models` for exactly these query params, answering with an empty collection.
    ///
    /// Empty params match any query.
    pub fn mock_query(&mut self, model: &str, params: &Value) -> &mut MockRequest {
        let mut mock = self.query_mock(model, params);
        mock.returns(self.adapter.wrap_collection(model, &[]));
        self.register(mock)
    }

    /// Mock `GET /models` for exactly these query params, answering with no record.
    ///
    /// Empty params match any query.
    pub fn mock_query_record(&mut self, model: &str, params: &Value) -> &mut MockRequest {
        let mut mock = self.query_mock(model, params);
        mock.returns(self.adapter.empty_record());
        self.register(mock)
    }

    /// Mock `POST /models`, answering with the created record (id 1).
    pub fn mock_create(&mut self, model: &str) -> &mut MockRequest {
        let mut mock = MockRequest::new(HttpMethod::Post, self.adapter.build_url(model, None));
        mock.returns(self.adapter.wrap_record(model, "1", &json!({})));
        self.register(mock)
    }

    /// Mock saving an existing record (`PATCH` for JSON:API, `PUT` otherwise).
    pub fn mock_update(&mut self, model: &str, id: &str) -> &mut MockRequest {
        let method = self.adapter.serializer.update_method();
        let mut mock = MockRequest::new(method, self.adapter.build_url(model, Some(id)));
        mock.returns(self.adapter.wrap_record(model, id, &json!({})));
        self.register(mock)
    }

    /// Mock `DELETE /models/:id`, answering with an empty object.
    pub fn mock_delete(&mut self, model: &str, id: &str) -> &mut MockRequest {
        let mut mock = MockRequest::new(HttpMethod::Delete, self.adapter.build_url(model, Some(id)));
        mock.returns(json!({}));
        self.register(mock)
    }

    /// Mock any request by method and URL.
    pub fn mock_any(&mut self, options: AnyRequestOptions) -> &mut MockRequest {
        self.register(MockRequest::any(options))
    }

    /// Answer a mock with a record built from `attrs` in this adapter's shape.
    ///
    /// Returns `None` when no mock has this id.
    pub fn returns_attrs(&mut self, id: MockId, model: &str, record_id: &str, attrs: &Value) -> Option<&mut MockRequest> {
        let payload = self.adapter.wrap_record(model, record_id, attrs);
        self.requests.mock_mut(id).map(|mock| mock.returns(payload))
    }

    /// Register the settings and mocks declared in a mock file.
    pub fn load(&mut self, file: MockFile) -> Vec<MockId> {
        if let Some(settings) = file.settings {
            self.mock_setup(settings);
        }
        file.mocks
            .into_iter()
            .map(|definition| {
                let params = definition.params.clone();
                let mock = self.mock_any(definition.into_options());
                if let Some(params) = params {
                    mock.with_params(params);
                }
                mock.id()
            })
            .collect()
    }

    pub fn dispatch(&mut self, request: &Request) -> Result<PendingResponse, RequestError> {
        self.requests.dispatch(request)
    }

    pub async fn handle(&mut self, request: &Request) -> Result<MockResponse, RequestError> {
        self.requests.handle(request).await
    }
}
