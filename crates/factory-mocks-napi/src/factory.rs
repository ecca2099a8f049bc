//! NAPI bindings for the mock helpers.

use factory_mocks_core::config::load_mock_files;
use factory_mocks_core::{
    Adapter, AnyRequestOptions, ErrorInput, FactoryGuy, FailureOptions, HttpMethod, MockId,
    MockRequest, Request, RequestError, SerializerKind, Settings, SettingsUpdate,
};
use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex, MutexGuard};

/// Adapter conventions of the application under test
#[napi(object)]
pub struct AdapterOptions {
    /// `json-api` (default), `active-model` or `rest`
    pub serializer: Option<String>,
    pub host: Option<String>,
    pub namespace: Option<String>,
}

impl TryFrom<AdapterOptions> for Adapter {
    type Error = Error;

    fn try_from(options: AdapterOptions) -> Result<Self> {
        let serializer = match options.serializer.as_deref() {
            None | Some("json-api") | Some("-json-api") => SerializerKind::JsonApi,
            Some("active-model") | Some("-active-model") => SerializerKind::ActiveModel,
            Some("rest") | Some("-rest") => SerializerKind::Rest,
            Some(other) => {
                return Err(Error::from_reason(format!("Unknown serializer: {other}")));
            }
        };
        Ok(Adapter {
            serializer,
            host: options.host,
            namespace: options.namespace,
        })
    }
}

/// Response settings
#[napi(object)]
pub struct MockSettings {
    pub response_time: Option<u32>,
    pub log_level: Option<u32>,
}

impl From<&Settings> for MockSettings {
    fn from(s: &Settings) -> Self {
        Self {
            response_time: Some(s.response_time),
            log_level: Some(u32::from(s.log_level)),
        }
    }
}

impl From<MockSettings> for SettingsUpdate {
    fn from(s: MockSettings) -> Self {
        Self {
            response_time: s.response_time,
            log_level: s.log_level.map(|level| level.min(u32::from(u8::MAX)) as u8),
        }
    }
}

/// Options for a mock answering any request
#[napi(object)]
pub struct AnyRequest {
    /// HTTP method, `GET` when unset
    #[napi(js_name = "type")]
    pub method: Option<String>,
    pub url: String,
    pub response_text: Option<Value>,
    pub status: Option<u32>,
}

fn parse_method(method: &str) -> Result<HttpMethod> {
    method
        .parse()
        .map_err(|e: factory_mocks_core::types::method::ParseMethodError| {
            Error::from_reason(e.to_string())
        })
}

fn parse_status(status: u32) -> Result<u16> {
    u16::try_from(status).map_err(|_| Error::from_reason(format!("Invalid status: {status}")))
}

fn request_error(err: RequestError) -> Error {
    match err {
        RequestError::Failed { status, payload } => Error::from_reason(
            json!({ "status": status, "payload": payload }).to_string(),
        ),
        other => Error::from_reason(other.to_string()),
    }
}

/// Mock registry and helpers for one test
#[napi]
pub struct FactoryMocks {
    inner: Arc<Mutex<FactoryGuy>>,
}

impl FactoryMocks {
    fn guy(&self) -> Result<MutexGuard<'_, FactoryGuy>> {
        self.inner
            .lock()
            .map_err(|_| Error::from_reason("Mock registry is poisoned"))
    }

    fn with_mock<T>(&self, id: u32, f: impl FnOnce(&mut MockRequest) -> Result<T>) -> Result<T> {
        let mut guy = self.guy()?;
        let mock = guy
            .requests_mut()
            .try_mock_mut(MockId(id))
            .map_err(|e| Error::from_reason(e.to_string()))?;
        f(mock)
    }

    fn register(&self, f: impl FnOnce(&mut FactoryGuy) -> MockId) -> Result<u32> {
        let mut guy = self.guy()?;
        Ok(f(&mut guy).0)
    }
}

#[napi]
impl FactoryMocks {
    /// Create a fresh mock context
    ///
    /// @param options - Serializer, host and namespace of the application adapter
    #[napi(constructor)]
    pub fn new(options: Option<AdapterOptions>) -> Result<Self> {
        let adapter = match options {
            Some(options) => Adapter::try_from(options)?,
            None => Adapter::default(),
        };
        Ok(Self {
            inner: Arc::new(Mutex::new(FactoryGuy::init(adapter))),
        })
    }

    /// Apply `responseTime` / `logLevel`, keeping settings not provided
    #[napi]
    pub fn setup(&self, settings: MockSettings) -> Result<MockSettings> {
        let mut guy = self.guy()?;
        Ok(MockSettings::from(guy.mock_setup(settings.into())))
    }

    /// Current settings
    #[napi(getter)]
    pub fn settings(&self) -> Result<MockSettings> {
        let guy = self.guy()?;
        Ok(MockSettings::from(guy.settings()))
    }

    /// Drop all mocks and restore default settings
    #[napi]
    pub fn teardown(&self) -> Result<()> {
        self.guy()?.mock_teardown();
        Ok(())
    }

    #[napi]
    pub fn mock_find_all(&self, model: String) -> Result<u32> {
        self.register(|guy| guy.mock_find_all(&model).id())
    }

    #[napi]
    pub fn mock_find_record(&self, model: String, id: String) -> Result<u32> {
        self.register(|guy| guy.mock_find_record(&model, &id).id())
    }

    #[napi]
    pub fn mock_query(&self, model: String, params: Option<Value>) -> Result<u32> {
        let params = params.unwrap_or_else(|| json!({}));
        self.register(|guy| guy.mock_query(&model, &params).id())
    }

    #[napi]
    pub fn mock_query_record(&self, model: String, params: Option<Value>) -> Result<u32> {
        let params = params.unwrap_or_else(|| json!({}));
        self.register(|guy| guy.mock_query_record(&model, &params).id())
    }

    #[napi]
    pub fn mock_create(&self, model: String) -> Result<u32> {
        self.register(|guy| guy.mock_create(&model).id())
    }

    #[napi]
    pub fn mock_update(&self, model: String, id: String) -> Result<u32> {
        self.register(|guy| guy.mock_update(&model, &id).id())
    }

    #[napi]
    pub fn mock_delete(&self, model: String, id: String) -> Result<u32> {
        self.register(|guy| guy.mock_delete(&model, &id).id())
    }

    #[napi]
    pub fn mock_any(&self, request: AnyRequest) -> Result<u32> {
        let options = AnyRequestOptions {
            method: match request.method.as_deref() {
                Some(method) => parse_method(method)?,
                None => HttpMethod::Get,
            },
            url: request.url,
            response_text: request.response_text.unwrap_or(Value::Null),
            status: request.status.map(parse_status).transpose()?,
        };
        self.register(|guy| guy.mock_any(options).id())
    }

    /// Set the success payload of a mock
    #[napi]
    pub fn returns(&self, id: u32, json: Value) -> Result<()> {
        self.with_mock(id, |mock| {
            mock.returns(json);
            Ok(())
        })
    }

    /// Make a mock fail
    ///
    /// @param status - 3XX, 4XX or 5XX status, 500 when omitted
    /// @param response - Error payload; `{errors: {field: message}}` is converted to JSON:API errors
    /// @param convertErrors - `false` sends the payload as is, `true` requires the convertible shape
    /// @throws Error if the status is not a failure status or conversion is impossible
    #[napi]
    pub fn fails(
        &self,
        id: u32,
        status: Option<u32>,
        response: Option<Value>,
        convert_errors: Option<bool>,
    ) -> Result<()> {
        let options = FailureOptions {
            status: status.map(parse_status).transpose()?,
            response: response
                .map(|response| ErrorInput::from_response(response, convert_errors))
                .transpose()
                .map_err(|e| Error::from_reason(e.to_string()))?,
        };
        self.with_mock(id, |mock| {
            mock.fails(options)
                .map(|_| ())
                .map_err(|e| Error::from_reason(e.to_string()))
        })
    }

    #[napi]
    pub fn enable(&self, id: u32) -> Result<()> {
        self.with_mock(id, |mock| {
            mock.enable();
            Ok(())
        })
    }

    #[napi]
    pub fn disable(&self, id: u32) -> Result<()> {
        self.with_mock(id, |mock| {
            mock.disable();
            Ok(())
        })
    }

    #[napi]
    pub fn destroy(&self, id: u32) -> Result<()> {
        self.with_mock(id, |mock| {
            mock.destroy();
            Ok(())
        })
    }

    #[napi]
    pub fn times_called(&self, id: u32) -> Result<u32> {
        self.with_mock(id, |mock| Ok(mock.times_called()))
    }

    #[napi]
    pub fn is_destroyed(&self, id: u32) -> Result<bool> {
        self.with_mock(id, |mock| Ok(mock.is_destroyed()))
    }

    /// Register settings and mocks from YAML/JSON/JSONC files
    ///
    /// @param pattern - Path or glob pattern to mock file(s)
    /// @returns Ids of the registered mocks
    #[napi]
    pub async fn load_mocks(&self, pattern: String) -> Result<Vec<u32>> {
        let file = load_mock_files(&pattern)
            .await
            .map_err(|e| Error::from_reason(format!("Failed to load mocks: {e}")))?;
        let mut guy = self.guy()?;
        Ok(guy.load(file).into_iter().map(|id| id.0).collect())
    }

    /// Answer a request the way the mocked backend would
    ///
    /// @returns The response body
    /// @throws Error with `{status, payload}` JSON when the mock fails, or when no mock matches
    #[napi]
    pub async fn handle(&self, method: String, url: String, body: Option<Value>) -> Result<Value> {
        let mut request = Request::new(parse_method(&method)?, url);
        request.payload = body;

        let pending = {
            let mut guy = self.guy()?;
            guy.dispatch(&request).map_err(request_error)?
        };
        let response = pending.settle().await.map_err(request_error)?;
        Ok(response.body)
    }
}
