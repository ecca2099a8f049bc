//! Core library for mocking the HTTP calls a client-side data layer makes in tests.
//!
//! Tests register mocks through the [`FactoryGuy`] helpers (or directly on a
//! [`RequestManager`]); requests issued by the code under test are matched to the
//! most recently registered active mock and answered after the configured latency.

pub mod config;
pub mod error;
pub mod expression;
pub mod facade;
pub mod matching;
pub mod mocks;
pub mod serializer;
pub mod types;

pub use error::{MockError, RequestError};
pub use facade::FactoryGuy;
pub use mocks::errors::{ErrorInput, FailureOptions};
pub use mocks::registry::{MockResponse, PendingResponse, RequestManager};
pub use mocks::request::{AnyRequestOptions, MockId, MockRequest, Responder};
pub use serializer::{Adapter, KeyCase, SerializerKind};
pub use types::method::HttpMethod;
pub use types::params::ParamsMatcher;
pub use types::request::Request;
pub use types::settings::{Settings, SettingsUpdate};
