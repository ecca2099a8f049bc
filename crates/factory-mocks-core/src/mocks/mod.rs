//! Mocks management module.
//!
//! This module provides the pieces a test uses to fake the backend:
//! - [`MockRequest`](request::MockRequest): One mocked call with its response and lifecycle flags
//! - [`RequestManager`](registry::RequestManager): Registry that matches outgoing requests to mocks
//! - [`ErrorInput`](errors::ErrorInput): Error payloads for failing mocks

pub mod errors;
pub mod registry;
pub mod request;
