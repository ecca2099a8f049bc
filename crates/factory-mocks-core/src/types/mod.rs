//! Core domain types for requests, matchers, and settings.

pub mod method;
pub mod params;
pub mod request;
pub mod settings;
