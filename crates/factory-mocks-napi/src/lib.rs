//! NAPI-RS bindings for the factory-mocks core library.
//!
//! Exposes the mock helpers to JavaScript test suites.

use napi::bindgen_prelude::*;
use napi_derive::napi;
use tracing_subscriber::EnvFilter;

mod factory;

pub use factory::*;

/// Library version
#[napi]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Install a tracing subscriber printing to stderr.
///
/// @param filter - `RUST_LOG`-style directives, defaults to `info`
#[napi]
pub fn init_logging(filter: Option<String>) -> Result<()> {
    let filter = EnvFilter::try_new(filter.as_deref().unwrap_or("info"))
        .map_err(|e| Error::from_reason(format!("Invalid log filter: {e}")))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::from_reason(format!("Failed to install logger: {e}")))
}
