//! Outgoing call issued by the data layer under test.

use crate::matching::parse_query_string;
use crate::types::method::HttpMethod;
use serde_json::Value;
use std::collections::HashMap;

/// HTTP request for mock matching.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP method
    pub method: HttpMethod,
    /// Request URL (path + query string)
    pub url: String,
    /// Query parameters (parsed from URL if `None`)
    pub query: Option<HashMap<String, String>>,
    /// Request body/payload
    pub payload: Option<Value>,
}

impl Request {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: None,
            payload: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>, payload: Value) -> Self {
        Self::new(HttpMethod::Post, url).with_payload(payload)
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = Some(query);
        self
    }

    /// Path part of the URL without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or("")
    }

    /// Explicit query parameters, or the ones carried by the URL.
    pub fn query_params(&self) -> HashMap<String, String> {
        if let Some(query) = &self.query {
            return query.clone();
        }
        self.url
            .split_once('?')
            .map(|(_, query_str)| parse_query_string(query_str))
            .unwrap_or_default()
    }
}
