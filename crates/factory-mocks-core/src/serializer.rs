//! Serializer conventions of the host data layer.
//!
//! The data layer accepts payloads in one of three shapes (JSON:API, ActiveModel,
//! REST), each with its own key casing and root-key rules. Mock helpers use these
//! conventions to build endpoint URLs and default response payloads.

use crate::types::method::HttpMethod;
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Payload convention expected by the data layer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SerializerKind {
    #[default]
    JsonApi,
    ActiveModel,
    Rest,
}

/// Casing applied to payload keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCase {
    Camel,
    Snake,
    Dasherized,
}

impl SerializerKind {
    pub fn key_case(&self) -> KeyCase {
        match self {
            SerializerKind::JsonApi => KeyCase::Dasherized,
            SerializerKind::ActiveModel => KeyCase::Snake,
            SerializerKind::Rest => KeyCase::Camel,
        }
    }

    /// Method the data layer uses to save an existing record.
    pub fn update_method(&self) -> HttpMethod {
        match self {
            SerializerKind::JsonApi => HttpMethod::Patch,
            SerializerKind::ActiveModel | SerializerKind::Rest => HttpMethod::Put,
        }
    }
}

/// Re-case a single key.
pub fn transform_key(key: &str, case: KeyCase) -> String {
    match case {
        KeyCase::Camel => key.to_lower_camel_case(),
        KeyCase::Snake => key.to_snake_case(),
        KeyCase::Dasherized => key.to_kebab_case(),
    }
}

/// Recursively re-case every object key in `value`.
pub fn transform_keys(value: &Value, case: KeyCase) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (transform_key(k, case), transform_keys(v, case)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(|v| transform_keys(v, case)).collect()),
        other => other.clone(),
    }
}

/// English pluralization good enough for model names.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if word.ends_with(['s', 'x', 'z']) || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{word}es");
    }
    format!("{word}s")
}

/// Adapter conventions: serializer shape plus URL prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Adapter {
    #[serde(default)]
    pub serializer: SerializerKind,
    /// Scheme and host prefix, e.g. `https://api.example.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Path namespace, e.g. `api/v1`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Adapter {
    pub fn new(serializer: SerializerKind) -> Self {
        Self {
            serializer,
            host: None,
            namespace: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Endpoint for a model type, or for one record when `id` is given.
    pub fn build_url(&self, model: &str, id: Option<&str>) -> String {
        let mut url = self
            .host
            .as_deref()
            .map(|h| h.trim_end_matches('/').to_string())
            .unwrap_or_default();

        if let Some(namespace) = self.namespace.as_deref() {
            let namespace = namespace.trim_matches('/');
            if !namespace.is_empty() {
                url.push('/');
                url.push_str(namespace);
            }
        }

        url.push('/');
        url.push_str(&pluralize(&transform_key(model, KeyCase::Dasherized)));

        if let Some(id) = id {
            url.push('/');
            url.push_str(&urlencoding::encode(id));
        }
        url
    }

    /// Root key for a model in the payload (`users`, `comic_book`, `comicBooks`).
    pub fn model_key(&self, model: &str, plural: bool) -> String {
        let key = transform_key(model, self.serializer.key_case());
        if plural {
            pluralize(&key)
        } else {
            key
        }
    }

    fn record_id(&self, id: &str) -> Value {
        match self.serializer {
            SerializerKind::JsonApi => Value::String(id.to_string()),
            _ => id
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(id.to_string())),
        }
    }

    fn record_body(&self, model: &str, id: &str, attrs: &Value) -> Value {
        let attrs = transform_keys(attrs, self.serializer.key_case());
        match self.serializer {
            SerializerKind::JsonApi => {
                let mut record = Map::new();
                record.insert("id".into(), self.record_id(id));
                record.insert("type".into(), Value::String(self.model_key(model, true)));
                let attributes = match attrs {
                    Value::Object(map) => Value::Object(map),
                    _ => Value::Object(Map::new()),
                };
                record.insert("attributes".into(), attributes);
                Value::Object(record)
            }
            SerializerKind::ActiveModel | SerializerKind::Rest => {
                let mut record = Map::new();
                record.insert("id".into(), self.record_id(id));
                if let Value::Object(map) = attrs {
                    record.extend(map);
                }
                Value::Object(record)
            }
        }
    }

    /// Single-record payload in the serializer's shape.
    pub fn wrap_record(&self, model: &str, id: &str, attrs: &Value) -> Value {
        let record = self.record_body(model, id, attrs);
        let key = match self.serializer {
            SerializerKind::JsonApi => "data".to_string(),
            _ => self.model_key(model, false),
        };
        let mut root = Map::new();
        root.insert(key, record);
        Value::Object(root)
    }

    /// Payload for a lookup that found no record.
    pub fn empty_record(&self) -> Value {
        match self.serializer {
            SerializerKind::JsonApi => json!({ "data": null }),
            _ => json!({}),
        }
    }

    /// Collection payload in the serializer's shape.
    pub fn wrap_collection(&self, model: &str, records: &[(String, Value)]) -> Value {
        let items = records
            .iter()
            .map(|(id, attrs)| self.record_body(model, id, attrs))
            .collect();
        let key = match self.serializer {
            SerializerKind::JsonApi => "data".to_string(),
            _ => self.model_key(model, true),
        };
        let mut root = Map::new();
        root.insert(key, Value::Array(items));
        Value::Object(root)
    }
}
