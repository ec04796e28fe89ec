//! Request shapes used to derive exact cache keys

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The parts of an inbound request that identify its response
///
/// Query parameters are kept in a sorted map and the body is plain JSON, so
/// two requests that differ only in parameter or field order serialize to
/// the same canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestShape {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl RequestShape {
    /// Create a shape with an upper-cased method and no query or body
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into().to_uppercase(),
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    /// Shorthand for a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}
