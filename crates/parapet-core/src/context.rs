//! Ambient request context carried through a dispatch.

use serde_json::Value;
use std::collections::HashMap;

/// Snapshot of the inbound request handed to [`dispatch`](crate::registry::ContractRegistry::dispatch).
///
/// The context is opaque to validation rules: the engine may read it but
/// the dispatcher always forwards the original, unmodified context on the
/// success path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestContext {
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub method: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Host-assigned values (session data, auth principal, ...).
    pub assigns: HashMap<String, Value>,
}

impl RequestContext {
    /// Create a new request context.
    pub fn new(path: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.into(),
            headers: HashMap::new(),
            assigns: HashMap::new(),
        }
    }

    /// Builder: add a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Builder: add a host-assigned value.
    pub fn with_assign(mut self, key: impl Into<String>, value: Value) -> Self {
        self.assigns.insert(key.into(), value);
        self
    }
}
