//! Contract model: rules, parameter specs, and per-action contracts.
//!
//! A [`Rule`] is a single validation constraint on one parameter, a
//! [`ParamSpec`] groups the rules declared for that parameter, and an
//! [`ActionContract`] is the full validation policy attached to one named
//! action. Rule *semantics* are not interpreted here — the contract layer
//! only transports rules to the [`ValidationEngine`](crate::engine::ValidationEngine)
//! bound at registry finalization.

use crate::context::RequestContext;
use crate::engine::ErrorMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────────────────────────

/// JSON value types a [`Rule::Type`] rule can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Object,
    Array,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Object => "object",
            FieldType::Array => "array",
        };
        f.write_str(name)
    }
}

/// One validation rule for a single parameter.
///
/// The known kinds cover the common cases; [`Rule::Opaque`] carries any
/// engine-specific rule configuration verbatim for engines that understand
/// more than this core does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Parameter must be present and non-null.
    Required,
    /// Parameter must have the given JSON type.
    Type { expected: FieldType },
    /// Character count (strings) or element count (arrays) bounds.
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// String must match the given regular expression.
    Pattern { regex: String },
    /// Value must be one of the allowed values.
    In { allowed: Vec<Value> },
    /// Apply the coercion function registered with the engine under `with`.
    /// Coerced values feed later rules for the same parameter but are never
    /// written back to the forwarded request context.
    Coerce { with: String },
    /// Engine-specific rule carried verbatim; never interpreted by this core.
    Opaque(Value),
}

// ─────────────────────────────────────────────────────────────────────────────
// ParamSpec
// ─────────────────────────────────────────────────────────────────────────────

/// Validation rule set for a single named parameter.
///
/// A spec with an empty rule list is dropped during
/// [`declare`](crate::registry::RegistryBuilder::declare) normalization —
/// a contract never carries an empty rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name as it appears in the raw request parameters.
    pub name: String,
    /// Rules applied in declaration order.
    pub rules: Vec<Rule>,
}

impl ParamSpec {
    /// Create a spec with no rules yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Builder: append an arbitrary rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Builder: parameter must be present and non-null.
    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    /// Builder: parameter must have the given JSON type.
    pub fn typed(self, expected: FieldType) -> Self {
        self.rule(Rule::Type { expected })
    }

    /// Builder: length bounds (characters for strings, elements for arrays).
    pub fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.rule(Rule::Length { min, max })
    }

    /// Builder: string must match `regex`.
    pub fn pattern(self, regex: impl Into<String>) -> Self {
        self.rule(Rule::Pattern {
            regex: regex.into(),
        })
    }

    /// Builder: value must be one of `allowed`.
    pub fn one_of(self, allowed: Vec<Value>) -> Self {
        self.rule(Rule::In { allowed })
    }

    /// Builder: run the named engine-registered coercion on the value.
    pub fn coerced_with(self, name: impl Into<String>) -> Self {
        self.rule(Rule::Coerce { with: name.into() })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ActionContract
// ─────────────────────────────────────────────────────────────────────────────

/// Recovery callback invoked when validation rejects a request.
///
/// Receives the request context, the action name, and the engine's error
/// map; its return value is opaque to the dispatcher and forwarded verbatim
/// inside [`DispatchResult::CustomRecovery`](crate::dispatch::DispatchResult).
/// The three-argument shape is enforced by this signature at compile time.
pub type OnFail = Arc<dyn Fn(&RequestContext, &str, &ErrorMap) -> Value + Send + Sync>;

/// The full validation policy for one named action.
pub struct ActionContract {
    /// Action name, unique within its registry.
    pub action_name: String,
    /// Declared parameter specs keyed by parameter name. `None` is the
    /// "no params declared" sentinel: the action always passes through.
    pub params: Option<HashMap<String, ParamSpec>>,
    /// Optional recovery callback for rejected requests.
    pub on_fail: Option<OnFail>,
}

impl ActionContract {
    /// Whether this contract declares any parameters at all.
    pub fn has_params(&self) -> bool {
        self.params.is_some()
    }
}

impl fmt::Debug for ActionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionContract")
            .field("action_name", &self.action_name)
            .field("params", &self.params)
            .field("on_fail", &self.on_fail.is_some())
            .finish()
    }
}
