//! Validation-engine boundary.
//!
//! The [`ValidationEngine`] trait is the single seam between the contract
//! core and the field-level rule interpreter. The core never inspects rule
//! semantics; it hands specs and raw parameters across this boundary and
//! branches on the returned [`EngineOutcome`].
//!
//! An engine signals a *verdict* (accepted / rejected with an error map)
//! through `EngineOutcome`. Anything it cannot express as a verdict — rule
//! misconfiguration, internal failure — is an [`EngineError`], which the
//! dispatcher propagates untouched: engine failures are configuration bugs,
//! not request-level outcomes.

use crate::context::RequestContext;
use crate::contract::ParamSpec;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Per-field violation map: parameter name → violation descriptions.
pub type ErrorMap = BTreeMap<String, Vec<String>>;

/// Verdict returned by a [`ValidationEngine`].
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutcome {
    /// All rules satisfied. Carries the engine's processed value, which the
    /// dispatcher discards in favor of the original request context.
    Accepted(Value),
    /// One or more rules violated.
    Rejected(ErrorMap),
}

impl EngineOutcome {
    /// Whether the verdict is [`EngineOutcome::Accepted`].
    pub fn is_accepted(&self) -> bool {
        matches!(self, EngineOutcome::Accepted(_))
    }

    /// The violation map, if rejected.
    pub fn errors(&self) -> Option<&ErrorMap> {
        match self {
            EngineOutcome::Rejected(errors) => Some(errors),
            EngineOutcome::Accepted(_) => None,
        }
    }
}

/// Failures outside the engine's verdict contract.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule's configuration cannot be interpreted (bad regex, unknown
    /// coercion name, ...).
    #[error("invalid rule configuration for '{field}': {reason}")]
    BadRule { field: String, reason: String },

    /// The engine itself failed.
    #[error("validation engine failure: {0}")]
    Internal(String),
}

/// Result alias for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Contract for a field-level validation engine.
///
/// Implementations must be `Send + Sync` so a single engine handle can be
/// shared by every concurrent dispatch against the same registry.
#[async_trait]
pub trait ValidationEngine: Send + Sync {
    /// Stable, human-readable identifier for this engine (used in logs).
    fn name(&self) -> &str;

    /// Check `params` against `specs`.
    ///
    /// `ctx` is ambient read-only data: engines may consult it (e.g. for
    /// context-dependent rules) but must not treat it as a validatable or
    /// mutable field. Returns a verdict, or an [`EngineError`] when the
    /// rules themselves are unusable.
    async fn validate(
        &self,
        ctx: &RequestContext,
        specs: &HashMap<String, ParamSpec>,
        params: &Map<String, Value>,
    ) -> EngineResult<EngineOutcome>;
}
