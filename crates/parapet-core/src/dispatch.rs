//! Per-request validation dispatch.
//!
//! [`ContractRegistry::dispatch`] is the request-time half of the crate:
//! look up the contract for the invoked action, run its validator unit,
//! and branch. Dispatch is stateless beyond the shared, read-only registry,
//! so arbitrarily many dispatches may run concurrently.
//!
//! ```text
//! Start ──► {PassThrough | Validating} ──► {PassThrough | CustomRecovery | DefaultFailure}
//! ```
//!
//! Rejections are data, never errors: a rejected request produces a
//! [`DispatchResult`], and `Err` is reserved for engine failures outside
//! the verdict contract, which propagate untouched.

use crate::context::RequestContext;
use crate::engine::{EngineOutcome, EngineResult};
use crate::registry::ContractRegistry;
use serde_json::{Map, Value, json};
use tracing::debug;

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// Request accepted; carries the original request context unchanged.
    PassThrough(RequestContext),
    /// Validation rejected the request and the contract's `on_fail`
    /// callback produced this value. Opaque to the dispatcher.
    CustomRecovery(Value),
    /// Validation rejected the request and no `on_fail` was set. The
    /// payload is `{ <action>: { "validation": <error map> } }`.
    DefaultFailure(Value),
}

impl DispatchResult {
    /// Whether the request was passed through.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, DispatchResult::PassThrough(_))
    }

    /// The default failure payload, if any.
    pub fn failure(&self) -> Option<&Value> {
        match self {
            DispatchResult::DefaultFailure(payload) => Some(payload),
            _ => None,
        }
    }

    /// The custom recovery value, if any.
    pub fn recovery(&self) -> Option<&Value> {
        match self {
            DispatchResult::CustomRecovery(value) => Some(value),
            _ => None,
        }
    }
}

impl ContractRegistry {
    /// Dispatch one request against this registry.
    ///
    /// The fast path — absent action name, no matching contract, or a
    /// contract with no declared params — returns
    /// [`DispatchResult::PassThrough`] without invoking the engine.
    /// Otherwise the action's validator unit runs and the verdict decides
    /// the branch:
    ///
    /// - accepted → `PassThrough` with the original `ctx` (the engine's
    ///   processed value is discarded — validation never rewrites the
    ///   forwarded context);
    /// - rejected with an `on_fail` callback → `CustomRecovery` carrying
    ///   the callback's return value verbatim;
    /// - rejected otherwise → `DefaultFailure` keyed by action name.
    ///
    /// Engine failures outside the verdict contract come back as `Err` and
    /// are never translated into a rejection.
    pub async fn dispatch(
        &self,
        action_name: Option<&str>,
        ctx: RequestContext,
        raw_params: &Map<String, Value>,
    ) -> EngineResult<DispatchResult> {
        let Some(action) = action_name else {
            debug!("dispatch without action name, passing through");
            return Ok(DispatchResult::PassThrough(ctx));
        };
        let Some(entry) = self.entry(action) else {
            debug!(action, "no contract for action, passing through");
            return Ok(DispatchResult::PassThrough(ctx));
        };
        let Some(unit) = &entry.unit else {
            debug!(action, "contract declares no params, passing through");
            return Ok(DispatchResult::PassThrough(ctx));
        };

        match unit.validate(&ctx, raw_params).await? {
            EngineOutcome::Accepted(_) => Ok(DispatchResult::PassThrough(ctx)),
            EngineOutcome::Rejected(errors) => {
                debug!(action, ?errors, "request rejected by contract");
                match &entry.contract.on_fail {
                    Some(on_fail) => Ok(DispatchResult::CustomRecovery(on_fail(
                        &ctx, action, &errors,
                    ))),
                    None => Ok(DispatchResult::DefaultFailure(
                        json!({ action: { "validation": errors } }),
                    )),
                }
            }
        }
    }
}
