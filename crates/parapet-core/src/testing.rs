//! In-crate test doubles.

use crate::context::RequestContext;
use crate::contract::ParamSpec;
use crate::engine::{EngineError, EngineOutcome, EngineResult, ValidationEngine};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted engine returning a fixed verdict (or error) and counting calls.
pub(crate) struct StubEngine {
    verdict: Result<EngineOutcome, String>,
    pub(crate) calls: AtomicUsize,
}

impl StubEngine {
    pub(crate) fn accepting() -> Self {
        Self {
            verdict: Ok(EngineOutcome::Accepted(json!({}))),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn rejecting(field: &str, violation: &str) -> Self {
        let mut errors = crate::engine::ErrorMap::new();
        errors.insert(field.to_string(), vec![violation.to_string()]);
        Self {
            verdict: Ok(EngineOutcome::Rejected(errors)),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            verdict: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ValidationEngine for StubEngine {
    fn name(&self) -> &str {
        "stub"
    }

    async fn validate(
        &self,
        _ctx: &RequestContext,
        _specs: &HashMap<String, ParamSpec>,
        _params: &Map<String, Value>,
    ) -> EngineResult<EngineOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.verdict {
            Ok(outcome) => Ok(outcome.clone()),
            Err(message) => Err(EngineError::Internal(message.clone())),
        }
    }
}
