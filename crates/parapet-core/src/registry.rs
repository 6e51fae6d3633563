//! Contract registry: builder, validator units, and the finalized registry.
//!
//! Registration is a distinct, single-threaded phase completed before any
//! request is served: a [`RegistryBuilder`] accumulates action declarations,
//! checks the structural invariants that must hold before traffic flows
//! (unique action names, well-formed parameter specs), and
//! [`finalize`](RegistryBuilder::finalize) produces an immutable
//! [`ContractRegistry`]. After that point the registry is read-only — every
//! concurrent dispatch shares it without synchronization.

use crate::contract::{ActionContract, OnFail, ParamSpec};
use crate::engine::{EngineOutcome, EngineResult, ValidationEngine};
use crate::error::{BuildError, BuildResult, BuildWarning};
use crate::context::RequestContext;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

// ─────────────────────────────────────────────────────────────────────────────
// ValidatorUnit
// ─────────────────────────────────────────────────────────────────────────────

/// A contract's parameter specs bound to a validation engine.
///
/// One unit is synthesized per action with declared params during
/// [`RegistryBuilder::finalize`]; it lives as long as the registry and is
/// never recreated per request.
pub struct ValidatorUnit {
    action_name: String,
    specs: HashMap<String, ParamSpec>,
    engine: Arc<dyn ValidationEngine>,
}

impl ValidatorUnit {
    fn new(
        action_name: String,
        specs: HashMap<String, ParamSpec>,
        engine: Arc<dyn ValidationEngine>,
    ) -> Self {
        Self {
            action_name,
            specs,
            engine,
        }
    }

    /// Run the bound engine against `params`.
    ///
    /// `ctx` is handed to the engine read-only, alongside — never inside —
    /// the raw parameters, so rules cannot target or rewrite it.
    pub async fn validate(
        &self,
        ctx: &RequestContext,
        params: &Map<String, Value>,
    ) -> EngineResult<EngineOutcome> {
        debug!(
            action = %self.action_name,
            engine = self.engine.name(),
            "running validator unit"
        );
        self.engine.validate(ctx, &self.specs, params).await
    }
}

impl fmt::Debug for ValidatorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorUnit")
            .field("action_name", &self.action_name)
            .field("specs", &self.specs.keys())
            .field("engine", &self.engine.name())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RegistryBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulates action declarations and produces an immutable
/// [`ContractRegistry`].
///
/// All failures here are build-time: they surface during initialization,
/// never as request-time errors.
#[derive(Default)]
pub struct RegistryBuilder {
    contracts: Vec<ActionContract>,
    names: HashSet<String>,
    warnings: Vec<BuildWarning>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare one action's contract.
    ///
    /// `params` is normalized: specs with empty rule lists are dropped, and
    /// an empty result is recorded as the "no params declared" sentinel
    /// (with a [`BuildWarning::NoParams`] warning) — the action then always
    /// passes through at dispatch time. Declaring the same action twice is
    /// a [`BuildError::DuplicateAction`].
    pub fn declare(
        mut self,
        action_name: impl Into<String>,
        params: impl IntoIterator<Item = ParamSpec>,
        on_fail: Option<OnFail>,
    ) -> BuildResult<Self> {
        let action = action_name.into();
        if action.trim().is_empty() {
            return Err(BuildError::EmptyActionName);
        }
        if !self.names.insert(action.clone()) {
            return Err(BuildError::DuplicateAction(action));
        }

        let specs: HashMap<String, ParamSpec> = params
            .into_iter()
            .filter(|spec| !spec.rules.is_empty())
            .map(|spec| (spec.name.clone(), spec))
            .collect();

        let params = if specs.is_empty() {
            let warning = BuildWarning::NoParams {
                action: action.clone(),
            };
            warn!(action = %action, "{warning}");
            self.warnings.push(warning);
            None
        } else {
            Some(specs)
        };

        self.contracts.push(ActionContract {
            action_name: action,
            params,
            on_fail,
        });
        Ok(self)
    }

    /// Finalize the registry, binding every contract with declared params
    /// to `engine`.
    ///
    /// A registry with zero declared actions is valid but emits
    /// [`BuildWarning::NoActions`]; it will pass every request through
    /// unvalidated.
    pub fn finalize(mut self, engine: Arc<dyn ValidationEngine>) -> ContractRegistry {
        if self.contracts.is_empty() {
            let warning = BuildWarning::NoActions;
            warn!("{warning}");
            self.warnings.push(warning);
        }

        let mut entries = Vec::with_capacity(self.contracts.len());
        let mut index = HashMap::with_capacity(self.contracts.len());
        for contract in self.contracts {
            let unit = contract.params.as_ref().map(|specs| {
                ValidatorUnit::new(contract.action_name.clone(), specs.clone(), engine.clone())
            });
            index.insert(contract.action_name.clone(), entries.len());
            entries.push(RegistryEntry { contract, unit });
        }

        ContractRegistry {
            entries,
            index,
            warnings: self.warnings,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContractRegistry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct RegistryEntry {
    pub(crate) contract: ActionContract,
    pub(crate) unit: Option<ValidatorUnit>,
}

/// Immutable set of action contracts owned by one handler.
///
/// Built once at initialization, read concurrently by every subsequent
/// dispatch. Entries keep declaration order; lookup by action name is O(1).
#[derive(Debug)]
pub struct ContractRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
    warnings: Vec<BuildWarning>,
}

impl ContractRegistry {
    pub(crate) fn entry(&self, action_name: &str) -> Option<&RegistryEntry> {
        self.index.get(action_name).map(|&i| &self.entries[i])
    }

    /// Look up the contract for an action.
    pub fn contract(&self, action_name: &str) -> Option<&ActionContract> {
        self.entry(action_name).map(|entry| &entry.contract)
    }

    /// Action names in declaration order.
    pub fn actions(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.contract.action_name.as_str())
            .collect()
    }

    /// Number of declared actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no actions were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Warnings recorded during construction.
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }
}
