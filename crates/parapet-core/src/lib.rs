//! Declarative per-action request contracts and validation dispatch.
//!
//! Parapet sits between a host web framework and a field-level validation
//! engine. At initialization a handler declares, per action, which
//! parameters must satisfy which rules; at request time the dispatcher
//! looks up the invoked action's contract and either forwards the request
//! untouched, produces a structured failure payload, or hands control to a
//! user-supplied recovery callback.
//!
//! # Architecture mapping
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │              parapet-core  (this crate)                   │
//! │  RegistryBuilder ──finalize()──► ContractRegistry         │
//! │  ActionContract / ParamSpec / Rule    ValidatorUnit       │
//! │  ContractRegistry::dispatch ──► DispatchResult            │
//! │  ValidationEngine trait    BuildError / EngineError       │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               │  implemented by
//! ┌─────────────────────────────▼─────────────────────────────┐
//! │              parapet-schema  (engine crate)               │
//! │  SchemaEngine: impl ValidationEngine                      │
//! │  (type / length / required / pattern / in / coercions)    │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Registration and dispatch are separated in time: the registry is built
//! single-threaded, validated fail-fast, and immutable after
//! [`RegistryBuilder::finalize`] — so any number of concurrent dispatches
//! read it without locking.
//!
//! # Quick start
//!
//! ```rust
//! use parapet_core::{
//!     EngineOutcome, EngineResult, FieldType, ParamSpec, RegistryBuilder,
//!     RequestContext, ValidationEngine,
//! };
//! use async_trait::async_trait;
//! use serde_json::{Map, Value, json};
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! /// Toy engine that accepts everything; see `parapet-schema` for a real one.
//! struct AcceptAll;
//!
//! #[async_trait]
//! impl ValidationEngine for AcceptAll {
//!     fn name(&self) -> &str {
//!         "accept-all"
//!     }
//!
//!     async fn validate(
//!         &self,
//!         _ctx: &RequestContext,
//!         _specs: &HashMap<String, ParamSpec>,
//!         params: &Map<String, Value>,
//!     ) -> EngineResult<EngineOutcome> {
//!         Ok(EngineOutcome::Accepted(Value::Object(params.clone())))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = RegistryBuilder::new()
//!         .declare(
//!             "show",
//!             vec![ParamSpec::new("id").required().typed(FieldType::String)],
//!             None,
//!         )
//!         .expect("contract is well formed")
//!         .finalize(Arc::new(AcceptAll));
//!
//!     let ctx = RequestContext::new("/posts/1", "GET");
//!     let raw = json!({ "id": "abcdef" }).as_object().cloned().unwrap();
//!     let result = registry.dispatch(Some("show"), ctx, &raw).await.unwrap();
//!     assert!(result.is_pass_through());
//! }
//! ```

pub mod context;
pub mod contract;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod registry;

#[cfg(test)]
mod testing;

// ── Flat re-exports ────────────────────────────────────────────────────────

pub use context::RequestContext;
pub use contract::{ActionContract, FieldType, OnFail, ParamSpec, Rule};
pub use dispatch::DispatchResult;
pub use engine::{EngineError, EngineOutcome, EngineResult, ErrorMap, ValidationEngine};
pub use error::{BuildError, BuildResult, BuildWarning};
pub use registry::{ContractRegistry, RegistryBuilder, ValidatorUnit};
