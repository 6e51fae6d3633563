//! Schema engine for parapet contracts.
//!
//! [`SchemaEngine`] implements the
//! [`ValidationEngine`](parapet_core::ValidationEngine) boundary for the
//! rule kinds `parapet-core` declares: required-ness, JSON type, length,
//! regex pattern, allowed values, and named coercions. Coerced values feed
//! later rules for the same parameter but are never written back to the
//! forwarded request context.
//!
//! # Example
//!
//! ```rust
//! use parapet_core::{FieldType, ParamSpec, RegistryBuilder, RequestContext};
//! use parapet_schema::SchemaEngine;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = RegistryBuilder::new()
//!         .declare(
//!             "show",
//!             vec![
//!                 ParamSpec::new("id")
//!                     .required()
//!                     .typed(FieldType::String)
//!                     .length(Some(5), None),
//!             ],
//!             None,
//!         )
//!         .expect("contract is well formed")
//!         .finalize(Arc::new(SchemaEngine::new()));
//!
//!     let raw = json!({ "id": "abc" }).as_object().cloned().unwrap();
//!     let result = registry
//!         .dispatch(Some("show"), RequestContext::new("/posts/1", "GET"), &raw)
//!         .await
//!         .unwrap();
//!     assert!(!result.is_pass_through());
//! }
//! ```

pub mod engine;

pub use engine::{Coercion, SchemaEngine};
