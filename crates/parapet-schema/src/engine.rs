//! Rule-interpreting validation engine.

use async_trait::async_trait;
use parapet_core::{
    EngineError, EngineOutcome, EngineResult, ErrorMap, FieldType, ParamSpec, RequestContext,
    Rule, ValidationEngine,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Named coercion function registered with a [`SchemaEngine`].
///
/// On success the coerced value feeds later rules for the same parameter;
/// on failure the returned message is recorded as a violation. Coerced
/// values are never forwarded to the request context.
pub type Coercion = Arc<dyn Fn(&Value) -> Result<Value, String> + Send + Sync>;

/// Validation engine interpreting the rule kinds declared in
/// [`parapet_core::Rule`].
///
/// Parameters that are absent (or null) and carry no [`Rule::Required`]
/// rule are skipped entirely; [`Rule::Opaque`] rules are skipped with a
/// debug log since this engine does not understand them.
#[derive(Default)]
pub struct SchemaEngine {
    coercions: HashMap<String, Coercion>,
}

impl SchemaEngine {
    /// Create an engine with no registered coercions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register a coercion function under `name`, referenced by
    /// [`Rule::Coerce`] rules.
    pub fn with_coercion(
        mut self,
        name: impl Into<String>,
        coercion: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        self.coercions.insert(name.into(), Arc::new(coercion));
        self
    }

    /// Check one parameter against its spec, returning its violations.
    fn check_param(
        &self,
        name: &str,
        spec: &ParamSpec,
        value: Option<&Value>,
    ) -> EngineResult<Vec<String>> {
        let required = spec.rules.iter().any(|rule| matches!(rule, Rule::Required));
        let Some(value) = value.filter(|v| !v.is_null()) else {
            // Absent/null parameters only violate an explicit Required rule.
            return Ok(if required {
                vec!["is required".to_string()]
            } else {
                Vec::new()
            });
        };

        let mut current = value.clone();
        let mut violations = Vec::new();
        for rule in &spec.rules {
            match rule {
                Rule::Required => {}
                Rule::Type { expected } => {
                    if !type_matches(&current, *expected) {
                        violations.push(format!("must be of type {expected}"));
                    }
                }
                Rule::Length { min, max } => {
                    if let Some((len, noun)) = length_of(&current) {
                        if let Some(min) = min {
                            if len < *min {
                                violations.push(format!("should be at least {min} {noun}"));
                            }
                        }
                        if let Some(max) = max {
                            if len > *max {
                                violations.push(format!("should be at most {max} {noun}"));
                            }
                        }
                    }
                }
                Rule::Pattern { regex } => {
                    let re = Regex::new(regex).map_err(|e| EngineError::BadRule {
                        field: name.to_string(),
                        reason: e.to_string(),
                    })?;
                    if let Some(s) = current.as_str() {
                        if !re.is_match(s) {
                            violations.push("has invalid format".to_string());
                        }
                    }
                }
                Rule::In { allowed } => {
                    if !allowed.contains(&current) {
                        violations.push("is not an allowed value".to_string());
                    }
                }
                Rule::Coerce { with } => {
                    let Some(coercion) = self.coercions.get(with) else {
                        return Err(EngineError::BadRule {
                            field: name.to_string(),
                            reason: format!("unknown coercion '{with}'"),
                        });
                    };
                    match coercion(&current) {
                        Ok(coerced) => current = coerced,
                        Err(message) => violations.push(message),
                    }
                }
                Rule::Opaque(raw) => {
                    debug!(field = name, rule = %raw, "skipping opaque rule");
                }
            }
        }
        Ok(violations)
    }
}

#[async_trait]
impl ValidationEngine for SchemaEngine {
    fn name(&self) -> &str {
        "schema"
    }

    async fn validate(
        &self,
        _ctx: &RequestContext,
        specs: &HashMap<String, ParamSpec>,
        params: &Map<String, Value>,
    ) -> EngineResult<EngineOutcome> {
        let mut errors = ErrorMap::new();
        for (name, spec) in specs {
            let violations = self.check_param(name, spec, params.get(name))?;
            if !violations.is_empty() {
                errors.insert(name.clone(), violations);
            }
        }

        if errors.is_empty() {
            Ok(EngineOutcome::Accepted(Value::Object(params.clone())))
        } else {
            Ok(EngineOutcome::Rejected(errors))
        }
    }
}

fn type_matches(value: &Value, expected: FieldType) -> bool {
    match expected {
        FieldType::String => value.is_string(),
        FieldType::Integer => value.as_i64().is_some() || value.as_u64().is_some(),
        FieldType::Float => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Object => value.is_object(),
        FieldType::Array => value.is_array(),
    }
}

/// Length of a string (in characters) or array (in items), with the noun
/// used in violation messages. Other value types have no length and are
/// skipped by length rules.
fn length_of(value: &Value) -> Option<(usize, &'static str)> {
    match value {
        Value::String(s) => Some((s.chars().count(), "character(s)")),
        Value::Array(items) => Some((items.len(), "item(s)")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn specs(list: Vec<ParamSpec>) -> HashMap<String, ParamSpec> {
        list.into_iter().map(|s| (s.name.clone(), s)).collect()
    }

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    fn ctx() -> RequestContext {
        RequestContext::new("/test", "POST")
    }

    #[tokio::test]
    async fn missing_required_param_is_rejected() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("name").required()]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({})))
            .await
            .unwrap();

        assert_eq!(
            outcome.errors().unwrap().get("name").unwrap(),
            &vec!["is required".to_string()]
        );
    }

    #[tokio::test]
    async fn absent_optional_param_is_skipped() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![
            ParamSpec::new("tag").typed(FieldType::String).length(Some(3), None),
        ]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({})))
            .await
            .unwrap();

        assert!(outcome.is_accepted());
    }

    #[tokio::test]
    async fn type_mismatch_is_reported() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("id").typed(FieldType::String)]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({ "id": 42 })))
            .await
            .unwrap();

        assert_eq!(
            outcome.errors().unwrap().get("id").unwrap(),
            &vec!["must be of type string".to_string()]
        );
    }

    #[tokio::test]
    async fn string_below_min_length_is_too_short() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("id").length(Some(5), None)]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({ "id": "abc" })))
            .await
            .unwrap();

        assert_eq!(
            outcome.errors().unwrap().get("id").unwrap(),
            &vec!["should be at least 5 character(s)".to_string()]
        );
    }

    #[tokio::test]
    async fn array_length_uses_item_count() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("tags").length(None, Some(2))]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({ "tags": ["a", "b", "c"] })))
            .await
            .unwrap();

        assert_eq!(
            outcome.errors().unwrap().get("tags").unwrap(),
            &vec!["should be at most 2 item(s)".to_string()]
        );
    }

    #[tokio::test]
    async fn violations_accumulate_per_param_in_rule_order() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![
            ParamSpec::new("id")
                .typed(FieldType::String)
                .length(Some(5), None)
                .one_of(vec![json!("abcdef")]),
        ]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({ "id": "abc" })))
            .await
            .unwrap();

        assert_eq!(
            outcome.errors().unwrap().get("id").unwrap(),
            &vec![
                "should be at least 5 character(s)".to_string(),
                "is not an allowed value".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn pattern_mismatch_has_invalid_format() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("slug").pattern("^[a-z-]+$")]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({ "slug": "Not A Slug" })))
            .await
            .unwrap();

        assert_eq!(
            outcome.errors().unwrap().get("slug").unwrap(),
            &vec!["has invalid format".to_string()]
        );
    }

    #[tokio::test]
    async fn invalid_pattern_is_a_bad_rule_not_a_rejection() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("slug").pattern("([unclosed")]);

        let result = engine
            .validate(&ctx(), &specs, &params(json!({ "slug": "x" })))
            .await;

        assert!(matches!(result, Err(EngineError::BadRule { ref field, .. }) if field == "slug"));
    }

    #[tokio::test]
    async fn coercion_feeds_later_rules() {
        let engine = SchemaEngine::new().with_coercion("to_int", |value| {
            value
                .as_str()
                .and_then(|s| s.parse::<i64>().ok())
                .map(Value::from)
                .ok_or_else(|| "is not a number".to_string())
        });
        let specs = specs(vec![
            ParamSpec::new("page")
                .coerced_with("to_int")
                .typed(FieldType::Integer),
        ]);

        let ok = engine
            .validate(&ctx(), &specs, &params(json!({ "page": "42" })))
            .await
            .unwrap();
        assert!(ok.is_accepted());

        let bad = engine
            .validate(&ctx(), &specs, &params(json!({ "page": "nope" })))
            .await
            .unwrap();
        assert_eq!(
            bad.errors().unwrap().get("page").unwrap(),
            &vec![
                "is not a number".to_string(),
                "must be of type integer".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_coercion_is_a_bad_rule() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![ParamSpec::new("page").coerced_with("missing")]);

        let result = engine
            .validate(&ctx(), &specs, &params(json!({ "page": "1" })))
            .await;

        assert!(matches!(result, Err(EngineError::BadRule { ref field, .. }) if field == "page"));
    }

    #[tokio::test]
    async fn opaque_rules_are_skipped() {
        let engine = SchemaEngine::new();
        let specs = specs(vec![
            ParamSpec::new("blob").rule(Rule::Opaque(json!({ "vendor": "x" }))),
        ]);

        let outcome = engine
            .validate(&ctx(), &specs, &params(json!({ "blob": 1 })))
            .await
            .unwrap();

        assert!(outcome.is_accepted());
    }
}
