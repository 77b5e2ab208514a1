//! Compile/evaluate capability for the policy query language.
//!
//! The authenticator never talks to an interpreter directly: it holds
//! [`CompiledExpression`]s produced by an [`ExpressionLanguage`]. Any
//! embeddable rule engine can satisfy the pair; [`JmesPath`] is the stock
//! implementation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::{Error, Result};

/// A language able to compile expression source text.
pub trait ExpressionLanguage: Send + Sync {
    /// Compile `source` once, at construction time.
    ///
    /// # Errors
    ///
    /// Returns `Error::Expression` with the compiler's diagnostic.
    fn compile(&self, source: &str) -> Result<Arc<dyn CompiledExpression>>;
}

/// An immutable, compiled expression.
///
/// Implementations must be safe to evaluate from any number of threads at
/// once.
pub trait CompiledExpression: Send + Sync + fmt::Debug {
    /// Evaluate the expression against `input`.
    ///
    /// # Errors
    ///
    /// Returns a description of the runtime failure, e.g. a function applied
    /// to an argument of the wrong type.
    fn evaluate(&self, input: &Value) -> std::result::Result<Value, EvaluationError>;

    /// The source text the expression was compiled from.
    fn source(&self) -> &str;
}

/// Runtime failure while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct EvaluationError(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// JMESPath
// ─────────────────────────────────────────────────────────────────────────────

/// [JMESPath](https://jmespath.org) backed by the `jmespath` crate.
///
/// ```
/// use tls_client_auth::policy::{ExpressionLanguage, JmesPath};
///
/// let expr = JmesPath.compile("contains(dnsNames, 'a.example.com')").unwrap();
/// let out = expr.evaluate(&serde_json::json!({"dnsNames": ["a.example.com"]})).unwrap();
/// assert_eq!(out, serde_json::Value::Bool(true));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JmesPath;

impl ExpressionLanguage for JmesPath {
    fn compile(&self, source: &str) -> Result<Arc<dyn CompiledExpression>> {
        let expression = jmespath::compile(source).map_err(|e| Error::Expression {
            expression: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Arc::new(JmesPathExpression { expression }))
    }
}

struct JmesPathExpression {
    expression: jmespath::Expression<'static>,
}

impl CompiledExpression for JmesPathExpression {
    fn evaluate(&self, input: &Value) -> std::result::Result<Value, EvaluationError> {
        let result = self
            .expression
            .search(input)
            .map_err(|e| EvaluationError(e.to_string()))?;
        serde_json::to_value(&*result).map_err(|e| EvaluationError(e.to_string()))
    }

    fn source(&self) -> &str {
        self.expression.as_str()
    }
}

impl fmt::Debug for JmesPathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("JmesPathExpression")
            .field(&self.expression.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn view() -> Value {
        json!({
            "dnsNames": ["a.example.com"],
            "emailAddresses": ["me@example.com"],
            "uris": ["uri:example:a"],
        })
    }

    #[test]
    fn contains_matches_present_claim() {
        let expr = JmesPath.compile("contains(dnsNames, 'a.example.com')").unwrap();
        assert_eq!(expr.evaluate(&view()).unwrap(), json!(true));
    }

    #[test]
    fn contains_misses_absent_claim() {
        let expr = JmesPath.compile("contains(dnsNames, 'b.example.com')").unwrap();
        assert_eq!(expr.evaluate(&view()).unwrap(), json!(false));
    }

    #[test]
    fn identity_projection_wraps_whole_input() {
        let expr = JmesPath.compile(r#"{"public": @}"#).unwrap();
        assert_eq!(expr.evaluate(&view()).unwrap(), json!({ "public": view() }));
    }

    #[test]
    fn function_on_missing_field_is_an_evaluation_error() {
        let expr = JmesPath.compile("contains(groups, 'admin')").unwrap();
        assert!(expr.evaluate(&view()).is_err());
    }

    #[test]
    fn malformed_source_fails_to_compile() {
        let err = JmesPath.compile("contains(dnsNames,").unwrap_err();
        assert!(matches!(err, Error::Expression { .. }));
    }

    #[test]
    fn source_is_preserved() {
        let expr = JmesPath.compile("uris[0]").unwrap();
        assert_eq!(expr.source(), "uris[0]");
        assert!(format!("{expr:?}").contains("uris[0]"));
    }

    #[test]
    fn compiled_expression_is_shareable_across_threads() {
        let expr = JmesPath.compile("dnsNames[0]").unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let expr = Arc::clone(&expr);
                std::thread::spawn(move || expr.evaluate(&view()).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), json!("a.example.com"));
        }
    }
}
