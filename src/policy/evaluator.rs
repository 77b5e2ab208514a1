//! Two-stage admission policy.
//!
//! # Evaluation order
//!
//! 1. The **accept** predicate runs against the certificate view.
//!    - `true` → continue.
//!    - `false`, or a runtime error (e.g. a function applied to an absent
//!      claim) → [`PolicyOutcome::Rejected`].
//!    - any other value → [`PolicyError::NonBooleanPredicate`].
//! 2. The **metadata** expression runs against the same view. Its result is
//!    returned as-is; shaping it into metadata is the caller's job.

use std::sync::Arc;

use serde_json::Value;

use crate::policy::PolicyError;
use crate::policy::expression::{CompiledExpression, ExpressionLanguage};
use crate::Result;

/// Result of a successful policy evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum PolicyOutcome {
    /// The predicate admitted the view; carries the metadata expression's result.
    Accepted(Value),
    /// The predicate did not admit the view.
    Rejected,
}

/// Pre-compiled accept predicate and metadata projection.
#[derive(Debug, Clone)]
pub struct PolicyEvaluator {
    accept: Arc<dyn CompiledExpression>,
    metadata: Arc<dyn CompiledExpression>,
}

impl PolicyEvaluator {
    /// Pair two already compiled expressions.
    #[must_use]
    pub fn new(accept: Arc<dyn CompiledExpression>, metadata: Arc<dyn CompiledExpression>) -> Self {
        Self { accept, metadata }
    }

    /// Compile both expressions with `language`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Expression` for the first expression that does not
    /// compile.
    pub fn compile(language: &dyn ExpressionLanguage, accept: &str, metadata: &str) -> Result<Self> {
        Ok(Self::new(language.compile(accept)?, language.compile(metadata)?))
    }

    /// Evaluate the policy against a certificate view.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] when an expression yields something unusable.
    /// These are configuration faults, never client faults.
    pub fn evaluate(&self, view: &Value) -> std::result::Result<PolicyOutcome, PolicyError> {
        match self.accept.evaluate(view) {
            Ok(Value::Bool(true)) => {}
            Ok(Value::Bool(false)) | Err(_) => return Ok(PolicyOutcome::Rejected),
            Ok(other) => return Err(PolicyError::NonBooleanPredicate(other.to_string())),
        }

        let metadata = self
            .metadata
            .evaluate(view)
            .map_err(|e| PolicyError::MetadataEvaluation(e.0))?;
        Ok(PolicyOutcome::Accepted(metadata))
    }

    /// Source text of the accept predicate.
    #[must_use]
    pub fn accept_source(&self) -> &str {
        self.accept.source()
    }

    /// Source text of the metadata expression.
    #[must_use]
    pub fn metadata_source(&self) -> &str {
        self.metadata.source()
    }
}
