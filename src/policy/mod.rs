//! Declarative admission policy over certificate claims.
//!
//! - [`expression`] — the compile/evaluate capability and its JMESPath implementation
//! - [`evaluator`] — accept predicate + metadata projection (`PolicyEvaluator`)

pub mod evaluator;
pub mod expression;

pub use evaluator::{PolicyEvaluator, PolicyOutcome};
pub use expression::{CompiledExpression, EvaluationError, ExpressionLanguage, JmesPath};

/// A policy expression produced a value the authenticator cannot use.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// The accept predicate returned something other than a boolean.
    #[error("validation expression yielded non-boolean value {0}")]
    NonBooleanPredicate(String),

    /// The metadata expression failed at runtime.
    #[error("metadata extraction failed: {0}")]
    MetadataEvaluation(String),
}
