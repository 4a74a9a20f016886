//! Trait hierarchy for validation rules.
//!
//! A rule is a factory: for each run it builds a fresh [`Visitor`] from the
//! run's context. Visitors keep per-run state (such as a table of names seen
//! so far) and are dropped when the run ends.

use crate::context::{SdlValidationContext, ValidationContext};
use crate::diagnostics::DiagnosticSeverity;
use graphql_apollo_ext::{CstNodeRef, VisitControl};

/// Base trait for all validation rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule (e.g., `"unique_type_names"`)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Default severity (can be overridden by config)
    fn default_severity(&self) -> DiagnosticSeverity;
}

/// Per-run handlers for one rule.
///
/// Visitors dispatch on the node's kind themselves; kinds they do not handle
/// fall through to [`VisitControl::Continue`].
#[allow(unused_variables)]
pub trait Visitor<C: ?Sized> {
    fn enter(&mut self, ctx: &mut C, node: CstNodeRef<'_>) -> VisitControl {
        VisitControl::Continue
    }

    fn leave(&mut self, ctx: &mut C, node: CstNodeRef<'_>) {}
}

/// Rule that checks type system definitions, optionally against an existing schema
///
/// Examples: `unique_type_names`, `unique_directive_names`
pub trait SdlRule: Rule {
    fn create_visitor(&self, ctx: &SdlValidationContext) -> Box<dyn Visitor<SdlValidationContext>>;
}

/// Rule that checks executable documents against a schema
///
/// Examples: `no_deprecated`
pub trait DocumentRule: Rule {
    fn create_visitor(&self, ctx: &ValidationContext) -> Box<dyn Visitor<ValidationContext>>;
}
