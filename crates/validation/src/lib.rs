//! Rule-based semantic validation for GraphQL documents.
//!
//! Rules are visitor factories. For every run the runner builds a fresh
//! visitor per rule and drives all of them through a single traversal,
//! sharing one context and one diagnostic sink.
//!
//! ```rust,ignore
//! use graphql_validation::prelude::*;
//!
//! let schema = Arc::new(TypeSystem::parse(sdl, "schema.graphql")?);
//! let tree = apollo_parser::Parser::new(query).parse();
//! let diagnostics = Validator::default().validate_document(&tree, schema);
//! ```

mod config;
mod context;
mod diagnostics;
mod registry;
mod rules;
mod runner;
mod traits;
mod type_info;
mod validator;

pub use config::{ConfigError, ExtendsConfig, FullValidationConfig, RuleSeverity, ValidationConfig};
pub use context::{RuleContext, SdlValidationContext, ValidationContext};
pub use diagnostics::{
    Diagnostic, DiagnosticNode, DiagnosticSeverity, DiagnosticSink, LineIndex, OffsetRange,
    SourceLocation,
};
pub use registry::{all_rule_names, document_rules, sdl_rules};
pub use rules::{NoDeprecatedRuleImpl, UniqueDirectiveNamesRuleImpl, UniqueTypeNamesRuleImpl};
pub use runner::{run_document_rules, run_sdl_rules};
pub use traits::{DocumentRule, Rule, SdlRule, Visitor};
pub use type_info::TypeInfo;
pub use validator::Validator;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use graphql_validation::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{RuleSeverity, ValidationConfig};
    pub use crate::diagnostics::{Diagnostic, DiagnosticSeverity, OffsetRange};
    pub use crate::traits::{DocumentRule, Rule, SdlRule};
    pub use crate::validator::Validator;
    pub use graphql_hir::TypeSystem;
    pub use std::sync::Arc;
}
