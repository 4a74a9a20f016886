use crate::config::{RuleSeverity, ValidationConfig};
use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::registry::{document_rules, sdl_rules};
use crate::runner::{run_document_rules, run_sdl_rules};
use crate::traits::{DocumentRule, SdlRule};
use apollo_parser::SyntaxTree;
use graphql_hir::TypeSystem;
use std::sync::Arc;

/// Runs the registered rules enabled by a [`ValidationConfig`].
///
/// Each call is an independent run: a fresh context, fresh visitors and a
/// fresh sink. Reported severities follow the configuration.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    #[must_use]
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Check type system definitions, against `schema` when one is given.
    #[tracing::instrument(skip_all)]
    pub fn validate_sdl(&self, tree: &SyntaxTree, schema: Option<Arc<TypeSystem>>) -> Vec<Diagnostic> {
        let rules: Vec<Arc<dyn SdlRule>> = sdl_rules()
            .iter()
            .filter(|rule| self.config.is_enabled(rule.name()))
            .cloned()
            .collect();
        tracing::debug!(
            enabled = ?rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
            "Running SDL rules"
        );

        let diagnostics = run_sdl_rules(tree, schema, &rules);
        self.apply_severities(diagnostics)
    }

    /// Check an executable document against `schema`.
    #[tracing::instrument(skip_all)]
    pub fn validate_document(&self, tree: &SyntaxTree, schema: Arc<TypeSystem>) -> Vec<Diagnostic> {
        let rules: Vec<Arc<dyn DocumentRule>> = document_rules()
            .iter()
            .filter(|rule| self.config.is_enabled(rule.name()))
            .cloned()
            .collect();
        tracing::debug!(
            enabled = ?rules.iter().map(|rule| rule.name()).collect::<Vec<_>>(),
            "Running document rules"
        );

        let diagnostics = run_document_rules(tree, schema, &rules);
        self.apply_severities(diagnostics)
    }

    fn apply_severities(&self, mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
        for diagnostic in &mut diagnostics {
            match self.config.get_severity(diagnostic.rule) {
                Some(RuleSeverity::Error) => diagnostic.severity = DiagnosticSeverity::Error,
                Some(RuleSeverity::Warn) => diagnostic.severity = DiagnosticSeverity::Warning,
                Some(RuleSeverity::Off) | None => {}
            }
        }
        tracing::debug!(count = diagnostics.len(), "Validation complete");
        diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config(yaml: &str) -> ValidationConfig {
        ValidationConfig::parse(yaml, Path::new("validation.yaml")).unwrap()
    }

    #[test]
    fn test_recommended_runs_all_rules() {
        let validator = Validator::default();
        let tree = apollo_parser::Parser::new("type A { id: ID } type A { id: ID } directive @d on FIELD directive @d on FIELD").parse();
        let diagnostics = validator.validate_sdl(&tree, None);

        let rules: Vec<_> = diagnostics.iter().map(|d| (d.rule, d.severity)).collect();
        assert_eq!(
            rules,
            vec![
                ("unique_type_names", DiagnosticSeverity::Error),
                ("unique_directive_names", DiagnosticSeverity::Error),
            ]
        );
    }

    #[test]
    fn test_off_rules_are_skipped() {
        let validator = Validator::new(config(
            r"
extends: recommended
rules:
  unique_type_names: off
",
        ));
        let tree = apollo_parser::Parser::new("type A { id: ID } type A { id: ID } directive @d on FIELD directive @d on FIELD").parse();
        let diagnostics = validator.validate_sdl(&tree, None);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, "unique_directive_names");
    }

    #[test]
    fn test_configured_severity_applies() {
        let validator = Validator::new(config(
            r"
rules:
  no_deprecated: error
",
        ));
        let schema = Arc::new(
            TypeSystem::parse(
                "type Query { old: Int @deprecated(reason: \"gone\") }",
                "schema.graphql",
            )
            .unwrap(),
        );
        let tree = apollo_parser::Parser::new("{ old }").parse();
        let diagnostics = validator.validate_document(&tree, schema);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
        assert_eq!(diagnostics[0].message, "The field Query.old is deprecated. gone");
    }
}
