//! Runs a set of rules over a document in a single traversal.

use crate::context::{RuleContext, SdlValidationContext, ValidationContext};
use crate::diagnostics::{Diagnostic, DiagnosticSeverity};
use crate::traits::{DocumentRule, SdlRule, Visitor};
use apollo_parser::{SyntaxNode, SyntaxTree};
use graphql_apollo_ext::{walk_document, CstNodeRef, CstVisitor, VisitControl};
use graphql_hir::TypeSystem;
use std::sync::Arc;

/// Run SDL rules over `tree`, optionally against an existing schema.
///
/// Diagnostics come back in report order and carry each rule's default severity.
#[tracing::instrument(skip_all, fields(rules = rules.len(), with_schema = schema.is_some()))]
pub fn run_sdl_rules(
    tree: &SyntaxTree,
    schema: Option<Arc<TypeSystem>>,
    rules: &[Arc<dyn SdlRule>],
) -> Vec<Diagnostic> {
    let mut ctx = SdlValidationContext::new(schema);
    let active = rules
        .iter()
        .map(|rule| ActiveRule::new(rule.name(), rule.default_severity(), rule.create_visitor(&ctx)))
        .collect();
    run(tree, &mut ctx, active);
    ctx.into_diagnostics()
}

/// Run document rules over an executable document.
#[tracing::instrument(skip_all, fields(rules = rules.len()))]
pub fn run_document_rules(
    tree: &SyntaxTree,
    schema: Arc<TypeSystem>,
    rules: &[Arc<dyn DocumentRule>],
) -> Vec<Diagnostic> {
    let mut ctx = ValidationContext::new(schema);
    let active = rules
        .iter()
        .map(|rule| ActiveRule::new(rule.name(), rule.default_severity(), rule.create_visitor(&ctx)))
        .collect();
    run(tree, &mut ctx, active);
    ctx.into_diagnostics()
}

fn run<C: RuleContext>(tree: &SyntaxTree, ctx: &mut C, rules: Vec<ActiveRule<C>>) {
    let mut parallel = ParallelVisitor { ctx, rules };
    walk_document(&mut parallel, tree);
    tracing::debug!(
        diagnostics = parallel.ctx.sink().diagnostics().len(),
        "Traversal complete"
    );
}

struct ActiveRule<C> {
    name: &'static str,
    severity: DiagnosticSeverity,
    visitor: Box<dyn Visitor<C>>,
    /// Node whose subtree this rule asked not to descend into
    skipping: Option<SyntaxNode>,
}

impl<C> ActiveRule<C> {
    fn new(name: &'static str, severity: DiagnosticSeverity, visitor: Box<dyn Visitor<C>>) -> Self {
        Self {
            name,
            severity,
            visitor,
            skipping: None,
        }
    }
}

/// Fans each traversal event out to every rule that is not skipping.
///
/// The context sees a node before any rule enters it and after every rule
/// has left it.
struct ParallelVisitor<'a, C> {
    ctx: &'a mut C,
    rules: Vec<ActiveRule<C>>,
}

impl<C: RuleContext> CstVisitor for ParallelVisitor<'_, C> {
    fn enter(&mut self, node: CstNodeRef<'_>) -> VisitControl {
        self.ctx.enter_node(node);

        for rule in &mut self.rules {
            if rule.skipping.is_some() {
                continue;
            }
            self.ctx.sink_mut().set_active_rule(rule.name, rule.severity);
            if rule.visitor.enter(self.ctx, node) == VisitControl::SkipChildren {
                rule.skipping = Some(node.syntax().clone());
            }
        }

        // When every rule skips this node the subtree can be pruned outright
        if self
            .rules
            .iter()
            .all(|rule| rule.skipping.as_ref() == Some(node.syntax()))
        {
            for rule in &mut self.rules {
                rule.skipping = None;
            }
            self.ctx.leave_node(node);
            return VisitControl::SkipChildren;
        }

        VisitControl::Continue
    }

    fn leave(&mut self, node: CstNodeRef<'_>) {
        for rule in &mut self.rules {
            match &rule.skipping {
                None => {
                    self.ctx.sink_mut().set_active_rule(rule.name, rule.severity);
                    rule.visitor.leave(self.ctx, node);
                }
                Some(skipped) if skipped == node.syntax() => rule.skipping = None,
                Some(_) => {}
            }
        }

        self.ctx.leave_node(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Rule;
    use graphql_apollo_ext::NodeKind;
    use std::sync::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Records enter/leave events and skips children of one node kind.
    struct Recorder {
        name: &'static str,
        skip: Option<NodeKind>,
        log: Log,
    }

    impl Rule for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "records traversal events"
        }

        fn default_severity(&self) -> DiagnosticSeverity {
            DiagnosticSeverity::Info
        }
    }

    struct RecorderVisitor {
        name: &'static str,
        skip: Option<NodeKind>,
        log: Log,
    }

    fn label(node: CstNodeRef<'_>) -> String {
        match node.name() {
            Some(name) => format!("{:?}:{}", node.kind(), name.text()),
            None => format!("{:?}", node.kind()),
        }
    }

    impl<C: RuleContext> Visitor<C> for RecorderVisitor {
        fn enter(&mut self, ctx: &mut C, node: CstNodeRef<'_>) -> VisitControl {
            self.log
                .lock()
                .unwrap()
                .push(format!("{} +{}", self.name, label(node)));
            if node.kind() == NodeKind::ObjectTypeDefinition {
                ctx.report(format!("saw {}", label(node)), &[node]);
            }
            if self.skip == Some(node.kind()) {
                VisitControl::SkipChildren
            } else {
                VisitControl::Continue
            }
        }

        fn leave(&mut self, _ctx: &mut C, node: CstNodeRef<'_>) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{} -{}", self.name, label(node)));
        }
    }

    impl SdlRule for Recorder {
        fn create_visitor(
            &self,
            _ctx: &SdlValidationContext,
        ) -> Box<dyn Visitor<SdlValidationContext>> {
            Box::new(RecorderVisitor {
                name: self.name,
                skip: self.skip,
                log: self.log.clone(),
            })
        }
    }

    fn recorder(name: &'static str, skip: Option<NodeKind>, log: &Log) -> Arc<dyn SdlRule> {
        Arc::new(Recorder {
            name,
            skip,
            log: log.clone(),
        })
    }

    #[test]
    fn test_skip_is_per_rule() {
        let log = Log::default();
        let tree = apollo_parser::Parser::new("type A { f: Int } scalar S").parse();
        let rules = [
            recorder("skipper", Some(NodeKind::ObjectTypeDefinition), &log),
            recorder("walker", None, &log),
        ];
        let diagnostics = run_sdl_rules(&tree, None, &rules);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "skipper +Document",
                "walker +Document",
                "skipper +ObjectTypeDefinition:A",
                "walker +ObjectTypeDefinition:A",
                "walker +FieldDefinition:f",
                "walker -FieldDefinition:f",
                "walker -ObjectTypeDefinition:A",
                "skipper +ScalarTypeDefinition:S",
                "walker +ScalarTypeDefinition:S",
                "skipper -ScalarTypeDefinition:S",
                "walker -ScalarTypeDefinition:S",
                "skipper -Document",
                "walker -Document",
            ]
        );

        // Diagnostics are stamped with the reporting rule, in report order
        let reported: Vec<_> = diagnostics.iter().map(|d| (d.rule, d.message.as_str())).collect();
        assert_eq!(
            reported,
            vec![
                ("skipper", "saw ObjectTypeDefinition:A"),
                ("walker", "saw ObjectTypeDefinition:A"),
            ]
        );
        assert!(diagnostics
            .iter()
            .all(|d| d.severity == DiagnosticSeverity::Info));
    }

    #[test]
    fn test_subtree_pruned_when_all_rules_skip() {
        let log = Log::default();
        let tree = apollo_parser::Parser::new("type A { f: Int } type B { g: Int }").parse();
        let rules = [
            recorder("one", Some(NodeKind::ObjectTypeDefinition), &log),
            recorder("two", Some(NodeKind::ObjectTypeDefinition), &log),
        ];
        run_sdl_rules(&tree, None, &rules);

        let events = log.lock().unwrap();
        assert!(!events.iter().any(|e| e.contains("FieldDefinition")));
        // Both rules resume on the next sibling
        assert!(events.contains(&"one +ObjectTypeDefinition:B".to_string()));
        assert!(events.contains(&"two +ObjectTypeDefinition:B".to_string()));
        assert_eq!(events.last().map(String::as_str), Some("two -Document"));
    }

    #[test]
    fn test_empty_rule_set() {
        let tree = apollo_parser::Parser::new("type A { f: Int }").parse();
        assert!(run_sdl_rules(&tree, None, &[]).is_empty());
    }

    /// Observes the type info around field nodes.
    struct FieldTypes;

    impl Rule for FieldTypes {
        fn name(&self) -> &'static str {
            "field_types"
        }

        fn description(&self) -> &'static str {
            "reports the parent type seen on enter and leave of each field"
        }

        fn default_severity(&self) -> DiagnosticSeverity {
            DiagnosticSeverity::Info
        }
    }

    struct FieldTypesVisitor;

    impl Visitor<ValidationContext> for FieldTypesVisitor {
        fn enter(&mut self, ctx: &mut ValidationContext, node: CstNodeRef<'_>) -> VisitControl {
            if node.kind() == NodeKind::Field {
                let message = format!(
                    "enter {:?}",
                    ctx.field_def().map(|f| f.type_ref.to_string())
                );
                ctx.report(message, &[node]);
            }
            VisitControl::Continue
        }

        fn leave(&mut self, ctx: &mut ValidationContext, node: CstNodeRef<'_>) {
            if node.kind() == NodeKind::Field {
                let message = format!(
                    "leave {:?}",
                    ctx.field_def().map(|f| f.type_ref.to_string())
                );
                ctx.report(message, &[node]);
            }
        }
    }

    impl DocumentRule for FieldTypes {
        fn create_visitor(&self, _ctx: &ValidationContext) -> Box<dyn Visitor<ValidationContext>> {
            Box::new(FieldTypesVisitor)
        }
    }

    #[test]
    fn test_type_info_wraps_rule_callbacks() {
        let schema = Arc::new(
            TypeSystem::parse("type Query { user: User } type User { id: ID! }", "s.graphql")
                .unwrap(),
        );
        let tree = apollo_parser::Parser::new("{ user { id } }").parse();
        let rules: [Arc<dyn DocumentRule>; 1] = [Arc::new(FieldTypes)];
        let diagnostics = run_document_rules(&tree, schema, &rules);

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "enter Some(\"User\")",
                "enter Some(\"ID!\")",
                "leave Some(\"ID!\")",
                "leave Some(\"User\")",
            ]
        );
    }
}
