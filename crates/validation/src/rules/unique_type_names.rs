use crate::context::{RuleContext, SdlValidationContext};
use crate::diagnostics::DiagnosticSeverity;
use crate::traits::{Rule, SdlRule, Visitor};
use apollo_parser::cst;
use graphql_apollo_ext::{CstNodeRef, NodeKind, VisitControl};
use graphql_hir::TypeSystem;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Rule that forbids declaring the same type name twice
///
/// All six named type definition kinds share one namespace, so `scalar Foo`
/// followed by `type Foo` is a duplicate. A name already defined by the
/// schema bound to the run is reported as a redefinition instead.
pub struct UniqueTypeNamesRuleImpl;

impl Rule for UniqueTypeNamesRuleImpl {
    fn name(&self) -> &'static str {
        "unique_type_names"
    }

    fn description(&self) -> &'static str {
        "Ensures each named type is defined only once"
    }

    fn default_severity(&self) -> DiagnosticSeverity {
        DiagnosticSeverity::Error
    }
}

impl SdlRule for UniqueTypeNamesRuleImpl {
    fn create_visitor(&self, ctx: &SdlValidationContext) -> Box<dyn Visitor<SdlValidationContext>> {
        Box::new(UniqueTypeNamesVisitor {
            schema: ctx.schema().cloned(),
            known_type_names: HashMap::new(),
        })
    }
}

struct UniqueTypeNamesVisitor {
    schema: Option<Arc<TypeSystem>>,
    known_type_names: HashMap<String, cst::Name>,
}

impl<C: RuleContext> Visitor<C> for UniqueTypeNamesVisitor {
    fn enter(&mut self, ctx: &mut C, node: CstNodeRef<'_>) -> VisitControl {
        if !matches!(
            node.kind(),
            NodeKind::ScalarTypeDefinition
                | NodeKind::ObjectTypeDefinition
                | NodeKind::InterfaceTypeDefinition
                | NodeKind::UnionTypeDefinition
                | NodeKind::EnumTypeDefinition
                | NodeKind::InputObjectTypeDefinition
        ) {
            return VisitControl::Continue;
        }
        let Some(name) = node.name() else {
            return VisitControl::SkipChildren;
        };
        let type_name = name.text().to_string();

        if self
            .schema
            .as_ref()
            .is_some_and(|schema| schema.type_def(&type_name).is_some())
        {
            ctx.report(
                format!(
                    "Type \"{type_name}\" already exists in the schema. It cannot also be defined in this type definition."
                ),
                &[CstNodeRef::Name(&name)],
            );
            return VisitControl::SkipChildren;
        }

        match self.known_type_names.entry(type_name) {
            Entry::Occupied(first) => {
                ctx.report(
                    format!("There can be only one type named \"{}\".", first.key()),
                    &[CstNodeRef::Name(first.get()), CstNodeRef::Name(&name)],
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(name);
            }
        }

        VisitControl::SkipChildren
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::run_sdl_rules;
    use graphql_test_utils::format_diagnostic_messages;

    fn check(sdl: &str, schema: Option<&str>) -> Vec<crate::Diagnostic> {
        let tree = apollo_parser::Parser::new(sdl).parse();
        let schema = schema.map(|s| Arc::new(TypeSystem::parse(s, "base.graphql").unwrap()));
        let rules: [Arc<dyn SdlRule>; 1] = [Arc::new(UniqueTypeNamesRuleImpl)];
        run_sdl_rules(&tree, schema, &rules)
    }

    fn messages(diagnostics: &[crate::Diagnostic]) -> String {
        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        format_diagnostic_messages(&messages)
    }

    #[test]
    fn test_distinct_types_pass() {
        let diagnostics = check(
            "scalar Date type Foo { id: ID } interface Node { id: ID } union U = Foo enum E { A } input I { a: Int }",
            None,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_duplicates_across_kinds() {
        let diagnostics = check(
            "type Foo { id: ID } scalar Foo enum Foo { A } input Bar { a: Int } union Bar = Foo",
            None,
        );
        insta::assert_snapshot!(messages(&diagnostics), @r#"
        [1] There can be only one type named "Foo".
        [2] There can be only one type named "Foo".
        [3] There can be only one type named "Bar".
        "#);

        // Every duplicate points back at the first declaration
        let first = diagnostics[0].nodes[0];
        assert!(diagnostics[..2].iter().all(|d| d.nodes[0] == first));
        assert_ne!(diagnostics[0].nodes[1], diagnostics[1].nodes[1]);
        assert!(diagnostics
            .iter()
            .all(|d| d.nodes.iter().all(|n| n.kind == NodeKind::Name)));
    }

    #[test]
    fn test_extensions_are_not_declarations() {
        let diagnostics = check("type Foo { id: ID } extend type Foo { name: String }", None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_type_and_directive_do_not_collide() {
        let diagnostics = check("type foo { id: ID } directive @foo on FIELD", None);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_existing_schema_types() {
        let diagnostics = check(
            "type Foo { id: ID } type Foo { id: ID } scalar String type Bar { id: ID }",
            Some("type Foo { id: ID } type Query { foo: Foo }"),
        );
        insta::assert_snapshot!(messages(&diagnostics), @r#"
        [1] Type "Foo" already exists in the schema. It cannot also be defined in this type definition.
        [2] Type "Foo" already exists in the schema. It cannot also be defined in this type definition.
        [3] Type "String" already exists in the schema. It cannot also be defined in this type definition.
        "#);
        assert!(diagnostics.iter().all(|d| d.nodes.len() == 1));
    }

    #[test]
    fn test_case_sensitive() {
        let diagnostics = check("type Foo { id: ID } type foo { id: ID } type FOO { id: ID }", None);
        assert!(diagnostics.is_empty());
    }
}
