use crate::context::{RuleContext, SdlValidationContext};
use crate::diagnostics::DiagnosticSeverity;
use crate::traits::{Rule, SdlRule, Visitor};
use apollo_parser::cst;
use graphql_apollo_ext::{CstNodeRef, VisitControl};
use graphql_hir::TypeSystem;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// Rule that forbids defining the same directive twice
pub struct UniqueDirectiveNamesRuleImpl;

impl Rule for UniqueDirectiveNamesRuleImpl {
    fn name(&self) -> &'static str {
        "unique_directive_names"
    }

    fn description(&self) -> &'static str {
        "Ensures each directive is defined only once"
    }

    fn default_severity(&self) -> DiagnosticSeverity {
        DiagnosticSeverity::Error
    }
}

impl SdlRule for UniqueDirectiveNamesRuleImpl {
    fn create_visitor(&self, ctx: &SdlValidationContext) -> Box<dyn Visitor<SdlValidationContext>> {
        Box::new(UniqueDirectiveNamesVisitor {
            schema: ctx.schema().cloned(),
            known_directive_names: HashMap::new(),
        })
    }
}

struct UniqueDirectiveNamesVisitor {
    schema: Option<Arc<TypeSystem>>,
    known_directive_names: HashMap<String, cst::Name>,
}

impl<C: RuleContext> Visitor<C> for UniqueDirectiveNamesVisitor {
    fn enter(&mut self, ctx: &mut C, node: CstNodeRef<'_>) -> VisitControl {
        let CstNodeRef::DirectiveDefinition(definition) = node else {
            return VisitControl::Continue;
        };
        let Some(name) = definition.name() else {
            return VisitControl::SkipChildren;
        };
        let directive_name = name.text().to_string();

        if self
            .schema
            .as_ref()
            .is_some_and(|schema| schema.directive(&directive_name).is_some())
        {
            ctx.report(
                format!(
                    "Directive \"@{directive_name}\" already exists in the schema. It cannot be redefined."
                ),
                &[CstNodeRef::Name(&name)],
            );
            return VisitControl::SkipChildren;
        }

        match self.known_directive_names.entry(directive_name) {
            Entry::Occupied(first) => {
                ctx.report(
                    format!("There can be only one directive named \"@{}\".", first.key()),
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
