use crate::context::{RuleContext, ValidationContext};
use crate::diagnostics::DiagnosticSeverity;
use crate::traits::{DocumentRule, Rule, Visitor};
use graphql_apollo_ext::{CstNodeRef, VisitControl};
use graphql_hir::TypeDefKind;

/// Rule that reports every use of a deprecated schema element
///
/// This rule checks for:
/// - Deprecated fields selected in operations and fragments
/// - Deprecated arguments passed to fields or directives
/// - Deprecated input object fields inside input literals
/// - Deprecated enum values
///
/// Usages nest freely, so the rule never skips a subtree.
pub struct NoDeprecatedRuleImpl;

impl Rule for NoDeprecatedRuleImpl {
    fn name(&self) -> &'static str {
        "no_deprecated"
    }

    fn description(&self) -> &'static str {
        "Warns when using deprecated fields, arguments, input fields, or enum values"
    }

    fn default_severity(&self) -> DiagnosticSeverity {
        DiagnosticSeverity::Warning
    }
}

impl DocumentRule for NoDeprecatedRuleImpl {
    fn create_visitor(&self, _ctx: &ValidationContext) -> Box<dyn Visitor<ValidationContext>> {
        Box::new(NoDeprecatedVisitor)
    }
}

struct NoDeprecatedVisitor;

impl Visitor<ValidationContext> for NoDeprecatedVisitor {
    fn enter(&mut self, ctx: &mut ValidationContext, node: CstNodeRef<'_>) -> VisitControl {
        let message = match node {
            CstNodeRef::Field(_) => deprecated_field(ctx),
            CstNodeRef::Argument(_) => deprecated_argument(ctx),
            CstNodeRef::ObjectField(_) => node
                .name()
                .and_then(|name| deprecated_input_field(ctx, name.text().as_str())),
            CstNodeRef::EnumValue(_) => deprecated_enum_value(ctx),
            _ => None,
        };
        if let Some(message) = message {
            ctx.report(message, &[node]);
        }
        VisitControl::Continue
    }
}

fn deprecated_field(ctx: &ValidationContext) -> Option<String> {
    let field_def = ctx.field_def()?;
    let reason = field_def.deprecation_reason.as_ref()?;
    let Some(parent) = ctx.parent_type() else {
        unreachable!("field definition \"{}\" resolved without a parent type", field_def.name);
    };
    Some(format!(
        "The field {}.{} is deprecated. {reason}",
        parent.name, field_def.name
    ))
}

fn deprecated_argument(ctx: &ValidationContext) -> Option<String> {
    let arg_def = ctx.argument()?;
    let reason = arg_def.deprecation_reason.as_ref()?;

    if let Some(directive) = ctx.directive() {
        return Some(format!(
            "Directive \"@{}\" argument \"{}\" is deprecated. {reason}",
            directive.name, arg_def.name
        ));
    }

    let (Some(parent), Some(field_def)) = (ctx.parent_type(), ctx.field_def()) else {
        unreachable!(
            "argument definition \"{}\" resolved without a directive or an enclosing field",
            arg_def.name
        );
    };
    Some(format!(
        "Field \"{}.{}\" argument \"{}\" is deprecated. {reason}",
        parent.name, field_def.name, arg_def.name
    ))
}

/// The input object is the type enclosing the object field. A field missing
/// from it is left to other rules.
fn deprecated_input_field(ctx: &ValidationContext, field_name: &str) -> Option<String> {
    let input_object = ctx
        .type_info()
        .named_type_def(ctx.parent_input_type())
        .filter(|def| def.kind == TypeDefKind::InputObject)?;
    let field = input_object.input_field(field_name)?;
    let reason = field.deprecation_reason.as_ref()?;
    Some(format!(
        "The input field {}.{} is deprecated. {reason}",
        input_object.name, field.name
    ))
}

fn deprecated_enum_value(ctx: &ValidationContext) -> Option<String> {
    let enum_value = ctx.enum_value()?;
    let reason = enum_value.deprecation_reason.as_ref()?;
    let Some(enum_type) = ctx.type_info().named_type_def(ctx.input_type()) else {
        unreachable!("enum value \"{}\" resolved without an enclosing enum type", enum_value.name);
    };
    Some(format!(
        "The enum value \"{}.{}\" is deprecated. {reason}",
        enum_type.name, enum_value.name
    ))
}
