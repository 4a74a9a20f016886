//! Positional type information for executable documents.
//!
//! [`TypeInfo`] keeps one stack per category (output type, parent type, input
//! type, field definition) plus single slots for the current directive,
//! argument and enum value. The runner calls [`TypeInfo::enter`] before any
//! rule sees a node and [`TypeInfo::leave`] after every rule has left it, so
//! rules always observe the innermost enclosing definition of each category.

use apollo_parser::cst::{self, CstNode};
use apollo_parser::SyntaxKind;
use graphql_apollo_ext::CstNodeRef;
use graphql_hir::{
    ArgumentDef, DirectiveDef, EnumValue, FieldSignature, OperationType, TypeDef, TypeDefKind,
    TypeRef, TypeSystem,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TypeInfo {
    schema: Arc<TypeSystem>,
    type_stack: Vec<Option<TypeRef>>,
    parent_type_stack: Vec<Option<Arc<TypeDef>>>,
    input_type_stack: Vec<Option<TypeRef>>,
    field_def_stack: Vec<Option<Arc<FieldSignature>>>,
    directive: Option<Arc<DirectiveDef>>,
    argument: Option<Arc<ArgumentDef>>,
    enum_value: Option<Arc<EnumValue>>,
}

impl TypeInfo {
    #[must_use]
    pub fn new(schema: Arc<TypeSystem>) -> Self {
        Self {
            schema,
            type_stack: Vec::new(),
            parent_type_stack: Vec::new(),
            input_type_stack: Vec::new(),
            field_def_stack: Vec::new(),
            directive: None,
            argument: None,
            enum_value: None,
        }
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<TypeSystem> {
        &self.schema
    }

    /// Output type of the innermost field, operation or fragment.
    #[must_use]
    pub fn output_type(&self) -> Option<&TypeRef> {
        self.type_stack.last().and_then(Option::as_ref)
    }

    /// Composite type whose selection set encloses the current position.
    #[must_use]
    pub fn parent_type(&self) -> Option<&Arc<TypeDef>> {
        self.parent_type_stack.last().and_then(Option::as_ref)
    }

    /// Expected type of the innermost argument, variable or input value.
    #[must_use]
    pub fn input_type(&self) -> Option<&TypeRef> {
        self.input_type_stack.last().and_then(Option::as_ref)
    }

    /// Input type enclosing [`input_type`](Self::input_type).
    ///
    /// Inside an object field this is the input object the field belongs to.
    #[must_use]
    pub fn parent_input_type(&self) -> Option<&TypeRef> {
        let len = self.input_type_stack.len();
        if len < 2 {
            return None;
        }
        self.input_type_stack[len - 2].as_ref()
    }

    #[must_use]
    pub fn field_def(&self) -> Option<&Arc<FieldSignature>> {
        self.field_def_stack.last().and_then(Option::as_ref)
    }

    #[must_use]
    pub fn directive(&self) -> Option<&Arc<DirectiveDef>> {
        self.directive.as_ref()
    }

    #[must_use]
    pub fn argument(&self) -> Option<&Arc<ArgumentDef>> {
        self.argument.as_ref()
    }

    #[must_use]
    pub fn enum_value(&self) -> Option<&Arc<EnumValue>> {
        self.enum_value.as_ref()
    }

    /// Definition of the named form of `ty`.
    #[must_use]
    pub fn named_type_def(&self, ty: Option<&TypeRef>) -> Option<&Arc<TypeDef>> {
        self.schema.type_def(ty?.named_type())
    }

    pub fn enter(&mut self, node: CstNodeRef<'_>) {
        match node {
            CstNodeRef::SelectionSet(_) => {
                let parent = self
                    .named_type_def(self.output_type())
                    .filter(|def| def.is_composite())
                    .cloned();
                self.parent_type_stack.push(parent);
            }
            CstNodeRef::Field(field) => {
                let field_def = match (self.parent_type(), field.name()) {
                    (Some(parent), Some(name)) => self
                        .schema
                        .field_def(&parent.name, name.text().as_str())
                        .cloned(),
                    _ => None,
                };
                let field_type = field_def
                    .as_ref()
                    .map(|def| def.type_ref.clone())
                    .filter(|ty| self.schema.is_output_type(ty));
                self.field_def_stack.push(field_def);
                self.type_stack.push(field_type);
            }
            CstNodeRef::Directive(directive) => {
                self.directive = directive
                    .name()
                    .and_then(|name| self.schema.directive(name.text().as_str()).cloned());
            }
            CstNodeRef::OperationDefinition(op) => {
                let kind = operation_kind(op);
                let root = self
                    .schema
                    .root_type(kind)
                    .filter(|def| def.kind == TypeDefKind::Object)
                    .map(|def| TypeRef::Named(def.name.clone()));
                self.type_stack.push(root);
            }
            CstNodeRef::InlineFragment(inline) => {
                let condition = type_condition_name(inline.type_condition());
                self.push_fragment_type(condition);
            }
            CstNodeRef::FragmentDefinition(frag) => {
                let condition = type_condition_name(frag.type_condition());
                self.push_fragment_type(condition);
            }
            CstNodeRef::VariableDefinition(var_def) => {
                let input_type = var_def
                    .ty()
                    .and_then(|ty| type_ref_from_cst(&ty))
                    .filter(|ty| self.schema.is_input_type(ty));
                self.input_type_stack.push(input_type);
            }
            CstNodeRef::Argument(arg) => {
                let arg_def = arg.name().and_then(|name| {
                    let name = name.text();
                    match argument_owner(arg) {
                        Some(SyntaxKind::DIRECTIVE) => {
                            self.directive()?.argument(name.as_str()).cloned()
                        }
                        Some(SyntaxKind::FIELD) => self.field_def()?.argument(name.as_str()).cloned(),
                        _ => None,
                    }
                });
                let arg_type = arg_def
                    .as_ref()
                    .map(|def| def.type_ref.clone())
                    .filter(|ty| self.schema.is_input_type(ty));
                self.argument = arg_def;
                self.input_type_stack.push(arg_type);
            }
            CstNodeRef::ListValue(_) => {
                let item_type = self
                    .input_type()
                    .map(|ty| ty.list_item().unwrap_or_else(|| ty.nullable()).clone())
                    .filter(|ty| self.schema.is_input_type(ty));
                self.input_type_stack.push(item_type);
            }
            CstNodeRef::ObjectField(object_field) => {
                let field_type = match (self.named_type_def(self.input_type()), object_field.name()) {
                    (Some(def), Some(name)) if def.kind == TypeDefKind::InputObject => def
                        .input_field(name.text().as_str())
                        .map(|field| field.type_ref.clone()),
                    _ => None,
                }
                .filter(|ty| self.schema.is_input_type(ty));
                self.input_type_stack.push(field_type);
            }
            CstNodeRef::EnumValue(value) => {
                self.enum_value = match (self.named_type_def(self.input_type()), value.name()) {
                    (Some(def), Some(name)) if def.kind == TypeDefKind::Enum => {
                        def.enum_value(name.text().as_str()).cloned()
                    }
                    _ => None,
                };
            }
            _ => {}
        }
    }

    pub fn leave(&mut self, node: CstNodeRef<'_>) {
        match node {
            CstNodeRef::SelectionSet(_) => {
                self.parent_type_stack.pop();
            }
            CstNodeRef::Field(_) => {
                self.field_def_stack.pop();
                self.type_stack.pop();
            }
            CstNodeRef::Directive(_) => {
                self.directive = None;
            }
            CstNodeRef::OperationDefinition(_)
            | CstNodeRef::InlineFragment(_)
            | CstNodeRef::FragmentDefinition(_) => {
                self.type_stack.pop();
            }
            CstNodeRef::VariableDefinition(_)
            | CstNodeRef::ListValue(_)
            | CstNodeRef::ObjectField(_) => {
                self.input_type_stack.pop();
            }
            CstNodeRef::Argument(_) => {
                self.argument = None;
                self.input_type_stack.pop();
            }
            CstNodeRef::EnumValue(_) => {
                self.enum_value = None;
            }
            _ => {}
        }
    }

    /// A fragment without a type condition keeps the enclosing named type.
    fn push_fragment_type(&mut self, condition: Option<String>) {
        let ty = match condition {
            Some(name) => Some(TypeRef::named(&name)),
            None => self
                .output_type()
                .map(|ty| TypeRef::Named(ty.named_type().clone())),
        }
        .filter(|ty| self.schema.is_output_type(ty));
        self.type_stack.push(ty);
    }
}

/// Syntax kind of the field or directive an argument is passed to.
fn argument_owner(arg: &cst::Argument) -> Option<SyntaxKind> {
    // ARGUMENT -> ARGUMENTS -> FIELD | DIRECTIVE
    Some(arg.syntax().parent()?.parent()?.kind())
}

/// Operation kind of an operation definition; the shorthand form is a query.
pub(crate) fn operation_kind(op: &cst::OperationDefinition) -> OperationType {
    let Some(op_type) = op.operation_type() else {
        return OperationType::Query;
    };
    if op_type.query_token().is_some() {
        OperationType::Query
    } else if op_type.mutation_token().is_some() {
        OperationType::Mutation
    } else {
        OperationType::Subscription
    }
}

fn type_condition_name(condition: Option<cst::TypeCondition>) -> Option<String> {
    Some(condition?.named_type()?.name()?.text().to_string())
}

fn type_ref_from_cst(ty: &cst::Type) -> Option<TypeRef> {
    match ty {
        cst::Type::NamedType(named) => Some(TypeRef::named(named.name()?.text().as_str())),
        cst::Type::ListType(list) => Some(TypeRef::List(Box::new(type_ref_from_cst(&list.ty()?)?))),
        cst::Type::NonNullType(non_null) => {
            let inner = if let Some(named) = non_null.named_type() {
                TypeRef::named(named.name()?.text().as_str())
            } else {
                TypeRef::List(Box::new(type_ref_from_cst(&non_null.list_type()?.ty()?)?))
            };
            Some(TypeRef::NonNull(Box::new(inner)))
        }
    }
}
