//! Enter/leave traversal over the GraphQL CST.
//!
//! The walker visits every node of interest in document order, depth-first.
//! Each node is handed to the visitor as a kind-tagged [`CstNodeRef`], so a
//! visitor can dispatch on [`NodeKind`] without one method per node type.
//!
//! # Example
//!
//! ```
//! use graphql_apollo_ext::{walk_document, CstNodeRef, CstVisitor, VisitControl};
//!
//! struct FieldCounter(usize);
//!
//! impl CstVisitor for FieldCounter {
//!     fn enter(&mut self, node: CstNodeRef<'_>) -> VisitControl {
//!         if let CstNodeRef::Field(_) = node {
//!             self.0 += 1;
//!         }
//!         VisitControl::Continue
//!     }
//! }
//!
//! let source = "query { user { name email } }";
//! let tree = apollo_parser::Parser::new(source).parse();
//! let mut counter = FieldCounter(0);
//! walk_document(&mut counter, &tree);
//! assert_eq!(counter.0, 3); // user, name, email
//! ```

use apollo_parser::cst::{self, CstNode};
use apollo_parser::{SyntaxElement, SyntaxKind, SyntaxNode};

/// What the walker should do after a node has been entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitControl {
    /// Visit the node's children, then call `leave` for it.
    #[default]
    Continue,
    /// Do not visit any descendant of the node and do not call `leave` for it.
    SkipChildren,
}

macro_rules! cst_nodes {
    ($($kind:ident),* $(,)?) => {
        /// Discriminator for every CST node kind the walker emits.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum NodeKind {
            $($kind,)*
        }

        /// A borrowed reference to one typed CST node.
        #[derive(Debug, Clone, Copy)]
        pub enum CstNodeRef<'a> {
            $($kind(&'a cst::$kind),)*
        }

        impl CstNodeRef<'_> {
            #[must_use]
            pub fn kind(&self) -> NodeKind {
                match self {
                    $(Self::$kind(_) => NodeKind::$kind,)*
                }
            }

            #[must_use]
            pub fn syntax(&self) -> &SyntaxNode {
                match self {
                    $(Self::$kind(node) => node.syntax(),)*
                }
            }
        }
    };
}

cst_nodes! {
    Document,
    OperationDefinition,
    FragmentDefinition,
    VariableDefinition,
    SelectionSet,
    Field,
    FragmentSpread,
    InlineFragment,
    Argument,
    Directive,
    Variable,
    StringValue,
    IntValue,
    FloatValue,
    BooleanValue,
    NullValue,
    EnumValue,
    ListValue,
    ObjectValue,
    ObjectField,
    SchemaDefinition,
    SchemaExtension,
    ScalarTypeDefinition,
    ObjectTypeDefinition,
    InterfaceTypeDefinition,
    UnionTypeDefinition,
    EnumTypeDefinition,
    InputObjectTypeDefinition,
    ScalarTypeExtension,
    ObjectTypeExtension,
    InterfaceTypeExtension,
    UnionTypeExtension,
    EnumTypeExtension,
    InputObjectTypeExtension,
    DirectiveDefinition,
    FieldDefinition,
    InputValueDefinition,
    EnumValueDefinition,
    // Never walked on its own; names are referenced when attributing diagnostics.
    Name,
}

impl CstNodeRef<'_> {
    /// Byte range of the node in its source text.
    ///
    /// Ignored tokens (whitespace, comments and commas) at either edge are not
    /// part of the range, so a name covers exactly its identifier.
    #[must_use]
    pub fn range(&self) -> (usize, usize) {
        let syntax = self.syntax();
        let mut significant = syntax
            .descendants_with_tokens()
            .filter_map(SyntaxElement::into_token)
            .filter(|token| {
                !matches!(
                    token.kind(),
                    SyntaxKind::WHITESPACE | SyntaxKind::COMMENT | SyntaxKind::COMMA
                )
            });
        let Some(first) = significant.next() else {
            let range = syntax.text_range();
            return (range.start().into(), range.start().into());
        };
        let end = significant.last().unwrap_or_else(|| first.clone()).text_range().end();
        (first.text_range().start().into(), end.into())
    }

    /// The `name` child of the node, for kinds that carry one.
    ///
    /// Fragment definitions and spreads report the fragment name.
    #[must_use]
    pub fn name(&self) -> Option<cst::Name> {
        match self {
            Self::OperationDefinition(node) => node.name(),
            Self::FragmentDefinition(node) => node.fragment_name().and_then(|n| n.name()),
            Self::FragmentSpread(node) => node.fragment_name().and_then(|n| n.name()),
            Self::Field(node) => node.name(),
            Self::Argument(node) => node.name(),
            Self::Directive(node) => node.name(),
            Self::Variable(node) => node.name(),
            Self::EnumValue(node) => node.name(),
            Self::ObjectField(node) => node.name(),
            Self::ScalarTypeDefinition(node) => node.name(),
            Self::ObjectTypeDefinition(node) => node.name(),
            Self::InterfaceTypeDefinition(node) => node.name(),
            Self::UnionTypeDefinition(node) => node.name(),
            Self::EnumTypeDefinition(node) => node.name(),
            Self::InputObjectTypeDefinition(node) => node.name(),
            Self::ScalarTypeExtension(node) => node.name(),
            Self::ObjectTypeExtension(node) => node.name(),
            Self::InterfaceTypeExtension(node) => node.name(),
            Self::UnionTypeExtension(node) => node.name(),
            Self::EnumTypeExtension(node) => node.name(),
            Self::InputObjectTypeExtension(node) => node.name(),
            Self::DirectiveDefinition(node) => node.name(),
            Self::FieldDefinition(node) => node.name(),
            Self::InputValueDefinition(node) => node.name(),
            Self::EnumValueDefinition(node) => node.enum_value().and_then(|v| v.name()),
            Self::Name(node) => Some((*node).clone()),
            _ => None,
        }
    }
}

/// A visitor driven by [`walk_document`].
///
/// Both methods default to doing nothing, so implementors only override what
/// they need.
#[allow(unused_variables)]
pub trait CstVisitor {
    /// Called before any of the node's children.
    fn enter(&mut self, node: CstNodeRef<'_>) -> VisitControl {
        VisitControl::Continue
    }

    /// Called after all of the node's children, unless `enter` returned
    /// [`VisitControl::SkipChildren`].
    fn leave(&mut self, node: CstNodeRef<'_>) {}
}

/// Walk a parsed document with the given visitor.
///
/// This is the main entry point for traversing a GraphQL document.
pub fn walk_document<V: CstVisitor + ?Sized>(visitor: &mut V, tree: &apollo_parser::SyntaxTree) {
    let doc = tree.document();
    walk_node(visitor, CstNodeRef::Document(&doc), |visitor| {
        for definition in doc.definitions() {
            walk_definition(visitor, &definition);
        }
    });
}

fn walk_node<V: CstVisitor + ?Sized>(
    visitor: &mut V,
    node: CstNodeRef<'_>,
    children: impl FnOnce(&mut V),
) {
    if visitor.enter(node) == VisitControl::SkipChildren {
        return;
    }
    children(visitor);
    visitor.leave(node);
}

fn walk_definition<V: CstVisitor + ?Sized>(visitor: &mut V, def: &cst::Definition) {
    match def {
        cst::Definition::OperationDefinition(op) => walk_operation(visitor, op),
        cst::Definition::FragmentDefinition(frag) => walk_fragment_definition(visitor, frag),
        cst::Definition::SchemaDefinition(schema) => {
            walk_node(visitor, CstNodeRef::SchemaDefinition(schema), |visitor| {
                walk_directives(visitor, schema.directives());
            });
        }
        cst::Definition::SchemaExtension(ext) => {
            walk_node(visitor, CstNodeRef::SchemaExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
            });
        }
        cst::Definition::ScalarTypeDefinition(scalar) => {
            walk_node(visitor, CstNodeRef::ScalarTypeDefinition(scalar), |visitor| {
                walk_directives(visitor, scalar.directives());
            });
        }
        cst::Definition::ScalarTypeExtension(ext) => {
            walk_node(visitor, CstNodeRef::ScalarTypeExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
            });
        }
        cst::Definition::ObjectTypeDefinition(obj) => {
            walk_node(visitor, CstNodeRef::ObjectTypeDefinition(obj), |visitor| {
                walk_directives(visitor, obj.directives());
                walk_fields_definition(visitor, obj.fields_definition());
            });
        }
        cst::Definition::ObjectTypeExtension(ext) => {
            walk_node(visitor, CstNodeRef::ObjectTypeExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
                walk_fields_definition(visitor, ext.fields_definition());
            });
        }
        cst::Definition::InterfaceTypeDefinition(iface) => {
            walk_node(visitor, CstNodeRef::InterfaceTypeDefinition(iface), |visitor| {
                walk_directives(visitor, iface.directives());
                walk_fields_definition(visitor, iface.fields_definition());
            });
        }
        cst::Definition::InterfaceTypeExtension(ext) => {
            walk_node(visitor, CstNodeRef::InterfaceTypeExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
                walk_fields_definition(visitor, ext.fields_definition());
            });
        }
        cst::Definition::UnionTypeDefinition(union) => {
            walk_node(visitor, CstNodeRef::UnionTypeDefinition(union), |visitor| {
                walk_directives(visitor, union.directives());
            });
        }
        cst::Definition::UnionTypeExtension(ext) => {
            walk_node(visitor, CstNodeRef::UnionTypeExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
            });
        }
        cst::Definition::EnumTypeDefinition(enum_def) => {
            walk_node(visitor, CstNodeRef::EnumTypeDefinition(enum_def), |visitor| {
                walk_directives(visitor, enum_def.directives());
                walk_enum_values_definition(visitor, enum_def.enum_values_definition());
            });
        }
        cst::Definition::EnumTypeExtension(ext) => {
            walk_node(visitor, CstNodeRef::EnumTypeExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
                walk_enum_values_definition(visitor, ext.enum_values_definition());
            });
        }
        cst::Definition::InputObjectTypeDefinition(input) => {
            walk_node(visitor, CstNodeRef::InputObjectTypeDefinition(input), |visitor| {
                walk_directives(visitor, input.directives());
                if let Some(fields) = input.input_fields_definition() {
                    walk_input_value_definitions(visitor, fields.input_value_definitions());
                }
            });
        }
        cst::Definition::InputObjectTypeExtension(ext) => {
            walk_node(visitor, CstNodeRef::InputObjectTypeExtension(ext), |visitor| {
                walk_directives(visitor, ext.directives());
                if let Some(fields) = ext.input_fields_definition() {
                    walk_input_value_definitions(visitor, fields.input_value_definitions());
                }
            });
        }
        cst::Definition::DirectiveDefinition(dir) => {
            walk_node(visitor, CstNodeRef::DirectiveDefinition(dir), |visitor| {
                if let Some(args) = dir.arguments_definition() {
                    walk_input_value_definitions(visitor, args.input_value_definitions());
                }
            });
        }
    }
}

fn walk_operation<V: CstVisitor + ?Sized>(visitor: &mut V, op: &cst::OperationDefinition) {
    walk_node(visitor, CstNodeRef::OperationDefinition(op), |visitor| {
        if let Some(var_defs) = op.variable_definitions() {
            for var_def in var_defs.variable_definitions() {
                walk_variable_definition(visitor, &var_def);
            }
        }
        walk_directives(visitor, op.directives());
        walk_selection_set(visitor, op.selection_set());
    });
}

fn walk_fragment_definition<V: CstVisitor + ?Sized>(
    visitor: &mut V,
    frag: &cst::FragmentDefinition,
) {
    walk_node(visitor, CstNodeRef::FragmentDefinition(frag), |visitor| {
        walk_directives(visitor, frag.directives());
        walk_selection_set(visitor, frag.selection_set());
    });
}

fn walk_variable_definition<V: CstVisitor + ?Sized>(
    visitor: &mut V,
    var_def: &cst::VariableDefinition,
) {
    walk_node(visitor, CstNodeRef::VariableDefinition(var_def), |visitor| {
        if let Some(value) = var_def.default_value().and_then(|d| d.value()) {
            walk_value(visitor, &value);
        }
        walk_directives(visitor, var_def.directives());
    });
}

fn walk_selection_set<V: CstVisitor + ?Sized>(visitor: &mut V, set: Option<cst::SelectionSet>) {
    let Some(set) = set else {
        return;
    };
    walk_node(visitor, CstNodeRef::SelectionSet(&set), |visitor| {
        for selection in set.selections() {
            match selection {
                cst::Selection::Field(field) => walk_field(visitor, &field),
                cst::Selection::FragmentSpread(spread) => {
                    walk_node(visitor, CstNodeRef::FragmentSpread(&spread), |visitor| {
                        walk_directives(visitor, spread.directives());
                    });
                }
                cst::Selection::InlineFragment(inline) => {
                    walk_node(visitor, CstNodeRef::InlineFragment(&inline), |visitor| {
                        walk_directives(visitor, inline.directives());
                        walk_selection_set(visitor, inline.selection_set());
                    });
                }
            }
        }
    });
}

fn walk_field<V: CstVisitor + ?Sized>(visitor: &mut V, field: &cst::Field) {
    walk_node(visitor, CstNodeRef::Field(field), |visitor| {
        walk_arguments(visitor, field.arguments());
        walk_directives(visitor, field.directives());
        walk_selection_set(visitor, field.selection_set());
    });
}

fn walk_arguments<V: CstVisitor + ?Sized>(visitor: &mut V, args: Option<cst::Arguments>) {
    let Some(args) = args else {
        return;
    };
    for arg in args.arguments() {
        walk_node(visitor, CstNodeRef::Argument(&arg), |visitor| {
            if let Some(value) = arg.value() {
                walk_value(visitor, &value);
            }
        });
    }
}

fn walk_directives<V: CstVisitor + ?Sized>(visitor: &mut V, directives: Option<cst::Directives>) {
    let Some(directives) = directives else {
        return;
    };
    for directive in directives.directives() {
        walk_node(visitor, CstNodeRef::Directive(&directive), |visitor| {
            walk_arguments(visitor, directive.arguments());
        });
    }
}

fn walk_value<V: CstVisitor + ?Sized>(visitor: &mut V, value: &cst::Value) {
    match value {
        cst::Value::Variable(var) => walk_node(visitor, CstNodeRef::Variable(var), |_| {}),
        cst::Value::StringValue(s) => walk_node(visitor, CstNodeRef::StringValue(s), |_| {}),
        cst::Value::FloatValue(f) => walk_node(visitor, CstNodeRef::FloatValue(f), |_| {}),
        cst::Value::IntValue(i) => walk_node(visitor, CstNodeRef::IntValue(i), |_| {}),
        cst::Value::BooleanValue(b) => walk_node(visitor, CstNodeRef::BooleanValue(b), |_| {}),
        cst::Value::NullValue(n) => walk_node(visitor, CstNodeRef::NullValue(n), |_| {}),
        cst::Value::EnumValue(e) => walk_node(visitor, CstNodeRef::EnumValue(e), |_| {}),
        cst::Value::ListValue(list) => {
            walk_node(visitor, CstNodeRef::ListValue(list), |visitor| {
                for item in list.values() {
                    walk_value(visitor, &item);
                }
            });
        }
        cst::Value::ObjectValue(obj) => {
            walk_node(visitor, CstNodeRef::ObjectValue(obj), |visitor| {
                for field in obj.object_fields() {
                    walk_node(visitor, CstNodeRef::ObjectField(&field), |visitor| {
                        if let Some(value) = field.value() {
                            walk_value(visitor, &value);
                        }
                    });
                }
            });
        }
    }
}

fn walk_fields_definition<V: CstVisitor + ?Sized>(
    visitor: &mut V,
    fields: Option<cst::FieldsDefinition>,
) {
    let Some(fields) = fields else {
        return;
    };
    for field in fields.field_definitions() {
        walk_node(visitor, CstNodeRef::FieldDefinition(&field), |visitor| {
            if let Some(args) = field.arguments_definition() {
                walk_input_value_definitions(visitor, args.input_value_definitions());
            }
            walk_directives(visitor, field.directives());
        });
    }
}

fn walk_input_value_definitions<V: CstVisitor + ?Sized>(
    visitor: &mut V,
    values: impl Iterator<Item = cst::InputValueDefinition>,
) {
    for value in values {
        walk_node(visitor, CstNodeRef::InputValueDefinition(&value), |visitor| {
            if let Some(default) = value.default_value().and_then(|d| d.value()) {
                walk_value(visitor, &default);
            }
            walk_directives(visitor, value.directives());
        });
    }
}

fn walk_enum_values_definition<V: CstVisitor + ?Sized>(
    visitor: &mut V,
    values: Option<cst::EnumValuesDefinition>,
) {
    let Some(values) = values else {
        return;
    };
    for value in values.enum_value_definitions() {
        walk_node(visitor, CstNodeRef::EnumValueDefinition(&value), |visitor| {
            walk_directives(visitor, value.directives());
        });
    }
}
