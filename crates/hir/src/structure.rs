use apollo_compiler::ast;
use apollo_compiler::{Name, Node};
use std::fmt;
use std::sync::Arc;

/// Reason reported for `@deprecated` usages that do not give one.
pub const DEFAULT_DEPRECATION_REASON: &str = "No longer supported";

/// A named type definition, with any extensions already merged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: Arc<str>,
    pub kind: TypeDefKind,
    /// Output fields of object and interface types
    pub fields: Vec<Arc<FieldSignature>>,
    /// Fields of input object types
    pub input_fields: Vec<Arc<ArgumentDef>>,
    pub implements: Vec<Arc<str>>,
    pub union_members: Vec<Arc<str>>,
    pub enum_values: Vec<Arc<EnumValue>>,
    pub description: Option<Arc<str>>,
    /// Whether this type was lowered from a type extension (extend type)
    pub is_extension: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TypeDefKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

impl TypeDef {
    fn new(name: &Name, kind: TypeDefKind, description: Option<&Node<str>>) -> Self {
        Self {
            name: Arc::from(name.as_str()),
            kind,
            fields: Vec::new(),
            input_fields: Vec::new(),
            implements: Vec::new(),
            union_members: Vec::new(),
            enum_values: Vec::new(),
            description: description.map(|d| Arc::from(&**d)),
            is_extension: false,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Arc<FieldSignature>> {
        self.fields.iter().find(|f| &*f.name == name)
    }

    #[must_use]
    pub fn input_field(&self, name: &str) -> Option<&Arc<ArgumentDef>> {
        self.input_fields.iter().find(|f| &*f.name == name)
    }

    #[must_use]
    pub fn enum_value(&self, name: &str) -> Option<&Arc<EnumValue>> {
        self.enum_values.iter().find(|v| &*v.name == name)
    }

    /// Object, interface and union types can carry a selection set.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(
            self.kind,
            TypeDefKind::Object | TypeDefKind::Interface | TypeDefKind::Union
        )
    }

    #[must_use]
    pub fn is_input_type(&self) -> bool {
        matches!(
            self.kind,
            TypeDefKind::Scalar | TypeDefKind::Enum | TypeDefKind::InputObject
        )
    }

    #[must_use]
    pub fn is_output_type(&self) -> bool {
        self.kind != TypeDefKind::InputObject
    }

    /// Append the members an extension adds to this definition.
    pub(crate) fn merge_extension(&mut self, ext: TypeDef) {
        self.fields.extend(ext.fields);
        self.input_fields.extend(ext.input_fields);
        self.implements.extend(ext.implements);
        self.union_members.extend(ext.union_members);
        self.enum_values.extend(ext.enum_values);
    }
}

/// Signature of an output field (no resolver, no body)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSignature {
    pub name: Arc<str>,
    pub type_ref: TypeRef,
    pub arguments: Vec<Arc<ArgumentDef>>,
    pub description: Option<Arc<str>>,
    pub deprecation_reason: Option<Arc<str>>,
}

impl FieldSignature {
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Arc<ArgumentDef>> {
        self.arguments.iter().find(|a| &*a.name == name)
    }

    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }
}

/// Argument definition, also used for the fields of input object types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    pub name: Arc<str>,
    pub type_ref: TypeRef,
    pub default_value: Option<Arc<str>>,
    pub description: Option<Arc<str>>,
    pub deprecation_reason: Option<Arc<str>>,
}

impl ArgumentDef {
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }
}

/// Enum value definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: Arc<str>,
    pub description: Option<Arc<str>>,
    pub deprecation_reason: Option<Arc<str>>,
}

impl EnumValue {
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason.is_some()
    }
}

/// Directive definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveDef {
    pub name: Arc<str>,
    pub description: Option<Arc<str>>,
    pub arguments: Vec<Arc<ArgumentDef>>,
    pub repeatable: bool,
    pub locations: Vec<Arc<str>>,
}

impl DirectiveDef {
    #[must_use]
    pub fn argument(&self, name: &str) -> Option<&Arc<ArgumentDef>> {
        self.arguments.iter().find(|a| &*a.name == name)
    }
}

/// Reference to a type, with list and non-null wrappers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(Arc<str>),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self::Named(Arc::from(name))
    }

    /// The innermost named type, with every wrapper removed.
    #[must_use]
    pub fn named_type(&self) -> &Arc<str> {
        match self {
            Self::Named(name) => name,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// This type with an outer non-null wrapper removed.
    #[must_use]
    pub fn nullable(&self) -> &TypeRef {
        match self {
            Self::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Item type when this (possibly non-null) type is a list.
    #[must_use]
    pub fn list_item(&self) -> Option<&TypeRef> {
        match self.nullable() {
            Self::List(item) => Some(item),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        self.list_item().is_some()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::List(inner) => write!(f, "[{inner}]"),
            Self::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

impl OperationType {
    /// Root type name used when no `schema` definition names one.
    #[must_use]
    pub const fn default_type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }
}

impl From<ast::OperationType> for OperationType {
    fn from(op: ast::OperationType) -> Self {
        match op {
            ast::OperationType::Query => Self::Query,
            ast::OperationType::Mutation => Self::Mutation,
            ast::OperationType::Subscription => Self::Subscription,
        }
    }
}

/// Everything lowered from one SDL document, before merging
#[derive(Debug, Default)]
pub(crate) struct LoweredDocument {
    pub type_defs: Vec<TypeDef>,
    pub directives: Vec<DirectiveDef>,
    /// Root operations from `schema` and `extend schema`, in source order
    pub root_operations: Vec<(OperationType, Arc<str>)>,
    pub has_schema_definition: bool,
}

pub(crate) fn lower_document(document: &ast::Document) -> LoweredDocument {
    let mut lowered = LoweredDocument::default();

    for definition in &document.definitions {
        match definition {
            ast::Definition::ObjectTypeDefinition(obj) => {
                let mut def = TypeDef::new(&obj.name, TypeDefKind::Object, obj.description.as_ref());
                def.fields = extract_fields(&obj.fields);
                def.implements = extract_names(&obj.implements_interfaces);
                lowered.type_defs.push(def);
            }
            ast::Definition::InterfaceTypeDefinition(iface) => {
                let mut def =
                    TypeDef::new(&iface.name, TypeDefKind::Interface, iface.description.as_ref());
                def.fields = extract_fields(&iface.fields);
                def.implements = extract_names(&iface.implements_interfaces);
                lowered.type_defs.push(def);
            }
            ast::Definition::UnionTypeDefinition(union_def) => {
                let mut def =
                    TypeDef::new(&union_def.name, TypeDefKind::Union, union_def.description.as_ref());
                def.union_members = extract_names(&union_def.members);
                lowered.type_defs.push(def);
            }
            ast::Definition::EnumTypeDefinition(enum_def) => {
                let mut def =
                    TypeDef::new(&enum_def.name, TypeDefKind::Enum, enum_def.description.as_ref());
                def.enum_values = extract_enum_values(&enum_def.values);
                lowered.type_defs.push(def);
            }
            ast::Definition::ScalarTypeDefinition(scalar) => {
                lowered.type_defs.push(TypeDef::new(
                    &scalar.name,
                    TypeDefKind::Scalar,
                    scalar.description.as_ref(),
                ));
            }
            ast::Definition::InputObjectTypeDefinition(input) => {
                let mut def =
                    TypeDef::new(&input.name, TypeDefKind::InputObject, input.description.as_ref());
                def.input_fields = extract_input_values(&input.fields);
                lowered.type_defs.push(def);
            }
            // Type extensions - merged into their base type when the snapshot is built
            ast::Definition::ObjectTypeExtension(ext) => {
                let mut def = TypeDef::new(&ext.name, TypeDefKind::Object, None);
                def.fields = extract_fields(&ext.fields);
                def.implements = extract_names(&ext.implements_interfaces);
                def.is_extension = true;
                lowered.type_defs.push(def);
            }
            ast::Definition::InterfaceTypeExtension(ext) => {
                let mut def = TypeDef::new(&ext.name, TypeDefKind::Interface, None);
                def.fields = extract_fields(&ext.fields);
                def.implements = extract_names(&ext.implements_interfaces);
                def.is_extension = true;
                lowered.type_defs.push(def);
            }
            ast::Definition::UnionTypeExtension(ext) => {
                let mut def = TypeDef::new(&ext.name, TypeDefKind::Union, None);
                def.union_members = extract_names(&ext.members);
                def.is_extension = true;
                lowered.type_defs.push(def);
            }
            ast::Definition::EnumTypeExtension(ext) => {
                let mut def = TypeDef::new(&ext.name, TypeDefKind::Enum, None);
                def.enum_values = extract_enum_values(&ext.values);
                def.is_extension = true;
                lowered.type_defs.push(def);
            }
            ast::Definition::InputObjectTypeExtension(ext) => {
                let mut def = TypeDef::new(&ext.name, TypeDefKind::InputObject, None);
                def.input_fields = extract_input_values(&ext.fields);
                def.is_extension = true;
                lowered.type_defs.push(def);
            }
            ast::Definition::ScalarTypeExtension(ext) => {
                let mut def = TypeDef::new(&ext.name, TypeDefKind::Scalar, None);
                def.is_extension = true;
                lowered.type_defs.push(def);
            }
            ast::Definition::DirectiveDefinition(dir) => {
                lowered.directives.push(DirectiveDef {
                    name: Arc::from(dir.name.as_str()),
                    description: dir.description.as_ref().map(|d| Arc::from(&**d)),
                    arguments: extract_input_values(&dir.arguments),
                    repeatable: dir.repeatable,
                    locations: dir
                        .locations
                        .iter()
                        .map(|loc| Arc::from(loc.name()))
                        .collect(),
                });
            }
            ast::Definition::SchemaDefinition(schema_def) => {
                lowered.has_schema_definition = true;
                extract_root_operations(&schema_def.root_operations, &mut lowered);
            }
            ast::Definition::SchemaExtension(ext) => {
                extract_root_operations(&ext.root_operations, &mut lowered);
            }
            // Executable definitions have no place in a type system
            ast::Definition::OperationDefinition(_) | ast::Definition::FragmentDefinition(_) => {}
        }
    }

    lowered
}

fn extract_root_operations(
    root_operations: &[Node<(ast::OperationType, ast::NamedType)>],
    lowered: &mut LoweredDocument,
) {
    for root_op in root_operations {
        let (op_type, named_type) = &**root_op;
        lowered
            .root_operations
            .push(((*op_type).into(), Arc::from(named_type.as_str())));
    }
}

fn extract_names(names: &[Name]) -> Vec<Arc<str>> {
    names.iter().map(|n| Arc::from(n.as_str())).collect()
}

fn extract_fields(fields: &[Node<ast::FieldDefinition>]) -> Vec<Arc<FieldSignature>> {
    fields
        .iter()
        .map(|field| {
            Arc::new(FieldSignature {
                name: Arc::from(field.name.as_str()),
                type_ref: extract_type_ref(&field.ty),
                arguments: extract_input_values(&field.arguments),
                description: field.description.as_ref().map(|d| Arc::from(&**d)),
                deprecation_reason: extract_deprecation(&field.directives),
            })
        })
        .collect()
}

fn extract_input_values(values: &[Node<ast::InputValueDefinition>]) -> Vec<Arc<ArgumentDef>> {
    values
        .iter()
        .map(|arg| {
            Arc::new(ArgumentDef {
                name: Arc::from(arg.name.as_str()),
                type_ref: extract_type_ref(&arg.ty),
                default_value: arg
                    .default_value
                    .as_ref()
                    .map(|v| Arc::from(v.to_string().as_str())),
                description: arg.description.as_ref().map(|d| Arc::from(&**d)),
                deprecation_reason: extract_deprecation(&arg.directives),
            })
        })
        .collect()
}

fn extract_enum_values(values: &[Node<ast::EnumValueDefinition>]) -> Vec<Arc<EnumValue>> {
    values
        .iter()
        .map(|v| {
            Arc::new(EnumValue {
                name: Arc::from(v.value.as_str()),
                description: v.description.as_ref().map(|d| Arc::from(&**d)),
                deprecation_reason: extract_deprecation(&v.directives),
            })
        })
        .collect()
}

/// Deprecation reason from `@deprecated`, if the directive is present.
///
/// A missing or non-string `reason` falls back to [`DEFAULT_DEPRECATION_REASON`].
fn extract_deprecation(directives: &ast::DirectiveList) -> Option<Arc<str>> {
    let directive = directives.iter().find(|d| d.name == "deprecated")?;
    let reason = directive.arguments.iter().find_map(|arg| {
        if arg.name != "reason" {
            return None;
        }
        match &*arg.value {
            ast::Value::String(s) => Some(Arc::from(s.as_str())),
            _ => None,
        }
    });
    Some(reason.unwrap_or_else(|| Arc::from(DEFAULT_DEPRECATION_REASON)))
}

fn extract_type_ref(ty: &ast::Type) -> TypeRef {
    match ty {
        ast::Type::Named(name) => TypeRef::named(name.as_str()),
        ast::Type::NonNullNamed(name) => TypeRef::NonNull(Box::new(TypeRef::named(name.as_str()))),
        ast::Type::List(inner) => TypeRef::List(Box::new(extract_type_ref(inner))),
        ast::Type::NonNullList(inner) => TypeRef::NonNull(Box::new(TypeRef::List(Box::new(
            extract_type_ref(inner),
        )))),
    }
}
