// GraphQL HIR (High-level Intermediate Representation)
// This crate lowers SDL into an immutable type system snapshot that validation
// queries by name. Nothing in a snapshot changes once it has been built.

use std::collections::HashMap;
use std::sync::Arc;

mod builtins;
mod structure;

pub use structure::*;

/// Map from type name to type definition.
pub type TypeDefMap = HashMap<Arc<str>, Arc<TypeDef>>;

/// Map from directive name to directive definition.
pub type DirectiveDefMap = HashMap<Arc<str>, Arc<DirectiveDef>>;

/// Errors raised while building a [`TypeSystem`]
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Syntax errors in {path}:\n{message}")]
    Syntax { path: String, message: String },
}

/// Root operation type names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootOperations {
    pub query: Option<Arc<str>>,
    pub mutation: Option<Arc<str>>,
    pub subscription: Option<Arc<str>>,
}

impl RootOperations {
    #[must_use]
    pub fn get(&self, op: OperationType) -> Option<&Arc<str>> {
        match op {
            OperationType::Query => self.query.as_ref(),
            OperationType::Mutation => self.mutation.as_ref(),
            OperationType::Subscription => self.subscription.as_ref(),
        }
    }

    fn slot(&mut self, op: OperationType) -> &mut Option<Arc<str>> {
        match op {
            OperationType::Query => &mut self.query,
            OperationType::Mutation => &mut self.mutation,
            OperationType::Subscription => &mut self.subscription,
        }
    }
}

/// Read-only snapshot of a GraphQL type system.
///
/// Built once with [`TypeSystem::builder`] or [`TypeSystem::parse`] and
/// shared as `Arc<TypeSystem>` for the duration of any number of validation
/// runs.
#[derive(Debug, Clone)]
pub struct TypeSystem {
    types: TypeDefMap,
    directives: DirectiveDefMap,
    roots: RootOperations,
    meta_fields: MetaFields,
}

#[derive(Debug, Clone)]
struct MetaFields {
    typename: Arc<FieldSignature>,
    schema: Arc<FieldSignature>,
    type_: Arc<FieldSignature>,
}

impl TypeSystem {
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Build a snapshot from a single SDL source.
    pub fn parse(source: &str, path: &str) -> Result<Self, SchemaError> {
        let mut builder = Self::builder();
        builder.add_sdl(source, path)?;
        Ok(builder.build())
    }

    #[must_use]
    pub fn types(&self) -> &TypeDefMap {
        &self.types
    }

    #[must_use]
    pub fn directives(&self) -> &DirectiveDefMap {
        &self.directives
    }

    #[must_use]
    pub fn root_operations(&self) -> &RootOperations {
        &self.roots
    }

    #[must_use]
    pub fn type_def(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(name)
    }

    #[must_use]
    pub fn directive(&self, name: &str) -> Option<&Arc<DirectiveDef>> {
        self.directives.get(name)
    }

    /// Root type of the given operation kind, if the schema defines one.
    #[must_use]
    pub fn root_type(&self, op: OperationType) -> Option<&Arc<TypeDef>> {
        self.roots.get(op).and_then(|name| self.type_def(name))
    }

    /// Field definition of `field` on `parent`, including meta-fields.
    ///
    /// `__typename` resolves on every composite type; `__schema` and
    /// `__type` only on the query root.
    #[must_use]
    pub fn field_def(&self, parent: &str, field: &str) -> Option<&Arc<FieldSignature>> {
        let parent_def = self.type_def(parent)?;
        let is_query_root = self.roots.query.as_deref() == Some(parent);
        match field {
            "__typename" if parent_def.is_composite() => Some(&self.meta_fields.typename),
            "__schema" if is_query_root => Some(&self.meta_fields.schema),
            "__type" if is_query_root => Some(&self.meta_fields.type_),
            _ => parent_def.field(field),
        }
    }

    /// Whether the named form of `type_ref` is a scalar, enum or input object.
    #[must_use]
    pub fn is_input_type(&self, type_ref: &TypeRef) -> bool {
        self.type_def(type_ref.named_type())
            .is_some_and(|def| def.is_input_type())
    }

    /// Whether the named form of `type_ref` may appear as a field type.
    #[must_use]
    pub fn is_output_type(&self, type_ref: &TypeRef) -> bool {
        self.type_def(type_ref.named_type())
            .is_some_and(|def| def.is_output_type())
    }
}

/// Accumulates SDL sources and merges them into a [`TypeSystem`]
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    documents: Vec<LoweredDocument>,
}

impl SchemaBuilder {
    /// Parse and lower one SDL source.
    ///
    /// Executable definitions in the source are ignored.
    #[tracing::instrument(skip(self, source), fields(len = source.len()))]
    pub fn add_sdl(&mut self, source: &str, path: &str) -> Result<&mut Self, SchemaError> {
        let document = apollo_compiler::ast::Document::parse(source, path).map_err(|with_errors| {
            SchemaError::Syntax {
                path: path.to_string(),
                message: with_errors.errors.to_string(),
            }
        })?;
        let lowered = lower_document(&document);
        tracing::debug!(
            types = lowered.type_defs.len(),
            directives = lowered.directives.len(),
            "Lowered SDL source"
        );
        self.documents.push(lowered);
        Ok(self)
    }

    /// Merge every source added so far, plus the built-in definitions.
    #[tracing::instrument(skip(self), fields(sources = self.documents.len()))]
    pub fn build(self) -> TypeSystem {
        let mut types: HashMap<Arc<str>, TypeDef> = HashMap::new();
        let mut directives: DirectiveDefMap = HashMap::new();
        let mut extensions = Vec::new();
        let mut roots = RootOperations::default();
        let mut has_schema_definition = false;

        for document in self.documents {
            has_schema_definition |= document.has_schema_definition;
            for (op, name) in document.root_operations {
                *roots.slot(op) = Some(name);
            }
            for type_def in document.type_defs {
                if type_def.is_extension {
                    extensions.push(type_def);
                } else if types.contains_key(&type_def.name) {
                    tracing::warn!(name = %type_def.name, "Type defined more than once, keeping the first definition");
                } else {
                    types.insert(type_def.name.clone(), type_def);
                }
            }
            for directive in document.directives {
                if directives.contains_key(&directive.name) {
                    tracing::warn!(name = %directive.name, "Directive defined more than once, keeping the first definition");
                } else {
                    directives.insert(directive.name.clone(), Arc::new(directive));
                }
            }
        }

        let builtins = lower_sdl(builtins::BUILTINS_SDL, builtins::BUILTINS_PATH);
        for type_def in builtins.type_defs {
            types.entry(type_def.name.clone()).or_insert(type_def);
        }
        for directive in builtins.directives {
            directives
                .entry(directive.name.clone())
                .or_insert_with(|| Arc::new(directive));
        }

        for ext in extensions {
            match types.get_mut(&ext.name) {
                Some(base) => base.merge_extension(ext),
                None => {
                    tracing::warn!(name = %ext.name, "Extension of an undefined type ignored");
                }
            }
        }

        if !has_schema_definition {
            for op in [
                OperationType::Query,
                OperationType::Mutation,
                OperationType::Subscription,
            ] {
                let slot = roots.slot(op);
                if slot.is_none() && types.contains_key(op.default_type_name()) {
                    *slot = Some(Arc::from(op.default_type_name()));
                }
            }
        }

        tracing::debug!(
            types = types.len(),
            directives = directives.len(),
            "Built type system"
        );

        TypeSystem {
            types: types
                .into_iter()
                .map(|(name, def)| (name, Arc::new(def)))
                .collect(),
            directives,
            roots,
            meta_fields: meta_fields(),
        }
    }
}

/// Lower SDL that is known to be well-formed, keeping whatever parsed.
fn lower_sdl(source: &str, path: &str) -> LoweredDocument {
    let document = match apollo_compiler::ast::Document::parse(source, path) {
        Ok(document) => document,
        Err(with_errors) => with_errors.partial,
    };
    lower_document(&document)
}

fn meta_fields() -> MetaFields {
    let lowered = lower_sdl(builtins::META_FIELDS_SDL, builtins::BUILTINS_PATH);
    let fields = lowered
        .type_defs
        .into_iter()
        .flat_map(|def| def.fields)
        .collect::<Vec<_>>();
    let take = |name: &str| {
        fields
            .iter()
            .find(|f| &*f.name == name)
            .cloned()
            .unwrap_or_else(|| {
                Arc::new(FieldSignature {
                    name: Arc::from(name),
                    type_ref: TypeRef::named("String"),
                    arguments: Vec::new(),
                    description: None,
                    deprecation_reason: None,
                })
            })
    };
    MetaFields {
        typename: take("__typename"),
        schema: take("__schema"),
        type_: take("__type"),
    }
}
