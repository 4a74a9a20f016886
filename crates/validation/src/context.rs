use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::type_info::TypeInfo;
use graphql_apollo_ext::CstNodeRef;
use graphql_hir::{ArgumentDef, DirectiveDef, EnumValue, FieldSignature, TypeDef, TypeRef, TypeSystem};
use std::sync::Arc;

/// What every rule visitor can ask of the run it belongs to
pub trait RuleContext {
    /// The pre-existing type system, when one is bound to the run.
    fn schema(&self) -> Option<&Arc<TypeSystem>>;

    fn sink(&self) -> &DiagnosticSink;

    fn sink_mut(&mut self) -> &mut DiagnosticSink;

    /// Record a diagnostic attributed to `nodes`, in the order given.
    fn report(&mut self, message: String, nodes: &[CstNodeRef<'_>]) {
        self.sink_mut().report(message, nodes);
    }

    /// Called by the runner before any rule enters `node`.
    fn enter_node(&mut self, _node: CstNodeRef<'_>) {}

    /// Called by the runner after every rule has left `node`.
    fn leave_node(&mut self, _node: CstNodeRef<'_>) {}
}

/// Context for validating type system definitions.
///
/// Tracks nothing positional; rules only get type-system-wide lookups.
#[derive(Debug)]
pub struct SdlValidationContext {
    schema: Option<Arc<TypeSystem>>,
    sink: DiagnosticSink,
}

impl SdlValidationContext {
    #[must_use]
    pub fn new(schema: Option<Arc<TypeSystem>>) -> Self {
        Self {
            schema,
            sink: DiagnosticSink::new(),
        }
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.sink.into_diagnostics()
    }
}

impl RuleContext for SdlValidationContext {
    fn schema(&self) -> Option<&Arc<TypeSystem>> {
        self.schema.as_ref()
    }

    fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    fn sink_mut(&mut self) -> &mut DiagnosticSink {
        &mut self.sink
    }
}

/// Context for validating executable documents against a schema.
///
/// Positional accessors return `None` whenever the corresponding construct is
/// not enclosing the current node, or names something the schema lacks.
#[derive(Debug)]
pub struct ValidationContext {
    schema: Arc<TypeSystem>,
    type_info: TypeInfo,
    sink: DiagnosticSink,
}

impl ValidationContext {
    #[must_use]
    pub fn new(schema: Arc<TypeSystem>) -> Self {
        Self {
            type_info: TypeInfo::new(schema.clone()),
            schema,
            sink: DiagnosticSink::new(),
        }
    }

    #[must_use]
    pub fn type_system(&self) -> &Arc<TypeSystem> {
        &self.schema
    }

    #[must_use]
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    #[must_use]
    pub fn output_type(&self) -> Option<&TypeRef> {
        self.type_info.output_type()
    }

    #[must_use]
    pub fn parent_type(&self) -> Option<&Arc<TypeDef>> {
        self.type_info.parent_type()
    }

    #[must_use]
    pub fn input_type(&self) -> Option<&TypeRef> {
        self.type_info.input_type()
    }

    #[must_use]
    pub fn parent_input_type(&self) -> Option<&TypeRef> {
        self.type_info.parent_input_type()
    }

    #[must_use]
    pub fn field_def(&self) -> Option<&Arc<FieldSignature>> {
        self.type_info.field_def()
    }

    #[must_use]
    pub fn directive(&self) -> Option<&Arc<DirectiveDef>> {
        self.type_info.directive()
    }

    #[must_use]
    pub fn argument(&self) -> Option<&Arc<ArgumentDef>> {
        self.type_info.argument()
    }

    #[must_use]
    pub fn enum_value(&self) -> Option<&Arc<EnumValue>> {
        self.type_info.enum_value()
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.sink.into_diagnostics()
    }
}

impl RuleContext for ValidationContext {
    fn schema(&self) -> Option<&Arc<TypeSystem>> {
        Some(&self.schema)
    }

    fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }

    fn sink_mut(&mut self) -> &mut DiagnosticSink {
        &mut self.sink
    }

    fn enter_node(&mut self, node: CstNodeRef<'_>) {
        self.type_info.enter(node);
    }

    fn leave_node(&mut self, node: CstNodeRef<'_>) {
        self.type_info.leave(node);
    }
}
