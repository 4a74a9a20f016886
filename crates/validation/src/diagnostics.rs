use graphql_apollo_ext::{CstNodeRef, NodeKind};
use std::fmt;

/// Byte offset range in a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for OffsetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl OffsetRange {
    /// Create a new offset range
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Severity of a reported diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Info,
}

impl DiagnosticSeverity {
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// One syntax node implicated by a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticNode {
    pub kind: NodeKind,
    pub range: OffsetRange,
}

impl From<CstNodeRef<'_>> for DiagnosticNode {
    fn from(node: CstNodeRef<'_>) -> Self {
        let (start, end) = node.range();
        Self {
            kind: node.kind(),
            range: OffsetRange::new(start, end),
        }
    }
}

/// A validation error or notice, attributed to the nodes responsible.
///
/// Nodes are kept in the order the rule reported them: for a duplicate
/// declaration the first declaration comes first and the conflicting one last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable message
    pub message: String,
    pub nodes: Vec<DiagnosticNode>,
    /// Rule identifier (e.g., `"unique_type_names"`)
    pub rule: &'static str,
    pub severity: DiagnosticSeverity,
}

impl Diagnostic {
    /// Range of the node that triggered the report (the last one attributed).
    #[must_use]
    pub fn primary_range(&self) -> Option<OffsetRange> {
        self.nodes.last().map(|node| node.range)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.rule, self.message)
    }
}

/// Accumulates diagnostics for one validation run, in report order.
///
/// The runner marks which rule is being dispatched so each diagnostic is
/// stamped with its rule and severity without the rule passing them along.
#[derive(Debug)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    active_rule: &'static str,
    active_severity: DiagnosticSeverity,
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self {
            diagnostics: Vec::new(),
            active_rule: "",
            active_severity: DiagnosticSeverity::Error,
        }
    }
}

impl DiagnosticSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active_rule(&mut self, rule: &'static str, severity: DiagnosticSeverity) {
        self.active_rule = rule;
        self.active_severity = severity;
    }

    pub fn report(&mut self, message: impl Into<String>, nodes: &[CstNodeRef<'_>]) {
        let diagnostic = Diagnostic {
            message: message.into(),
            nodes: nodes.iter().copied().map(DiagnosticNode::from).collect(),
            rule: self.active_rule,
            severity: self.active_severity,
        };
        tracing::trace!(rule = diagnostic.rule, message = %diagnostic.message, "Reported");
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// 1-based line and column of a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte offset to line/column conversion for one source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based location. Columns count bytes.
    #[must_use]
    pub fn location(&self, offset: usize) -> SourceLocation {
        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        SourceLocation {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}
