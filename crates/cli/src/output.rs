//! Rendering of file results as human-readable lines or JSON

use crate::analysis::FileResult;
use colored::Colorize;
use graphql_validation::{DiagnosticSeverity, LineIndex, SourceLocation};
use serde::Serialize;

/// Rule name attached to parser errors
const SYNTAX_RULE: &str = "syntax";

/// One diagnostic, resolved to file positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDiagnostic {
    pub file: String,
    pub rule: String,
    pub severity: String,
    pub message: String,
    pub locations: Vec<OutputLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputLocation {
    pub line: usize,
    pub column: usize,
}

impl From<SourceLocation> for OutputLocation {
    fn from(location: SourceLocation) -> Self {
        Self {
            line: location.line,
            column: location.column,
        }
    }
}

/// Counts used for the closing summary line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub files: usize,
}

/// Flatten results into output diagnostics, syntax errors first per file
#[must_use]
pub fn collect(results: &[FileResult]) -> Vec<OutputDiagnostic> {
    let mut output = Vec::new();

    for result in results {
        let index = LineIndex::new(&result.file.text);
        let file = result.file.path.display().to_string();

        for issue in &result.syntax_errors {
            output.push(OutputDiagnostic {
                file: file.clone(),
                rule: SYNTAX_RULE.to_string(),
                severity: DiagnosticSeverity::Error.to_string(),
                message: issue.message.clone(),
                locations: vec![index.location(issue.offset).into()],
            });
        }

        for diagnostic in &result.diagnostics {
            output.push(OutputDiagnostic {
                file: file.clone(),
                rule: diagnostic.rule.to_string(),
                severity: diagnostic.severity.to_string(),
                message: diagnostic.message.clone(),
                locations: diagnostic
                    .nodes
                    .iter()
                    .map(|node| index.location(node.range.start).into())
                    .collect(),
            });
        }
    }

    output
}

#[must_use]
pub fn summarize(results: &[FileResult]) -> Summary {
    let mut summary = Summary {
        files: results.len(),
        ..Summary::default()
    };
    for result in results {
        summary.errors += result.syntax_errors.len();
        for diagnostic in &result.diagnostics {
            if diagnostic.severity.is_error() {
                summary.errors += 1;
            } else {
                summary.warnings += 1;
            }
        }
    }
    summary
}

/// `path:line:column: severity[rule]: message`, located at the node that
/// triggered the report
#[must_use]
pub fn format_human(diagnostic: &OutputDiagnostic) -> String {
    let location = diagnostic
        .locations
        .last()
        .map_or_else(String::new, |loc| format!(":{}:{}", loc.line, loc.column));
    format!(
        "{}{location}: {}[{}]: {}",
        diagnostic.file, diagnostic.severity, diagnostic.rule, diagnostic.message
    )
}

pub fn print_human(diagnostics: &[OutputDiagnostic], summary: Summary, show_info: bool) {
    for diagnostic in diagnostics {
        let line = format_human(diagnostic);
        if diagnostic.severity == DiagnosticSeverity::Error.to_string() {
            println!("{}", line.red());
        } else {
            println!("{}", line.yellow());
        }
    }

    if !show_info {
        return;
    }

    if summary.errors == 0 && summary.warnings == 0 {
        println!(
            "{} {}",
            "✓".green().bold(),
            format!("No issues found in {} file(s)", summary.files).green()
        );
    } else {
        let mark = if summary.errors > 0 {
            "✗".red().bold()
        } else {
            "!".yellow().bold()
        };
        println!(
            "\n{mark} {} error(s), {} warning(s) in {} file(s)",
            summary.errors, summary.warnings, summary.files
        );
    }
}

pub fn print_json(diagnostics: &[OutputDiagnostic]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(diagnostics)?);
    Ok(())
}
