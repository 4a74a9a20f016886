//! File loading and validation runs for the CLI
//!
//! Expands user globs, builds the type system snapshot from schema files and
//! runs the validator over each input file, keeping the source text so
//! diagnostics can be mapped back to line/column positions.

use anyhow::{Context, Result};
use graphql_hir::TypeSystem;
use graphql_validation::{Diagnostic, ValidationConfig, Validator};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file read from disk
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// A syntax error reported by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub message: String,
    pub offset: usize,
}

/// Outcome of checking one file
#[derive(Debug)]
pub struct FileResult {
    pub file: SourceFile,
    /// Rules are not run on files with syntax errors
    pub syntax_errors: Vec<SyntaxIssue>,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.syntax_errors.is_empty() || self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

/// Load the validation config, falling back to the recommended preset
pub fn load_config(path: Option<&Path>) -> Result<ValidationConfig> {
    let Some(path) = path else {
        tracing::debug!("No config file given, using recommended rules");
        return Ok(ValidationConfig::default());
    };
    ValidationConfig::from_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Build a type system snapshot from SDL files
#[tracing::instrument(skip_all, fields(files = paths.len()))]
pub fn build_schema(paths: &[PathBuf]) -> Result<Arc<TypeSystem>> {
    let mut builder = TypeSystem::builder();
    for path in paths {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        builder.add_sdl(&source, &path.display().to_string())?;
    }
    let schema = builder.build();
    tracing::debug!(types = schema.types().len(), "Built type system");
    Ok(Arc::new(schema))
}

/// Expand glob patterns into a sorted, de-duplicated list of files
///
/// Plain paths are accepted as-is. Files under `node_modules` are skipped.
pub fn collect_files(patterns: &[String]) -> Result<Vec<SourceFile>> {
    let mut paths = BTreeSet::new();

    for pattern in patterns {
        for expanded in expand_braces(pattern) {
            for entry in glob::glob(&expanded)
                .with_context(|| format!("Invalid glob pattern: {expanded}"))?
            {
                let path = entry.with_context(|| format!("Failed to expand {expanded}"))?;
                if !path.is_file() || path.components().any(|c| c.as_os_str() == "node_modules") {
                    continue;
                }
                paths.insert(path);
            }
        }
    }

    paths
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            Ok(SourceFile { path, text })
        })
        .collect()
}

/// Expand brace patterns like "src/**/*.{graphql,gql}" into separate patterns
fn expand_braces(pattern: &str) -> Vec<String> {
    // Simple brace expansion - handles single brace group
    if let (Some(start), Some(end)) = (pattern.find('{'), pattern.find('}')) {
        if start < end {
            let before = &pattern[..start];
            let after = &pattern[end + 1..];
            return pattern[start + 1..end]
                .split(',')
                .map(|opt| format!("{before}{}{after}", opt.trim()))
                .collect();
        }
    }

    vec![pattern.to_string()]
}

fn syntax_issues(tree: &apollo_parser::SyntaxTree) -> Vec<SyntaxIssue> {
    tree.errors()
        .map(|error| SyntaxIssue {
            message: error.message().to_string(),
            offset: error.index(),
        })
        .collect()
}

/// Run the document rules over one executable document
#[tracing::instrument(skip_all, fields(path = %file.path.display()))]
pub fn validate_document_file(
    validator: &Validator,
    file: SourceFile,
    schema: &Arc<TypeSystem>,
) -> FileResult {
    let tree = apollo_parser::Parser::new(&file.text).parse();
    let syntax_errors = syntax_issues(&tree);
    let diagnostics = if syntax_errors.is_empty() {
        validator.validate_document(&tree, schema.clone())
    } else {
        tracing::debug!(errors = syntax_errors.len(), "Skipping rules for file with syntax errors");
        Vec::new()
    };
    FileResult {
        file,
        syntax_errors,
        diagnostics,
    }
}

/// Run the SDL rules over one schema file, against `base` when given
#[tracing::instrument(skip_all, fields(path = %file.path.display()))]
pub fn check_schema_file(
    validator: &Validator,
    file: SourceFile,
    base: Option<&Arc<TypeSystem>>,
) -> FileResult {
    let tree = apollo_parser::Parser::new(&file.text).parse();
    let syntax_errors = syntax_issues(&tree);
    let diagnostics = if syntax_errors.is_empty() {
        validator.validate_sdl(&tree, base.cloned())
    } else {
        tracing::debug!(errors = syntax_errors.len(), "Skipping rules for file with syntax errors");
        Vec::new()
    };
    FileResult {
        file,
        syntax_errors,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{contents}").unwrap();
        path
    }

    #[test]
    fn test_expand_braces_single_brace_group() {
        let result = expand_braces("src/**/*.{graphql,gql}");
        assert_eq!(result, vec!["src/**/*.graphql", "src/**/*.gql"]);
    }

    #[test]
    fn test_expand_braces_with_spaces() {
        let result = expand_braces("src/**/*.{graphql, gql}");
        assert_eq!(result, vec!["src/**/*.graphql", "src/**/*.gql"]);
    }

    #[test]
    fn test_expand_braces_no_braces() {
        assert_eq!(expand_braces("src/**/*.graphql"), vec!["src/**/*.graphql"]);
    }

    #[test]
    fn test_collect_files_sorted_and_deduplicated() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write(dir, "b.graphql", "{ b }");
        write(dir, "a.graphql", "{ a }");
        write(dir, "c.txt", "ignored");

        let pattern = dir.join("*.graphql").display().to_string();
        let explicit = dir.join("a.graphql").display().to_string();
        let files = collect_files(&[pattern, explicit]).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.graphql", "b.graphql"]);
        assert_eq!(files[0].text.trim(), "{ a }");
    }

    #[test]
    fn test_collect_files_no_matches() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = temp_dir.path().join("*.graphql").display().to_string();
        assert!(collect_files(&[pattern]).unwrap().is_empty());
    }

    #[test]
    fn test_build_schema_from_multiple_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let a = write(dir, "a.graphql", "type Query { user: User }");
        let b = write(dir, "b.graphql", "type User { id: ID! }");

        let schema = build_schema(&[a, b]).unwrap();
        assert!(schema.type_def("User").is_some());
        assert!(schema.field_def("Query", "user").is_some());
    }

    #[test]
    fn test_build_schema_syntax_error() {
        let temp_dir = TempDir::new().unwrap();
        let bad = write(temp_dir.path(), "bad.graphql", "type Query {");
        let error = build_schema(&[bad]).unwrap_err();
        assert!(error.downcast_ref::<graphql_hir::SchemaError>().is_some());
    }

    #[test]
    fn test_document_with_syntax_error_skips_rules() {
        let schema = Arc::new(
            TypeSystem::parse("type Query { old: Int @deprecated }", "schema.graphql").unwrap(),
        );
        let file = SourceFile {
            path: PathBuf::from("q.graphql"),
            text: "{ old ".to_string(),
        };
        let result = validate_document_file(&Validator::default(), file, &schema);
        assert!(!result.syntax_errors.is_empty());
        assert!(result.diagnostics.is_empty());
        assert!(result.has_errors());
    }

    #[test]
    fn test_warnings_are_not_errors() {
        let schema = Arc::new(
            TypeSystem::parse("type Query { old: Int @deprecated }", "schema.graphql").unwrap(),
        );
        let file = SourceFile {
            path: PathBuf::from("q.graphql"),
            text: "{ old }".to_string(),
        };
        let result = validate_document_file(&Validator::default(), file, &schema);
        assert_eq!(result.diagnostics.len(), 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_check_schema_against_base() {
        let base = Arc::new(TypeSystem::parse("type User { id: ID! }", "base.graphql").unwrap());
        let file = SourceFile {
            path: PathBuf::from("ext.graphql"),
            text: "type User { name: String } type Post { id: ID! }".to_string(),
        };
        let result = check_schema_file(&Validator::default(), file, Some(&base));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].rule, "unique_type_names");
        assert!(result.has_errors());
    }
}
