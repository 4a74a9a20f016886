use crate::analysis::{build_schema, collect_files, load_config, validate_document_file, FileResult};
use crate::{output, ExitCode, OutputFormat, OutputOptions};
use anyhow::Result;
use colored::Colorize;
use graphql_validation::Validator;
use std::path::PathBuf;

/// Validate executable documents against the schema built from `schema_files`
#[tracing::instrument(skip_all, fields(schemas = schema_files.len(), patterns = document_patterns.len()))]
pub fn run(
    config_path: Option<PathBuf>,
    schema_files: &[PathBuf],
    document_patterns: &[String],
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let config = load_config(config_path.as_deref())?;
    let schema = build_schema(schema_files)?;

    if matches!(format, OutputFormat::Human) && output_opts.show_info {
        println!("{}", "✓ Schema loaded successfully".green());
    }

    let files = collect_files(document_patterns)?;
    if files.is_empty() {
        if matches!(format, OutputFormat::Human) {
            eprintln!(
                "{} {}",
                "✗".red().bold(),
                "No document files found matching the given patterns.".red()
            );
        } else {
            eprintln!(
                "{}",
                serde_json::json!({ "error": "No document files found matching the given patterns" })
            );
        }
        return Ok(ExitCode::ConfigError);
    }

    let validator = Validator::new(config);
    let results: Vec<FileResult> = files
        .into_iter()
        .map(|file| validate_document_file(&validator, file, &schema))
        .collect();

    tracing::info!(files = results.len(), "Validation completed");
    report(&results, format, output_opts)
}

/// Print results and pick the exit code
pub(crate) fn report(
    results: &[FileResult],
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let diagnostics = output::collect(results);
    let summary = output::summarize(results);

    match format {
        OutputFormat::Human => output::print_human(&diagnostics, summary, output_opts.show_info),
        OutputFormat::Json => output::print_json(&diagnostics)?,
    }

    Ok(exit_code_for(results))
}

/// Syntax errors take precedence over rule errors
pub(crate) fn exit_code_for(results: &[FileResult]) -> ExitCode {
    if results.iter().any(|r| !r.syntax_errors.is_empty()) {
        ExitCode::ParseError
    } else if results.iter().any(FileResult::has_errors) {
        ExitCode::ValidationError
    } else {
        ExitCode::Success
    }
}
