use crate::analysis::{build_schema, check_schema_file, collect_files, load_config, FileResult};
use crate::commands::validate::report;
use crate::{ExitCode, OutputFormat, OutputOptions};
use anyhow::Result;
use colored::Colorize;
use graphql_validation::Validator;
use std::path::PathBuf;

/// Check SDL files for duplicate definitions, optionally against a base schema
#[tracing::instrument(skip_all, fields(base = base_files.len(), patterns = sdl_patterns.len()))]
pub fn run(
    config_path: Option<PathBuf>,
    base_files: &[PathBuf],
    sdl_patterns: &[String],
    format: OutputFormat,
    output_opts: OutputOptions,
) -> Result<ExitCode> {
    let config = load_config(config_path.as_deref())?;
    let base = if base_files.is_empty() {
        None
    } else {
        Some(build_schema(base_files)?)
    };

    let files = collect_files(sdl_patterns)?;
    if files.is_empty() {
        if matches!(format, OutputFormat::Human) {
            eprintln!(
                "{} {}",
                "✗".red().bold(),
                "No schema files found matching the given patterns.".red()
            );
        } else {
            eprintln!(
                "{}",
                serde_json::json!({ "error": "No schema files found matching the given patterns" })
            );
        }
        return Ok(ExitCode::ConfigError);
    }

    let validator = Validator::new(config);
    let results: Vec<FileResult> = files
        .into_iter()
        .map(|file| check_schema_file(&validator, file, base.as_ref()))
        .collect();

    tracing::info!(files = results.len(), "Schema check completed");
    report(&results, format, output_opts)
}
