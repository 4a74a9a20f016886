mod analysis;
mod commands;
mod exit_code;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

pub use exit_code::ExitCode;

#[derive(Parser)]
#[command(name = "graphql")]
#[command(about = "GraphQL CLI for schema and document validation", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a validation config file (.yml, .yaml or .json)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except diagnostics and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate executable documents against a schema
    ///
    /// Runs the document rules (such as `no_deprecated`) over every file
    /// matched by the given globs.
    Validate {
        /// Schema files to build the type system from
        #[arg(short, long = "schema", value_name = "FILE", required = true)]
        schema: Vec<PathBuf>,

        /// Document files or glob patterns
        #[arg(value_name = "DOCUMENT_GLOB", required = true)]
        documents: Vec<String>,
    },

    /// Check schema files for duplicate type and directive definitions
    CheckSchema {
        /// Existing schema files that the checked files must not redefine
        #[arg(short, long = "base", value_name = "FILE")]
        base: Vec<PathBuf>,

        /// Schema files or glob patterns to check
        #[arg(value_name = "SDL_FILE", required = true)]
        files: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

fn main() {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_info: !cli.quiet,
    };

    let result = match cli.command {
        Commands::Validate { schema, documents } => {
            commands::validate::run(cli.config, &schema, &documents, cli.format, output_opts)
        }
        Commands::CheckSchema { base, files } => {
            commands::check_schema::run(cli.config, &base, &files, cli.format, output_opts)
        }
    };

    let code = match result {
        Ok(code) => code,
        Err(error) => {
            let code = exit_code_for_error(&error);
            match cli.format {
                OutputFormat::Human => eprintln!("{} {error:#}", "✗".red().bold()),
                OutputFormat::Json => eprintln!(
                    "{}",
                    serde_json::json!({ "error": format!("{error:#}"), "kind": code.to_string() })
                ),
            }
            code
        }
    };

    tracing::debug!(%code, "Exiting");
    code.exit();
}

/// Map a failure onto the exit code of its root cause
fn exit_code_for_error(error: &anyhow::Error) -> ExitCode {
    for cause in error.chain() {
        if cause.is::<graphql_validation::ConfigError>() || cause.is::<glob::PatternError>() {
            return ExitCode::ConfigError;
        }
        if cause.is::<graphql_hir::SchemaError>() {
            return ExitCode::SchemaError;
        }
    }
    ExitCode::IoError
}

/// Initialize tracing, controlled by `RUST_LOG` and off by default
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "graphql",
            "validate",
            "--schema",
            "schema.graphql",
            "--format",
            "json",
            "src/**/*.graphql",
        ])
        .unwrap();
        assert!(matches!(cli.format, OutputFormat::Json));
        let Commands::Validate { schema, documents } = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(schema, vec![PathBuf::from("schema.graphql")]);
        assert_eq!(documents, vec!["src/**/*.graphql"]);
    }

    #[test]
    fn test_validate_requires_schema() {
        assert!(Cli::try_parse_from(["graphql", "validate", "q.graphql"]).is_err());
    }

    #[test]
    fn test_parse_check_schema() {
        let cli = Cli::try_parse_from([
            "graphql",
            "check-schema",
            "--base",
            "base.graphql",
            "--quiet",
            "ext.graphql",
        ])
        .unwrap();
        assert!(cli.quiet);
        let Commands::CheckSchema { base, files } = cli.command else {
            panic!("expected check-schema");
        };
        assert_eq!(base, vec![PathBuf::from("base.graphql")]);
        assert_eq!(files, vec!["ext.graphql"]);
    }

    #[test]
    fn test_exit_code_for_error() {
        let schema_error = anyhow::Error::from(graphql_hir::SchemaError::Syntax {
            path: "s.graphql".to_string(),
            message: "oops".to_string(),
        })
        .context("Failed to build schema");
        assert_eq!(exit_code_for_error(&schema_error), ExitCode::SchemaError);

        let io_error = anyhow::Error::from(std::io::Error::other("missing"));
        assert_eq!(exit_code_for_error(&io_error), ExitCode::IoError);
    }
}
