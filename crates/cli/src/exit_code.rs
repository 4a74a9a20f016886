//! Exit codes for the GraphQL CLI.
//!
//! Scripts and CI systems can tell failure modes apart by the process status.

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// No error-severity diagnostics
    Success = 0,
    /// At least one rule reported an error
    ValidationError = 1,
    /// Invalid config file, or no input files matched
    ConfigError = 2,
    /// A schema file could not be parsed
    SchemaError = 3,
    /// A file could not be read
    IoError = 4,
    /// A checked file has syntax errors
    ParseError = 5,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ValidationError => write!(f, "validation error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
            Self::IoError => write!(f, "I/O error"),
            Self::ParseError => write!(f, "parse error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ExitCode::Success,
            ExitCode::ValidationError,
            ExitCode::ConfigError,
            ExitCode::SchemaError,
            ExitCode::IoError,
            ExitCode::ParseError,
        ];
        let values: Vec<_> = codes.iter().map(|c| c.code()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(ExitCode::ParseError.to_string(), "parse error");
    }
}
