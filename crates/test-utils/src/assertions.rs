//! Snapshot formatting for validation diagnostics
//!
//! Diagnostics are rendered one per line, numbered in report order, so inline
//! insta snapshots stay readable and show ordering changes clearly.

use std::fmt::Display;

const EMPTY: &str = "(no diagnostics)";

/// Format diagnostics through their `Display` impl.
///
/// # Example
///
/// ```ignore
/// use graphql_test_utils::format_diagnostics;
///
/// let diagnostics = validator.validate_document(&tree, &schema);
/// insta::assert_snapshot!(format_diagnostics(&diagnostics), @"[1] warning[no_deprecated]: ...");
/// ```
pub fn format_diagnostics<D: Display>(diagnostics: &[D]) -> String {
    numbered(diagnostics.iter().map(ToString::to_string))
}

/// Format diagnostic messages only, without rule or severity.
pub fn format_diagnostic_messages<T: AsRef<str>>(messages: &[T]) -> String {
    numbered(messages.iter().map(|m| m.as_ref().to_string()))
}

fn numbered(lines: impl Iterator<Item = String>) -> String {
    let formatted = lines
        .enumerate()
        .map(|(i, line)| format!("[{}] {line}", i + 1))
        .collect::<Vec<_>>();
    if formatted.is_empty() {
        return String::from(EMPTY);
    }
    formatted.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists() {
        let none: Vec<String> = vec![];
        assert_eq!(format_diagnostics(&none), EMPTY);
        assert_eq!(format_diagnostic_messages(&none), EMPTY);
    }

    #[test]
    fn test_messages_numbered_in_order() {
        let messages = ["There can be only one type named \"A\".", "second"];
        assert_eq!(
            format_diagnostic_messages(&messages),
            "[1] There can be only one type named \"A\".\n[2] second"
        );
    }

    #[test]
    fn test_display_formatting() {
        let diagnostics = [1, 22];
        assert_eq!(format_diagnostics(&diagnostics), "[1] 1\n[2] 22");
    }
}
