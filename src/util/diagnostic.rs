//! User-friendly diagnostic messages.
//!
//! Every error names the offending declaration and, where possible, the
//! configuration change that fixes it.

use std::fmt;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when a C type has no target-language equivalent.
    pub const ADD_TYPE: &str =
        "Or leave the function out with `exclude = [\"<function>\"]` under [parser]";

    /// Suggestion when two opaque types claim the same prefix.
    pub const EXPLICIT_PREFIX: &str =
        "Give one of the types a table entry: { name = \"...\", prefix = \"...\" }";

    /// Suggestion when the header contains something the reader cannot use.
    pub const MALFORMED: &str =
        "Leave the function out with `exclude = [\"<function>\"]` under [parser], or fix the header";

    /// Suggestion when an output file cannot be written.
    pub const WRITABLE_OUTPUT: &str =
        "Check that the output directory is writable, or pick another with --output";

    /// Suggestion for dropped functions.
    pub const DROPPED: &str =
        "Add the function to api.free-functions, or its type to api.opaque-types";
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message)
    }

    /// Create a new note.
    pub fn note(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Note, message)
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            match self.severity {
                Severity::Error => "\x1b[1;31merror\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Error => "error",
                Severity::Note => "note",
            }
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  --> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format() {
        let diag = Diagnostic::error("no rust type for C type `FILE*`")
            .with_context("in function `chfl_open` at chemfiles.h:3")
            .with_suggestion("Add an entry under [types.rust]");

        let output = diag.format(false);
        assert!(output.starts_with("error: no rust type"));
        assert!(output.contains("  --> in function `chfl_open` at chemfiles.h:3\n"));
        assert!(output.contains("  1. Add an entry under [types.rust]"));
    }

    #[test]
    fn test_note_without_suggestions() {
        let output = Diagnostic::note("dropped `chfl_x`").format(false);
        assert_eq!(output, "note: dropped `chfl_x`\n");
    }
}
