//! Diagnostic model for the Lumen compiler

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    /// Error - checking must stop
    Error,
    /// Warning - checking continues
    Warning,
    /// Note - additional information
    Note,
    /// Help - suggestion for user
    Help,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
            Severity::Help => write!(f, "help"),
        }
    }
}

/// Resolved source position (file name, line, column)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePos {
    /// Source file name
    pub file: String,
    /// Line number (1-indexed; 0 for generated nodes)
    pub line: u32,
    /// Column number (1-indexed; 0 for generated nodes)
    pub column: u32,
}

impl SourcePos {
    /// Create a new source position
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A renderable diagnostic message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity level
    pub severity: Severity,
    /// Diagnostic kind (e.g. "TypeMismatch")
    pub kind: String,
    /// Primary message
    pub message: String,
    /// Source position
    pub pos: SourcePos,
    /// Expected type, rendered
    pub expected: Option<String>,
    /// Actual type, rendered
    pub actual: Option<String>,
    /// Suggestion for the user
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(kind: impl Into<String>, message: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            severity: Severity::Error,
            kind: kind.into(),
            message: message.into(),
            pos,
            expected: None,
            actual: None,
            hint: None,
        }
    }

    /// Create a warning diagnostic
    pub fn warning(kind: impl Into<String>, message: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            severity: Severity::Warning,
            kind: kind.into(),
            message: message.into(),
            pos,
            expected: None,
            actual: None,
            hint: None,
        }
    }

    /// Attach an expected/actual type pair
    pub fn with_types(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Attach a hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Render the diagnostic in its canonical textual form:
    ///
    /// ```text
    /// <Kind> at <file>:<line>:<column>
    ///   <primary message>
    ///   [Expected: <type>]
    ///   [Actual:   <type>]
    ///   [Hint: <suggestion>]
    /// ```
    pub fn render(&self) -> String {
        let mut out = format!("{} at {}\n  {}", self.kind, self.pos, self.message);
        if let Some(expected) = &self.expected {
            out.push_str(&format!("\n  Expected: {}", expected));
        }
        if let Some(actual) = &self.actual {
            out.push_str(&format!("\n  Actual:   {}", actual));
        }
        if let Some(hint) = &self.hint {
            out.push_str(&format!("\n  Hint: {}", hint));
        }
        out
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_minimal() {
        let diag = Diagnostic::error(
            "UndefinedVariable",
            "undefined variable `foo`",
            SourcePos::new("main.lm", 3, 7),
        );
        assert_eq!(
            diag.render(),
            "UndefinedVariable at main.lm:3:7\n  undefined variable `foo`"
        );
    }

    #[test]
    fn test_render_full() {
        let diag = Diagnostic::error(
            "TypeMismatch",
            "expected Int but found String",
            SourcePos::new("main.lm", 1, 1),
        )
        .with_types("Int", "String")
        .with_hint("consider adding a type annotation");

        let rendered = diag.render();
        assert!(rendered.starts_with("TypeMismatch at main.lm:1:1"));
        assert!(rendered.contains("\n  Expected: Int"));
        assert!(rendered.contains("\n  Actual:   String"));
        assert!(rendered.contains("\n  Hint: consider adding a type annotation"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error < Severity::Warning);
    }

    #[test]
    fn test_json_roundtrip() {
        let diag = Diagnostic::warning(
            "UnreachablePattern",
            "this pattern can never match",
            SourcePos::new("main.lm", 9, 5),
        );
        let json = diag.to_json().unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(diag, back);
    }
}
