//! Non-fatal diagnostics collected while compiling workflows
//!
//! Parsing and validation favour complete reporting over fail-fast behaviour,
//! so problems are gathered into lists of plain values instead of being raised.

use std::fmt;

use super::error::WorkflowError;

/// Why a diagram line was skipped by the parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineErrorKind {
    /// The line matches none of the recognized statement shapes
    MalformedLine { reason: String },
    /// The line has a recognized shape but its action type is not supported
    UnknownActionType { action_type: String },
    /// No syntax extractor is available in this build
    ExtractorUnavailable { extractor: &'static str },
}

impl fmt::Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineErrorKind::MalformedLine { reason } => write!(f, "malformed line: {}", reason),
            LineErrorKind::UnknownActionType { action_type } => {
                write!(f, "unknown action type '{}'", action_type)
            }
            LineErrorKind::ExtractorUnavailable { extractor } => {
                write!(f, "syntax extractor '{}' is unavailable", extractor)
            }
        }
    }
}

/// A skipped diagram line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number in the original input
    pub line: usize,
    /// The trimmed line text
    pub content: String,
    pub kind: LineErrorKind,
}

impl LineDiagnostic {
    pub fn new(line: usize, content: impl Into<String>, kind: LineErrorKind) -> Self {
        Self {
            line,
            content: content.into(),
            kind,
        }
    }

    pub fn is_unknown_action_type(&self) -> bool {
        matches!(self.kind, LineErrorKind::UnknownActionType { .. })
    }
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ('{}')", self.line, self.kind, self.content)
    }
}

impl From<&LineDiagnostic> for WorkflowError {
    fn from(diagnostic: &LineDiagnostic) -> Self {
        match &diagnostic.kind {
            LineErrorKind::UnknownActionType { action_type } => {
                WorkflowError::unknown_action_type(diagnostic.line, action_type.clone())
            }
            _ => WorkflowError::malformed_line(diagnostic.line, diagnostic.content.clone()),
        }
    }
}

/// What is wrong with a field of an action, condition or document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingField,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    UnknownField,
    InvalidValue { expected: String, found: String },
    UnknownActionType { action_type: String },
}

/// A single schema violation, addressed by a dotted path into the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub path: String,
    pub kind: ViolationKind,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::MissingField)
    }

    pub fn wrong_type(path: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::new(path, ViolationKind::WrongType { expected, found })
    }

    pub fn unknown_field(path: impl Into<String>) -> Self {
        Self::new(path, ViolationKind::UnknownField)
    }

    pub fn invalid_value(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::new(
            path,
            ViolationKind::InvalidValue {
                expected: expected.into(),
                found: found.into(),
            },
        )
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingField => write!(f, "{}: missing required field", self.path),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            ViolationKind::UnknownField => write!(f, "{}: unknown field", self.path),
            ViolationKind::InvalidValue { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            ViolationKind::UnknownActionType { action_type } => {
                write!(f, "{}: unknown action type '{}'", self.path, action_type)
            }
        }
    }
}
