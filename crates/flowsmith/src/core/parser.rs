//! Core parser trait for diagram text
//!
//! A parser turns diagram text into an [`FsmDocument`]. Lines it cannot use
//! are reported as [`LineDiagnostic`]s next to the document rather than
//! failing the whole parse.

use anyhow::Result;

use super::{FsmDocument, LineDiagnostic, WorkflowError};

/// Result of a best-effort parse
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseOutcome {
    pub document: FsmDocument,
    /// Skipped lines, in input order
    pub diagnostics: Vec<LineDiagnostic>,
}

impl ParseOutcome {
    pub fn new(document: FsmDocument, diagnostics: Vec<LineDiagnostic>) -> Self {
        Self {
            document,
            diagnostics,
        }
    }

    /// Returns true if every statement line was used
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_document(self) -> FsmDocument {
        self.document
    }

    /// The document, or the first skipped line as an error
    pub fn into_strict(self) -> Result<FsmDocument, WorkflowError> {
        match self.diagnostics.first() {
            Some(diagnostic) => Err(WorkflowError::from(diagnostic)),
            None => Ok(self.document),
        }
    }
}

/// Core trait for diagram parsers
///
/// # Example
/// ```
/// use flowsmith::core::Parser;
/// use flowsmith::plugins::diagram::DiagramParser;
///
/// let parser = DiagramParser::new();
/// let outcome = parser.parse("[*] --> idle\nidle --> done : finish / notification").unwrap();
/// assert_eq!(outcome.document.initial_state(), Some("idle"));
/// ```
pub trait Parser: Send + Sync {
    /// Parse diagram text into a document plus diagnostics for skipped lines
    fn parse(&self, input: &str) -> Result<ParseOutcome>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input can be parsed by this parser
    fn can_parse(&self, input: &str) -> bool;
}
