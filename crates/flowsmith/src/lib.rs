//! Flowsmith - Compile workflow state diagrams into FSM documents
//!
//! A library for turning Mermaid-style state diagrams into workflow
//! finite-state-machine documents, validating those documents against the six
//! action shapes, writing them back out as diagrams, and checking that every
//! processor and criterion they reference has an implementation file.
//!
//! # Quick Start
//!
//! ```rust
//! use flowsmith::parse;
//!
//! let input = "stateDiagram-v2\n    [*] --> none\n    none --> greeted : greet / notification";
//! let document = parse(input).unwrap();
//! assert_eq!(document.initial_state(), Some("none"));
//! println!("{}", document.to_json_pretty().unwrap());
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use flowsmith::prelude::*;
//!
//! let input = "stateDiagram-v2\n    [*] --> a\n    a --> b : go [is_ready] / function\n    a --> a : chat (manual) / agent";
//!
//! // Parse, keeping diagnostics for skipped lines
//! let outcome = DiagramParser::new().parse(input).unwrap();
//! assert!(outcome.is_clean());
//! let document = outcome.document;
//!
//! // Validate against the action schemas
//! let report = SchemaValidator::new().validate_fsm(&document).unwrap();
//! assert!(report.is_valid());
//!
//! // Serialize back to diagram text
//! let text = DiagramSerializer::new().serialize(&document).unwrap();
//! assert!(text.contains("a --> b : go /condition [is_ready] /function"));
//! ```

pub mod core;
pub mod plugins;

pub use core::*;

use std::path::Path;

use crate::plugins::{CrossReferenceReport, ExtractionResult, Orchestrator, ValidationReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Action, ActionConfig, ActionKind, CompilerConfig, Condition, Detector, Direction,
        FsmDocument, InputKind, ParseOutcome, Parser, Serializer, State, Transition,
        WorkflowError,
    };
    pub use crate::plugins::{
        ComponentExtractor, CrossReferenceReport, CrossReferencer, DiagramChecker,
        DiagramDetector, DiagramParser, DiagramSerializer, DocumentDetector, ExtractionResult,
        Orchestrator, SchemaValidator, ValidationReport,
    };
}

/// Parse diagram text into an FSM document
///
/// Lines that cannot be used are skipped; use
/// [`DiagramParser`](plugins::DiagramParser) directly to see them.
///
/// # Example
/// ```rust
/// use flowsmith::parse;
///
/// let doc = parse("X --> X : feedback (manual) / agent").unwrap();
/// let t = doc.transition("X", "feedback").unwrap();
/// assert!(t.manual);
/// assert_eq!(t.next, "X");
/// ```
pub fn parse(input: &str) -> anyhow::Result<FsmDocument> {
    Ok(Orchestrator::default().parse(input)?.into_document())
}

/// Serialize a document to diagram text
pub fn serialize(document: &FsmDocument) -> anyhow::Result<String> {
    Orchestrator::default().serialize(document)
}

/// Validate a JSON document given as text
///
/// # Example
/// ```rust
/// use flowsmith::validate;
///
/// let report = validate(r#"{"states": {"a": {"transitions": {"go": {"next": 1}}}}}"#).unwrap();
/// assert!(!report.is_valid());
/// assert_eq!(report.violations[0].path, "states.a.transitions.go.next");
/// ```
pub fn validate(input: &str) -> anyhow::Result<ValidationReport> {
    Orchestrator::default().validate_json(input)
}

/// Extract processor and criterion names from a workflow file or directory
pub fn extract(path: impl AsRef<Path>) -> anyhow::Result<ExtractionResult> {
    Orchestrator::default().extract(path)
}

/// Cross-reference workflows against implementation directories with default settings
pub fn cross_reference(
    workflows: impl AsRef<Path>,
    processors_dir: impl AsRef<Path>,
    criteria_dir: impl AsRef<Path>,
) -> anyhow::Result<CrossReferenceReport> {
    Orchestrator::default().cross_reference(workflows, processors_dir, criteria_dir)
}

/// Batch requests for every accepted transition line, as JSON lines
pub fn generate_batch(input: &str) -> anyhow::Result<String> {
    Orchestrator::default().generate_batch(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIAGRAM: &str = "stateDiagram-v2\n    [*] --> none\n    none --> done : finish / prompt\n    done --> [*]";

    #[test]
    fn test_parse_and_serialize() {
        let doc = parse(DIAGRAM).unwrap();
        assert_eq!(doc.state_count(), 1);
        let text = serialize(&doc).unwrap();
        assert!(text.contains("none --> done : finish /prompt"));
        assert!(text.ends_with("end --> [*]"));
    }

    #[test]
    fn test_validate_parsed_output() {
        let json = parse(DIAGRAM).unwrap().to_json_pretty().unwrap();
        assert!(validate(&json).unwrap().is_valid());
    }

    #[test]
    fn test_generate_batch() {
        let jsonl = generate_batch(DIAGRAM).unwrap();
        assert_eq!(jsonl.lines().count(), 1);
    }

    #[test]
    fn test_extract_missing_path() {
        assert!(extract("/definitely/not/a/real/path").is_err());
    }
}
