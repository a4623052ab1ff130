//! Tests for error kinds and how they surface

use flowsmith::core::{Parser, SchemaViolation, WorkflowError};
use flowsmith::plugins::{ComponentExtractor, DiagramParser, ImplementationScanner};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_no_documents_found_message() {
    let error = WorkflowError::no_documents_found("/work/flows");
    assert_eq!(
        error.to_string(),
        "No JSON workflow files found in directory: /work/flows"
    );
}

#[test]
fn test_schema_violation_message() {
    let error = WorkflowError::schema_violation(vec![SchemaViolation::missing("states")]);
    assert!(error.to_string().contains("1 violation(s)"));
}

#[test]
fn test_io_error_propagates_from_extraction() {
    let error = ComponentExtractor::default()
        .extract_file(PathBuf::from("/no/such/workflow.json"))
        .unwrap_err();
    assert!(matches!(error, WorkflowError::IoError { .. }));
    assert!(error.to_string().starts_with("IO error"));
}

#[test]
fn test_json_error_from_conversion() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: WorkflowError = source.into();
    assert!(error.to_string().starts_with("JSON error"));
}

#[test]
fn test_scanner_rejects_a_file_path() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("Processor.java");
    fs::write(&file, "").unwrap();
    assert!(matches!(
        ImplementationScanner::default().scan(&file),
        Err(WorkflowError::NotADirectory { .. })
    ));
}

#[test]
fn test_strict_parse_surfaces_first_skipped_line() {
    let outcome = DiagramParser::new()
        .parse("[*] --> a\na --> b : go / teleport\na -> c")
        .unwrap();
    assert_eq!(outcome.diagnostics.len(), 2);
    match outcome.into_strict() {
        Err(WorkflowError::UnknownActionType { line, action_type }) => {
            assert_eq!(line, 2);
            assert_eq!(action_type, "teleport");
        }
        other => panic!("expected unknown action type, got {:?}", other),
    }

    let clean = DiagramParser::new().parse("a --> b : go / agent").unwrap();
    assert_eq!(clean.into_strict().unwrap().transition_count(), 1);
}

#[test]
fn test_invalid_document_json() {
    let error = flowsmith::FsmDocument::from_json_str("[1, 2]").unwrap_err();
    assert!(matches!(error, WorkflowError::JsonError { .. }));
}
