//! Integration tests for the public API

use flowsmith::prelude::*;
use flowsmith::{cross_reference, extract, generate_batch, parse, serialize, validate};
use std::fs;
use tempfile::tempdir;

const CHAT_FLOW: &str = r#"
stateDiagram-v2
    direction TB
    [*] --> none
    none --> chat_initialized : initialize_chat / function
    chat_initialized --> chat_initialized : answer (manual) / agent
    chat_initialized --> closed : close [is_done] / notification
    closed --> [*]
"#;

#[test]
fn test_parse_chat_flow() {
    let doc = parse(CHAT_FLOW).unwrap();
    assert_eq!(doc.initial_state(), Some("none"));
    assert_eq!(doc.state_count(), 2);
    assert_eq!(doc.transition_count(), 3);

    let answer = doc.transition("chat_initialized", "answer").unwrap();
    assert!(answer.manual);
    assert_eq!(answer.action_kind(), Some(ActionKind::Agent));

    let close = doc.transition("chat_initialized", "close").unwrap();
    assert_eq!(close.next, "closed");
    assert_eq!(close.condition.as_ref().unwrap().function_name(), "is_done");
}

#[test]
fn test_parse_keeps_state_order() {
    let doc = parse(CHAT_FLOW).unwrap();
    let names: Vec<&str> = doc.states.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["none", "chat_initialized"]);
}

#[test]
fn test_parsed_document_is_schema_valid() {
    let doc = parse(CHAT_FLOW).unwrap();
    let report = validate(&doc.to_json_pretty().unwrap()).unwrap();
    assert!(report.is_valid(), "{:?}", report.violations);
}

#[test]
fn test_serialize_then_parse() {
    let doc = parse(CHAT_FLOW).unwrap();
    let text = serialize(&doc).unwrap();
    assert!(text.starts_with("stateDiagram-v2"));
    assert!(text.contains("chat_initialized --> chat_initialized : answer (manual) /agent"));
    assert!(text.contains("chat_initialized --> closed : close /condition [is_done] /notification"));

    let back = parse(&text).unwrap();
    assert_eq!(back.state_count(), doc.state_count());
    assert_eq!(back.transition_count(), doc.transition_count());
}

#[test]
fn test_orchestrator_detects_both_formats() {
    let orchestrator = Orchestrator::default();
    assert_eq!(
        orchestrator.detect_input_kind(CHAT_FLOW).unwrap(),
        InputKind::Diagram
    );

    let json = parse(CHAT_FLOW).unwrap().to_json_pretty().unwrap();
    assert_eq!(
        orchestrator.detect_input_kind(&json).unwrap(),
        InputKind::Document
    );
}

#[test]
fn test_extract_and_cross_reference_from_disk() {
    let dir = tempdir().unwrap();
    let workflows = dir.path().join("workflows");
    let processors = dir.path().join("processors");
    let criteria = dir.path().join("criteria");
    fs::create_dir_all(&workflows).unwrap();
    fs::create_dir_all(&processors).unwrap();
    fs::create_dir_all(&criteria).unwrap();

    fs::write(
        workflows.join("order.json"),
        r#"{
            "processors": [{"name": "order_created_processor"}],
            "criterion": {"type": "function", "function": {"name": "isPaid"}}
        }"#,
    )
    .unwrap();
    fs::write(processors.join("OrderCreatedProcessor.java"), "class A {}").unwrap();
    fs::write(criteria.join("isPaid.java"), "class B {}").unwrap();

    let result = extract(&workflows).unwrap();
    assert!(result.processors.contains("OrderCreatedProcessor"));
    assert!(result.criteria.contains("isPaid"));

    let report = cross_reference(&workflows, &processors, &criteria).unwrap();
    assert!(report.passed);
    assert_eq!(report.total_required(), 2);
}

#[test]
fn test_generate_batch_counts_transitions_only() {
    let jsonl = generate_batch(CHAT_FLOW).unwrap();
    let ids: Vec<String> = jsonl
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["custom_id"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn test_prelude_components_compose() {
    let outcome = DiagramParser::new().parse(CHAT_FLOW).unwrap();
    assert!(outcome.is_clean());

    let report = SchemaValidator::new().validate_fsm(&outcome.document).unwrap();
    assert!(report.is_valid());

    let issues = DiagramChecker::new().check(CHAT_FLOW);
    assert!(issues.is_empty(), "{:?}", issues);
}
