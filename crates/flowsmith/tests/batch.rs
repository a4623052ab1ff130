//! Batch request generation

use flowsmith::core::{ActionKind, BatchConfig};
use flowsmith::plugins::{BatchEnvelope, BatchRequestGenerator};

const DIAGRAM: &str = r#"stateDiagram-v2
    direction LR
    [*] --> none
    %% a comment line
    none --> greeted : greet / notification
    greeted --> greeted : chat (manual) / agent
    greeted --> lost : wander / teleport
    greeted -> nowhere
    greeted --> checked : check [is_ready] / condition
    checked --> done : finish / prompt
    done --> [*]"#;

#[test]
fn test_ids_count_accepted_lines_only() {
    let requests = BatchRequestGenerator::default().generate(DIAGRAM).unwrap();
    let ids: Vec<u64> = requests.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let kinds: Vec<ActionKind> = requests.iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ActionKind::Notification,
            ActionKind::Agent,
            ActionKind::Condition,
            ActionKind::Prompt
        ]
    );
    assert_eq!(requests[1].line, "greeted --> greeted : chat (manual) / agent");
}

#[test]
fn test_instruction_embeds_sample_for_kind() {
    let requests = BatchRequestGenerator::default().generate(DIAGRAM).unwrap();
    assert!(requests[0].instruction.contains("greet / notification"));
    assert!(requests[0].instruction.contains("\"type\":\"notification\""));
    assert!(requests[2].instruction.contains("\"condition\""));
}

#[test]
fn test_jsonl_envelope() {
    let config = BatchConfig {
        model: "test-model".to_string(),
        ..BatchConfig::default()
    };
    let generator = BatchRequestGenerator::new(config);
    let requests = generator.generate(DIAGRAM).unwrap();
    let jsonl = generator.to_jsonl(&requests).unwrap();

    let envelopes: Vec<BatchEnvelope> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(envelopes.len(), 4);
    assert_eq!(envelopes[3].custom_id, "4");
    assert_eq!(envelopes[0].method, "POST");
    assert_eq!(envelopes[0].url, "/v1/chat/completions");
    assert_eq!(envelopes[0].body.model, "test-model");
    assert_eq!(envelopes[0].body.response_format.kind, "json_object");
    assert_eq!(envelopes[0].body.messages[0].role, "system");
    assert_eq!(envelopes[0].body.messages[1].content, requests[0].instruction);
}

#[test]
fn test_write_jsonl_to_writer() {
    let generator = BatchRequestGenerator::default();
    let requests = generator.generate("a --> b : go / question").unwrap();
    let mut buffer = Vec::new();
    generator.write_jsonl(&mut buffer, &requests).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 1);
}

#[test]
fn test_empty_diagram_yields_nothing() {
    let generator = BatchRequestGenerator::default();
    let requests = generator.generate("stateDiagram-v2\n").unwrap();
    assert!(requests.is_empty());
    assert_eq!(generator.to_jsonl(&requests).unwrap(), "");
}
