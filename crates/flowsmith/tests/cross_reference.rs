//! Cross-referencing workflows against implementation directories

use flowsmith::core::{CompilerConfig, ScanConfig, WorkflowError};
use flowsmith::plugins::{
    validate_workflow_implementation, validate_workflow_processors, CrossReferenceReport,
    CrossReferencer, ExtractionResult, ImplementationScanner,
};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn required(processors: &[&str], criteria: &[&str]) -> ExtractionResult {
    ExtractionResult {
        processors: set(processors),
        criteria: set(criteria),
        documents: 1,
        skipped: Vec::new(),
    }
}

struct Layout {
    _root: TempDir,
    workflows: PathBuf,
    processors: PathBuf,
    criteria: PathBuf,
}

impl Layout {
    fn new() -> Self {
        let root = tempdir().unwrap();
        let workflows = root.path().join("workflows");
        let processors = root.path().join("processor");
        let criteria = root.path().join("criterion");
        for dir in [&workflows, &processors, &criteria] {
            fs::create_dir_all(dir).unwrap();
        }
        Self {
            _root: root,
            workflows,
            processors,
            criteria,
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "").unwrap();
    }
}

/// Structured-shape workflow with one function action and one guard
const ORDER_WORKFLOW: &str = r#"{
    "initial_state": "new",
    "states": {
        "new": {
            "transitions": {
                "pay": {
                    "next": "paid",
                    "action": {
                        "name": "process_event",
                        "config": {
                            "type": "function",
                            "function": {
                                "name": "charge_card",
                                "description": "Charge",
                                "strict": true,
                                "parameters": {}
                            }
                        }
                    },
                    "condition": {
                        "config": {
                            "type": "function",
                            "function": {"name": "hasBalance", "description": "", "params": {}}
                        }
                    }
                }
            }
        }
    }
}"#;

#[test]
fn test_pass_scenario() {
    let report = CrossReferenceReport::compute(
        &required(&["UserRegistrationProcessor"], &["validateUserData"]),
        set(&["UserRegistrationProcessor"]),
        set(&["validateUserData"]),
    );
    assert!(report.passed);
    assert!(report.missing_processors.is_empty());
    assert!(report.missing_criteria.is_empty());
    assert!(report.render_detailed().contains("STATUS: VALIDATION PASSED"));
}

#[test]
fn test_fail_scenario() {
    let report = CrossReferenceReport::compute(
        &required(
            &["UserRegistrationProcessor", "EmailNotificationProcessor"],
            &[],
        ),
        set(&["UserRegistrationProcessor"]),
        BTreeSet::new(),
    );
    assert!(!report.passed);
    assert_eq!(report.missing_processors, set(&["EmailNotificationProcessor"]));

    let text = report.render_detailed();
    assert!(text.contains("Missing processors: 1"));
    assert!(text.contains("Total required: 2"));
    assert!(text.contains("Total missing: 1"));
    assert!(text.contains("  ✗ EmailNotificationProcessor"));
    assert!(text.contains("STATUS: VALIDATION FAILED"));
}

#[test]
fn test_extras_never_fail() {
    let report = CrossReferenceReport::compute(
        &required(&["A"], &[]),
        set(&["A", "Legacy"]),
        set(&["oldCheck"]),
    );
    assert!(report.passed);
    assert_eq!(report.extra_processors, set(&["Legacy"]));
    assert_eq!(report.extra_criteria, set(&["oldCheck"]));
    assert!(report
        .render_detailed()
        .contains("EXTRA PROCESSORS (1) - kept, not required"));
    assert!(report
        .render_brief()
        .contains("Extra processors found (keeping them): Legacy"));
}

#[test]
fn test_end_to_end_with_files() {
    let layout = Layout::new();
    fs::write(
        layout.workflows.join("registration.json"),
        r#"{"processors": [{"name": "user_registration_processor"},
                           {"name": "email_notification_processor"}],
            "criterion": {"type": "function", "function": {"name": "validateUserData"}}}"#,
    )
    .unwrap();
    Layout::touch(&layout.processors, "UserRegistrationProcessor.java");
    Layout::touch(&layout.criteria, "validateUserData.java");
    Layout::touch(&layout.criteria, "README.md");

    let report = validate_workflow_processors(
        &CompilerConfig::default(),
        &layout.workflows,
        &layout.processors,
        &layout.criteria,
    )
    .unwrap();
    assert!(!report.passed);
    assert_eq!(report.missing_processors, set(&["EmailNotificationProcessor"]));
    assert!(report.missing_criteria.is_empty());
    assert_eq!(report.implemented_criteria, set(&["validateUserData"]));
}

#[test]
fn test_scanner_respects_extension_and_depth() {
    let layout = Layout::new();
    let nested = layout.processors.join("billing");
    fs::create_dir(&nested).unwrap();
    Layout::touch(&layout.processors, "TopProcessor.kt");
    Layout::touch(&nested, "NestedProcessor.kt");
    Layout::touch(&layout.processors, "Ignored.java");

    let recursive = ImplementationScanner::new(ScanConfig::default().with_extension("kt"))
        .scan(&layout.processors)
        .unwrap();
    assert_eq!(recursive, set(&["NestedProcessor", "TopProcessor"]));

    let flat = ImplementationScanner::new(
        ScanConfig::default()
            .with_extension(".kt")
            .with_recursive(false),
    )
    .scan(&layout.processors)
    .unwrap();
    assert_eq!(flat, set(&["TopProcessor"]));
}

#[test]
fn test_missing_implementation_directory_implements_nothing() {
    let layout = Layout::new();
    let scanned = ImplementationScanner::default()
        .scan(layout.processors.join("does_not_exist"))
        .unwrap();
    assert!(scanned.is_empty());
}

#[test]
fn test_entry_points_differ_on_empty_workflow_directory() {
    let layout = Layout::new();
    let config = CompilerConfig::default();

    let report = validate_workflow_processors(
        &config,
        &layout.workflows,
        &layout.processors,
        &layout.criteria,
    )
    .unwrap();
    assert!(report.passed);
    assert_eq!(report.total_required(), 0);

    let error = validate_workflow_implementation(
        &config,
        &layout.workflows,
        &layout.processors,
        &layout.criteria,
    )
    .unwrap_err();
    assert!(matches!(error, WorkflowError::NoDocumentsFound { .. }));
}

#[test]
fn test_implementation_entry_point_uses_fsm_shape() {
    let layout = Layout::new();
    fs::write(layout.workflows.join("order.json"), ORDER_WORKFLOW).unwrap();
    Layout::touch(&layout.processors, "ChargeCard.java");
    Layout::touch(&layout.processors, "RefundCard.java");

    let report = validate_workflow_implementation(
        &CompilerConfig::default(),
        &layout.workflows,
        &layout.processors,
        &layout.criteria,
    )
    .unwrap();
    assert!(!report.passed);
    assert_eq!(report.missing_criteria, set(&["hasBalance"]));
    assert_eq!(report.extra_processors, set(&["RefundCard"]));

    let brief = report.render_brief();
    assert!(brief.starts_with("Workflow implementation validation failed:"));
    assert!(brief.contains("• Missing criteria: hasBalance"));
}

#[test]
fn test_cross_referencer_accepts_a_single_file() {
    let layout = Layout::new();
    let file = layout.workflows.join("order.json");
    fs::write(&file, ORDER_WORKFLOW).unwrap();
    Layout::touch(&layout.criteria, "hasBalance.java");

    let config = CompilerConfig::default();
    let report = CrossReferencer::from_config(&config)
        .cross_reference(&file, &layout.processors, &layout.criteria)
        .unwrap();
    // The recursive strategy only looks at `processors` and `criterion` keys
    assert!(report.required_processors.is_empty());
    assert!(report.passed);
    assert_eq!(report.extra_criteria, set(&["hasBalance"]));
}
