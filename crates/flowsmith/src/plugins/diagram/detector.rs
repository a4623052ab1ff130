//! Diagram detector
//!
//! Identifies state-diagram text.

use crate::core::{Detector, InputKind};

/// Detector for state-diagram text
pub struct DiagramDetector;

impl DiagramDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DiagramDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DiagramDetector {
    fn confidence(&self, input: &str) -> f64 {
        let trimmed = input.trim();

        if trimmed.starts_with("stateDiagram") {
            return 1.0;
        }
        if trimmed.starts_with('{') || (trimmed.starts_with('[') && !trimmed.starts_with("[*]")) {
            return 0.0;
        }

        let has_pseudo_state = input.contains("[*]");
        let has_transition = input.contains("-->");
        let has_action_type = input.lines().any(|l| l.contains(':') && l.contains('/'));

        match (has_pseudo_state, has_transition, has_action_type) {
            (true, true, _) => 0.8,
            (_, true, true) => 0.7,
            (_, true, false) => 0.4,
            (true, false, _) => 0.3,
            _ => 0.0,
        }
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Diagram
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["stateDiagram", "stateDiagram-v2", "[*]", "-->"]
    }
}
