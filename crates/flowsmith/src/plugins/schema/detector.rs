//! FSM document detector
//!
//! Identifies JSON workflow documents.

use serde_json::Value;

use crate::core::{Detector, InputKind};

/// Detector for FSM documents in JSON
pub struct DocumentDetector;

impl DocumentDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocumentDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for DocumentDetector {
    fn confidence(&self, input: &str) -> f64 {
        let trimmed = input.trim();
        if !trimmed.starts_with('{') {
            return 0.0;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) if map.contains_key("states") => 1.0,
            Ok(Value::Object(map)) if map.contains_key("initial_state") => 0.9,
            Ok(Value::Object(_)) => 0.6,
            Ok(_) => 0.0,
            // Unparseable but JSON-shaped
            Err(_) if trimmed.contains("\"states\"") => 0.6,
            Err(_) => 0.2,
        }
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Document
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["{", "\"states\"", "\"initial_state\"", "\"transitions\""]
    }
}
