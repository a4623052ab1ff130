//! Diagram serializer
//!
//! Writes an [`FsmDocument`] back out as state-diagram text that the
//! [`DiagramParser`](super::DiagramParser) reads into an equivalent document.

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{Direction, FsmDocument, Serializer, Transition};

/// Serializer producing `stateDiagram-v2` text
#[derive(Debug, Clone)]
pub struct DiagramSerializer {
    direction: Option<Direction>,
    indent: String,
}

impl DiagramSerializer {
    pub fn new() -> Self {
        Self {
            direction: None,
            indent: "    ".to_string(),
        }
    }

    /// Emit a `direction` line after the header
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Build the label text that follows the colon
    pub fn label(trigger: &str, transition: &Transition) -> String {
        let mut label = trigger.to_string();
        if let Some(condition) = &transition.condition {
            label.push_str(&format!(" /condition [{}]", condition.function_name()));
        }
        if transition.manual {
            label.push_str(" (manual)");
        }
        if let Some(kind) = transition.action_kind() {
            label.push_str(&format!(" /{}", kind));
        }
        label
    }

    /// Serialize directly to a string
    pub fn to_diagram(&self, document: &FsmDocument) -> String {
        let mut lines = vec!["stateDiagram-v2".to_string()];
        if let Some(direction) = self.direction {
            lines.push(format!("{}direction {}", self.indent, direction));
        }
        if let Some(initial) = document.initial_state() {
            lines.push(format!("{}[*] --> {}", self.indent, initial));
        }
        for (state, trigger, transition) in document.transitions() {
            lines.push(format!(
                "{}{} --> {} : {}",
                self.indent,
                state,
                transition.next,
                Self::label(trigger, transition)
            ));
        }
        lines.push(format!("{}end --> [*]", self.indent));
        lines.join("\n")
    }
}

impl Default for DiagramSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Serializer for DiagramSerializer {
    type Output = String;

    fn serialize(&self, document: &FsmDocument) -> Result<String> {
        let serialize_span = span!(
            Level::INFO,
            "serialize_diagram",
            state_count = document.state_count(),
            transition_count = document.transition_count()
        );
        let _enter = serialize_span.enter();

        let text = self.to_diagram(document);
        debug!(output_len = text.len(), "Serialized document");
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "diagram"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "mermaid"
    }
}
