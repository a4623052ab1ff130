//! Syntax extraction capability
//!
//! The diagram parser does not tokenize lines itself. It asks a
//! [`SyntaxTreeExtractor`] to turn each statement line into a [`Statement`],
//! and the extractor is picked when the parser is composed. Builds without a
//! grammar use [`UnavailableExtractor`], which rejects every line with a
//! typed error instead of pretending to parse.

use super::types::Direction;

/// A single parsed diagram statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `[*] --> state`
    Initial { state: String },
    /// `state --> [*]`
    Terminal { state: String },
    /// `from --> to : label`
    Transition {
        from: String,
        to: String,
        label: TransitionLabel,
    },
}

/// The part of a transition line after the colon
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionLabel {
    pub trigger: String,
    /// Guard function named in `[...]` or `/condition [...]`
    pub guard: Option<String>,
    /// `(manual)` marker
    pub manual: bool,
    /// Word following the final `/`
    pub action_type: Option<String>,
}

impl TransitionLabel {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            ..Self::default()
        }
    }

    pub fn with_guard(mut self, guard: impl Into<String>) -> Self {
        self.guard = Some(guard.into());
        self
    }

    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    pub fn with_action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(action_type.into());
        self
    }
}

/// Why an extractor could not produce a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementError {
    /// The line does not follow the statement grammar
    Malformed { reason: String },
    /// This extractor cannot parse anything
    Unavailable { extractor: &'static str },
}

impl StatementError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Capability that turns one trimmed statement line into a [`Statement`]
pub trait SyntaxTreeExtractor: Send + Sync {
    /// Extract a statement from a single line (already trimmed, not a header)
    fn extract(&self, line: &str) -> Result<Statement, StatementError>;

    /// Get the name of this extractor
    fn name(&self) -> &'static str;

    /// Whether this extractor can parse anything at all
    fn is_available(&self) -> bool {
        true
    }
}

/// Extractor used when no statement grammar is compiled in
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableExtractor;

impl UnavailableExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxTreeExtractor for UnavailableExtractor {
    fn extract(&self, _line: &str) -> Result<Statement, StatementError> {
        Err(StatementError::Unavailable {
            extractor: self.name(),
        })
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// `stateDiagram` / `stateDiagram-v2` header line
pub fn is_diagram_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("stateDiagram") && !trimmed.contains("-->")
}

/// `direction` followed by exactly one known direction keyword
pub fn is_direction_line(line: &str) -> bool {
    let mut words = line.split_whitespace();
    words.next() == Some("direction")
        && words.next().is_some_and(|value| Direction::from_str(value).is_some())
        && words.next().is_none()
}

/// Returns true for lines the parser never hands to an extractor
///
/// A state may be named `direction`, so only complete header lines are
/// skipped. Anything else reaches the extractor and is either parsed or
/// reported.
pub fn is_ignorable_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("%%")
        || is_diagram_header(trimmed)
        || is_direction_line(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_extractor_rejects_everything() {
        let extractor = UnavailableExtractor::new();
        assert!(!extractor.is_available());
        assert_eq!(
            extractor.extract("[*] --> A"),
            Err(StatementError::Unavailable {
                extractor: "unavailable"
            })
        );
    }

    #[test]
    fn test_label_builder() {
        let label = TransitionLabel::new("go")
            .with_guard("is_ready")
            .with_action_type("agent");
        assert_eq!(label.trigger, "go");
        assert_eq!(label.guard.as_deref(), Some("is_ready"));
        assert!(!label.manual);
        assert_eq!(label.action_type.as_deref(), Some("agent"));
    }

    #[test]
    fn test_ignorable_lines() {
        assert!(is_ignorable_line(""));
        assert!(is_ignorable_line("   "));
        assert!(is_ignorable_line("stateDiagram-v2"));
        assert!(is_ignorable_line("  direction TB"));
        assert!(is_ignorable_line("%% comment"));
        assert!(!is_ignorable_line("[*] --> A"));
        assert!(!is_ignorable_line("direction_chosen --> done : go / agent"));
    }

    #[test]
    fn test_states_named_like_headers_are_statements() {
        assert!(!is_ignorable_line("direction --> x : go / agent"));
        assert!(!is_ignorable_line("x --> direction"));
        assert!(!is_ignorable_line("stateDiagramStart --> x : go / agent"));
        assert!(!is_ignorable_line("direction UP"));
        assert!(!is_ignorable_line("direction TB LR"));
        assert!(is_ignorable_line("direction lr"));
        assert!(is_diagram_header("stateDiagram"));
        assert!(!is_diagram_header("stateDiagram --> x"));
    }
}
