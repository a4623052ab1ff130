//! Diagram parser
//!
//! Turns state-diagram text into an [`FsmDocument`]. Statement syntax is
//! delegated to a [`SyntaxTreeExtractor`]; this module decides which
//! transition shape a statement has and fills in the templates.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, span, trace, warn, Level};

use super::grammar::ChumskyExtractor;
use super::templates::{conditional_action, default_action, guard, manual_action, DEFAULT_GUARD};
use crate::core::{
    is_ignorable_line, Action, ActionKind, FsmDocument, LineDiagnostic, LineErrorKind, ParseOutcome,
    Parser as CoreParser, Statement, StatementError, SyntaxTreeExtractor, Transition,
    TransitionLabel,
};

/// Which recognized transition form a line used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionShape {
    /// `from --> to : trigger [guard] / type`
    Conditional,
    /// `state --> state : trigger (manual) / type`
    ManualSelf,
    /// `from --> to : trigger / type`
    Plain,
}

/// A transition line after classification
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransition {
    pub from: String,
    pub trigger: String,
    pub shape: TransitionShape,
    pub kind: ActionKind,
    pub transition: Transition,
}

/// Classification of one diagram line
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// Blank, comment, header or direction line
    Ignored,
    Initial(String),
    Terminal(String),
    Transition(ParsedTransition),
}

/// Parser for workflow state diagrams
pub struct DiagramParser {
    extractor: Arc<dyn SyntaxTreeExtractor>,
}

impl DiagramParser {
    /// Create a parser using the chumsky statement grammar
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(ChumskyExtractor::new()))
    }

    /// Create a parser with a specific syntax extractor
    pub fn with_extractor(extractor: Arc<dyn SyntaxTreeExtractor>) -> Self {
        Self { extractor }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    /// Classify a single line without touching any document
    pub fn parse_line(&self, line: &str) -> Result<ParsedLine, LineErrorKind> {
        let trimmed = line.trim();
        if is_ignorable_line(trimmed) {
            return Ok(ParsedLine::Ignored);
        }

        let statement = self.extractor.extract(trimmed).map_err(|e| match e {
            StatementError::Malformed { reason } => LineErrorKind::MalformedLine { reason },
            StatementError::Unavailable { extractor } => {
                LineErrorKind::ExtractorUnavailable { extractor }
            }
        })?;

        match statement {
            Statement::Initial { state } => Ok(ParsedLine::Initial(state)),
            Statement::Terminal { state } => Ok(ParsedLine::Terminal(state)),
            Statement::Transition { from, to, label } => {
                classify(from, to, label).map(ParsedLine::Transition)
            }
        }
    }
}

fn malformed(reason: &str) -> LineErrorKind {
    LineErrorKind::MalformedLine {
        reason: reason.to_string(),
    }
}

fn classify(
    from: String,
    to: String,
    label: TransitionLabel,
) -> Result<ParsedTransition, LineErrorKind> {
    let TransitionLabel {
        trigger,
        guard: guard_name,
        manual,
        action_type,
    } = label;

    let kind = match action_type {
        Some(name) => name
            .parse::<ActionKind>()
            .map_err(|_| LineErrorKind::UnknownActionType { action_type: name })?,
        // A bracketed guard alone is a condition-only transition
        None if guard_name.is_some() => ActionKind::Condition,
        None => return Err(malformed("missing action type")),
    };

    let (shape, transition) = if let Some(function) = guard_name {
        let mut transition = Transition::new(to)
            .with_manual(manual)
            .with_condition(guard(&function, &trigger));
        if let Some(action) = conditional_action(kind, &trigger) {
            transition = transition.with_action(action);
        }
        (TransitionShape::Conditional, transition)
    } else if manual {
        if from != to {
            return Err(malformed("manual transition must target its own state"));
        }
        let transition = Transition::new(from.clone()).with_manual(true);
        (
            TransitionShape::ManualSelf,
            attach(transition, kind, manual_action(kind, &trigger), &trigger),
        )
    } else {
        let transition = Transition::new(to);
        (
            TransitionShape::Plain,
            attach(transition, kind, default_action(kind, &trigger), &trigger),
        )
    };

    Ok(ParsedTransition {
        from,
        trigger,
        shape,
        kind,
        transition,
    })
}

/// Attach the templated action, or the default guard for the condition kind
fn attach(
    transition: Transition,
    kind: ActionKind,
    action: Option<Action>,
    trigger: &str,
) -> Transition {
    match action {
        Some(action) => transition.with_action(action),
        None if kind == ActionKind::Condition => {
            transition.with_condition(guard(DEFAULT_GUARD, trigger))
        }
        None => transition,
    }
}

impl Default for DiagramParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreParser for DiagramParser {
    fn parse(&self, input: &str) -> Result<ParseOutcome> {
        let parse_span = span!(
            Level::INFO,
            "parse_diagram",
            input_len = input.len(),
            extractor = self.extractor.name()
        );
        let _enter = parse_span.enter();

        let mut document = FsmDocument::new();
        let mut diagnostics = Vec::new();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            match self.parse_line(line) {
                Ok(ParsedLine::Ignored) => {}
                Ok(ParsedLine::Initial(state)) => {
                    trace!(line = line_no, state = %state, "Initial state");
                    document.set_initial_state(state);
                }
                Ok(ParsedLine::Terminal(state)) => {
                    trace!(line = line_no, state = %state, "Terminal transition");
                }
                Ok(ParsedLine::Transition(parsed)) => {
                    trace!(
                        line = line_no,
                        from = %parsed.from,
                        trigger = %parsed.trigger,
                        kind = %parsed.kind,
                        shape = ?parsed.shape,
                        "Transition"
                    );
                    document.add_transition(&parsed.from, parsed.trigger, parsed.transition);
                }
                Err(kind) => {
                    warn!(line = line_no, content = line.trim(), error = %kind, "Skipping line");
                    diagnostics.push(LineDiagnostic::new(line_no, line.trim(), kind));
                }
            }
        }

        debug!(
            state_count = document.state_count(),
            transition_count = document.transition_count(),
            skipped = diagnostics.len(),
            "Parsed diagram"
        );
        info!("Parsing completed");

        Ok(ParseOutcome::new(document, diagnostics))
    }

    fn name(&self) -> &'static str {
        "diagram"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        let trimmed = input.trim();
        trimmed.starts_with("stateDiagram") || input.contains("-->")
    }
}
