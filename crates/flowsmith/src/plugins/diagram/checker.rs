//! Structural checks for diagram text
//!
//! Unlike the parser, which skips what it cannot use, the checker reports
//! every structural problem in one pass: header and direction lines, line
//! syntax, action types, pseudo-state transitions, and reachability.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use chumsky::prelude::*;
use indexmap::IndexMap;
use tracing::{debug, span, Level};

use super::parser::{DiagramParser, ParsedLine};
use crate::core::chumsky_utils::{identifier, inline_whitespace, inline_whitespace_required, Extra};
use crate::core::{is_diagram_header, ActionKind, Direction, LineErrorKind};

const PSEUDO_STATE: &str = "[*]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A structural problem found in a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramIssue {
    Empty,
    MissingHeader,
    MissingDirection,
    MalformedDirection { line: usize },
    InvalidDirection { line: usize, value: String },
    MalformedTransition {
        line: usize,
        content: String,
        reason: String,
    },
    UnknownActionType { line: usize, action_type: String },
    MissingInitial,
    MissingTerminal,
    Unreachable { state: String },
}

impl DiagramIssue {
    pub fn severity(&self) -> Severity {
        match self {
            DiagramIssue::MissingDirection => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for DiagramIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramIssue::Empty => write!(f, "Diagram is empty."),
            DiagramIssue::MissingHeader => {
                write!(f, "The diagram must start with 'stateDiagram'.")
            }
            DiagramIssue::MissingDirection => write!(f, "Direction line not found."),
            DiagramIssue::MalformedDirection { line } => {
                write!(f, "Line {}: Direction line is malformed.", line)
            }
            DiagramIssue::InvalidDirection { line, value } => write!(
                f,
                "Line {}: Invalid direction '{}'. Valid directions are: {}.",
                line,
                value,
                Direction::variants().join(", ")
            ),
            DiagramIssue::MalformedTransition {
                line,
                content,
                reason,
            } => write!(
                f,
                "Line {}: Transition format invalid: '{}' ({})",
                line, content, reason
            ),
            DiagramIssue::UnknownActionType { line, action_type } => write!(
                f,
                "Line {}: Invalid action type '{}'. Valid types are: {}.",
                line,
                action_type,
                ActionKind::variants().join(", ")
            ),
            DiagramIssue::MissingInitial => write!(
                f,
                "Initial state '[*]' not defined as a source in any transition."
            ),
            DiagramIssue::MissingTerminal => write!(
                f,
                "Terminal state '[*]' not defined as a target in any transition."
            ),
            DiagramIssue::Unreachable { state } => write!(
                f,
                "Orphan state detected: '{}' is not reachable from the initial state '[*]'.",
                state
            ),
        }
    }
}

/// `direction` keyword followed by an optional value
fn direction_line<'src>() -> impl Parser<'src, &'src str, Option<String>, Extra<'src>> {
    just("direction")
        .ignore_then(inline_whitespace_required().ignore_then(identifier()).or_not())
        .then_ignore(inline_whitespace())
        .then_ignore(end())
}

/// Whole-diagram structural checker
pub struct DiagramChecker {
    parser: DiagramParser,
    require_direction: bool,
}

impl DiagramChecker {
    pub fn new() -> Self {
        Self::with_parser(DiagramParser::new())
    }

    pub fn with_parser(parser: DiagramParser) -> Self {
        Self {
            parser,
            require_direction: true,
        }
    }

    /// Report a missing `direction` line as a warning (default true)
    pub fn with_require_direction(mut self, require: bool) -> Self {
        self.require_direction = require;
        self
    }

    /// Check a diagram and return every issue found, in line order
    pub fn check(&self, input: &str) -> Vec<DiagramIssue> {
        let check_span = span!(Level::INFO, "check_diagram", input_len = input.len());
        let _enter = check_span.enter();

        let lines: Vec<(usize, &str)> = input
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();

        let Some(&(_, first)) = lines.first() else {
            return vec![DiagramIssue::Empty];
        };

        let mut issues = Vec::new();
        if !is_diagram_header(first) {
            issues.push(DiagramIssue::MissingHeader);
        }

        let mut direction_seen = false;
        // adjacency in first-appearance order
        let mut graph: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut add_edge = |from: &str, to: &str| {
            graph.entry(from.to_string()).or_default().push(to.to_string());
            graph.entry(to.to_string()).or_default();
        };

        for &(line_no, line) in &lines {
            // `direction --> x` is a transition out of a state named `direction`
            if line.split_whitespace().next() == Some("direction") && !line.contains("-->") {
                direction_seen = true;
                match direction_line().parse(line).into_result() {
                    Ok(Some(value)) if Direction::from_str(&value).is_some() => {}
                    Ok(Some(value)) => issues.push(DiagramIssue::InvalidDirection {
                        line: line_no,
                        value,
                    }),
                    _ => issues.push(DiagramIssue::MalformedDirection { line: line_no }),
                }
                continue;
            }

            match self.parser.parse_line(line) {
                Ok(ParsedLine::Ignored) => {}
                Ok(ParsedLine::Initial(state)) => add_edge(PSEUDO_STATE, &state),
                Ok(ParsedLine::Terminal(state)) => add_edge(&state, PSEUDO_STATE),
                Ok(ParsedLine::Transition(parsed)) => {
                    add_edge(&parsed.from, &parsed.transition.next)
                }
                Err(LineErrorKind::UnknownActionType { action_type }) => {
                    issues.push(DiagramIssue::UnknownActionType {
                        line: line_no,
                        action_type,
                    })
                }
                Err(kind) => issues.push(DiagramIssue::MalformedTransition {
                    line: line_no,
                    content: line.to_string(),
                    reason: kind.to_string(),
                }),
            }
        }

        if !direction_seen && self.require_direction {
            issues.push(DiagramIssue::MissingDirection);
        }

        let has_initial = graph
            .get(PSEUDO_STATE)
            .is_some_and(|targets| !targets.is_empty());
        let has_terminal = graph.values().flatten().any(|t| t == PSEUDO_STATE);
        if !has_initial {
            issues.push(DiagramIssue::MissingInitial);
        }
        if !has_terminal {
            issues.push(DiagramIssue::MissingTerminal);
        }

        if has_initial {
            let reachable = reachable_from(&graph, PSEUDO_STATE);
            for state in graph.keys() {
                if !reachable.contains(state.as_str()) {
                    issues.push(DiagramIssue::Unreachable {
                        state: state.clone(),
                    });
                }
            }
        }

        debug!(issue_count = issues.len(), "Checked diagram");
        issues
    }
}

fn reachable_from<'a>(
    graph: &'a IndexMap<String, Vec<String>>,
    start: &'a str,
) -> HashSet<&'a str> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        for next in graph.get(node).into_iter().flatten() {
            if seen.insert(next.as_str()) {
                queue.push_back(next.as_str());
            }
        }
    }
    seen
}

impl Default for DiagramChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
stateDiagram-v2
    direction TB
    [*] --> none
    none --> greeting_sent : welcome_user / notification
    greeting_sent --> greeting_sent : chat (manual) / agent
    greeting_sent --> done : finish [is_stage_completed] / prompt
    done --> [*]
"#;

    #[test]
    fn test_valid_diagram_has_no_issues() {
        assert_eq!(DiagramChecker::new().check(VALID), vec![]);
    }

    #[test]
    fn test_empty_diagram() {
        assert_eq!(DiagramChecker::new().check("  \n\n"), vec![DiagramIssue::Empty]);
    }

    #[test]
    fn test_header_and_direction() {
        let issues = DiagramChecker::new().check("[*] --> a\na --> [*]");
        assert!(issues.contains(&DiagramIssue::MissingHeader));
        assert!(issues.contains(&DiagramIssue::MissingDirection));
        assert!(!DiagramIssue::MissingDirection.is_error());

        let issues = DiagramChecker::new()
            .with_require_direction(false)
            .check("stateDiagram-v2\n[*] --> a\na --> [*]");
        assert!(issues.is_empty());
    }

    #[test]
    fn test_invalid_direction() {
        let issues = DiagramChecker::new().check("stateDiagram-v2\ndirection UP\n[*] --> a\na --> [*]");
        assert_eq!(
            issues,
            vec![DiagramIssue::InvalidDirection {
                line: 2,
                value: "UP".to_string()
            }]
        );

        let issues = DiagramChecker::new().check("stateDiagram-v2\ndirection\n[*] --> a\na --> [*]");
        assert_eq!(issues, vec![DiagramIssue::MalformedDirection { line: 2 }]);
    }

    #[test]
    fn test_state_named_direction_is_a_transition() {
        let input = "stateDiagram-v2\ndirection LR\n[*] --> direction\ndirection --> x : go / agent\nx --> [*]";
        assert_eq!(DiagramChecker::new().check(input), vec![]);

        let issues = DiagramChecker::new().check("stateDiagram-v2\ndirection TB\n[*] --> a\na --> [*]\ndirection --> x : go / agent");
        assert_eq!(
            issues,
            vec![
                DiagramIssue::Unreachable {
                    state: "direction".to_string()
                },
                DiagramIssue::Unreachable {
                    state: "x".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_bad_lines_are_all_reported() {
        let input = "stateDiagram-v2\ndirection LR\n[*] --> a\na -> b\na --> c : go / teleport\na --> [*]";
        let issues = DiagramChecker::new().check(input);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], DiagramIssue::MalformedTransition { line: 4, .. }));
        assert_eq!(
            issues[1],
            DiagramIssue::UnknownActionType {
                line: 5,
                action_type: "teleport".to_string()
            }
        );
    }

    #[test]
    fn test_missing_pseudo_states_and_orphans() {
        let issues = DiagramChecker::new().check("stateDiagram-v2\ndirection TB\na --> b : go / agent");
        assert!(issues.contains(&DiagramIssue::MissingInitial));
        assert!(issues.contains(&DiagramIssue::MissingTerminal));

        let issues = DiagramChecker::new().check(
            "stateDiagram-v2\ndirection TB\n[*] --> a\na --> [*]\nx --> y : go / agent",
        );
        assert_eq!(
            issues,
            vec![
                DiagramIssue::Unreachable {
                    state: "x".to_string()
                },
                DiagramIssue::Unreachable {
                    state: "y".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_issue_messages() {
        assert_eq!(
            DiagramIssue::Unreachable {
                state: "x".to_string()
            }
            .to_string(),
            "Orphan state detected: 'x' is not reachable from the initial state '[*]'."
        );
    }
}
