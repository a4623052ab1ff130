//! Statement grammar for diagram lines
//!
//! ```text
//! line     = state_ref "-->" state_ref [ ":" label ] [ "%%" comment ]
//! label    = trigger { segment }
//! segment  = "[" ident "]"                 guard
//!          | "(manual)"                    manual marker
//!          | "/" "condition" "[" ident "]" guard, as written by the serializer
//!          | "/" ident                     action type
//! ```

use chumsky::prelude::*;

use crate::core::chumsky_utils::{
    describe_errors, identifier, inline_whitespace, mermaid_comment, state_ref, Extra,
};
use crate::core::{Statement, StatementError, SyntaxTreeExtractor, TransitionLabel};

/// One label segment after the trigger
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Guard(String),
    Manual,
    Action(String),
}

fn segment<'src>() -> impl Parser<'src, &'src str, Segment, Extra<'src>> + Clone {
    let bracketed = identifier()
        .padded_by(inline_whitespace())
        .delimited_by(just('['), just(']'));
    let slash = just('/').then(inline_whitespace());

    let guard = bracketed.clone().map(Segment::Guard);
    let manual = just("(manual)").to(Segment::Manual);
    let condition_guard = slash
        .clone()
        .ignore_then(just("condition"))
        .ignore_then(inline_whitespace())
        .ignore_then(bracketed)
        .map(Segment::Guard);
    let action = slash.ignore_then(identifier()).map(Segment::Action);

    choice((guard, manual, condition_guard, action))
}

fn build_label(trigger: String, segments: Vec<Segment>) -> Result<TransitionLabel, String> {
    let mut label = TransitionLabel::new(trigger);
    for segment in segments {
        match segment {
            Segment::Guard(name) => {
                if label.guard.is_some() {
                    return Err("more than one guard".to_string());
                }
                label.guard = Some(name);
            }
            Segment::Manual => {
                if label.manual {
                    return Err("repeated (manual) marker".to_string());
                }
                label.manual = true;
            }
            Segment::Action(kind) => {
                if label.action_type.is_some() {
                    return Err("more than one action type".to_string());
                }
                label.action_type = Some(kind);
            }
        }
    }
    Ok(label)
}

fn label<'src>() -> impl Parser<'src, &'src str, TransitionLabel, Extra<'src>> + Clone {
    identifier()
        .then(
            inline_whitespace()
                .ignore_then(segment())
                .repeated()
                .collect::<Vec<_>>(),
        )
        .try_map(|(trigger, segments), span| {
            build_label(trigger, segments).map_err(|reason| Rich::custom(span, reason))
        })
}

type RawLine = ((String, String), Option<TransitionLabel>);

fn line<'src>() -> impl Parser<'src, &'src str, RawLine, Extra<'src>> {
    state_ref()
        .then_ignore(inline_whitespace())
        .then_ignore(just("-->"))
        .then_ignore(inline_whitespace())
        .then(state_ref())
        .then_ignore(inline_whitespace())
        .then(
            just(':')
                .ignore_then(inline_whitespace())
                .ignore_then(label())
                .or_not(),
        )
        .then_ignore(inline_whitespace())
        .then_ignore(mermaid_comment().or_not())
        .then_ignore(end())
}

/// Full statement grammar built on chumsky
#[derive(Debug, Default, Clone, Copy)]
pub struct ChumskyExtractor;

impl ChumskyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxTreeExtractor for ChumskyExtractor {
    fn extract(&self, input: &str) -> Result<Statement, StatementError> {
        let ((from, to), label) = line()
            .parse(input.trim())
            .into_result()
            .map_err(|errors| StatementError::malformed(describe_errors(&errors)))?;

        match (from.as_str(), to.as_str(), label) {
            ("[*]", "[*]", _) => Err(StatementError::malformed(
                "transition between two pseudo-states",
            )),
            ("[*]", _, _) => Ok(Statement::Initial { state: to }),
            (_, "[*]", _) => Ok(Statement::Terminal { state: from }),
            (_, _, Some(label)) => Ok(Statement::Transition { from, to, label }),
            (_, _, None) => Err(StatementError::malformed("transition has no label")),
        }
    }

    fn name(&self) -> &'static str {
        "chumsky"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(line: &str) -> Result<Statement, StatementError> {
        ChumskyExtractor::new().extract(line)
    }

    fn transition(line: &str) -> (String, String, TransitionLabel) {
        match extract(line).unwrap() {
            Statement::Transition { from, to, label } => (from, to, label),
            other => panic!("expected transition, got {:?}", other),
        }
    }

    #[test]
    fn test_initial_and_terminal() {
        assert_eq!(
            extract("[*] --> none").unwrap(),
            Statement::Initial {
                state: "none".to_string()
            }
        );
        assert_eq!(
            extract("end --> [*]").unwrap(),
            Statement::Terminal {
                state: "end".to_string()
            }
        );
        assert!(extract("[*] --> [*]").is_err());
    }

    #[test]
    fn test_plain_transition() {
        let (from, to, label) = transition("none --> chat_initialized : initialize_chat / function");
        assert_eq!(from, "none");
        assert_eq!(to, "chat_initialized");
        assert_eq!(label, TransitionLabel::new("initialize_chat").with_action_type("function"));
    }

    #[test]
    fn test_spacing_is_flexible() {
        let (_, _, label) = transition("A-->B:go/agent");
        assert_eq!(label.action_type.as_deref(), Some("agent"));
        let (_, _, label) = transition("  A   -->   B  :  go   /   agent  ");
        assert_eq!(label.trigger, "go");
    }

    #[test]
    fn test_manual_marker() {
        let (from, to, label) = transition("X --> X : feedback (manual) / agent");
        assert_eq!(from, to);
        assert!(label.manual);
        assert_eq!(label.action_type.as_deref(), Some("agent"));
    }

    #[test]
    fn test_bracket_guard() {
        let (_, _, label) = transition("A --> B : go [cond] / function");
        assert_eq!(label.guard.as_deref(), Some("cond"));
        assert_eq!(label.action_type.as_deref(), Some("function"));
    }

    #[test]
    fn test_serialized_guard_form() {
        let (_, _, label) = transition("A --> B : go /condition [cond] (manual) /agent");
        assert_eq!(label.guard.as_deref(), Some("cond"));
        assert!(label.manual);
        assert_eq!(label.action_type.as_deref(), Some("agent"));
    }

    #[test]
    fn test_bare_condition_is_an_action_type() {
        let (_, _, label) = transition("A --> B : go / condition");
        assert_eq!(label.guard, None);
        assert_eq!(label.action_type.as_deref(), Some("condition"));

        let (_, _, label) = transition("A --> B : go / conditional");
        assert_eq!(label.action_type.as_deref(), Some("conditional"));
    }

    #[test]
    fn test_trailing_comment() {
        let (_, to, label) = transition("A --> B : go / prompt %% ask the user");
        assert_eq!(to, "B");
        assert_eq!(label.action_type.as_deref(), Some("prompt"));
    }

    #[test]
    fn test_identifiers_are_case_sensitive() {
        let (from, _, label) = transition("Idle --> idle : Go / Agent");
        assert_eq!(from, "Idle");
        assert_eq!(label.trigger, "Go");
        assert_eq!(label.action_type.as_deref(), Some("Agent"));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(extract("A -> B : go / agent").is_err());
        assert!(extract("A --> B").is_err());
        assert!(extract("A --> B : go / agent / prompt").is_err());
        assert!(extract("A --> B : go [x] [y] / agent").is_err());
        assert!(extract("A --> B : two words / agent").is_err());
        assert!(extract("random text").is_err());
    }
}
