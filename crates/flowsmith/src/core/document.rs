//! FSM document model
//!
//! The canonical representation of a workflow: an optional initial state and
//! an insertion-ordered map of states, each owning its outgoing transitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionKind, Condition};
use super::error::WorkflowError;

/// Workflow finite-state-machine document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FsmDocument {
    #[serde(default)]
    pub initial_state: Option<String>,
    #[serde(default)]
    pub states: IndexMap<String, State>,
}

/// A state and its outgoing transitions, keyed by trigger name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    #[serde(default)]
    pub transitions: IndexMap<String, Transition>,
}

/// A single transition out of a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub next: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub manual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Transition {
    pub fn new(next: impl Into<String>) -> Self {
        Self {
            next: next.into(),
            manual: false,
            action: None,
            condition: None,
        }
    }

    pub fn with_manual(mut self, manual: bool) -> Self {
        self.manual = manual;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Kind of the attached action, if any
    pub fn action_kind(&self) -> Option<ActionKind> {
        self.action.as_ref().map(Action::kind)
    }
}

impl FsmDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_state(&self) -> Option<&str> {
        self.initial_state.as_deref()
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    /// Look up a transition by owning state and trigger
    pub fn transition(&self, state: &str, trigger: &str) -> Option<&Transition> {
        self.states.get(state)?.transitions.get(trigger)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn transition_count(&self) -> usize {
        self.states.values().map(|s| s.transitions.len()).sum()
    }

    /// Iterate over `(state, trigger, transition)` triples in document order
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str, &Transition)> {
        self.states.iter().flat_map(|(state, data)| {
            data.transitions
                .iter()
                .map(move |(trigger, t)| (state.as_str(), trigger.as_str(), t))
        })
    }

    /// Set the initial state, creating it if absent
    pub fn set_initial_state(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.ensure_state(&name);
        self.initial_state = Some(name);
    }

    /// Ensure a state exists (creates an empty state if needed)
    pub fn ensure_state(&mut self, name: &str) -> &mut State {
        self.states.entry(name.to_string()).or_default()
    }

    /// Add a transition, accumulating onto an existing state
    pub fn add_transition(&mut self, from: &str, trigger: impl Into<String>, transition: Transition) {
        self.ensure_state(from)
            .transitions
            .insert(trigger.into(), transition);
    }

    pub fn from_json_str(input: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, WorkflowError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, WorkflowError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{ActionConfig, NotificationConfig};

    fn notify() -> Action {
        Action::process_event(ActionConfig::Notification(NotificationConfig {
            notification: "hi".to_string(),
            publish: true,
            allow_anonymous_users: true,
        }))
    }

    #[test]
    fn test_transitions_accumulate_on_same_state() {
        let mut doc = FsmDocument::new();
        doc.add_transition("A", "go", Transition::new("B"));
        doc.add_transition("A", "stay", Transition::new("A").with_manual(true));

        assert_eq!(doc.state_count(), 1);
        assert_eq!(doc.transition_count(), 2);
        assert!(doc.transition("A", "stay").unwrap().manual);
    }

    #[test]
    fn test_set_initial_state_creates_state() {
        let mut doc = FsmDocument::new();
        doc.set_initial_state("none");
        assert_eq!(doc.initial_state(), Some("none"));
        assert!(doc.state("none").unwrap().transitions.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut doc = FsmDocument::new();
        doc.add_transition("zeta", "a", Transition::new("alpha"));
        doc.add_transition("alpha", "b", Transition::new("zeta"));
        let names: Vec<&String> = doc.states.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_json_round_trip_omits_defaults() {
        let mut doc = FsmDocument::new();
        doc.set_initial_state("A");
        doc.add_transition("A", "go", Transition::new("B").with_action(notify()));

        let json = doc.to_json_pretty().unwrap();
        assert!(!json.contains("manual"));
        assert!(!json.contains("condition"));

        let back = FsmDocument::from_json_str(&json).unwrap();
        assert_eq!(back, doc);
        assert_eq!(
            back.transition("A", "go").unwrap().action_kind(),
            Some(ActionKind::Notification)
        );
    }
}
