//! State renaming between diagram versions
//!
//! When a diagram is revised, its states are matched to the previous version
//! by position of first appearance, and the resulting mapping is applied to an
//! existing document.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, span, Level};

use super::grammar::ChumskyExtractor;
use crate::core::{is_ignorable_line, FsmDocument, State, Statement, SyntaxTreeExtractor};

const PSEUDO_STATE: &str = "[*]";

/// Old state name to new state name, in first-appearance order
pub type StateMapping = IndexMap<String, String>;

pub struct StateRenamer {
    extractor: Arc<dyn SyntaxTreeExtractor>,
}

impl StateRenamer {
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(ChumskyExtractor::new()))
    }

    pub fn with_extractor(extractor: Arc<dyn SyntaxTreeExtractor>) -> Self {
        Self { extractor }
    }

    /// State names in the order they first appear, excluding `[*]`
    pub fn state_order(&self, diagram: &str) -> Vec<String> {
        let mut order: Vec<String> = Vec::new();
        let mut push = |name: String| {
            if name != PSEUDO_STATE && !order.contains(&name) {
                order.push(name);
            }
        };

        for line in diagram.lines().filter(|l| !is_ignorable_line(l)) {
            match self.extractor.extract(line.trim()) {
                Ok(Statement::Initial { state }) | Ok(Statement::Terminal { state }) => {
                    push(state)
                }
                Ok(Statement::Transition { from, to, .. }) => {
                    push(from);
                    push(to);
                }
                Err(_) => {}
            }
        }
        order
    }

    /// Pair states of two diagram versions by position
    ///
    /// Extra states in the longer diagram are left unmapped.
    pub fn positional_mapping(&self, old_diagram: &str, new_diagram: &str) -> StateMapping {
        self.state_order(old_diagram)
            .into_iter()
            .zip(self.state_order(new_diagram))
            .collect()
    }
}

impl Default for StateRenamer {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a mapping to state keys, `next` targets and the initial state
///
/// Returns a new document; names missing from the mapping are kept.
pub fn rename_states(document: &FsmDocument, mapping: &StateMapping) -> FsmDocument {
    let rename_span = span!(Level::INFO, "rename_states", mapping_len = mapping.len());
    let _enter = rename_span.enter();

    let rename = |name: &str| -> String {
        mapping
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    };

    let mut renamed = FsmDocument::new();
    renamed.initial_state = document.initial_state().map(rename);
    for (name, state) in &document.states {
        let target: &mut State = renamed.ensure_state(&rename(name));
        for (trigger, transition) in &state.transitions {
            let mut transition = transition.clone();
            transition.next = rename(&transition.next);
            target.transitions.insert(trigger.clone(), transition);
        }
    }

    debug!(state_count = renamed.state_count(), "Renamed states");
    renamed
}
