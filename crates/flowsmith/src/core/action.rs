//! Transition actions and guard conditions
//!
//! An action is always wrapped in the `{ name: "process_event", config }`
//! envelope. The config is a closed union keyed by its `type` field. Guard
//! conditions use the sixth shape, a named function with string parameters.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Envelope name shared by every action
pub const PROCESS_EVENT: &str = "process_event";

/// Discriminant of the only supported condition shape
pub const FUNCTION_CONDITION: &str = "function";

/// The six action shapes a diagram line may name after `/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Notification,
    Question,
    Function,
    Prompt,
    Agent,
    /// Guard shape; lives in a transition's `condition` field rather than `action`
    Condition,
}

impl ActionKind {
    /// All kinds, in declaration order
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Notification,
        ActionKind::Question,
        ActionKind::Function,
        ActionKind::Prompt,
        ActionKind::Agent,
        ActionKind::Condition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Notification => "notification",
            ActionKind::Question => "question",
            ActionKind::Function => "function",
            ActionKind::Prompt => "prompt",
            ActionKind::Agent => "agent",
            ActionKind::Condition => "condition",
        }
    }

    /// Returns true for the kinds that populate a transition's `action`
    pub fn is_action(&self) -> bool {
        !matches!(self, ActionKind::Condition)
    }

    /// Get all valid kind names
    pub fn variants() -> &'static [&'static str] {
        &[
            "notification",
            "question",
            "function",
            "prompt",
            "agent",
            "condition",
        ]
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown action type: {}", s))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action envelope attached to a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub config: ActionConfig,
}

impl Action {
    /// Wrap a config in the standard `process_event` envelope
    pub fn process_event(config: ActionConfig) -> Self {
        Self {
            name: PROCESS_EVENT.to_string(),
            config,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.config.kind()
    }
}

/// Payload of an action, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionConfig {
    Notification(NotificationConfig),
    Question(QuestionConfig),
    Function(FunctionConfig),
    Prompt(PromptConfig),
    Agent(AgentConfig),
}

impl ActionConfig {
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionConfig::Notification(_) => ActionKind::Notification,
            ActionConfig::Question(_) => ActionKind::Question,
            ActionConfig::Function(_) => ActionKind::Function,
            ActionConfig::Prompt(_) => ActionKind::Prompt,
            ActionConfig::Agent(_) => ActionKind::Agent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub notification: String,
    pub publish: bool,
    pub allow_anonymous_users: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionConfig {
    pub question: String,
    pub example_answers: Vec<String>,
    pub publish: bool,
    pub allow_anonymous_users: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub function: FunctionSpec,
}

/// A callable function description with a free-form JSON-Schema parameter block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub strict: bool,
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    pub messages: Vec<Message>,
    pub publish: bool,
    pub allow_anonymous_users: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![content.into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub publish: bool,
    pub allow_anonymous_users: bool,
    pub model: Map<String, Value>,
    pub tools: Vec<ToolSpec>,
    pub messages: Vec<Message>,
    pub tool_choice: String,
    pub max_iteration: u32,
    pub approve: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

impl ToolSpec {
    pub fn function(function: FunctionSpec) -> Self {
        Self {
            kind: "function".to_string(),
            function,
        }
    }
}

/// Guard attached to a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Group criterion name, used by hand-written documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub config: ConditionConfig,
}

impl Condition {
    pub fn function(function: ConditionFunction) -> Self {
        Self {
            name: None,
            config: ConditionConfig {
                kind: FUNCTION_CONDITION.to_string(),
                function,
            },
        }
    }

    /// Name of the guard function
    pub fn function_name(&self) -> &str {
        &self.config.function.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: ConditionFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionFunction {
    pub name: String,
    pub description: String,
    pub params: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_kind_parsing() {
        assert_eq!("agent".parse::<ActionKind>(), Ok(ActionKind::Agent));
        assert_eq!("condition".parse::<ActionKind>(), Ok(ActionKind::Condition));
        // Identifiers are case-sensitive
        assert!("Agent".parse::<ActionKind>().is_err());
        assert!("teleport".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_variants_match_all() {
        let names: Vec<&str> = ActionKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ActionKind::variants());
        assert!(!ActionKind::Condition.is_action());
        assert!(ActionKind::Prompt.is_action());
    }

    #[test]
    fn test_notification_serializes_with_type_tag() {
        let action = Action::process_event(ActionConfig::Notification(NotificationConfig {
            notification: "Welcome!".to_string(),
            publish: true,
            allow_anonymous_users: false,
        }));

        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "process_event",
                "config": {
                    "type": "notification",
                    "notification": "Welcome!",
                    "publish": true,
                    "allow_anonymous_users": false
                }
            })
        );
    }

    #[test]
    fn test_condition_deserializes() {
        let value = json!({
            "config": {
                "type": "function",
                "function": {
                    "name": "is_stage_completed",
                    "description": "Checks the stage",
                    "params": { "transition": "go" }
                }
            }
        });

        let condition: Condition = serde_json::from_value(value).unwrap();
        assert_eq!(condition.function_name(), "is_stage_completed");
        assert_eq!(condition.config.function.params["transition"], "go");
        assert!(condition.name.is_none());
    }
}
