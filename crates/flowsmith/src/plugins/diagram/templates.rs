//! Default action and guard templates
//!
//! Every template produced here passes the schema validator. Templates are
//! parameterized by the transition's trigger name.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};

use crate::core::{
    Action, ActionConfig, ActionKind, AgentConfig, Condition, ConditionFunction, FsmDocument,
    FunctionConfig, FunctionSpec, Message, NotificationConfig, PromptConfig, QuestionConfig,
    ToolSpec, Transition, WorkflowError,
};

/// Guard function used when a line names the `condition` type without a
/// bracketed function
pub const DEFAULT_GUARD: &str = "is_stage_completed";

const GUARD_DESCRIPTION: &str = "Checks if the transition stage is complete.";

/// Placeholder names used in sample documents
pub const SAMPLE_STATE: &str = "current_state";
pub const SAMPLE_TRIGGER: &str = "transition_name";
pub const SAMPLE_NEXT: &str = "next_state";

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn tool(name: &str, description: &str, parameters: Value) -> ToolSpec {
    ToolSpec::function(FunctionSpec {
        name: name.to_string(),
        description: description.to_string(),
        strict: true,
        parameters: object(parameters),
    })
}

fn text_tool(name: &str, description: &str) -> ToolSpec {
    tool(
        name,
        description,
        json!({
            "type": "object",
            "properties": { "text": { "type": "string" } },
            "required": ["text"],
            "additionalProperties": false
        }),
    )
}

fn agent(tools: Vec<ToolSpec>, message: &str, max_iteration: u32) -> ActionConfig {
    ActionConfig::Agent(AgentConfig {
        publish: true,
        allow_anonymous_users: true,
        model: Map::new(),
        tools,
        messages: vec![Message::user(message)],
        tool_choice: "auto".to_string(),
        max_iteration,
        approve: true,
    })
}

/// Minimal action for a plain transition; `None` for the condition kind
pub fn default_action(kind: ActionKind, trigger: &str) -> Option<Action> {
    let config = match kind {
        ActionKind::Notification => ActionConfig::Notification(NotificationConfig {
            notification: "Generic notification message.".to_string(),
            publish: true,
            allow_anonymous_users: true,
        }),
        ActionKind::Question => ActionConfig::Question(QuestionConfig {
            question: "Generic question prompt?".to_string(),
            example_answers: vec![
                "Example answer 1".to_string(),
                "Example answer 2".to_string(),
            ],
            publish: true,
            allow_anonymous_users: true,
        }),
        ActionKind::Function => ActionConfig::Function(FunctionConfig {
            function: FunctionSpec {
                name: trigger.to_string(),
                description: "Generic function.".to_string(),
                strict: false,
                parameters: object(json!({
                    "type": "object",
                    "properties": {
                        "param1": { "type": "string" },
                        "param2": { "type": "number" }
                    },
                    "required": ["param1"]
                })),
            },
        }),
        ActionKind::Prompt => ActionConfig::Prompt(PromptConfig {
            messages: vec![Message::user("Generic prompt message text.")],
            publish: true,
            allow_anonymous_users: true,
        }),
        ActionKind::Agent => agent(
            vec![tool(
                "generic_tool",
                "Generic tool for agent processing.",
                json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } },
                    "required": ["query"],
                    "additionalProperties": false
                }),
            )],
            "Generic agent prompt message.",
            10,
        ),
        ActionKind::Condition => return None,
    };
    Some(Action::process_event(config))
}

/// Action for a manual self transition
///
/// Agents get a follow-up question tool whose `transition` parameter is pinned
/// to the trigger; other kinds use the default template.
pub fn manual_action(kind: ActionKind, trigger: &str) -> Option<Action> {
    match kind {
        ActionKind::Agent => Some(Action::process_event(agent(
            vec![tool(
                "set_additional_question_flag",
                "Set true if the discussion with the user is not complete and the user has \
                 additional details to provide. If set to false, proceed with processing.",
                json!({
                    "type": "object",
                    "properties": {
                        "transition": { "type": "string", "enum": [trigger] },
                        "require_additional_question_flag": { "type": "boolean" }
                    },
                    "required": ["transition", "require_additional_question_flag"],
                    "additionalProperties": false
                }),
            )],
            "Your feedback seems brief. Would you like to add more details or clarify any points?",
            30,
        ))),
        _ => default_action(kind, trigger),
    }
}

/// Action for a guarded transition
pub fn conditional_action(kind: ActionKind, trigger: &str) -> Option<Action> {
    match kind {
        ActionKind::Agent => Some(Action::process_event(agent(
            vec![
                text_tool("sentiment_analysis", "Analyzes the sentiment of the input."),
                text_tool("entity_extraction", "Extracts key entities from the input."),
            ],
            "Proceeding with analysis: extract sentiment and key entities from the provided input: {{input}}",
            10,
        ))),
        _ => default_action(kind, trigger),
    }
}

/// Guard condition calling `function` with the trigger as its `transition`
/// parameter
pub fn guard(function: &str, trigger: &str) -> Condition {
    let mut params = IndexMap::new();
    params.insert("transition".to_string(), trigger.to_string());
    Condition::function(ConditionFunction {
        name: function.to_string(),
        description: GUARD_DESCRIPTION.to_string(),
        params,
    })
}

/// Canonical single-transition document for an action kind, with placeholder
/// state and trigger names
pub fn sample_document(kind: ActionKind) -> Result<Value, WorkflowError> {
    let mut transition = Transition::new(SAMPLE_NEXT);
    match default_action(kind, SAMPLE_TRIGGER) {
        Some(action) => transition = transition.with_action(action),
        None => transition = transition.with_condition(guard(DEFAULT_GUARD, SAMPLE_TRIGGER)),
    }

    let mut document = FsmDocument::new();
    document.add_transition(SAMPLE_STATE, SAMPLE_TRIGGER, transition);
    Ok(document.to_value()?["states"].clone())
}
