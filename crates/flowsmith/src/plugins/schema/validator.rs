//! Action schema validator
//!
//! Validates raw JSON against the six action shapes. Every violation in the
//! input is collected; validation never stops at the first problem and never
//! mutates its input.

use serde_json::{Map, Value};
use tracing::{debug, span, Level};

use crate::core::{
    ActionKind, FsmDocument, SchemaViolation, ViolationKind, WorkflowError, FUNCTION_CONDITION,
    PROCESS_EVENT,
};

/// Expected type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    String,
    Bool,
    Integer,
    Object,
    StringArray,
    Messages,
    Tools,
    FunctionSpec,
    ConditionFunction,
}

/// Required config fields for each kind, besides the `type` tag
fn fields(kind: ActionKind) -> &'static [(&'static str, FieldType)] {
    use FieldType::*;
    match kind {
        ActionKind::Notification => &[
            ("notification", String),
            ("publish", Bool),
            ("allow_anonymous_users", Bool),
        ],
        ActionKind::Question => &[
            ("question", String),
            ("example_answers", StringArray),
            ("publish", Bool),
            ("allow_anonymous_users", Bool),
        ],
        ActionKind::Function => &[("function", FunctionSpec)],
        ActionKind::Prompt => &[
            ("messages", Messages),
            ("publish", Bool),
            ("allow_anonymous_users", Bool),
        ],
        ActionKind::Agent => &[
            ("publish", Bool),
            ("allow_anonymous_users", Bool),
            ("model", Object),
            ("tools", Tools),
            ("messages", Messages),
            ("tool_choice", String),
            ("max_iteration", Integer),
            ("approve", Bool),
        ],
        ActionKind::Condition => &[("function", ConditionFunction)],
    }
}

const FUNCTION_SPEC_FIELDS: &[(&str, FieldType)] = &[
    ("name", FieldType::String),
    ("description", FieldType::String),
    ("strict", FieldType::Bool),
];

const CONDITION_FUNCTION_FIELDS: &[(&str, FieldType)] = &[
    ("name", FieldType::String),
    ("description", FieldType::String),
];

const MESSAGE_FIELDS: &[(&str, FieldType)] = &[
    ("role", FieldType::String),
    ("content", FieldType::StringArray),
];

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub violations: Vec<SchemaViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert into `Err(WorkflowError::SchemaViolation)` when anything failed
    pub fn into_result(self) -> Result<(), WorkflowError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::schema_violation(self.violations))
        }
    }
}

/// Collects violations while walking a value
#[derive(Default)]
struct Walker {
    violations: Vec<SchemaViolation>,
}

impl Walker {
    fn push(&mut self, violation: SchemaViolation) {
        self.violations.push(violation);
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.push(SchemaViolation::wrong_type(path, "object", json_type(other)));
                None
            }
        }
    }

    /// Report keys not in `allowed`
    fn unknown_keys(&mut self, map: &Map<String, Value>, path: &str, allowed: &[&str]) {
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.push(SchemaViolation::unknown_field(join(path, key)));
            }
        }
    }

    /// Check required fields, then reject anything else except `extra_allowed`
    fn fields(
        &mut self,
        map: &Map<String, Value>,
        path: &str,
        spec: &[(&str, FieldType)],
        extra_allowed: &[&str],
    ) {
        for (name, field_type) in spec {
            let field_path = join(path, name);
            match map.get(*name) {
                Some(value) => self.field(value, &field_path, *field_type),
                None => self.push(SchemaViolation::missing(field_path)),
            }
        }
        for key in map.keys() {
            let known = spec.iter().any(|(name, _)| name == key)
                || extra_allowed.contains(&key.as_str());
            if !known {
                self.push(SchemaViolation::unknown_field(join(path, key)));
            }
        }
    }

    fn field(&mut self, value: &Value, path: &str, field_type: FieldType) {
        match field_type {
            FieldType::String => self.expect(value.is_string(), value, path, "string"),
            FieldType::Bool => self.expect(value.is_boolean(), value, path, "boolean"),
            FieldType::Integer => self.unsigned(value, path),
            FieldType::Object => self.expect(value.is_object(), value, path, "object"),
            FieldType::StringArray => self.string_array(value, path),
            FieldType::Messages => self.array_of(value, path, |w, item, item_path| {
                if let Some(map) = w.object(item, item_path) {
                    w.fields(map, item_path, MESSAGE_FIELDS, &[]);
                }
            }),
            FieldType::Tools => self.array_of(value, path, |w, item, item_path| {
                if let Some(map) = w.object(item, item_path) {
                    w.fields(
                        map,
                        item_path,
                        &[("type", FieldType::String), ("function", FieldType::FunctionSpec)],
                        &[],
                    );
                }
            }),
            FieldType::FunctionSpec => {
                if let Some(map) = self.object(value, path) {
                    self.fields(map, path, FUNCTION_SPEC_FIELDS, &["parameters"]);
                    let parameters_path = join(path, "parameters");
                    match map.get("parameters") {
                        Some(parameters) => self.parameters(parameters, &parameters_path),
                        None => self.push(SchemaViolation::missing(parameters_path)),
                    }
                }
            }
            FieldType::ConditionFunction => {
                if let Some(map) = self.object(value, path) {
                    self.fields(map, path, CONDITION_FUNCTION_FIELDS, &["params"]);
                    let params_path = join(path, "params");
                    match map.get("params") {
                        Some(params) => self.string_map(params, &params_path),
                        None => self.push(SchemaViolation::missing(params_path)),
                    }
                }
            }
        }
    }

    fn expect(&mut self, ok: bool, value: &Value, path: &str, expected: &'static str) {
        if !ok {
            self.push(SchemaViolation::wrong_type(path, expected, json_type(value)));
        }
    }

    /// Integers must fit the `u32` the typed model loads them into
    fn unsigned(&mut self, value: &Value, path: &str) {
        if !(value.is_u64() || value.is_i64()) {
            self.push(SchemaViolation::wrong_type(path, "integer", json_type(value)));
        } else if !value.as_u64().is_some_and(|n| n <= u64::from(u32::MAX)) {
            self.push(SchemaViolation::invalid_value(
                path,
                format!("integer in 0..={}", u32::MAX),
                value.to_string(),
            ));
        }
    }

    fn array_of(
        &mut self,
        value: &Value,
        path: &str,
        mut item: impl FnMut(&mut Self, &Value, &str),
    ) {
        match value {
            Value::Array(items) => {
                for (i, entry) in items.iter().enumerate() {
                    item(self, entry, &format!("{}[{}]", path, i));
                }
            }
            other => self.push(SchemaViolation::wrong_type(path, "array", json_type(other))),
        }
    }

    fn string_array(&mut self, value: &Value, path: &str) {
        self.array_of(value, path, |w, item, item_path| {
            w.expect(item.is_string(), item, item_path, "string")
        });
    }

    fn string_map(&mut self, value: &Value, path: &str) {
        if let Some(map) = self.object(value, path) {
            for (key, entry) in map {
                self.expect(entry.is_string(), entry, &join(path, key), "string");
            }
        }
    }

    /// Free-form JSON-Schema fragment: extra keys allowed, but it must be an
    /// object schema with `properties`
    fn parameters(&mut self, value: &Value, path: &str) {
        let Some(map) = self.object(value, path) else {
            return;
        };
        let type_path = join(path, "type");
        match map.get("type") {
            Some(Value::String(t)) if t == "object" => {}
            Some(other) => self.push(SchemaViolation::invalid_value(
                type_path,
                "\"object\"",
                other.to_string(),
            )),
            None => self.push(SchemaViolation::missing(type_path)),
        }
        let properties_path = join(path, "properties");
        match map.get("properties") {
            Some(properties) => {
                self.expect(properties.is_object(), properties, &properties_path, "object")
            }
            None => self.push(SchemaViolation::missing(properties_path)),
        }
    }

    fn action(&mut self, value: &Value, path: &str) {
        let Some(envelope) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(envelope, path, &["name", "config"]);

        let name_path = join(path, "name");
        match envelope.get("name") {
            Some(Value::String(name)) if name == PROCESS_EVENT => {}
            Some(Value::String(name)) => self.push(SchemaViolation::invalid_value(
                name_path,
                PROCESS_EVENT,
                name.clone(),
            )),
            Some(other) => {
                self.push(SchemaViolation::wrong_type(name_path, "string", json_type(other)))
            }
            None => self.push(SchemaViolation::missing(name_path)),
        }

        let config_path = join(path, "config");
        let Some(config_value) = envelope.get("config") else {
            self.push(SchemaViolation::missing(config_path));
            return;
        };
        let Some(config) = self.object(config_value, &config_path) else {
            return;
        };

        let type_path = join(&config_path, "type");
        let kind = match config.get("type") {
            Some(Value::String(tag)) => match tag.parse::<ActionKind>() {
                Ok(kind) if kind.is_action() => kind,
                Ok(kind) => {
                    self.push(SchemaViolation::invalid_value(
                        type_path,
                        "an action type",
                        kind.as_str(),
                    ));
                    return;
                }
                Err(_) => {
                    self.push(SchemaViolation::new(
                        type_path,
                        ViolationKind::UnknownActionType {
                            action_type: tag.clone(),
                        },
                    ));
                    return;
                }
            },
            Some(other) => {
                self.push(SchemaViolation::wrong_type(
                    type_path,
                    "string",
                    json_type(other),
                ));
                return;
            }
            None => {
                self.push(SchemaViolation::missing(type_path));
                return;
            }
        };

        self.fields(config, &config_path, fields(kind), &["type"]);
    }

    fn condition(&mut self, value: &Value, path: &str) {
        let Some(envelope) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(envelope, path, &["name", "config"]);
        if let Some(name) = envelope.get("name") {
            self.expect(name.is_string(), name, &join(path, "name"), "string");
        }

        let config_path = join(path, "config");
        let Some(config_value) = envelope.get("config") else {
            self.push(SchemaViolation::missing(config_path));
            return;
        };
        let Some(config) = self.object(config_value, &config_path) else {
            return;
        };

        let type_path = join(&config_path, "type");
        match config.get("type") {
            Some(Value::String(tag)) if tag == FUNCTION_CONDITION => {}
            Some(other) => self.push(SchemaViolation::invalid_value(
                type_path,
                FUNCTION_CONDITION,
                other.as_str().map(str::to_string).unwrap_or_else(|| other.to_string()),
            )),
            None => self.push(SchemaViolation::missing(type_path)),
        }

        self.fields(config, &config_path, fields(ActionKind::Condition), &["type"]);
    }

    fn transition(&mut self, value: &Value, path: &str) {
        let Some(map) = self.object(value, path) else {
            return;
        };
        self.unknown_keys(map, path, &["next", "manual", "action", "condition"]);

        let next_path = join(path, "next");
        match map.get("next") {
            Some(next) => self.expect(next.is_string(), next, &next_path, "string"),
            None => self.push(SchemaViolation::missing(next_path)),
        }
        if let Some(manual) = map.get("manual") {
            self.expect(manual.is_boolean(), manual, &join(path, "manual"), "boolean");
        }
        if let Some(action) = map.get("action") {
            self.action(action, &join(path, "action"));
        }
        if let Some(condition) = map.get("condition") {
            self.condition(condition, &join(path, "condition"));
        }
    }

    fn document(&mut self, value: &Value) {
        let Some(root) = self.object(value, "") else {
            return;
        };
        self.unknown_keys(root, "", &["initial_state", "states"]);

        let states = match root.get("states") {
            Some(states) => self.object(states, "states"),
            None => {
                self.push(SchemaViolation::missing("states"));
                None
            }
        };

        match root.get("initial_state") {
            None | Some(Value::Null) => {}
            Some(Value::String(initial)) => {
                if states.is_some_and(|s| !s.contains_key(initial)) {
                    self.push(SchemaViolation::invalid_value(
                        "initial_state",
                        "a declared state",
                        initial.clone(),
                    ));
                }
            }
            Some(other) => self.push(SchemaViolation::wrong_type(
                "initial_state",
                "string",
                json_type(other),
            )),
        }

        let Some(states) = states else {
            return;
        };
        for (name, state) in states {
            let state_path = join("states", name);
            let Some(state_map) = self.object(state, &state_path) else {
                continue;
            };
            self.unknown_keys(state_map, &state_path, &["transitions"]);
            let transitions_path = join(&state_path, "transitions");
            let Some(transitions) = state_map.get("transitions") else {
                self.push(SchemaViolation::missing(transitions_path));
                continue;
            };
            let Some(transitions) = self.object(transitions, &transitions_path) else {
                continue;
            };
            for (trigger, transition) in transitions {
                self.transition(transition, &join(&transitions_path, trigger));
            }
        }
    }

    fn finish(self) -> ValidationReport {
        ValidationReport {
            violations: self.violations,
        }
    }
}

/// Validator for actions, conditions and whole documents
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a `{ name, config }` action envelope
    pub fn validate_action(&self, value: &Value) -> ValidationReport {
        let mut walker = Walker::default();
        walker.action(value, "action");
        walker.finish()
    }

    /// Validate a transition's `condition` value
    pub fn validate_condition(&self, value: &Value) -> ValidationReport {
        let mut walker = Walker::default();
        walker.condition(value, "condition");
        walker.finish()
    }

    /// Validate a whole FSM document
    pub fn validate_document(&self, value: &Value) -> ValidationReport {
        let validate_span = span!(Level::INFO, "validate_document");
        let _enter = validate_span.enter();

        let mut walker = Walker::default();
        walker.document(value);
        let report = walker.finish();
        debug!(violation_count = report.len(), "Validated document");
        report
    }

    /// Validate a typed document by way of its JSON form
    pub fn validate_fsm(&self, document: &FsmDocument) -> Result<ValidationReport, WorkflowError> {
        Ok(self.validate_document(&document.to_value()?))
    }
}
