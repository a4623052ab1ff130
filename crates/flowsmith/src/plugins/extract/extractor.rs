//! Processor and criterion extraction
//!
//! Gathers the names a workflow expects the host to provide. Two strategies
//! are supported: a recursive walk over every JSON node, and a structured walk
//! over `states.*.transitions.*`. Results from several documents merge by set
//! union, so visiting order never matters.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, span, trace, warn, Level};
use walkdir::WalkDir;

use super::naming::normalize_processor;
use crate::core::{
    ExtractionConfig, ExtractionStrategy, FsmDocument, MissingDocuments, ProcessorNaming,
    WorkflowError, FUNCTION_CONDITION,
};

/// Names referenced by one or more workflow documents
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ExtractionResult {
    pub processors: BTreeSet<String>,
    pub criteria: BTreeSet<String>,
    /// Number of documents that contributed
    pub documents: usize,
    /// Files in a scanned directory that could not be parsed as JSON
    pub skipped: Vec<PathBuf>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty() && self.criteria.is_empty()
    }

    pub fn component_count(&self) -> usize {
        self.processors.len() + self.criteria.len()
    }

    /// Union of two results
    pub fn merge(mut self, other: ExtractionResult) -> Self {
        self.processors.extend(other.processors);
        self.criteria.extend(other.criteria);
        self.documents += other.documents;
        self.skipped.extend(other.skipped);
        self
    }
}

/// Collects names from workflow documents according to an [`ExtractionConfig`]
#[derive(Debug, Clone, Default)]
pub struct ComponentExtractor {
    config: ExtractionConfig,
}

impl ComponentExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract names from a single JSON document
    pub fn extract_value(&self, value: &Value) -> ExtractionResult {
        let mut result = ExtractionResult {
            documents: 1,
            ..ExtractionResult::default()
        };
        let naming = self.config.processor_naming;
        match self.config.strategy {
            ExtractionStrategy::Recursive => visit(value, naming, &mut result),
            ExtractionStrategy::Structured => walk_states(value, naming, &mut result),
        }
        trace!(
            processors = result.processors.len(),
            criteria = result.criteria.len(),
            "Extracted document"
        );
        result
    }

    pub fn extract_document(&self, document: &FsmDocument) -> Result<ExtractionResult, WorkflowError> {
        Ok(self.extract_value(&document.to_value()?))
    }

    /// Extract names from one JSON file; malformed JSON is an error here
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<ExtractionResult, WorkflowError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let value: Value = serde_json::from_str(&content)?;
        Ok(self.extract_value(&value))
    }

    /// Extract from a file or a directory of `.json` documents
    pub fn extract_path(&self, path: impl AsRef<Path>) -> Result<ExtractionResult, WorkflowError> {
        let path = path.as_ref();
        if std::fs::metadata(path)?.is_file() {
            self.extract_file(path)
        } else {
            self.extract_directory(path)
        }
    }

    /// Extract from every `.json` document in a directory and merge the results
    ///
    /// Files that fail to parse are logged, skipped and listed in
    /// [`ExtractionResult::skipped`]. Finding no documents at all is either an
    /// empty result or [`WorkflowError::NoDocumentsFound`], depending on the
    /// configured [`MissingDocuments`] policy.
    pub fn extract_directory(&self, dir: impl AsRef<Path>) -> Result<ExtractionResult, WorkflowError> {
        let dir = dir.as_ref();
        let extract_span = span!(
            Level::INFO,
            "extract_directory",
            path = %dir.display(),
            strategy = %self.config.strategy
        );
        let _enter = extract_span.enter();

        if !std::fs::metadata(dir)?.is_dir() {
            return Err(WorkflowError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut result = ExtractionResult::new();
        let mut found = 0usize;
        for path in json_files(dir, self.config.recursive)? {
            found += 1;
            let content = std::fs::read_to_string(&path)?;
            match serde_json::from_str::<Value>(&content) {
                Ok(value) => {
                    debug!(file = %path.display(), "Extracting components");
                    result = result.merge(self.extract_value(&value));
                }
                Err(error) => {
                    warn!(file = %path.display(), %error, "Skipping malformed workflow file");
                    result.skipped.push(path);
                }
            }
        }

        if found == 0 {
            match self.config.missing_documents {
                MissingDocuments::Empty => warn!("No JSON workflow files found"),
                MissingDocuments::Error => return Err(WorkflowError::no_documents_found(dir)),
            }
        }

        info!(
            documents = result.documents,
            skipped = result.skipped.len(),
            processors = result.processors.len(),
            criteria = result.criteria.len(),
            "Extraction completed"
        );
        Ok(result)
    }
}

/// `.json` files directly in `dir` (or below it when `recursive`), sorted by name
fn json_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, WorkflowError> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let is_json = entry.path().extension().is_some_and(|ext| ext == "json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn visit(value: &Value, naming: ProcessorNaming, result: &mut ExtractionResult) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Array(processors)) = map.get("processors") {
                for name in processors.iter().filter_map(|p| p.get("name")?.as_str()) {
                    result.processors.insert(normalize_processor(name, naming));
                }
            }
            if let Some(name) = map.get("criterion").and_then(criterion_name) {
                result.criteria.insert(name.to_string());
            }
            map.values().for_each(|child| visit(child, naming, result));
        }
        Value::Array(items) => items.iter().for_each(|child| visit(child, naming, result)),
        _ => {}
    }
}

/// `function.name` of a criterion whose `type`, if present, is `function`
fn criterion_name(criterion: &Value) -> Option<&str> {
    let criterion = criterion.as_object()?;
    match criterion.get("type") {
        None => {}
        Some(kind) if kind == FUNCTION_CONDITION => {}
        Some(_) => return None,
    }
    criterion.get("function")?.get("name")?.as_str()
}

fn walk_states(value: &Value, naming: ProcessorNaming, result: &mut ExtractionResult) {
    let Some(states) = value.get("states").and_then(Value::as_object) else {
        return;
    };
    let transitions = states
        .values()
        .filter_map(|state| state.get("transitions")?.as_object())
        .flat_map(Map::values);

    for transition in transitions {
        if let Some(name) = transition.get("action").and_then(function_config_name) {
            result.processors.insert(normalize_processor(name, naming));
        }
        if let Some(condition) = transition.get("condition") {
            if let Some(name) = function_config_name(condition) {
                result.criteria.insert(name.to_string());
            }
            if let Some(name) = condition.get("name").and_then(Value::as_str) {
                result.criteria.insert(name.to_string());
            }
        }
    }
}

/// `config.function.name` when `config.type == "function"`
fn function_config_name(envelope: &Value) -> Option<&str> {
    let config = envelope.get("config")?;
    if config.get("type")? != FUNCTION_CONDITION {
        return None;
    }
    config.get("function")?.get("name")?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn recursive() -> ComponentExtractor {
        ComponentExtractor::new(ExtractionConfig::default())
    }

    fn structured() -> ComponentExtractor {
        ComponentExtractor::new(
            ExtractionConfig::default().with_strategy(ExtractionStrategy::Structured),
        )
    }

    fn names(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_recursive_collects_nested_names() {
        let value = json!({
            "states": {
                "a": { "transitions": [
                    { "processors": [{ "name": "send_email" }, { "name": "AgentProcessor.log_event" }] },
                    { "criterion": { "type": "function", "function": { "name": "isReady" } } }
                ]}
            },
            "extra": [{ "deep": { "processors": [{ "name": "send_email" }] } }]
        });

        let result = recursive().extract_value(&value);
        assert_eq!(names(&result.processors), vec!["LogEvent", "SendEmail"]);
        assert_eq!(names(&result.criteria), vec!["isReady"]);
        assert_eq!(result.documents, 1);
    }

    #[test]
    fn test_recursive_criterion_type_filter() {
        let value = json!({
            "a": { "criterion": { "function": { "name": "untyped" } } },
            "b": { "criterion": { "type": "group", "function": { "name": "grouped" } } },
            "c": { "criterion": { "type": "function" } }
        });
        let result = recursive().extract_value(&value);
        assert_eq!(names(&result.criteria), vec!["untyped"]);
    }

    #[test]
    fn test_as_declared_naming() {
        let extractor = ComponentExtractor::new(
            ExtractionConfig::default().with_processor_naming(ProcessorNaming::AsDeclared),
        );
        let result = extractor.extract_value(&json!({ "processors": [{ "name": "send_email" }] }));
        assert_eq!(names(&result.processors), vec!["send_email"]);
    }

    #[test]
    fn test_structured_strategy() {
        let value = json!({
            "states": {
                "none": { "transitions": {
                    "go": {
                        "next": "done",
                        "action": { "name": "process_event", "config": {
                            "type": "function",
                            "function": { "name": "create_user" }
                        }},
                        "condition": {
                            "name": "groupCheck",
                            "config": { "type": "function", "function": { "name": "isEligible" } }
                        }
                    },
                    "say": {
                        "next": "done",
                        "action": { "name": "process_event", "config": { "type": "notification" } }
                    }
                }}
            }
        });

        let result = structured().extract_value(&value);
        assert_eq!(names(&result.processors), vec!["CreateUser"]);
        assert_eq!(names(&result.criteria), vec!["groupCheck", "isEligible"]);
        assert!(recursive().extract_value(&value).is_empty());
    }

    #[test]
    fn test_extract_document_uses_serialized_form() {
        let doc = FsmDocument::from_value(json!({
            "states": { "a": { "transitions": { "go": {
                "next": "b",
                "action": { "name": "process_event", "config": {
                    "type": "function",
                    "function": { "name": "do_work", "description": "", "strict": false,
                                  "parameters": { "type": "object", "properties": {} } }
                }}
            }}}}
        }))
        .unwrap();
        let result = structured().extract_document(&doc).unwrap();
        assert_eq!(names(&result.processors), vec!["DoWork"]);
    }

    #[test]
    fn test_directory_merges_and_skips_malformed() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("one.json"),
            r#"{"processors": [{"name": "a_processor"}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("two.json"),
            r#"{"processors": [{"name": "a_processor"}, {"name": "b_processor"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested").join("three.json"),
            r#"{"processors": [{"name": "c_processor"}]}"#,
        )
        .unwrap();

        let result = recursive().extract_directory(dir.path()).unwrap();
        assert_eq!(names(&result.processors), vec!["AProcessor", "BProcessor"]);
        assert_eq!(result.documents, 2);
        assert_eq!(result.skipped, vec![dir.path().join("broken.json")]);

        let deep = ComponentExtractor::new(ExtractionConfig::default().with_recursive(true))
            .extract_directory(dir.path())
            .unwrap();
        assert!(deep.processors.contains("CProcessor"));
    }

    #[test]
    fn test_empty_directory_policy() {
        let dir = TempDir::new().unwrap();
        let result = recursive().extract_directory(dir.path()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.documents, 0);

        let strict = ComponentExtractor::new(
            ExtractionConfig::default().with_missing_documents(MissingDocuments::Error),
        );
        assert!(matches!(
            strict.extract_directory(dir.path()),
            Err(WorkflowError::NoDocumentsFound { .. })
        ));
    }

    #[test]
    fn test_path_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            recursive().extract_path(&missing),
            Err(WorkflowError::IoError { .. })
        ));

        let file = dir.path().join("wf.json");
        std::fs::write(&file, r#"{"processors": [{"name": "x"}]}"#).unwrap();
        assert!(matches!(
            recursive().extract_directory(&file),
            Err(WorkflowError::NotADirectory { .. })
        ));
        assert_eq!(names(&recursive().extract_path(&file).unwrap().processors), vec!["X"]);
    }

    #[test]
    fn test_merge_is_union() {
        let a = recursive().extract_value(&json!({ "processors": [{ "name": "one" }] }));
        let b = recursive().extract_value(&json!({ "processors": [{ "name": "one" }, { "name": "two" }] }));
        let merged = a.clone().merge(b.clone());
        assert_eq!(merged, b.merge(a));
        assert_eq!(merged.processors.len(), 2);
        assert_eq!(merged.documents, 2);
    }
}
