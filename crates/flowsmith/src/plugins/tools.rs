//! Static tool registry
//!
//! Host-invoked tools are addressed by name. Every [`ToolName`] maps to a plain
//! function pointer through an exhaustive match, and the registry table is
//! built from it once. Unknown names and missing parameters come back as
//! [`WorkflowError`] values inside the `anyhow` error.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{info, span, Level};

use crate::core::{CompilerConfig, FsmDocument, Parser, Serializer, WorkflowError};
use crate::plugins::batch::BatchRequestGenerator;
use crate::plugins::crossref;
use crate::plugins::diagram::{DiagramChecker, DiagramParser, DiagramSerializer};
use crate::plugins::extract::{ComponentExtractor, OutputFormat};
use crate::plugins::schema::SchemaValidator;

/// Named tool parameters
pub type ToolParams = Map<String, Value>;

/// Signature shared by every tool
pub type ToolHandler = fn(&CompilerConfig, &ToolParams) -> Result<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ConvertDiagramToWorkflow,
    ConvertWorkflowToDiagram,
    ValidateWorkflowSchema,
    CheckDiagram,
    ExtractWorkflowComponents,
    ValidateWorkflowProcessors,
    ValidateWorkflowImplementation,
    GenerateBatchRequests,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::ConvertDiagramToWorkflow,
        ToolName::ConvertWorkflowToDiagram,
        ToolName::ValidateWorkflowSchema,
        ToolName::CheckDiagram,
        ToolName::ExtractWorkflowComponents,
        ToolName::ValidateWorkflowProcessors,
        ToolName::ValidateWorkflowImplementation,
        ToolName::GenerateBatchRequests,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ConvertDiagramToWorkflow => "convert_diagram_to_workflow",
            ToolName::ConvertWorkflowToDiagram => "convert_workflow_to_diagram",
            ToolName::ValidateWorkflowSchema => "validate_workflow_schema",
            ToolName::CheckDiagram => "check_diagram",
            ToolName::ExtractWorkflowComponents => "extract_workflow_components",
            ToolName::ValidateWorkflowProcessors => "validate_workflow_processors",
            ToolName::ValidateWorkflowImplementation => "validate_workflow_implementation",
            ToolName::GenerateBatchRequests => "generate_batch_requests",
        }
    }

    /// Function pointer that implements the tool
    pub fn handler(self) -> ToolHandler {
        match self {
            ToolName::ConvertDiagramToWorkflow => convert_diagram_to_workflow,
            ToolName::ConvertWorkflowToDiagram => convert_workflow_to_diagram,
            ToolName::ValidateWorkflowSchema => validate_workflow_schema,
            ToolName::CheckDiagram => check_diagram,
            ToolName::ExtractWorkflowComponents => extract_workflow_components,
            ToolName::ValidateWorkflowProcessors => validate_workflow_processors,
            ToolName::ValidateWorkflowImplementation => validate_workflow_implementation,
            ToolName::GenerateBatchRequests => generate_batch_requests,
        }
    }

    /// Parameters the tool requires
    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            ToolName::ConvertDiagramToWorkflow
            | ToolName::CheckDiagram
            | ToolName::GenerateBatchRequests => &["diagram"],
            ToolName::ConvertWorkflowToDiagram | ToolName::ValidateWorkflowSchema => &["workflow"],
            ToolName::ExtractWorkflowComponents => &["workflow_directory"],
            ToolName::ValidateWorkflowProcessors | ToolName::ValidateWorkflowImplementation => &[
                "workflow_directory",
                "processors_directory",
                "criteria_directory",
            ],
        }
    }
}

impl FromStr for ToolName {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| WorkflowError::UnknownTool {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table from tool name to handler
pub struct ToolRegistry {
    handlers: IndexMap<ToolName, ToolHandler>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            handlers: ToolName::ALL
                .into_iter()
                .map(|tool| (tool, tool.handler()))
                .collect(),
        }
    }

    /// Process-wide registry, built on first use
    pub fn global() -> &'static ToolRegistry {
        static REGISTRY: OnceLock<ToolRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ToolRegistry::new)
    }

    pub fn names(&self) -> impl Iterator<Item = ToolName> + '_ {
        self.handlers.keys().copied()
    }

    pub fn handler(&self, tool: ToolName) -> Option<ToolHandler> {
        self.handlers.get(&tool).copied()
    }

    /// Look a tool up by name and run it
    pub fn invoke(&self, name: &str, config: &CompilerConfig, params: &ToolParams) -> Result<String> {
        let tool: ToolName = name.parse()?;
        let tool_span = span!(Level::INFO, "invoke_tool", tool = %tool);
        let _enter = tool_span.enter();

        let handler = tool.handler();
        for param in tool.required_params() {
            require_str(params, param)?;
        }
        let output = handler(config, params)?;
        info!(output_len = output.len(), "Tool completed");
        Ok(output)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn require_str<'a>(params: &'a ToolParams, name: &str) -> Result<&'a str, WorkflowError> {
    match params.get(name) {
        None | Some(Value::Null) => Err(WorkflowError::missing_parameter(name)),
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(WorkflowError::invalid_parameter(name, "expected a string")),
    }
}

fn convert_diagram_to_workflow(_config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let outcome = DiagramParser::new().parse(require_str(params, "diagram")?)?;
    Ok(outcome.document.to_json_pretty()?)
}

fn convert_workflow_to_diagram(_config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let document = FsmDocument::from_json_str(require_str(params, "workflow")?)?;
    DiagramSerializer::new().serialize(&document)
}

fn validate_workflow_schema(_config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let value: Value = serde_json::from_str(require_str(params, "workflow")?)?;
    let report = SchemaValidator::new().validate_document(&value);
    if report.is_valid() {
        return Ok("Workflow schema is valid.".to_string());
    }
    let mut lines = vec![format!(
        "Workflow schema validation failed with {} violation(s):",
        report.len()
    )];
    lines.extend(report.violations.iter().map(|v| format!("• {}", v)));
    Ok(lines.join("\n"))
}

fn check_diagram(_config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let issues = DiagramChecker::new().check(require_str(params, "diagram")?);
    if issues.is_empty() {
        return Ok("Diagram is valid.".to_string());
    }
    Ok(issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn extract_workflow_components(config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let path = require_str(params, "workflow_directory")?;
    let format = match params.get("format").and_then(Value::as_str) {
        Some(name) => name
            .parse::<OutputFormat>()
            .map_err(|message| WorkflowError::invalid_parameter("format", message))?,
        None => OutputFormat::default(),
    };
    let result = ComponentExtractor::new(config.extraction.clone()).extract_path(path)?;
    Ok(format.render(&result, &config.scan.extension))
}

fn validate_workflow_processors(config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let report = crossref::validate_workflow_processors(
        config,
        require_str(params, "workflow_directory")?,
        require_str(params, "processors_directory")?,
        require_str(params, "criteria_directory")?,
    )?;
    Ok(report.render_detailed())
}

fn validate_workflow_implementation(config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let report = crossref::validate_workflow_implementation(
        config,
        require_str(params, "workflow_directory")?,
        require_str(params, "processors_directory")?,
        require_str(params, "criteria_directory")?,
    )?;
    Ok(report.render_brief())
}

fn generate_batch_requests(config: &CompilerConfig, params: &ToolParams) -> Result<String> {
    let generator = BatchRequestGenerator::new(config.batch.clone());
    let requests = generator.generate(require_str(params, "diagram")?)?;
    Ok(generator.to_jsonl(&requests)?)
}
