//! Compiler configuration
//!
//! Configuration is an explicit value handed to each component when it is
//! constructed. It can be built in code or loaded from a JSON file; every
//! field has a default so partial files are accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::WorkflowError;

/// How workflow documents are searched for processor and criterion names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Visit every JSON node, collecting `processors[].name` and
    /// `criterion.function.name`
    #[default]
    Recursive,
    /// Walk `states.*.transitions.*`, collecting function actions as
    /// processors and function conditions as criteria
    Structured,
}

impl FromStr for ExtractionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recursive" => Ok(ExtractionStrategy::Recursive),
            "structured" => Ok(ExtractionStrategy::Structured),
            _ => Err(format!("Unknown extraction strategy: {}", s)),
        }
    }
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStrategy::Recursive => write!(f, "recursive"),
            ExtractionStrategy::Structured => write!(f, "structured"),
        }
    }
}

/// How declared processor names map onto implementation file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorNaming {
    /// Use names exactly as written in the workflow
    AsDeclared,
    /// Drop any dotted qualifier and convert snake_case to PascalCase
    #[default]
    PascalCase,
}

/// What directory-mode extraction does when no documents are found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDocuments {
    /// Return empty sets
    #[default]
    Empty,
    /// Fail with `WorkflowError::NoDocumentsFound`
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub strategy: ExtractionStrategy,
    pub processor_naming: ProcessorNaming,
    pub missing_documents: MissingDocuments,
    /// Descend into subdirectories when looking for `.json` documents
    pub recursive: bool,
}

impl ExtractionConfig {
    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_processor_naming(mut self, naming: ProcessorNaming) -> Self {
        self.processor_naming = naming;
        self
    }

    pub fn with_missing_documents(mut self, policy: MissingDocuments) -> Self {
        self.missing_documents = policy;
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Implementation directory scanning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extension of implementation files, with or without the leading dot
    pub extension: String,
    pub recursive: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extension: "java".to_string(),
            recursive: true,
        }
    }
}

impl ScanConfig {
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Extension with exactly one leading dot
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }
}

/// Envelope settings for generated batch requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub model: String,
    pub url: String,
    pub max_tokens: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            url: "/v1/chat/completions".to_string(),
            max_tokens: 5000,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub extraction: ExtractionConfig,
    pub scan: ScanConfig,
    pub batch: BatchConfig,
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_scan(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    pub fn from_json_str(input: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WorkflowError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
