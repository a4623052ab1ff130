//! Core error types for workflow compilation
//!
//! This module defines the error type shared by the parser, validator,
//! extractor and cross-referencer.

use std::path::PathBuf;
use thiserror::Error;

use super::diagnostics::SchemaViolation;

/// Core error types for workflow compilation
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Malformed line {line}: {content}")]
    MalformedLine { line: usize, content: String },

    #[error("Unknown action type '{action_type}' at line {line}")]
    UnknownActionType { line: usize, action_type: String },

    #[error("Schema validation failed with {} violation(s)", violations.len())]
    SchemaViolation { violations: Vec<SchemaViolation> },

    #[error("No JSON workflow files found in directory: {}", path.display())]
    NoDocumentsFound { path: PathBuf },

    #[error("Path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },
}

impl WorkflowError {
    /// Create a new malformed line error
    pub fn malformed_line(line: usize, content: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            content: content.into(),
        }
    }

    /// Create a new unknown action type error
    pub fn unknown_action_type(line: usize, action_type: impl Into<String>) -> Self {
        Self::UnknownActionType {
            line,
            action_type: action_type.into(),
        }
    }

    /// Create a new schema violation error from a violation list
    pub fn schema_violation(violations: Vec<SchemaViolation>) -> Self {
        Self::SchemaViolation { violations }
    }

    /// Create a new "no documents found" error
    pub fn no_documents_found(path: impl Into<PathBuf>) -> Self {
        Self::NoDocumentsFound { path: path.into() }
    }

    pub fn missing_parameter(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}
