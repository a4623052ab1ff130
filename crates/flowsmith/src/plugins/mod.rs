//! Plugin implementations for each compiler stage
//!
//! Each plugin owns one stage of the pipeline and implements the core traits
//! where they apply.

pub mod batch;
pub mod crossref;
pub mod diagram;
pub mod extract;
pub mod orchestrator;
pub mod schema;
pub mod tools;

pub use batch::{BatchEnvelope, BatchRequest, BatchRequestGenerator};
pub use crossref::{
    validate_workflow_implementation, validate_workflow_processors, CrossReferenceReport,
    CrossReferencer, ImplementationScanner,
};
pub use diagram::{
    rename_states, ChumskyExtractor, DiagramChecker, DiagramDetector, DiagramIssue,
    DiagramParser, DiagramSerializer, ParsedLine, ParsedTransition, Severity, StateMapping,
    StateRenamer, TransitionShape,
};
pub use extract::{
    normalize_processor, snake_to_pascal_case, ComponentExtractor, ExtractionResult,
    OutputFormat,
};
pub use orchestrator::{Conversion, Orchestrator};
pub use schema::{DocumentDetector, SchemaValidator, ValidationReport};
pub use tools::{ToolHandler, ToolName, ToolParams, ToolRegistry};
