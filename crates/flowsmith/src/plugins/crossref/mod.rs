//! Implementation cross-reference plugin
//!
//! Compares the components a workflow needs with the implementation files
//! present on disk.

pub mod report;
pub mod scanner;

use std::path::Path;

use tracing::{info, span, Level};

use crate::core::{
    CompilerConfig, ExtractionConfig, ExtractionStrategy, MissingDocuments, ScanConfig,
    WorkflowError,
};
use crate::plugins::extract::ComponentExtractor;

pub use report::CrossReferenceReport;
pub use scanner::ImplementationScanner;

/// Runs extraction and scanning, then diffs the two
#[derive(Debug, Clone, Default)]
pub struct CrossReferencer {
    extractor: ComponentExtractor,
    scanner: ImplementationScanner,
}

impl CrossReferencer {
    pub fn new(extraction: ExtractionConfig, scan: ScanConfig) -> Self {
        Self {
            extractor: ComponentExtractor::new(extraction),
            scanner: ImplementationScanner::new(scan),
        }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.extraction.clone(), config.scan.clone())
    }

    /// Cross-reference a workflow file or directory against implementation directories
    pub fn cross_reference(
        &self,
        workflows: impl AsRef<Path>,
        processors_dir: impl AsRef<Path>,
        criteria_dir: impl AsRef<Path>,
    ) -> Result<CrossReferenceReport, WorkflowError> {
        let workflows = workflows.as_ref();
        let xref_span = span!(
            Level::INFO,
            "cross_reference",
            workflows = %workflows.display(),
            strategy = %self.extractor.config().strategy
        );
        let _enter = xref_span.enter();

        let required = self.extractor.extract_path(workflows)?;
        let processors = self.scanner.scan(processors_dir)?;
        let criteria = self.scanner.scan(criteria_dir)?;
        let report = CrossReferenceReport::compute(&required, processors, criteria);

        info!(
            passed = report.passed,
            missing_processors = report.missing_processors.len(),
            missing_criteria = report.missing_criteria.len(),
            "Cross-reference completed"
        );
        Ok(report)
    }
}

/// Recursive extraction where an empty workflow directory simply requires nothing
pub fn validate_workflow_processors(
    config: &CompilerConfig,
    workflows: impl AsRef<Path>,
    processors_dir: impl AsRef<Path>,
    criteria_dir: impl AsRef<Path>,
) -> Result<CrossReferenceReport, WorkflowError> {
    let extraction = config
        .extraction
        .clone()
        .with_strategy(ExtractionStrategy::Recursive)
        .with_missing_documents(MissingDocuments::Empty);
    CrossReferencer::new(extraction, config.scan.clone()).cross_reference(
        workflows,
        processors_dir,
        criteria_dir,
    )
}

/// Structured extraction where finding no workflow documents is an error
pub fn validate_workflow_implementation(
    config: &CompilerConfig,
    workflows: impl AsRef<Path>,
    processors_dir: impl AsRef<Path>,
    criteria_dir: impl AsRef<Path>,
) -> Result<CrossReferenceReport, WorkflowError> {
    let extraction = config
        .extraction
        .clone()
        .with_strategy(ExtractionStrategy::Structured)
        .with_missing_documents(MissingDocuments::Error);
    CrossReferencer::new(extraction, config.scan.clone()).cross_reference(
        workflows,
        processors_dir,
        criteria_dir,
    )
}
