//! Plugin orchestrator for coordinating the compiler pipeline
//!
//! The orchestrator wires detection, parsing, serialization, validation,
//! extraction and cross-referencing together so callers can run any step
//! with one shared configuration:
//! Detector → Parser → {Validator, Serializer, Extractor} → Cross-Referencer

use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    CompilerConfig, Detector, FsmDocument, InputKind, ParseOutcome, Parser, Serializer,
};
use crate::plugins::batch::BatchRequestGenerator;
use crate::plugins::crossref::{self, CrossReferenceReport, CrossReferencer};
use crate::plugins::diagram::{DiagramChecker, DiagramDetector, DiagramIssue, DiagramParser, DiagramSerializer};
use crate::plugins::extract::{ComponentExtractor, ExtractionResult};
use crate::plugins::schema::{DocumentDetector, SchemaValidator, ValidationReport};

/// Result of converting input in whichever direction detection picked
#[derive(Debug, Clone, PartialEq)]
pub enum Conversion {
    /// Diagram text compiled into a document
    Document(ParseOutcome),
    /// Document rendered back into diagram text
    Diagram(String),
}

/// Plugin orchestrator that coordinates the entire pipeline
pub struct Orchestrator {
    config: CompilerConfig,
    detectors: Vec<Box<dyn Detector>>,
    parser: DiagramParser,
    serializer: DiagramSerializer,
    validator: SchemaValidator,
}

impl Orchestrator {
    /// Create an orchestrator with no detectors registered
    pub fn new(config: CompilerConfig) -> Self {
        Self {
            config,
            detectors: Vec::new(),
            parser: DiagramParser::new(),
            serializer: DiagramSerializer::new(),
            validator: SchemaValidator::new(),
        }
    }

    /// Create an orchestrator with the diagram and document detectors registered
    pub fn with_default_detectors(config: CompilerConfig) -> Self {
        let mut orchestrator = Self::new(config);
        orchestrator.register_detector(Box::new(DiagramDetector::new()));
        orchestrator.register_detector(Box::new(DocumentDetector::new()));
        orchestrator
    }

    pub fn with_parser(mut self, parser: DiagramParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_serializer(mut self, serializer: DiagramSerializer) -> Self {
        self.serializer = serializer;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Register a detector plugin
    pub fn register_detector(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Input kinds of the registered detectors, in registration order
    pub fn get_detectors(&self) -> Vec<InputKind> {
        self.detectors.iter().map(|d| d.input_kind()).collect()
    }

    /// Pick the input kind whose detector is most confident
    pub fn detect_input_kind(&self, input: &str) -> Result<InputKind> {
        let detect_span = span!(Level::INFO, "detect_input_kind", input_len = input.len());
        let _enter = detect_span.enter();

        let mut best: Option<(InputKind, f64)> = None;
        for detector in &self.detectors {
            let confidence = detector.confidence(input);
            trace!(detector = %detector.input_kind(), confidence, "Checking detector");
            if detector.detect(input) && best.map_or(true, |(_, c)| confidence > c) {
                best = Some((detector.input_kind(), confidence));
            }
        }

        match best {
            Some((kind, confidence)) => {
                info!(input_kind = %kind, confidence, "Detected input kind");
                Ok(kind)
            }
            None => {
                warn!("No suitable detector found for input");
                Err(anyhow::anyhow!("No suitable detector found for input"))
            }
        }
    }

    /// Parse diagram text into a document, keeping skipped-line diagnostics
    pub fn parse(&self, input: &str) -> Result<ParseOutcome> {
        self.parser.parse(input)
    }

    pub fn serialize(&self, document: &FsmDocument) -> Result<String> {
        self.serializer.serialize(document)
    }

    /// Validate a JSON document given as text
    pub fn validate_json(&self, input: &str) -> Result<ValidationReport> {
        let value: Value = serde_json::from_str(input)?;
        Ok(self.validator.validate_document(&value))
    }

    pub fn validate(&self, document: &FsmDocument) -> Result<ValidationReport> {
        Ok(self.validator.validate_fsm(document)?)
    }

    pub fn check(&self, input: &str) -> Vec<DiagramIssue> {
        DiagramChecker::new().check(input)
    }

    /// Extract components from a workflow file or directory
    pub fn extract(&self, path: impl AsRef<Path>) -> Result<ExtractionResult> {
        let extractor = ComponentExtractor::new(self.config.extraction.clone());
        Ok(extractor.extract_path(path)?)
    }

    /// Cross-reference using the configured extraction strategy and policy
    pub fn cross_reference(
        &self,
        workflows: impl AsRef<Path>,
        processors_dir: impl AsRef<Path>,
        criteria_dir: impl AsRef<Path>,
    ) -> Result<CrossReferenceReport> {
        Ok(CrossReferencer::from_config(&self.config).cross_reference(
            workflows,
            processors_dir,
            criteria_dir,
        )?)
    }

    pub fn validate_workflow_processors(
        &self,
        workflows: impl AsRef<Path>,
        processors_dir: impl AsRef<Path>,
        criteria_dir: impl AsRef<Path>,
    ) -> Result<CrossReferenceReport> {
        Ok(crossref::validate_workflow_processors(
            &self.config,
            workflows,
            processors_dir,
            criteria_dir,
        )?)
    }

    pub fn validate_workflow_implementation(
        &self,
        workflows: impl AsRef<Path>,
        processors_dir: impl AsRef<Path>,
        criteria_dir: impl AsRef<Path>,
    ) -> Result<CrossReferenceReport> {
        Ok(crossref::validate_workflow_implementation(
            &self.config,
            workflows,
            processors_dir,
            criteria_dir,
        )?)
    }

    /// Batch requests for a diagram, as JSON lines
    pub fn generate_batch(&self, input: &str) -> Result<String> {
        let generator = BatchRequestGenerator::new(self.config.batch.clone());
        let requests = generator.generate(input)?;
        Ok(generator.to_jsonl(&requests)?)
    }

    /// Detect the input kind and convert to the other representation
    pub fn process(&self, input: &str) -> Result<Conversion> {
        let process_span = span!(Level::INFO, "process_input", input_len = input.len());
        let _enter = process_span.enter();

        match self.detect_input_kind(input)? {
            InputKind::Diagram => {
                let outcome = self.parse(input)?;
                debug!(skipped = outcome.diagnostics.len(), "Compiled diagram");
                Ok(Conversion::Document(outcome))
            }
            InputKind::Document => {
                let document = FsmDocument::from_json_str(input)?;
                let text = self.serialize(&document)?;
                debug!(output_len = text.len(), "Rendered document");
                Ok(Conversion::Diagram(text))
            }
        }
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::with_default_detectors(CompilerConfig::default())
    }
}
