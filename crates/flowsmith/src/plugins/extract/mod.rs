//! Component extraction plugin
//!
//! Collects the processor and criterion names workflow documents reference.

pub mod extractor;
pub mod format;
pub mod naming;

pub use extractor::{ComponentExtractor, ExtractionResult};
pub use format::OutputFormat;
pub use naming::{normalize_processor, snake_to_pascal_case};
