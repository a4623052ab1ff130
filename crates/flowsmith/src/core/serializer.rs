//! Core serializer trait for document output
//!
//! This trait defines the interface for turning an [`FsmDocument`] back into
//! an external format.

use anyhow::Result;

use super::FsmDocument;

/// Core trait for document serializers
///
/// # Example
/// ```
/// use flowsmith::core::{FsmDocument, Serializer, Transition};
/// use flowsmith::plugins::diagram::DiagramSerializer;
///
/// let mut doc = FsmDocument::new();
/// doc.add_transition("a", "go", Transition::new("b"));
/// let text = DiagramSerializer::new().serialize(&doc).unwrap();
/// assert!(text.contains("a --> b : go"));
/// ```
pub trait Serializer: Send + Sync {
    /// The output type of this serializer
    type Output;

    /// Serialize the document into the output format
    fn serialize(&self, document: &FsmDocument) -> Result<Self::Output>;

    /// Get the name of this serializer
    fn name(&self) -> &'static str;

    /// Get the version of this serializer
    fn version(&self) -> &'static str;

    /// Get the produced output format
    fn format(&self) -> &'static str;
}
