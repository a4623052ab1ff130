//! Core detector trait for input identification
//!
//! This trait defines the interface for telling the supported input formats
//! apart before any parsing happens.

use super::InputKind;

/// Core trait for input detectors
///
/// Each supported input format provides a detector that recognizes its
/// patterns and reports how confident it is.
///
/// # Example
/// ```
/// use flowsmith::core::Detector;
/// use flowsmith::plugins::diagram::DiagramDetector;
///
/// let detector = DiagramDetector::new();
/// assert!(detector.detect("stateDiagram-v2\n    [*] --> idle"));
/// ```
pub trait Detector: Send + Sync {
    /// Detect if the input matches this format
    fn detect(&self, input: &str) -> bool {
        self.confidence(input) > 0.5
    }

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// Get the input kind this detector recognizes
    fn input_kind(&self) -> InputKind;

    /// Get key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}
