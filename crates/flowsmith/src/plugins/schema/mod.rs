//! Schema plugin
//!
//! Validates FSM documents and their actions against the six action shapes.

pub mod detector;
pub mod validator;

pub use detector::DocumentDetector;
pub use validator::{SchemaValidator, ValidationReport};
