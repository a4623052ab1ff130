//! Batch request plugin
//!
//! Turns diagram lines into offline chat-completion requests.

pub mod generator;

pub use generator::{BatchEnvelope, BatchRequest, BatchRequestGenerator};
