//! State-diagram plugin
//!
//! Parses workflow state diagrams into FSM documents, serializes documents
//! back to diagrams, and checks diagram structure.

pub mod checker;
pub mod detector;
pub mod grammar;
pub mod parser;
pub mod rename;
pub mod serializer;
pub mod templates;

pub use checker::{DiagramChecker, DiagramIssue, Severity};
pub use detector::DiagramDetector;
pub use grammar::ChumskyExtractor;
pub use parser::{DiagramParser, ParsedLine, ParsedTransition, TransitionShape};
pub use rename::{rename_states, StateMapping, StateRenamer};
pub use serializer::DiagramSerializer;
