//! Core abstractions for workflow compilation
//!
//! This module defines the document model, the error and diagnostic types,
//! configuration, and the traits every plugin implements.

mod action;
pub mod chumsky_utils;
mod config;
mod detector;
mod diagnostics;
mod document;
mod error;
pub mod logging;
mod parser;
mod serializer;
mod syntax;
mod types;

pub use action::*;
pub use config::*;
pub use detector::*;
pub use diagnostics::*;
pub use document::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use serializer::*;
pub use syntax::*;
pub use types::*;
