//! Shared chumsky parser utilities for diagram parsing
//!
//! This module provides the small combinators the statement grammar and the
//! diagram checker are built from.

use chumsky::prelude::*;

/// Parser extra used across the crate
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Parse inline whitespace only (spaces and tabs, no newlines).
///
/// Uses explicit character matching to avoid the "repeated combinator making
/// no progress" issue.
pub fn inline_whitespace<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse required inline whitespace (at least one space or tab).
pub fn inline_whitespace_required<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone
{
    one_of(" \t").repeated().at_least(1).ignored()
}

/// Parse an identifier: letters, digits and underscores.
pub fn identifier<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>()
}

/// Parse the pseudo-state marker `[*]`.
pub fn pseudo_state<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just("[*]").to("[*]".to_string())
}

/// Parse a state reference (either `[*]` or an identifier).
pub fn state_ref<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    pseudo_state().or(identifier())
}

/// Parse a Mermaid-style comment (%% to end of line).
pub fn mermaid_comment<'src>() -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    just("%%").ignore_then(none_of('\n').repeated()).ignored()
}

/// Render parser errors into a single readable reason
pub fn describe_errors(errors: &[Rich<'_, char>]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
