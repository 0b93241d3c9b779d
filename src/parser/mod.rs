//! Select-query parser.
//!
//! Parses the PostgREST field-selection syntax into a list of [`Node`]s.
//!
//! # Syntax Overview
//!
//! ```text
//! *, team:members!members_workspace_fkey(user:users(id, email))
//! ┬  ──┬─ ───┬─── ──────────┬────────── ───────────┬──────────
//! │    │     │              │                      │
//! │    │     │              │                      └── Embedded resource (children)
//! │    │     │              └── Hint (which foreign key to follow)
//! │    │     └── Source column / relation
//! │    └── Output name (rename)
//! └── Wildcard
//! ```
//!
//! Whitespace is insignificant between tokens.

pub mod nodes;
pub mod tokens;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::error::ParseError;

pub use nodes::{parse_embedded, parse_node, parse_nodes, Embedded};
pub use tokens::{is_identifier_char, is_whitespace, read_identifier, skip_whitespace};

/// Default limit on nested embedded resources.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default limit on query length in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 64 * 1024;

/// Resource limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Maximum nesting of embedded resources.
    pub max_depth: usize,
    /// Maximum query length in bytes.
    pub max_length: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// A select-query parser with its resource limits.
///
/// Holds no state between calls and can be shared freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parse a complete query. The whole input must be consumed.
    pub fn parse_query(&self, input: &str) -> Result<Vec<Node>, ParseError> {
        if input.len() > self.options.max_length {
            return Err(ParseError::InputTooLong {
                len: input.len(),
                limit: self.options.max_length,
            });
        }

        let (nodes, rest) = self.nodes(skip_whitespace(input), 0)?;
        let rest = skip_whitespace(rest);
        if !rest.is_empty() {
            tracing::debug!(remainder = rest, "trailing input after select list");
            return Err(ParseError::UnexpectedTrailingInput(rest.to_string()));
        }

        tracing::trace!(nodes = nodes.len(), "parsed select query");
        Ok(nodes)
    }
}

/// Parse a complete select query with default limits.
pub fn parse_query(input: &str) -> Result<Vec<Node>, ParseError> {
    Parser::default().parse_query(input)
}
