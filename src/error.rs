//! Error types for parsing and projection.

use thiserror::Error;

/// Longest slice of offending input echoed back in an error message.
const SNIPPET_CHARS: usize = 24;

/// Render the offending input for a diagnostic.
fn describe(at: &str) -> String {
    if at.is_empty() {
        return "end of input".to_string();
    }
    let mut chars = at.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("`{}…`", head)
    } else {
        format!("`{}`", head)
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}

/// Failure to parse a select query. Parsing stops at the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token was required but the input was exhausted.
    #[error("unexpected end of input")]
    EmptyInput,

    /// The next character is not in `[0-9A-Za-z_]`.
    #[error("expected identifier at {}", describe(.at))]
    ExpectedIdentifier { at: String },

    /// An embedded resource was opened but never closed.
    #[error("expected ')' at {}", describe(.at))]
    ExpectedCloseParen { at: String },

    /// `()` with nothing inside.
    #[error("expected fields after '('")]
    EmptyEmbeddedResource,

    /// `!hint` not followed by `(...)`.
    #[error("expected embedded resource after hint at {}", describe(.at))]
    MissingEmbeddedResourceAfterHint { at: String },

    /// A complete query was followed by more text.
    #[error("unexpected trailing input: {}", describe(.0))]
    UnexpectedTrailingInput(String),

    /// Embedded resources nested deeper than the configured limit.
    #[error("embedded resources nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Query text longer than the configured limit.
    #[error("query is {len} bytes, limit is {limit}")]
    InputTooLong { len: usize, limit: usize },
}

impl ParseError {
    pub(crate) fn expected_identifier(at: &str) -> Self {
        Self::ExpectedIdentifier { at: at.to_string() }
    }

    pub(crate) fn expected_close_paren(at: &str) -> Self {
        Self::ExpectedCloseParen { at: at.to_string() }
    }

    pub(crate) fn missing_embedded(at: &str) -> Self {
        Self::MissingEmbeddedResourceAfterHint { at: at.to_string() }
    }
}

/// Failure to resolve a parsed query against a schema catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("table '{table}' not found{}", did_you_mean(.suggestion))]
    UnknownTable {
        table: String,
        suggestion: Option<String>,
    },

    #[error("column '{column}' not found in table '{table}'{}", did_you_mean(.suggestion))]
    UnknownColumn {
        table: String,
        column: String,
        suggestion: Option<String>,
    },

    #[error("embedded resources nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

/// Crate-level error for operations that combine parsing, projection and I/O.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// Catalog document could not be read or decoded.
    #[error("schema error: {0}")]
    Schema(String),

    /// Configuration file could not be decoded.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;
