//! # postgrest-select
//!
//! Parses the PostgREST select syntax and computes the shape of the response
//! it would produce against a schema.
//!
//! ## Quick Example
//!
//! ```rust
//! use postgrest_select::prelude::*;
//!
//! let catalog = SchemaCatalog::new()
//!     .with_table("workspaces", &[("id", "string"), ("name", "string")])
//!     .with_table("members", &[("workspace_id", "string"), ("user_id", "string")]);
//!
//! let nodes = postgrest_select::parse("*, team:members(user_id)").unwrap();
//! let shape = project(&catalog, "workspaces", &nodes).unwrap();
//!
//! assert_eq!(
//!     shape.to_string(),
//!     "{ id: string; name: string; team: { user_id: string } | { user_id: string }[] }"
//! );
//! ```
//!
//! ## Syntax
//!
//! | Form                      | Meaning                                   |
//! |---------------------------|-------------------------------------------|
//! | `*`                       | Every column of the table                 |
//! | `col`                     | One column                                |
//! | `alias:col`               | One column under another key              |
//! | `rel(...)`                | Embedded related resource                 |
//! | `alias:rel!hint(...)`     | Embedded resource via a named foreign key |

pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod projector;
pub mod schema;
pub mod shape;

pub mod prelude {
    pub use crate::ast::{to_query, Field, Node};
    pub use crate::config::Config;
    pub use crate::error::{Error, ParseError, ProjectionError};
    pub use crate::parser::{parse_query, Parser, ParserOptions};
    pub use crate::projector::{project, Projector};
    pub use crate::schema::{Catalog, ColumnType, Relationship, SchemaCatalog, Table};
    pub use crate::shape::{Cardinality, FieldShape, ProjectedShape};
}

/// Parse a select query into its node list.
///
/// # Example
///
/// ```
/// use postgrest_select::{parse, ast::Node};
///
/// let nodes = parse("id, author:users(name)").unwrap();
/// assert_eq!(nodes[0], Node::field("id"));
/// ```
pub fn parse(input: &str) -> Result<Vec<ast::Node>, error::ParseError> {
    parser::parse_query(input)
}

/// Parse `query` and project it against `table` in one step.
pub fn parse_and_project<C: schema::Catalog + ?Sized>(
    catalog: &C,
    table: &str,
    query: &str,
) -> error::Result<shape::ProjectedShape> {
    let nodes = parse(query)?;
    Ok(projector::project(catalog, table, &nodes)?)
}
