//! Schema catalog: tables, their column types, and optional relationship
//! cardinalities.
//!
//! How the catalog is acquired (database introspection, an API description)
//! is up to the caller. [`SchemaCatalog`] can be built in code or loaded from
//! an already-serialized JSON or TOML document:
//!
//! ```json
//! {
//!   "tables": {
//!     "users": { "id": "string", "email": "string" }
//!   },
//!   "relationships": [
//!     { "from": "posts", "to": "users", "cardinality": "one" }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use strsim::levenshtein;

use crate::error::{Error, Result};
use crate::shape::Cardinality;

/// Opaque value-type descriptor copied into projected shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnType(pub String);

impl ColumnType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column name to type, in declaration order.
pub type Table = IndexMap<String, ColumnType>;

/// Read access to a schema, as needed by the projector.
pub trait Catalog {
    /// Columns of `name`, or `None` when the table is unknown.
    fn lookup_table(&self, name: &str) -> Option<&Table>;

    /// Known table names, used for "did you mean" suggestions.
    fn table_names(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Declared cardinality of the relation embedded from `from` to `to`.
    ///
    /// `None` means the catalog does not know, and the projector reports the
    /// relation as [`Cardinality::OneOrMany`].
    fn relationship(&self, _from: &str, _to: &str, _hint: Option<&str>) -> Option<Cardinality> {
        None
    }
}

impl Catalog for IndexMap<String, Table> {
    fn lookup_table(&self, name: &str) -> Option<&Table> {
        self.get(name)
    }

    fn table_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// A relationship declared by the catalog author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Table the embedding starts from.
    pub from: String,
    /// Embedded table.
    pub to: String,
    /// Foreign-key hint this entry answers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub cardinality: Cardinality,
}

/// An in-memory schema catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default)]
    pub tables: IndexMap<String, Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table and its `(column, type)` pairs.
    pub fn add_table(&mut self, table: &str, cols: &[(&str, &str)]) {
        self.tables.insert(
            table.to_string(),
            cols.iter()
                .map(|(name, ty)| (name.to_string(), ColumnType::from(*ty)))
                .collect(),
        );
    }

    /// Builder form of [`add_table`](Self::add_table).
    pub fn with_table(mut self, table: &str, cols: &[(&str, &str)]) -> Self {
        self.add_table(table, cols);
        self
    }

    /// Declare the cardinality of embedding `to` from `from`.
    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        hint: Option<&str>,
        cardinality: Cardinality,
    ) {
        self.relationships.push(Relationship {
            from: from.to_string(),
            to: to.to_string(),
            hint: hint.map(str::to_string),
            cardinality,
        });
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::Schema(format!("Failed to parse JSON schema: {}", e)))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Schema(format!("Failed to parse TOML schema: {}", e)))
    }

    /// Load a catalog from a `.json` or `.toml` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Schema(format!("Failed to read {}: {}", path.display(), e)))?;

        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            other => {
                return Err(Error::Schema(format!(
                    "Unsupported schema format '{}': expected .json or .toml",
                    other.unwrap_or("")
                )));
            }
        };

        tracing::info!(
            "Loaded {} tables from {}",
            catalog.tables.len(),
            path.display()
        );
        Ok(catalog)
    }
}

impl Catalog for SchemaCatalog {
    fn lookup_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    fn relationship(&self, from: &str, to: &str, hint: Option<&str>) -> Option<Cardinality> {
        let candidates: Vec<&Relationship> = self
            .relationships
            .iter()
            .filter(|r| r.from == from && r.to == to)
            .collect();

        if let Some(hint) = hint {
            if let Some(r) = candidates.iter().find(|r| r.hint.as_deref() == Some(hint)) {
                return Some(r.cardinality);
            }
        }

        // Without a matching hint the answer is only known if every
        // declared relationship between the two tables agrees.
        let first = candidates.first()?.cardinality;
        candidates
            .iter()
            .all(|r| r.cardinality == first)
            .then_some(first)
    }
}

/// Find the closest candidate within a length-dependent Levenshtein distance.
pub(crate) fn did_you_mean<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let threshold = match input.len() {
        0..=2 => 0,
        3..=5 => 2,
        _ => 3,
    };

    let mut best_match = None;
    let mut min_dist = usize::MAX;
    for cand in candidates {
        let dist = levenshtein(input, cand);
        if dist <= threshold && dist < min_dist {
            min_dist = dist;
            best_match = Some(cand.to_string());
        }
    }
    best_match
}
