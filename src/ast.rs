//! Syntax tree for select queries.
//!
//! A query is an ordered list of [`Node`]s. Nodes render back to the
//! canonical compact query text through `Display`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// `*`
    Wildcard,
    /// `field`, `alias:field`, `field(...)`, `alias:field!hint(...)`
    Field(Field),
}

/// A selected column or an embedded resource.
///
/// `hint` is only ever set together with `children`, and `children` is never
/// an empty list. The parser upholds both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Output key.
    pub name: String,
    /// Column or relation name in the schema.
    pub source_column: String,
    /// Foreign-key disambiguation, `!hint`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Fields of the embedded resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}

impl Field {
    /// A plain column, `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            source_column: name.clone(),
            name,
            hint: None,
            children: None,
        }
    }

    /// A renamed column, `name:source_column`.
    pub fn renamed(name: impl Into<String>, source_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_column: source_column.into(),
            hint: None,
            children: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    /// True when the output key differs from the schema name.
    pub fn is_renamed(&self) -> bool {
        self.name != self.source_column
    }

    /// True when this field selects a related resource.
    pub fn is_embedded(&self) -> bool {
        self.children.is_some()
    }
}

impl Node {
    pub fn field(name: impl Into<String>) -> Self {
        Node::Field(Field::new(name))
    }

    pub fn renamed(name: impl Into<String>, source_column: impl Into<String>) -> Self {
        Node::Field(Field::renamed(name, source_column))
    }

    /// An embedded resource without a rename, `name(children)`.
    pub fn embedded(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Field(Field::new(name).with_children(children))
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Node::Wildcard => None,
            Node::Field(field) => Some(field),
        }
    }

    /// Deepest level of embedded resources below this node.
    pub fn depth(&self) -> usize {
        match self {
            Node::Field(Field {
                children: Some(children),
                ..
            }) => 1 + children.iter().map(Node::depth).max().unwrap_or(0),
            _ => 0,
        }
    }
}

impl From<Field> for Node {
    fn from(field: Field) -> Self {
        Node::Field(field)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Wildcard => write!(f, "*"),
            Node::Field(field) => write!(f, "{}", field),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // A hint is only accepted after the `name:source` form.
        if self.is_renamed() || self.hint.is_some() {
            write!(f, "{}:{}", self.name, self.source_column)?;
        } else {
            write!(f, "{}", self.name)?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "!{}", hint)?;
        }
        if let Some(children) = &self.children {
            write!(f, "({})", to_query(children))?;
        }
        Ok(())
    }
}

/// Render a node list as compact query text.
pub fn to_query(nodes: &[Node]) -> String {
    nodes
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
