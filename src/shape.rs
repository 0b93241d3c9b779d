//! Projected response shapes.
//!
//! A [`ProjectedShape`] maps output keys to [`FieldShape`]s in the order the
//! keys first appear in the query. Shapes render as TypeScript type literals
//! through `Display` (`{:#}` spreads them over several lines) and serialize
//! to JSON through serde.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};

use crate::schema::ColumnType;

/// How many related rows an embedded resource yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// A single related row (to-one relationship).
    One,
    /// A list of related rows (to-many relationship).
    Many,
    /// Not determinable from the query and the catalog alone.
    OneOrMany,
}

impl Cardinality {
    /// Combine two cardinalities reported for the same key.
    pub fn merge(self, other: Cardinality) -> Cardinality {
        if self == other {
            self
        } else {
            Cardinality::OneOrMany
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::One => write!(f, "one"),
            Cardinality::Many => write!(f, "many"),
            Cardinality::OneOrMany => write!(f, "one-or-many"),
        }
    }
}

/// The value under one output key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldShape {
    /// A column, typed per the catalog.
    Scalar(ColumnType),
    /// An embedded resource.
    Relation {
        cardinality: Cardinality,
        shape: ProjectedShape,
    },
    /// Several incompatible values selected under the same key.
    Intersection { all_of: Vec<FieldShape> },
}

impl FieldShape {
    /// Merge two values selected under the same key.
    ///
    /// Equal scalars collapse, relations merge field by field, anything else
    /// becomes an intersection. Merging a value with itself is a no-op.
    pub fn merge(self, other: FieldShape) -> FieldShape {
        match (self, other) {
            (FieldShape::Scalar(a), FieldShape::Scalar(b)) if a == b => FieldShape::Scalar(a),
            (
                FieldShape::Relation {
                    cardinality: c1,
                    shape: mut s1,
                },
                FieldShape::Relation {
                    cardinality: c2,
                    shape: s2,
                },
            ) => {
                s1.merge(s2);
                FieldShape::Relation {
                    cardinality: c1.merge(c2),
                    shape: s1,
                }
            }
            (a, b) => {
                let mut members = Vec::new();
                for part in a.into_members().into_iter().chain(b.into_members()) {
                    absorb(&mut members, part);
                }
                members.sort_by_key(member_rank);
                if members.len() == 1 {
                    members.remove(0)
                } else {
                    FieldShape::Intersection { all_of: members }
                }
            }
        }
    }

    fn into_members(self) -> Vec<FieldShape> {
        match self {
            FieldShape::Intersection { all_of } => all_of,
            other => vec![other],
        }
    }

    pub fn as_scalar(&self) -> Option<&ColumnType> {
        match self {
            FieldShape::Scalar(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<(Cardinality, &ProjectedShape)> {
        match self {
            FieldShape::Relation { cardinality, shape } => Some((*cardinality, shape)),
            _ => None,
        }
    }

    fn render(&self, out: &mut String, indent: Option<usize>) {
        match self {
            FieldShape::Scalar(ty) => out.push_str(ty.as_str()),
            FieldShape::Relation { cardinality, shape } => {
                let mut object = String::new();
                shape.render(&mut object, indent);
                match cardinality {
                    Cardinality::One => out.push_str(&object),
                    Cardinality::Many => {
                        let _ = write!(out, "{}[]", object);
                    }
                    Cardinality::OneOrMany => {
                        let _ = write!(out, "{} | {}[]", object, object);
                    }
                }
            }
            FieldShape::Intersection { all_of } => {
                for (i, member) in all_of.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" & ");
                    }
                    let mut part = String::new();
                    member.render(&mut part, indent);
                    if matches!(
                        member,
                        FieldShape::Relation {
                            cardinality: Cardinality::OneOrMany,
                            ..
                        }
                    ) {
                        let _ = write!(out, "({})", part);
                    } else {
                        out.push_str(&part);
                    }
                }
            }
        }
    }
}

/// Intersection members are ordered scalars first, by type name, then the
/// relation, so sibling order in the query does not affect the shape.
fn member_rank(member: &FieldShape) -> (u8, String) {
    match member {
        FieldShape::Scalar(ty) => (0, ty.as_str().to_string()),
        FieldShape::Relation { .. } => (1, String::new()),
        FieldShape::Intersection { .. } => (2, String::new()),
    }
}

/// Add `part` to an intersection, folding it into an equal scalar or an
/// existing relation.
fn absorb(members: &mut Vec<FieldShape>, part: FieldShape) {
    if let FieldShape::Relation { .. } = part {
        if let Some(pos) = members
            .iter()
            .position(|m| matches!(m, FieldShape::Relation { .. }))
        {
            let existing = members.remove(pos);
            members.insert(pos, existing.merge(part));
            return;
        }
    }
    if !members.contains(&part) {
        members.push(part);
    }
}

impl fmt::Display for FieldShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, f.alternate().then_some(0));
        f.write_str(&out)
    }
}

/// Output keys of a response object and their shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectedShape(IndexMap<String, FieldShape>);

impl ProjectedShape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, merging with any value already there.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldShape) {
        let key = key.into();
        match self.0.get_mut(&key) {
            Some(existing) => {
                let placeholder = FieldShape::Intersection { all_of: Vec::new() };
                let current = std::mem::replace(existing, placeholder);
                *existing = current.merge(value);
            }
            None => {
                self.0.insert(key, value);
            }
        }
    }

    /// Merge every key of `other` into `self`.
    pub fn merge(&mut self, other: ProjectedShape) {
        for (key, value) in other.0 {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldShape> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldShape)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `indent` is `None` for single-line output, otherwise the current
    /// nesting level.
    fn render(&self, out: &mut String, indent: Option<usize>) {
        if self.0.is_empty() {
            out.push_str("{}");
            return;
        }
        match indent {
            None => {
                out.push_str("{ ");
                for (i, (key, value)) in self.0.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let _ = write!(out, "{}: ", key);
                    value.render(out, None);
                }
                out.push_str(" }");
            }
            Some(level) => {
                let pad = "  ".repeat(level + 1);
                out.push_str("{\n");
                for (key, value) in &self.0 {
                    let _ = write!(out, "{}{}: ", pad, key);
                    value.render(out, Some(level + 1));
                    out.push_str(";\n");
                }
                let _ = write!(out, "{}}}", "  ".repeat(level));
            }
        }
    }
}

impl fmt::Display for ProjectedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.render(&mut out, f.alternate().then_some(0));
        f.write_str(&out)
    }
}

impl FromIterator<(String, FieldShape)> for ProjectedShape {
    fn from_iter<I: IntoIterator<Item = (String, FieldShape)>>(iter: I) -> Self {
        let mut shape = ProjectedShape::new();
        for (key, value) in iter {
            shape.insert(key, value);
        }
        shape
    }
}
