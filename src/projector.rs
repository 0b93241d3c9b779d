//! Schema projector.
//!
//! Walks a parsed select list against a [`Catalog`] and computes the shape
//! of the object a matching response row would have.

use crate::ast::{Field, Node};
use crate::error::ProjectionError;
use crate::parser::DEFAULT_MAX_DEPTH;
use crate::schema::{did_you_mean, Catalog, Table};
use crate::shape::{Cardinality, FieldShape, ProjectedShape};

/// Resolves select lists against a catalog.
///
/// Embedded relations are tagged with the cardinality the catalog declares
/// for them, or [`Cardinality::OneOrMany`] when it declares none.
pub struct Projector<'c, C: Catalog + ?Sized> {
    catalog: &'c C,
    max_depth: usize,
}

impl<'c, C: Catalog + ?Sized> Projector<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        Self {
            catalog,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit the nesting of embedded resources in hand-built trees.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Project `nodes` against `table`.
    pub fn project(&self, table: &str, nodes: &[Node]) -> Result<ProjectedShape, ProjectionError> {
        tracing::debug!(table, nodes = nodes.len(), "projecting select list");
        self.project_at(table, nodes, 0)
    }

    fn project_at(
        &self,
        table: &str,
        nodes: &[Node],
        depth: usize,
    ) -> Result<ProjectedShape, ProjectionError> {
        let columns = self.table(table)?;
        let mut shape = ProjectedShape::new();

        for node in nodes {
            match node {
                Node::Wildcard => {
                    for (name, ty) in columns {
                        shape.insert(name.clone(), FieldShape::Scalar(ty.clone()));
                    }
                }
                Node::Field(field) => {
                    let value = self.field(table, columns, field, depth)?;
                    shape.insert(field.name.clone(), value);
                }
            }
        }

        Ok(shape)
    }

    fn field(
        &self,
        table: &str,
        columns: &Table,
        field: &Field,
        depth: usize,
    ) -> Result<FieldShape, ProjectionError> {
        let Some(children) = &field.children else {
            return match columns.get(&field.source_column) {
                Some(ty) => Ok(FieldShape::Scalar(ty.clone())),
                None => Err(ProjectionError::UnknownColumn {
                    table: table.to_string(),
                    column: field.source_column.clone(),
                    suggestion: did_you_mean(
                        &field.source_column,
                        columns.keys().map(String::as_str),
                    ),
                }),
            };
        };

        if depth >= self.max_depth {
            return Err(ProjectionError::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let shape = self.project_at(&field.source_column, children, depth + 1)?;
        let cardinality = self
            .catalog
            .relationship(table, &field.source_column, field.hint.as_deref())
            .unwrap_or(Cardinality::OneOrMany);

        tracing::trace!(
            from = table,
            to = field.source_column.as_str(),
            %cardinality,
            "resolved embedded resource"
        );
        Ok(FieldShape::Relation { cardinality, shape })
    }

    fn table(&self, name: &str) -> Result<&'c Table, ProjectionError> {
        self.catalog
            .lookup_table(name)
            .ok_or_else(|| ProjectionError::UnknownTable {
                table: name.to_string(),
                suggestion: did_you_mean(name, self.catalog.table_names()),
            })
    }
}

/// Project `nodes` against `table` with default limits.
pub fn project<C: Catalog + ?Sized>(
    catalog: &C,
    table: &str,
    nodes: &[Node],
) -> Result<ProjectedShape, ProjectionError> {
    Projector::new(catalog).project(table, nodes)
}
