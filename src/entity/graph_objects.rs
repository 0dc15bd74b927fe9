//! Vertices, edges and paths decoded from agtype.
//!
//! # Text form
//!
//! ```text
//! {"id": 844424930131969, "label": "Person", "properties": {"name": "Joe"}}::vertex
//! {"id": 1125899906842625, "label": "workWith", "end_id": 844424930131969,
//!  "start_id": 844424930131971, "properties": {"weight": 3}}::edge
//! [vertex, edge, vertex, ...]::path
//! ```
//!
//! Vertices and edges are immutable once built. A [`Path`] shares them through
//! `Arc`, so the same element decoded twice in one session is stored once.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::scalar::{write_map, write_quoted, Scalar};
use super::EntityKind;
use crate::errors::{IndexOutOfRange, MalformedEntity, ProjectionError};
use crate::projection::Projectable;

/// A graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: i64,
    label: String,
    properties: HashMap<String, Scalar>,
}

impl Vertex {
    pub fn new(id: i64, label: impl Into<String>, properties: HashMap<String, Scalar>) -> Self {
        Vertex {
            id,
            label: label.into(),
            properties,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn properties(&self) -> &HashMap<String, Scalar> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Scalar> {
        self.properties.get(key)
    }

    /// Project this vertex's properties onto `T`.
    pub fn project<T: Projectable>(&self) -> Result<T, ProjectionError> {
        T::schema().project(&self.properties)
    }
}

/// A graph relationship. Endpoints are held as ids, not as vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: i64,
    label: String,
    start_id: i64,
    end_id: i64,
    properties: HashMap<String, Scalar>,
}

impl Edge {
    pub fn new(
        id: i64,
        label: impl Into<String>,
        start_id: i64,
        end_id: i64,
        properties: HashMap<String, Scalar>,
    ) -> Self {
        Edge {
            id,
            label: label.into(),
            start_id,
            end_id,
            properties,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start_id(&self) -> i64 {
        self.start_id
    }

    pub fn end_id(&self) -> i64 {
        self.end_id
    }

    pub fn properties(&self) -> &HashMap<String, Scalar> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Scalar> {
        self.properties.get(key)
    }

    /// True when this edge joins `a` and `b`, in either direction.
    pub fn connects(&self, a: i64, b: i64) -> bool {
        (self.start_id == a && self.end_id == b) || (self.start_id == b && self.end_id == a)
    }

    /// The endpoint opposite `vertex_id`, if `vertex_id` is an endpoint.
    pub fn other_end(&self, vertex_id: i64) -> Option<i64> {
        if self.start_id == vertex_id {
            Some(self.end_id)
        } else if self.end_id == vertex_id {
            Some(self.start_id)
        } else {
            None
        }
    }

    pub fn project<T: Projectable>(&self) -> Result<T, ProjectionError> {
        T::schema().project(&self.properties)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathElement {
    Vertex(Arc<Vertex>),
    Edge(Arc<Edge>),
}

impl PathElement {
    pub fn id(&self) -> i64 {
        match self {
            PathElement::Vertex(v) => v.id(),
            PathElement::Edge(e) => e.id(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            PathElement::Vertex(_) => EntityKind::Vertex,
            PathElement::Edge(_) => EntityKind::Edge,
        }
    }

    pub fn as_vertex(&self) -> Option<&Arc<Vertex>> {
        match self {
            PathElement::Vertex(v) => Some(v),
            PathElement::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Arc<Edge>> {
        match self {
            PathElement::Edge(e) => Some(e),
            PathElement::Vertex(_) => None,
        }
    }
}

/// Alternating `[vertex, edge, vertex, ..., vertex]` sequence.
///
/// Positions are absolute: even indices hold vertices, odd indices edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
}

impl Path {
    /// Build a path, checking the alternating shape.
    ///
    /// Connectivity is checked separately by [`Path::check_connected`].
    pub fn new(elements: Vec<PathElement>) -> Result<Self, MalformedEntity> {
        if elements.is_empty() {
            return Err(MalformedEntity::new(
                EntityKind::Path,
                "a path needs at least one vertex",
            ));
        }
        if elements.len() % 2 == 0 {
            return Err(MalformedEntity::new(
                EntityKind::Path,
                format!("a path must end with a vertex, got {} elements", elements.len()),
            ));
        }
        for (index, element) in elements.iter().enumerate() {
            let expected = expected_kind(index);
            if element.kind() != expected {
                return Err(MalformedEntity::new(
                    EntityKind::Path,
                    format!("expected {} at element {}, found {}", expected, index, element.kind()),
                ));
            }
        }
        Ok(Path { elements })
    }

    /// Every edge must join the vertices on either side of it.
    pub fn check_connected(&self) -> Result<(), MalformedEntity> {
        for (index, window) in self.elements.windows(3).enumerate().step_by(2) {
            if let [PathElement::Vertex(from), PathElement::Edge(edge), PathElement::Vertex(to)] =
                window
            {
                if !edge.connects(from.id(), to.id()) {
                    return Err(MalformedEntity::new(
                        EntityKind::Path,
                        format!(
                            "edge {} at position {} joins {} and {}, not {} and {}",
                            edge.id(),
                            index + 1,
                            edge.start_id(),
                            edge.end_id(),
                            from.id(),
                            to.id()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Number of elements (vertices plus edges).
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.elements.len() / 2
    }

    pub fn get(&self, index: usize) -> Option<&PathElement> {
        self.elements.get(index)
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    pub fn vertex_at(&self, index: usize) -> Result<&Arc<Vertex>, IndexOutOfRange> {
        self.elements
            .get(index)
            .and_then(PathElement::as_vertex)
            .ok_or(IndexOutOfRange {
                index,
                len: self.elements.len(),
                expected: EntityKind::Vertex,
            })
    }

    pub fn edge_at(&self, index: usize) -> Result<&Arc<Edge>, IndexOutOfRange> {
        self.elements
            .get(index)
            .and_then(PathElement::as_edge)
            .ok_or(IndexOutOfRange {
                index,
                len: self.elements.len(),
                expected: EntityKind::Edge,
            })
    }

    pub fn start(&self) -> Option<&Arc<Vertex>> {
        self.elements.first().and_then(PathElement::as_vertex)
    }

    pub fn end(&self) -> Option<&Arc<Vertex>> {
        self.elements.last().and_then(PathElement::as_vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Arc<Vertex>> {
        self.elements.iter().filter_map(PathElement::as_vertex)
    }

    pub fn edges(&self) -> impl Iterator<Item = &Arc<Edge>> {
        self.elements.iter().filter_map(PathElement::as_edge)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

fn expected_kind(index: usize) -> EntityKind {
    if index % 2 == 0 {
        EntityKind::Vertex
    } else {
        EntityKind::Edge
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"id\": {}, \"label\": ", self.id)?;
        write_quoted(&self.label, f)?;
        f.write_str(", \"properties\": ")?;
        write_map(&self.properties, f)?;
        f.write_str("}::vertex")
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"id\": {}, \"label\": ", self.id)?;
        write_quoted(&self.label, f)?;
        write!(
            f,
            ", \"end_id\": {}, \"start_id\": {}, \"properties\": ",
            self.end_id, self.start_id
        )?;
        write_map(&self.properties, f)?;
        f.write_str("}::edge")
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Vertex(v) => v.fmt(f),
            PathElement::Edge(e) => e.fmt(f),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            element.fmt(f)?;
        }
        f.write_str("]::path")
    }
}
