//! Decoded graph values.

use std::fmt;
use std::sync::Arc;

use crate::errors::ProjectionError;
use crate::projection::Projectable;

pub mod graph_objects;
pub mod scalar;

pub use graph_objects::{Edge, Path, PathElement, Vertex};
pub use scalar::Scalar;

/// Discriminant of [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Scalar,
    Vertex,
    Edge,
    Path,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Scalar => "scalar",
            EntityKind::Vertex => "vertex",
            EntityKind::Edge => "edge",
            EntityKind::Path => "path",
        };
        f.write_str(name)
    }
}

/// One decoded graph-value text.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Scalar(Scalar),
    Vertex(Arc<Vertex>),
    Edge(Arc<Edge>),
    Path(Path),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Scalar(_) => EntityKind::Scalar,
            Entity::Vertex(_) => EntityKind::Vertex,
            Entity::Edge(_) => EntityKind::Edge,
            Entity::Path(_) => EntityKind::Path,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Entity::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vertex(&self) -> Option<&Arc<Vertex>> {
        match self {
            Entity::Vertex(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Arc<Edge>> {
        match self {
            Entity::Edge(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Entity::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Project a vertex or edge onto `T`. Scalars and paths have no single
    /// property map and are rejected.
    pub fn project<T: Projectable>(&self) -> Result<T, ProjectionError> {
        match self {
            Entity::Vertex(v) => v.project(),
            Entity::Edge(e) => e.project(),
            other => Err(ProjectionError::UnsupportedEntity(other.kind())),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Scalar(s) => s.fmt(f),
            Entity::Vertex(v) => v.fmt(f),
            Entity::Edge(e) => e.fmt(f),
            Entity::Path(p) => p.fmt(f),
        }
    }
}

impl From<Scalar> for Entity {
    fn from(value: Scalar) -> Self {
        Entity::Scalar(value)
    }
}

impl From<Vertex> for Entity {
    fn from(value: Vertex) -> Self {
        Entity::Vertex(Arc::new(value))
    }
}

impl From<Edge> for Entity {
    fn from(value: Edge) -> Self {
        Entity::Edge(Arc::new(value))
    }
}

impl From<Path> for Entity {
    fn from(value: Path) -> Self {
        Entity::Path(value)
    }
}
