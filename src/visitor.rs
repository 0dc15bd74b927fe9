//! Parse tree → decoded value.
//!
//! The visitor walks one [`AgtypeNode`] and produces exactly one value.
//! Vertices and edges go through the session's [`IdentityCache`]: every
//! reserved key is checked first, and a cached id then returns the stored
//! element without decoding its properties again.

use std::collections::HashMap;
use std::sync::Arc;

use crate::agtype_parser::ast::{AgtypeNode, ObjectNode, PathElementNode, PathNode, ValueNode};
use crate::config::DecoderConfig;
use crate::entity::{Edge, Entity, EntityKind, Path, PathElement, Scalar, Vertex};
use crate::errors::{MalformedEntity, ProjectionError, UnmarshalError};
use crate::identity_cache::{CachedElement, IdentityCache};
use crate::projection::{Record, TypeRegistry};
use crate::unmarshaler::Mapped;

const ID_KEY: &str = "id";
const LABEL_KEY: &str = "label";
const PROPERTIES_KEY: &str = "properties";
const START_ID_KEY: &str = "start_id";
const END_ID_KEY: &str = "end_id";

pub(crate) struct TreeVisitor<'s> {
    cache: &'s mut IdentityCache,
    config: &'s DecoderConfig,
}

impl<'s> TreeVisitor<'s> {
    pub(crate) fn new(cache: &'s mut IdentityCache, config: &'s DecoderConfig) -> Self {
        TreeVisitor { cache, config }
    }

    pub(crate) fn visit(&mut self, node: &AgtypeNode<'_>) -> Result<Entity, MalformedEntity> {
        match node {
            AgtypeNode::Value(value) => Ok(Entity::Scalar(visit_value(value))),
            AgtypeNode::Vertex(object) => self.visit_vertex(object).map(Entity::Vertex),
            AgtypeNode::Edge(object) => self.visit_edge(object).map(Entity::Edge),
            AgtypeNode::Path(path) => self.visit_path(path).map(Entity::Path),
        }
    }

    /// Like [`TreeVisitor::visit`], then project a top-level vertex or edge
    /// whose label is registered. Paths and scalars are never projected.
    pub(crate) fn visit_mapped(
        &mut self,
        node: &AgtypeNode<'_>,
        registry: &TypeRegistry,
    ) -> Result<Mapped, UnmarshalError> {
        let entity = self.visit(node)?;
        match project_registered(&entity, registry)? {
            Some(record) => Ok(Mapped::Record(record)),
            None => Ok(Mapped::Entity(entity)),
        }
    }

    fn visit_vertex(&mut self, object: &ObjectNode<'_>) -> Result<Arc<Vertex>, MalformedEntity> {
        let kind = EntityKind::Vertex;
        let id = required_int(object, ID_KEY, kind)?;
        let label = required_str(object, LABEL_KEY, kind)?;
        let properties = required_properties(object, kind)?;

        if let Some(CachedElement::Vertex(vertex)) = self.cached(id, label, kind)? {
            return Ok(vertex);
        }

        let vertex = Arc::new(Vertex::new(id, label, visit_object(properties)));
        self.cache.insert(CachedElement::Vertex(Arc::clone(&vertex)));
        Ok(vertex)
    }

    fn visit_edge(&mut self, object: &ObjectNode<'_>) -> Result<Arc<Edge>, MalformedEntity> {
        let kind = EntityKind::Edge;
        let id = required_int(object, ID_KEY, kind)?;
        let label = required_str(object, LABEL_KEY, kind)?;
        let start_id = required_int(object, START_ID_KEY, kind)?;
        let end_id = required_int(object, END_ID_KEY, kind)?;
        let properties = required_properties(object, kind)?;

        if let Some(CachedElement::Edge(edge)) = self.cached(id, label, kind)? {
            return Ok(edge);
        }

        let edge = Arc::new(Edge::new(id, label, start_id, end_id, visit_object(properties)));
        self.cache.insert(CachedElement::Edge(Arc::clone(&edge)));
        Ok(edge)
    }

    fn visit_path(&mut self, path: &PathNode<'_>) -> Result<Path, MalformedEntity> {
        log::trace!("TreeVisitor: path with {} elements", path.elements.len());

        let mut elements = Vec::with_capacity(path.elements.len());
        for element in &path.elements {
            let decoded = match element {
                PathElementNode::Vertex(object) => PathElement::Vertex(self.visit_vertex(object)?),
                PathElementNode::Edge(object) => PathElement::Edge(self.visit_edge(object)?),
            };
            elements.push(decoded);
        }

        let path = Path::new(elements)?;
        if self.config.verify_paths {
            path.check_connected()?;
        }
        Ok(path)
    }

    /// Cached element for `id`, after checking it is the same kind and label.
    fn cached(
        &self,
        id: i64,
        label: &str,
        kind: EntityKind,
    ) -> Result<Option<CachedElement>, MalformedEntity> {
        let Some(cached) = self.cache.get(id) else {
            log::trace!("TreeVisitor: cache miss for {} {}", kind, id);
            return Ok(None);
        };

        if cached.kind() != kind {
            return Err(MalformedEntity::new(
                kind,
                format!("id {} was already decoded as a {}", id, cached.kind()),
            ));
        }
        if cached.label() != label {
            if self.config.strict_identity {
                return Err(MalformedEntity::new(
                    kind,
                    format!(
                        "id {} was already decoded with label '{}', found '{}'",
                        id,
                        cached.label(),
                        label
                    ),
                ));
            }
            log::warn!(
                "TreeVisitor: {} {} relabelled from '{}' to '{}', keeping the cached one",
                kind,
                id,
                cached.label(),
                label
            );
        }

        log::trace!("TreeVisitor: cache hit for {} {}", kind, id);
        Ok(Some(cached.clone()))
    }
}

fn project_registered(
    entity: &Entity,
    registry: &TypeRegistry,
) -> Result<Option<Record>, ProjectionError> {
    let (label, properties) = match entity {
        Entity::Vertex(vertex) => (vertex.label(), vertex.properties()),
        Entity::Edge(edge) => (edge.label(), edge.properties()),
        Entity::Scalar(_) | Entity::Path(_) => return Ok(None),
    };
    match registry.get(label) {
        Some(descriptor) => descriptor.project(label, properties).map(Some),
        None => Ok(None),
    }
}

fn visit_value(node: &ValueNode<'_>) -> Scalar {
    match node {
        ValueNode::Null => Scalar::Null,
        ValueNode::Bool(b) => Scalar::Bool(*b),
        ValueNode::Integer(i) => Scalar::Integer(*i),
        ValueNode::Float(f) => Scalar::Float(*f),
        ValueNode::String(s) => Scalar::String(s.to_string()),
        ValueNode::Array(items) => Scalar::List(items.iter().map(visit_value).collect()),
        ValueNode::Object(object) => Scalar::Map(visit_object(object)),
    }
}

// Later duplicates overwrite earlier ones.
fn visit_object(object: &ObjectNode<'_>) -> HashMap<String, Scalar> {
    object
        .pairs
        .iter()
        .map(|(key, value)| (key.to_string(), visit_value(value)))
        .collect()
}

fn required<'n, 'a>(
    object: &'n ObjectNode<'a>,
    key: &str,
    kind: EntityKind,
) -> Result<&'n ValueNode<'a>, MalformedEntity> {
    object
        .get(key)
        .ok_or_else(|| MalformedEntity::new(kind, format!("missing reserved key '{}'", key)))
}

fn required_int(object: &ObjectNode<'_>, key: &str, kind: EntityKind) -> Result<i64, MalformedEntity> {
    match required(object, key, kind)? {
        ValueNode::Integer(i) => Ok(*i),
        other => Err(wrong_kind(kind, key, "an integer", other)),
    }
}

fn required_str<'n>(
    object: &'n ObjectNode<'_>,
    key: &str,
    kind: EntityKind,
) -> Result<&'n str, MalformedEntity> {
    match required(object, key, kind)? {
        ValueNode::String(s) => Ok(s.as_ref()),
        other => Err(wrong_kind(kind, key, "a string", other)),
    }
}

fn required_properties<'n, 'a>(
    object: &'n ObjectNode<'a>,
    kind: EntityKind,
) -> Result<&'n ObjectNode<'a>, MalformedEntity> {
    match required(object, PROPERTIES_KEY, kind)? {
        ValueNode::Object(properties) => Ok(properties),
        other => Err(wrong_kind(kind, PROPERTIES_KEY, "an object", other)),
    }
}

fn wrong_kind(kind: EntityKind, key: &str, expected: &str, found: &ValueNode<'_>) -> MalformedEntity {
    let found = match found {
        ValueNode::Null => "null",
        ValueNode::Bool(_) => "a boolean",
        ValueNode::Integer(_) => "an integer",
        ValueNode::Float(_) => "a float",
        ValueNode::String(_) => "a string",
        ValueNode::Array(_) => "an array",
        ValueNode::Object(_) => "an object",
    };
    MalformedEntity::new(
        kind,
        format!("reserved key '{}' must be {}, found {}", key, expected, found),
    )
}
