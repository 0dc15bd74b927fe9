//! Decoding sessions.
//!
//! An [`Unmarshaler`] turns graph-value texts into [`Entity`] values. A
//! [`Mapper`] does the same but projects vertices and edges whose label is
//! registered onto the caller's record types. Both keep one identity cache
//! for their whole lifetime, so repeated elements across rows and columns
//! are decoded once.
//!
//! ```rust
//! use agegraph::projection::{Projectable, RecordSchema};
//! use agegraph::unmarshaler::{Mapped, Mapper, Unmarshal};
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//! }
//!
//! impl Projectable for Person {
//!     fn schema() -> RecordSchema<Self> {
//!         RecordSchema::new().field("name", |p: &mut Person, v| p.name = v)
//!     }
//! }
//!
//! let mut mapper = Mapper::new();
//! mapper.register_type::<Person>("Person");
//!
//! let row = mapper
//!     .unmarshal(r#"{"id": 1, "label": "Person", "properties": {"name": "Joe"}}::vertex"#)
//!     .unwrap();
//! match row {
//!     Mapped::Record(record) => assert_eq!(record.downcast::<Person>().unwrap().name, "Joe"),
//!     Mapped::Entity(entity) => panic!("expected a record, got {}", entity),
//! }
//! ```

use std::sync::Arc;

use validator::Validate;

use crate::agtype_parser::ast::AgtypeNode;
use crate::agtype_parser::{AgtypeParser, CollectingErrorListener};
use crate::config::{ConfigError, DecoderConfig};
use crate::entity::{Edge, Entity, Vertex};
use crate::errors::{SyntaxError, UnmarshalError};
use crate::identity_cache::IdentityCache;
use crate::projection::{Projectable, Record, TypeDescriptor, TypeRegistry};
use crate::visitor::TreeVisitor;

/// Result of a projecting decode.
#[derive(Debug)]
pub enum Mapped {
    /// Scalars, paths and vertices or edges with an unregistered label.
    Entity(Entity),
    /// A vertex or edge projected onto its registered type.
    Record(Record),
}

impl Mapped {
    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Mapped::Entity(entity) => Some(entity),
            Mapped::Record(_) => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Mapped::Record(record) => Some(record),
            Mapped::Entity(_) => None,
        }
    }

    pub fn into_record(self) -> Option<Record> {
        match self {
            Mapped::Record(record) => Some(record),
            Mapped::Entity(_) => None,
        }
    }
}

/// Shared shape of both decoder flavours, for code that decodes whole rows.
pub trait Unmarshal {
    type Output;

    fn unmarshal(&mut self, text: &str) -> Result<Self::Output, UnmarshalError>;

    /// Decode every column of one row, stopping at the first failure. The
    /// error carries the index of the failing column.
    fn unmarshal_row<S: AsRef<str>>(
        &mut self,
        columns: &[S],
    ) -> Result<Vec<Self::Output>, UnmarshalError> {
        columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                self.unmarshal(column.as_ref())
                    .map_err(|source| UnmarshalError::Column {
                        index,
                        source: Box::new(source),
                    })
            })
            .collect()
    }
}

/// Decoding session that returns raw entities.
#[derive(Debug, Default)]
pub struct Unmarshaler {
    parser: AgtypeParser,
    cache: IdentityCache,
    config: DecoderConfig,
}

impl Unmarshaler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Unmarshaler {
            parser: AgtypeParser::new(config.max_depth),
            cache: IdentityCache::new(),
            config,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Number of distinct vertices and edges decoded so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// A vertex decoded earlier in this session, e.g. an edge endpoint.
    pub fn vertex(&self, id: i64) -> Option<Arc<Vertex>> {
        self.cache.vertex(id).cloned()
    }

    pub fn edge(&self, id: i64) -> Option<Arc<Edge>> {
        self.cache.edge(id).cloned()
    }

    fn decode<T>(
        &mut self,
        text: &str,
        visit: impl FnOnce(&mut TreeVisitor<'_>, &AgtypeNode<'_>) -> Result<T, UnmarshalError>,
    ) -> Result<T, UnmarshalError> {
        let mut listener = CollectingErrorListener::default();
        let tree = self.parser.parse(text, &mut listener);
        if let Some(error) = listener.into_first() {
            return Err(error.into());
        }
        let tree = tree.ok_or_else(|| SyntaxError {
            offending_text: "<EOF>".to_string(),
            line: 1,
            column: 0,
            message: "unable to parse".to_string(),
        })?;

        let mut visitor = TreeVisitor::new(&mut self.cache, &self.config);
        visit(&mut visitor, &tree)
    }
}

impl Unmarshal for Unmarshaler {
    type Output = Entity;

    fn unmarshal(&mut self, text: &str) -> Result<Entity, UnmarshalError> {
        self.decode(text, |visitor, tree| Ok(visitor.visit(tree)?))
    }
}

/// Decoding session that projects registered labels onto record types.
#[derive(Debug, Default)]
pub struct Mapper {
    unmarshaler: Unmarshaler,
    registry: TypeRegistry,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecoderConfig) -> Result<Self, ConfigError> {
        Ok(Mapper {
            unmarshaler: Unmarshaler::with_config(config)?,
            registry: TypeRegistry::new(),
        })
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Bind `label` to a record type, replacing any earlier binding.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Option<TypeDescriptor> {
        self.registry.register(label, descriptor)
    }

    pub fn register_type<T: Projectable>(&mut self, label: impl Into<String>) -> Option<TypeDescriptor> {
        self.registry.register_type::<T>(label)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DecoderConfig {
        self.unmarshaler.config()
    }

    pub fn cache_len(&self) -> usize {
        self.unmarshaler.cache_len()
    }

    pub fn clear_cache(&mut self) {
        self.unmarshaler.clear_cache();
    }

    pub fn vertex(&self, id: i64) -> Option<Arc<Vertex>> {
        self.unmarshaler.vertex(id)
    }

    pub fn edge(&self, id: i64) -> Option<Arc<Edge>> {
        self.unmarshaler.edge(id)
    }
}

impl Unmarshal for Mapper {
    type Output = Mapped;

    fn unmarshal(&mut self, text: &str) -> Result<Mapped, UnmarshalError> {
        let registry = &self.registry;
        self.unmarshaler
            .decode(text, |visitor, tree| visitor.visit_mapped(tree, registry))
    }
}
