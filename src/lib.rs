//! AgeGraph - decoder for Apache AGE graph query results
//!
//! AGE returns every result cell as `agtype` text. This crate turns that
//! text into typed values through:
//! - A nom-based `agtype` grammar parser with line/column syntax errors
//! - Vertex, edge and path entities shared through a per-session identity cache
//! - Optional projection of vertices and edges onto caller record types
//!
//! ```rust
//! use agegraph::{Unmarshal, Unmarshaler};
//!
//! let mut unmarshaler = Unmarshaler::new();
//! let entity = unmarshaler
//!     .unmarshal(r#"{"id": 1, "label": "Person", "properties": {"name": "Joe"}}::vertex"#)
//!     .unwrap();
//! assert_eq!(entity.as_vertex().map(|v| v.label()), Some("Person"));
//! ```

pub mod agtype_parser;
pub mod config;
pub mod entity;
pub mod errors;
pub mod identity_cache;
pub mod projection;
pub mod unmarshaler;

mod visitor;

pub use config::{ConfigError, DecoderConfig};
pub use entity::{Edge, Entity, EntityKind, Path, PathElement, Scalar, Vertex};
pub use errors::{IndexOutOfRange, MalformedEntity, ProjectionError, SyntaxError, UnmarshalError};
pub use projection::{Projectable, Record, RecordSchema, TypeRegistry};
pub use unmarshaler::{Mapped, Mapper, Unmarshal, Unmarshaler};
