//! Projection of vertex and edge properties onto user record types.
//!
//! A record type describes its fields once through [`Projectable::schema`].
//! [`TypeRegistry`] binds graph labels to those types so the projecting
//! decoder can turn matching vertices and edges into [`Record`]s.

mod from_scalar;
mod record;
mod registry;

pub use from_scalar::FromScalar;
pub use record::Record;
pub use registry::{title_case, Projectable, RecordSchema, TypeDescriptor, TypeRegistry};
