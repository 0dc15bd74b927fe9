use std::any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::from_scalar::FromScalar;
use super::record::Record;
use crate::entity::Scalar;
use crate::errors::ProjectionError;

type FieldSetter<T> = Box<dyn Fn(&mut T, &Scalar) -> Result<(), String> + Send + Sync>;

/// A record type that vertices or edges can be projected onto.
///
/// ```rust
/// use agegraph::projection::{Projectable, RecordSchema};
///
/// #[derive(Debug, Default)]
/// struct Person {
///     name: String,
///     age: Option<i64>,
/// }
///
/// impl Projectable for Person {
///     fn schema() -> RecordSchema<Self> {
///         RecordSchema::new()
///             .field("name", |p: &mut Person, v| p.name = v)
///             .field("age", |p: &mut Person, v| p.age = v)
///     }
/// }
/// ```
pub trait Projectable: Default + fmt::Debug + Send + Sync + 'static {
    fn schema() -> RecordSchema<Self>;
}

/// Field name → typed setter table for one record type.
///
/// Field names are stored title-cased, and property keys are title-cased
/// before lookup, so `name`, `Name` and `NAME` all bind the same field.
pub struct RecordSchema<T> {
    fields: HashMap<String, FieldSetter<T>>,
}

impl<T: Default + 'static> Default for RecordSchema<T> {
    fn default() -> Self {
        RecordSchema::new()
    }
}

impl<T: Default + 'static> RecordSchema<T> {
    pub fn new() -> Self {
        RecordSchema {
            fields: HashMap::new(),
        }
    }

    /// Bind property `name` to `setter`. A later binding of the same name
    /// replaces the earlier one.
    pub fn field<V, F>(mut self, name: &str, setter: F) -> Self
    where
        V: FromScalar + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: FieldSetter<T> = Box::new(move |record, value| match V::from_scalar(value) {
            Some(converted) => {
                setter(record, converted);
                Ok(())
            }
            None => Err(V::expected_type()),
        });
        self.fields.insert(title_case(name), setter);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Title-cased names of the bound fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Build a `T` from `properties`.
    ///
    /// Properties without a matching field are skipped. The first property
    /// whose value does not convert fails the whole projection; keys are
    /// visited in sorted order so the reported key is deterministic.
    pub fn project(&self, properties: &HashMap<String, Scalar>) -> Result<T, ProjectionError> {
        let mut record = T::default();

        let mut keys: Vec<&String> = properties.keys().collect();
        keys.sort();

        for key in keys {
            let value = &properties[key];
            match self.fields.get(&title_case(key)) {
                Some(setter) => {
                    setter(&mut record, value).map_err(|expected_type| {
                        ProjectionError::TypeMismatch {
                            key: key.clone(),
                            value: value.clone(),
                            expected_type,
                        }
                    })?;
                }
                None => log::trace!(
                    "Projection: no field for property '{}' on {}",
                    key,
                    any::type_name::<T>()
                ),
            }
        }

        Ok(record)
    }
}

impl<T> fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.fields.keys().collect();
        names.sort();
        f.debug_struct("RecordSchema")
            .field("type", &any::type_name::<T>())
            .field("fields", &names)
            .finish()
    }
}

trait ErasedSchema: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn project_record(
        &self,
        label: &str,
        properties: &HashMap<String, Scalar>,
    ) -> Result<Record, ProjectionError>;
}

impl<T: Default + fmt::Debug + Send + Sync + 'static> ErasedSchema for RecordSchema<T> {
    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn project_record(
        &self,
        label: &str,
        properties: &HashMap<String, Scalar>,
    ) -> Result<Record, ProjectionError> {
        self.project(properties).map(|value| Record::new(label, value))
    }
}

/// Type-erased handle to a [`RecordSchema`], as stored in the registry.
#[derive(Clone)]
pub struct TypeDescriptor {
    schema: Arc<dyn ErasedSchema>,
}

impl TypeDescriptor {
    pub fn of<T: Projectable>() -> Self {
        TypeDescriptor::from_schema(T::schema())
    }

    pub fn from_schema<T: Default + fmt::Debug + Send + Sync + 'static>(
        schema: RecordSchema<T>,
    ) -> Self {
        TypeDescriptor {
            schema: Arc::new(schema),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.schema.type_name()
    }

    /// Project `properties` onto the described type, tagging the result
    /// with `label`.
    pub fn project(
        &self,
        label: &str,
        properties: &HashMap<String, Scalar>,
    ) -> Result<Record, ProjectionError> {
        self.schema.project_record(label, properties)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor")
            .field(&self.type_name())
            .finish()
    }
}

/// Label → record type bindings consulted by the projecting decoder.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `label` to `descriptor`, returning the previous binding.
    pub fn register(
        &mut self,
        label: impl Into<String>,
        descriptor: TypeDescriptor,
    ) -> Option<TypeDescriptor> {
        let label = label.into();
        log::debug!(
            "TypeRegistry: {} -> {}",
            label,
            descriptor.type_name()
        );
        self.types.insert(label, descriptor)
    }

    pub fn register_type<T: Projectable>(&mut self, label: impl Into<String>) -> Option<TypeDescriptor> {
        self.register(label, TypeDescriptor::of::<T>())
    }

    pub fn unregister(&mut self, label: &str) -> Option<TypeDescriptor> {
        self.types.remove(label)
    }

    pub fn get(&self, label: &str) -> Option<&TypeDescriptor> {
        self.types.get(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.types.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

/// Title-case each word: first letter upper, the rest lower. Words are
/// split on whitespace and hyphens; underscores stay inside a word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    for c in s.chars() {
        if c.is_whitespace() || c == '-' {
            word_start = true;
            out.push(c);
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
