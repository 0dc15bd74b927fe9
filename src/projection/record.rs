use std::any::{self, Any};
use std::fmt;

type DebugFn = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

/// A vertex or edge projected onto a registered record type.
///
/// The concrete type is erased; recover it with [`Record::downcast`] or
/// [`Record::downcast_ref`].
pub struct Record {
    label: String,
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
    debug: DebugFn,
}

impl Record {
    pub fn new<T: Any + fmt::Debug + Send + Sync>(label: impl Into<String>, value: T) -> Self {
        Record {
            label: label.into(),
            type_name: any::type_name::<T>(),
            value: Box::new(value),
            debug: debug_as::<T>,
        }
    }

    /// Label of the vertex or edge this record was projected from.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Take the value out as `T`, or get the record back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Record> {
        let Record {
            label,
            type_name,
            value,
            debug,
        } = self;
        match value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(value) => Err(Record {
                label,
                type_name,
                value,
                debug,
            }),
        }
    }
}

fn debug_as<T: Any + fmt::Debug>(
    value: &(dyn Any + Send + Sync),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(v) => v.fmt(f),
        None => f.write_str("<unknown>"),
    }
}

struct ErasedValue<'a>(&'a Record);

impl fmt::Debug for ErasedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.0.debug)(self.0.value.as_ref(), f)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("label", &self.label)
            .field("type_name", &self.type_name)
            .field("value", &ErasedValue(self))
            .finish()
    }
}
