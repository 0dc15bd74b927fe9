use std::borrow::Cow;

/// Root of one parsed agtype value.
#[derive(Debug, Clone, PartialEq)]
pub enum AgtypeNode<'a> {
    Value(ValueNode<'a>),
    /// `{...}::vertex`
    Vertex(ObjectNode<'a>),
    /// `{...}::edge`
    Edge(ObjectNode<'a>),
    /// `[vertex, edge, vertex, ...]::path`
    Path(PathNode<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode<'a> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// Escapes are resolved; borrowed when the literal had none.
    String(Cow<'a, str>),
    Array(Vec<ValueNode<'a>>),
    Object(ObjectNode<'a>),
}

/// Key/value pairs in textual order. Duplicate keys are kept; consumers
/// treat the last occurrence as authoritative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectNode<'a> {
    pub pairs: Vec<(Cow<'a, str>, ValueNode<'a>)>,
}

impl<'a> ObjectNode<'a> {
    /// Last value bound to `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ValueNode<'a>> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathNode<'a> {
    pub elements: Vec<PathElementNode<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathElementNode<'a> {
    Vertex(ObjectNode<'a>),
    Edge(ObjectNode<'a>),
}
