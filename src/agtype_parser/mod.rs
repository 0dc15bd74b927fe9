//! Parser for Apache AGE `agtype` output text.
//!
//! Produces an [`ast::AgtypeNode`] tree for one result cell. Syntax errors
//! are reported through a [`SyntaxErrorListener`] rather than returned
//! directly, so callers decide how to collect them:
//!
//! ```rust
//! use agegraph::agtype_parser::{AgtypeParser, CollectingErrorListener};
//!
//! let parser = AgtypeParser::default();
//! let mut listener = CollectingErrorListener::default();
//! let tree = parser.parse(r#"{"id": 1, "label": "A", "properties": {}}::vertex"#, &mut listener);
//! assert!(tree.is_some());
//! assert!(!listener.has_errors());
//! ```

use ast::{AgtypeNode, ValueNode};
use errors::AgtypeParsingError;
use graph_element::{parse_annotated_object, parse_path, EDGE_ANNOTATION, VERTEX_ANNOTATION};
use nom::character::complete::multispace0;
use nom::IResult;
use value::{parse_array, parse_value};

use crate::errors::SyntaxError;

pub mod ast;
mod common;
pub(crate) mod errors;
mod graph_element;
mod value;

pub const DEFAULT_MAX_DEPTH: u32 = 128;

const EOF_TOKEN: &str = "<EOF>";
const MAX_TOKEN_CHARS: usize = 32;

/// Receives syntax errors from [`AgtypeParser::parse`].
pub trait SyntaxErrorListener {
    fn syntax_error(&mut self, offending_text: &str, line: usize, column: usize, message: &str);
}

/// Listener that records every reported error.
#[derive(Debug, Default, Clone)]
pub struct CollectingErrorListener {
    errors: Vec<SyntaxError>,
}

impl CollectingErrorListener {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_first(self) -> Option<SyntaxError> {
        self.errors.into_iter().next()
    }
}

impl SyntaxErrorListener for CollectingErrorListener {
    fn syntax_error(&mut self, offending_text: &str, line: usize, column: usize, message: &str) {
        self.errors.push(SyntaxError {
            offending_text: offending_text.to_string(),
            line,
            column,
            message: message.to_string(),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgtypeParser {
    max_depth: u32,
}

impl Default for AgtypeParser {
    fn default() -> Self {
        AgtypeParser::new(DEFAULT_MAX_DEPTH)
    }
}

impl AgtypeParser {
    /// `max_depth` bounds how deeply objects, arrays and paths may nest.
    pub fn new(max_depth: u32) -> Self {
        AgtypeParser { max_depth }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Parse one graph-value text.
    ///
    /// Returns `None` after notifying `listener` when the text is not valid;
    /// no partial tree is ever returned.
    pub fn parse<'a>(
        &self,
        text: &'a str,
        listener: &mut dyn SyntaxErrorListener,
    ) -> Option<AgtypeNode<'a>> {
        match parse_agtype_node(text, self.max_depth) {
            Ok(("", node)) => Some(node),
            Ok((rest, _)) => {
                report(text, rest, "unexpected trailing input", listener);
                None
            }
            Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
                log::trace!("AgtypeParser: error trail\n{}", err);
                let (at, message) = err.primary().unwrap_or((text, "unable to parse"));
                report(text, at, message, listener);
                None
            }
            Err(nom::Err::Incomplete(_)) => {
                report(text, "", "incomplete input", listener);
                None
            }
        }
    }
}

/// Parse with the default depth limit, returning the first syntax error.
pub fn parse_agtype(text: &str) -> Result<AgtypeNode<'_>, SyntaxError> {
    let mut listener = CollectingErrorListener::default();
    match AgtypeParser::default().parse(text, &mut listener) {
        Some(node) => Ok(node),
        None => Err(listener.into_first().unwrap_or_else(|| SyntaxError {
            offending_text: EOF_TOKEN.to_string(),
            line: 1,
            column: 0,
            message: "unable to parse".to_string(),
        })),
    }
}

fn parse_agtype_node(input: &str, depth: u32) -> IResult<&str, AgtypeNode<'_>, AgtypeParsingError<'_>> {
    let (input, _) = multispace0(input)?;

    match input.as_bytes().first() {
        Some(b'{') => {
            let (rest, (object, annotation)) = parse_annotated_object(input, depth)?;
            match annotation {
                None => Ok((rest, AgtypeNode::Value(ValueNode::Object(object)))),
                Some(VERTEX_ANNOTATION) => Ok((rest, AgtypeNode::Vertex(object))),
                Some(EDGE_ANNOTATION) => Ok((rest, AgtypeNode::Edge(object))),
                Some(_) => Err(nom::Err::Failure(AgtypeParsingError::new(
                    annotation_position(input, rest),
                    "unexpected type annotation",
                ))),
            }
        }
        Some(b'[') => match parse_path(input, depth) {
            Ok((rest, path)) => Ok((rest, AgtypeNode::Path(path))),
            Err(nom::Err::Error(_)) => {
                let (rest, array) = parse_array(input, depth)?;
                let (rest, _) = multispace0(rest)?;
                if rest.starts_with("::") {
                    return Err(nom::Err::Failure(AgtypeParsingError::new(
                        rest,
                        "unexpected type annotation",
                    )));
                }
                Ok((rest, AgtypeNode::Value(array)))
            }
            Err(err) => Err(err),
        },
        _ => {
            let (rest, value) = parse_value(input, depth)?;
            if rest.starts_with("::") {
                return Err(nom::Err::Failure(AgtypeParsingError::new(
                    rest,
                    "unexpected type annotation",
                )));
            }
            Ok((rest, AgtypeNode::Value(value)))
        }
    }
}

// Best effort: point at the `::` that follows the object.
fn annotation_position<'a>(input: &'a str, rest: &'a str) -> &'a str {
    let consumed = &input[..input.len() - rest.len()];
    match consumed.rfind("::") {
        Some(pos) => &input[pos..],
        None => rest,
    }
}

fn report(text: &str, at: &str, message: &str, listener: &mut dyn SyntaxErrorListener) {
    let offset = text.len().saturating_sub(at.len());
    let consumed = &text[..offset];
    let line = consumed.matches('\n').count() + 1;
    let column = consumed
        .rsplit('\n')
        .next()
        .map(|s| s.chars().count())
        .unwrap_or(0);
    let token = offending_token(&text[offset..]);

    log::debug!(
        "agtype syntax error at {}:{} near '{}': {}",
        line,
        column,
        token,
        message
    );
    listener.syntax_error(token, line, column, message);
}

fn offending_token(rest: &str) -> &str {
    if let Some(annotation) = rest.strip_prefix("::") {
        let len = annotation
            .find(|c: char| !c.is_alphanumeric())
            .unwrap_or(annotation.len());
        return &rest[..2 + len];
    }

    let mut end = 0;
    for (count, (pos, c)) in rest.char_indices().enumerate() {
        if count == MAX_TOKEN_CHARS
            || c.is_whitespace()
            || (pos > 0 && matches!(c, ',' | ':' | '{' | '}' | '[' | ']'))
        {
            break;
        }
        end = pos + c.len_utf8();
    }
    if rest.is_empty() {
        EOF_TOKEN
    } else if end == 0 {
        // leading whitespace: report the next visible token instead
        offending_token(rest.trim_start())
    } else {
        &rest[..end]
    }
}
