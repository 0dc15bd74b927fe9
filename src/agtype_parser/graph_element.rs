//! Annotated graph elements: `{...}::vertex`, `{...}::edge` and
//! `[vertex, edge, vertex, ...]::path`.

use nom::{
    bytes::complete::tag,
    character::complete::{alphanumeric1, char, multispace0},
    combinator::{cut, opt, verify},
    error::context,
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};

use super::{
    ast::{ObjectNode, PathElementNode, PathNode},
    common::ws,
    errors::AgtypeParsingError,
    value::{descend, parse_object},
};

pub const VERTEX_ANNOTATION: &str = "vertex";
pub const EDGE_ANNOTATION: &str = "edge";
pub const PATH_ANNOTATION: &str = "path";

/// Parse an optional `::name` type annotation, surrounding whitespace included.
pub fn parse_annotation(input: &str) -> IResult<&str, Option<&str>, AgtypeParsingError<'_>> {
    ws(opt(preceded(tag("::"), alphanumeric1))).parse(input)
}

/// Parse an object followed by its optional annotation.
pub fn parse_annotated_object(
    input: &str,
    depth: u32,
) -> IResult<&str, (ObjectNode<'_>, Option<&str>), AgtypeParsingError<'_>> {
    (
        preceded(multispace0, move |i| parse_object(i, depth)),
        parse_annotation,
    )
        .parse(input)
}

/// Parse a path. Returns a recoverable error when the bracketed list does
/// not start with a vertex, so the caller can fall back to a plain array.
pub fn parse_path(input: &str, depth: u32) -> IResult<&str, PathNode<'_>, AgtypeParsingError<'_>> {
    let (rest, _) = char('[').parse(input)?;
    let depth = descend(rest, depth)?;

    let (rest, _) = multispace0(rest)?;
    if !rest.starts_with('{') {
        return Err(nom::Err::Error(AgtypeParsingError::new(rest, "not a path")));
    }
    let (rest, (first, annotation)) = parse_annotated_object(rest, depth)?;
    if annotation != Some(VERTEX_ANNOTATION) {
        return Err(nom::Err::Error(AgtypeParsingError::new(rest, "not a path")));
    }

    // every further hop is `, edge, vertex`
    let (rest, hops) = many0(preceded(
        ws(char(',')),
        cut((
            move |i| parse_element(i, depth, EDGE_ANNOTATION, "expected an edge"),
            preceded(
                context("expected ',' after edge", char(',')),
                move |i| parse_element(i, depth, VERTEX_ANNOTATION, "expected a vertex"),
            ),
        )),
    ))
    .parse(rest)?;

    let (rest, _) = context("expected ',' or ']'", cut(char(']'))).parse(rest)?;
    let (rest, _) = context(
        "expected '::path' annotation",
        cut(verify(parse_annotation, |annotation: &Option<&str>| {
            *annotation == Some(PATH_ANNOTATION)
        })),
    )
    .parse(rest)?;

    let mut elements = Vec::with_capacity(1 + hops.len() * 2);
    elements.push(PathElementNode::Vertex(first));
    for (edge, vertex) in hops {
        elements.push(PathElementNode::Edge(edge));
        elements.push(PathElementNode::Vertex(vertex));
    }
    Ok((rest, PathNode { elements }))
}

/// An object carrying exactly the `expected` annotation.
fn parse_element<'a>(
    input: &'a str,
    depth: u32,
    expected: &'static str,
    message: &'static str,
) -> IResult<&'a str, ObjectNode<'a>, AgtypeParsingError<'a>> {
    let (input, _) = multispace0(input)?;
    let (rest, (object, _)) = context(
        message,
        verify(
            move |i| parse_annotated_object(i, depth),
            |(_, annotation): &(ObjectNode<'a>, Option<&'a str>)| *annotation == Some(expected),
        ),
    )
    .parse(input)?;
    Ok((rest, object))
}
