use std::borrow::Cow;

use nom::{
    branch::alt,
    character::complete::{char, multispace0},
    combinator::{cut, map, peek},
    error::context,
    multi::separated_list1,
    sequence::{delimited, preceded, separated_pair},
    IResult, Parser,
};

use super::{
    ast::{ObjectNode, ValueNode},
    common::{parse_keyword_literal, parse_number, parse_string_literal, ws},
    errors::AgtypeParsingError,
};

/// Parse any plain value: string, number, keyword, object or array.
///
/// `depth` is the remaining nesting budget; every object or array entered
/// consumes one level.
pub fn parse_value(input: &str, depth: u32) -> IResult<&str, ValueNode<'_>, AgtypeParsingError<'_>> {
    ws(context(
        "expected a value",
        alt((
            map(move |i| parse_object(i, depth), ValueNode::Object),
            move |i| parse_array(i, depth),
            map(parse_string_literal, ValueNode::String),
            parse_keyword_literal,
            parse_number,
        )),
    ))
    .parse(input)
}

/// Parse `{ "key": value, ... }`.
pub fn parse_object(input: &str, depth: u32) -> IResult<&str, ObjectNode<'_>, AgtypeParsingError<'_>> {
    let (input, _) = char('{').parse(input)?;
    let depth = descend(input, depth)?;

    let (input, pairs) = preceded(
        multispace0,
        alt((
            map(peek(char('}')), |_| Vec::new()),
            separated_list1(ws(char(',')), cut(move |i| parse_pair(i, depth))),
        )),
    )
    .parse(input)?;
    let (input, _) = context("expected ',' or '}'", cut(char('}'))).parse(input)?;

    Ok((input, ObjectNode { pairs }))
}

fn parse_pair(
    input: &str,
    depth: u32,
) -> IResult<&str, (Cow<'_, str>, ValueNode<'_>), AgtypeParsingError<'_>> {
    separated_pair(
        preceded(
            multispace0,
            context("expected a string key", parse_string_literal),
        ),
        preceded(multispace0, context("expected ':' after key", char(':'))),
        move |i| parse_value(i, depth),
    )
    .parse(input)
}

/// Parse `[ value, ... ]`.
pub fn parse_array(input: &str, depth: u32) -> IResult<&str, ValueNode<'_>, AgtypeParsingError<'_>> {
    let (input, _) = char('[').parse(input)?;
    let depth = descend(input, depth)?;

    let (input, items) = delimited(
        multispace0,
        alt((
            map(peek(char(']')), |_| Vec::new()),
            separated_list1(ws(char(',')), cut(move |i| parse_value(i, depth))),
        )),
        context("expected ',' or ']'", cut(char(']'))),
    )
    .parse(input)?;

    Ok((input, ValueNode::Array(items)))
}

/// Consume one level of the nesting budget.
pub(crate) fn descend(input: &str, depth: u32) -> Result<u32, nom::Err<AgtypeParsingError<'_>>> {
    depth.checked_sub(1).ok_or_else(|| {
        nom::Err::Failure(AgtypeParsingError::new(
            input,
            "maximum nesting depth exceeded",
        ))
    })
}
