use std::borrow::Cow;

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while, take_while_m_n},
    character::complete::{digit0, digit1, multispace0, one_of},
    combinator::{cut, map, map_res, not, opt, recognize, value},
    error::{context, ParseError},
    sequence::{delimited, preceded, terminated},
    IResult, Parser,
};

use nom::character::complete::char;

use super::{ast::ValueNode, errors::AgtypeParsingError};

pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse a double-quoted string literal with JSON escapes.
///
/// Returns the unescaped contents, borrowing from the input when the literal
/// contains no escape sequences.
pub fn parse_string_literal(input: &str) -> IResult<&str, Cow<'_, str>, AgtypeParsingError<'_>> {
    let (body, _) = char('"').parse(input)?;

    alt((
        map(
            terminated(take_while(|c: char| c != '"' && c != '\\'), char('"')),
            Cow::Borrowed,
        ),
        map(
            terminated(
                escaped_transform(
                    is_not("\"\\"),
                    '\\',
                    context("invalid escape sequence", cut(parse_escape)),
                ),
                char('"'),
            ),
            Cow::Owned,
        ),
    ))
    .parse(body)
    .map_err(|err| match err {
        // only the closing quote can still fail recoverably
        nom::Err::Error(_) => nom::Err::Failure(AgtypeParsingError::new(
            input,
            "unterminated string literal",
        )),
        other => other,
    })
}

/// The character after a `\`.
fn parse_escape(input: &str) -> IResult<&str, char, AgtypeParsingError<'_>> {
    alt((
        value('"', char('"')),
        value('\\', char('\\')),
        value('/', char('/')),
        value('\u{8}', char('b')),
        value('\u{c}', char('f')),
        value('\n', char('n')),
        value('\r', char('r')),
        value('\t', char('t')),
        parse_unicode_escape,
    ))
    .parse(input)
}

fn hex4(input: &str) -> IResult<&str, u32, AgtypeParsingError<'_>> {
    map_res(
        take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()),
        |digits| u32::from_str_radix(digits, 16),
    )
    .parse(input)
}

// uXXXX, combining a UTF-16 surrogate pair into one scalar value
fn parse_unicode_escape(input: &str) -> IResult<&str, char, AgtypeParsingError<'_>> {
    let (rest, high) = preceded(char('u'), hex4).parse(input)?;
    let (rest, code) = if (0xD800..0xDC00).contains(&high) {
        let (rest, low) = preceded(tag("\\u"), hex4).parse(rest)?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(nom::Err::Error(AgtypeParsingError::new(rest, "invalid surrogate pair")));
        }
        (rest, 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
    } else {
        (rest, high)
    };

    match char::from_u32(code) {
        Some(c) => Ok((rest, c)),
        None => Err(nom::Err::Error(AgtypeParsingError::new(
            input,
            "invalid unicode escape",
        ))),
    }
}

/// Parse a numeric literal, including the non-finite spellings and an
/// optional `::numeric` annotation.
///
/// Matches: 1, -1, 70.3, 1e20, -2.5E-3, NaN, Infinity, -Infinity, 12.5::numeric
pub fn parse_number(input: &str) -> IResult<&str, ValueNode<'_>, AgtypeParsingError<'_>> {
    let (rest, value) = alt((
        map(tag("NaN"), |_| ValueNode::Float(f64::NAN)),
        map(tag("-Infinity"), |_| ValueNode::Float(f64::NEG_INFINITY)),
        map(tag("Infinity"), |_| ValueNode::Float(f64::INFINITY)),
        parse_numeric_literal,
    ))
    .parse(input)?;

    let (rest, numeric) = opt(tag::<_, _, AgtypeParsingError>("::numeric")).parse(rest)?;
    let value = match (value, numeric) {
        (ValueNode::Integer(i), Some(_)) => ValueNode::Float(i as f64),
        (value, _) => value,
    };
    Ok((rest, value))
}

fn parse_numeric_literal(input: &str) -> IResult<&str, ValueNode<'_>, AgtypeParsingError<'_>> {
    let (rest, text) = recognize((
        opt(char('-')),
        parse_integer_part,
        opt((char('.'), digit1)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)?;

    if text.contains(|c| matches!(c, '.' | 'e' | 'E')) {
        let value = text.parse::<f64>().map_err(|_| {
            nom::Err::Failure(AgtypeParsingError::new(input, "invalid float literal"))
        })?;
        Ok((rest, ValueNode::Float(value)))
    } else {
        let value = text.parse::<i64>().map_err(|_| {
            nom::Err::Failure(AgtypeParsingError::new(
                input,
                "integer literal out of range",
            ))
        })?;
        Ok((rest, ValueNode::Integer(value)))
    }
}

// `0` or a digit sequence without a leading zero
fn parse_integer_part(input: &str) -> IResult<&str, &str, AgtypeParsingError<'_>> {
    alt((
        terminated(
            tag("0"),
            context("leading zeros are not allowed", cut(not(digit1))),
        ),
        recognize((one_of("123456789"), digit0)),
    ))
    .parse(input)
}

pub fn parse_keyword_literal(input: &str) -> IResult<&str, ValueNode<'_>, AgtypeParsingError<'_>> {
    alt((
        map(tag("true"), |_| ValueNode::Bool(true)),
        map(tag("false"), |_| ValueNode::Bool(false)),
        map(tag("null"), |_| ValueNode::Null),
    ))
    .parse(input)
}
