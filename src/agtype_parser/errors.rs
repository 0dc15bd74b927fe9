use nom::error::{ContextError, FromExternalError, ParseError};
use std::fmt;

/// Error accumulated by the agtype combinators.
///
/// Each entry pairs the remaining input at the point of failure with a short
/// description; the first entry is the innermost one. Entries produced from
/// a bare nom `ErrorKind` carry no useful message, so when the innermost
/// entry is one of those the nearest `context` describes the failure instead.
#[derive(Debug, PartialEq)]
pub struct AgtypeParsingError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
    from_kind: bool,
}

impl<'a> AgtypeParsingError<'a> {
    pub fn new(input: &'a str, message: &'static str) -> Self {
        AgtypeParsingError {
            errors: vec![(input, message)],
            from_kind: false,
        }
    }

    fn from_kind(input: &'a str, message: &'static str) -> Self {
        AgtypeParsingError {
            errors: vec![(input, message)],
            from_kind: true,
        }
    }

    /// Where the parser gave up and why, as reported to error listeners.
    pub fn primary(&self) -> Option<(&'a str, &'static str)> {
        if self.from_kind {
            if let Some(described) = self.errors.get(1) {
                return Some(*described);
            }
        }
        self.errors.first().copied()
    }
}

impl<'a> ParseError<&'a str> for AgtypeParsingError<'a> {
    fn from_error_kind(input: &'a str, kind: nom::error::ErrorKind) -> Self {
        let message = match kind {
            nom::error::ErrorKind::Char => "unexpected character",
            nom::error::ErrorKind::Tag => "unexpected token",
            nom::error::ErrorKind::Digit => "expected a number",
            nom::error::ErrorKind::Eof => "unexpected trailing input",
            _ => "unable to parse",
        };
        AgtypeParsingError::from_kind(input, message)
    }

    fn append(_input: &'a str, _kind: nom::error::ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        // keep whichever alternative got further into the input
        match (self.primary(), other.primary()) {
            (Some((a, _)), Some((b, _))) if a.len() < b.len() => self,
            _ => other,
        }
    }
}

impl<'a> ContextError<&'a str> for AgtypeParsingError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for AgtypeParsingError<'a> {
    fn from_external_error(input: &'a str, _kind: nom::error::ErrorKind, _e: E) -> Self {
        AgtypeParsingError::from_kind(input, "invalid literal")
    }
}

impl fmt::Display for AgtypeParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (input, ctx) in &self.errors {
            writeln!(f, "{}: {:}", ctx, input)?;
        }
        Ok(())
    }
}
