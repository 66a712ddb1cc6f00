//! A `nom`-based parser for the dotted attribute-path notation.
//!
//! The notation is the one used by monitoring queries: the first segment
//! names the attribute, the remaining segments drill into its value, e.g.
//! `HeapMemoryUsage.used` or `SystemProperties.'java.version'`. Segments
//! containing dots or spaces are single-quoted.
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while},
    character::complete::{alpha1, char},
    combinator::{map, recognize},
    multi::separated_list1,
    sequence::{delimited, pair},
};

use crate::ast::AttributePath;
use crate::error::PathError;

// --- Main Public Parser ---

pub fn parse_attribute_path(input: &str) -> Result<AttributePath, PathError> {
    match attribute_path(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(PathError::Parse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(PathError::Parse(input.to_string(), e.to_string())),
    }
}

// --- Combinators ---

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('\''), is_not("'"), char('\'')).parse(input)
}

fn segment(input: &str) -> IResult<&str, &str> {
    alt((quoted, identifier)).parse(input)
}

fn attribute_path(input: &str) -> IResult<&str, AttributePath> {
    map(separated_list1(char('.'), segment), |mut segments| {
        let attribute = segments.remove(0);
        AttributePath::new(attribute, segments)
    })
    .parse(input)
}
