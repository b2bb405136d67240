use crate::error::FilterError;
use nom::{
    character::complete::{char, one_of},
    combinator::{all_consuming, recognize},
    multi::{many1, separated_list1},
    IResult,
};

const IDENTIFIER_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

pub fn identifier(i: &str) -> IResult<&str, &str> {
    recognize(many1(one_of(IDENTIFIER_CHARS)))(i)
}

/// `segment(.segment)*`
pub fn column_path(i: &str) -> IResult<&str, Vec<&str>> {
    separated_list1(char('.'), identifier)(i)
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

fn check_characters(input: &str) -> Result<(), FilterError> {
    if input.is_empty() {
        return Err(FilterError::InvalidIdentifier(input.to_string()));
    }
    if input.chars().any(|c| !is_identifier_char(c)) {
        return Err(FilterError::InjectionRisk(input.to_string()));
    }
    Ok(())
}

/// Splits a possibly dotted identifier into its segments.
///
/// Quotes, whitespace and every other character outside `[A-Za-z0-9_.]` are an
/// `InjectionRisk`; empty input or empty segments (`a..b`, `.a`) are an
/// `InvalidIdentifier`.
pub fn parse_column_path(input: &str) -> Result<Vec<String>, FilterError> {
    check_characters(input)?;
    all_consuming(column_path)(input)
        .map(|(_, segments)| segments.into_iter().map(str::to_string).collect())
        .map_err(|_| FilterError::InvalidIdentifier(input.to_string()))
}

/// Parses a single, undotted identifier such as a table alias.
pub fn parse_identifier(input: &str) -> Result<String, FilterError> {
    check_characters(input)?;
    all_consuming(identifier)(input)
        .map(|(_, name)| name.to_string())
        .map_err(|_| FilterError::InvalidIdentifier(input.to_string()))
}
