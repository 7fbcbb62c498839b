//! Property-list parser.
//!
//! Turns the text between a declaration's brackets into an ordered
//! string map. The list is split on commas that are not inside double
//! quotes or a nested bracket pair; each entry is split on its first
//! colon, both halves are trimmed and one layer of surrounding double
//! quotes is removed from the value. No other escape processing happens.

use indexmap::IndexMap;
use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat, separated},
    error::{ContextError, ErrMode},
    token::{take_till, take_while},
};

type Input<'src> = &'src str;
type IResult<O> = Result<O, ErrMode<ContextError>>;

/// Remove one pair of surrounding double quotes, if present.
pub(crate) fn strip_quotes(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Skip a quoted run. An unterminated quote runs to the end of the list.
fn quoted_run(input: &mut Input<'_>) -> IResult<()> {
    ('"', take_till(0.., '"'), opt('"')).void().parse_next(input)
}

/// Skip a nested `[...]` run so its commas don't split the list.
fn nested_run(input: &mut Input<'_>) -> IResult<()> {
    ('[', take_till(0.., ']'), opt(']')).void().parse_next(input)
}

/// Parse one comma-free entry of the list. May be empty.
fn entry<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    repeat::<_, _, (), _, _>(
        0..,
        alt((
            quoted_run,
            nested_run,
            take_while(1.., |c: char| !matches!(c, ',' | '"' | '[')).void(),
        )),
    )
    .take()
    .parse_next(input)
}

fn entries<'src>(input: &mut Input<'src>) -> IResult<Vec<&'src str>> {
    separated(0.., entry, ',').parse_next(input)
}

/// Parse the inside of a property list.
///
/// Duplicate keys keep the position of their first occurrence and the value
/// of their last. An entry without a colon becomes a flag with an empty
/// value; empty entries are skipped.
///
/// # Examples
///
/// ```
/// use trellis_parser::parse_properties;
///
/// let props = parse_properties(r#"icon: aws-s3, label: "Web, Static", icon: s3"#);
/// assert_eq!(props.get("icon").map(String::as_str), Some("s3"));
/// assert_eq!(props.get("label").map(String::as_str), Some("Web, Static"));
/// assert_eq!(props.get_index(0).map(|(k, _)| k.as_str()), Some("icon"));
/// ```
pub fn parse_properties(text: &str) -> IndexMap<String, String> {
    let mut input = text;
    let mut segments = entries(&mut input).unwrap_or_default();
    if !input.is_empty() {
        segments.push(input);
    }

    let mut properties = IndexMap::new();
    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (key, value) = match segment.split_once(':') {
            Some((key, value)) => (key.trim(), strip_quotes(value.trim())),
            None => (segment, ""),
        };
        if key.is_empty() {
            log::debug!(segment = segment; "Skipping property without a key");
            continue;
        }
        properties.insert(key.to_string(), value.to_string());
    }
    properties
}
