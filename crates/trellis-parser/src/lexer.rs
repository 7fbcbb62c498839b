//! Line classifier for Trellis source text.
//!
//! The source is cut into logical lines: a physical line is split after
//! each `{`, around each `}` and at each `;`, except inside double quotes or
//! a bracketed property list. A `//` or `#` at the start of a logical line
//! comments out the rest of the physical line. An unquoted connection label
//! runs to the end of the physical line and is never split.
//!
//! Every logical line is then classified by a small winnow grammar, in
//! priority order: container open, leaf declaration, container close,
//! connection, title. Anything else is ignorable. Classification never
//! fails; malformed declarations and connections come back as
//! [`LineKind::Malformed`] carrying their diagnostic.
//!
//! The public entry point is [`tokenize`], which returns a lazy [`Lexer`]
//! iterator.

use std::ops::Range;

use winnow::{
    Parser as _,
    combinator::{alt, delimited, not, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    token::{literal, one_of, take_till, take_while},
};

use trellis_core::graph::EdgeKind;

use crate::{
    error::{Diagnostic, ErrorCode},
    properties::strip_quotes,
    span::{Span, Spanned},
    tokens::{ClassifiedLine, ConnectionToken, Declaration, LineKind},
};

type Input<'src> = &'src str;
type IResult<O> = Result<O, ErrMode<ContextError>>;

fn backtrack<O>() -> IResult<O> {
    Err(ErrMode::Backtrack(ContextError::new()))
}

fn is_word_start(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '&' | '/')
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '&' | '/')
}

fn is_inline_space(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Parse one or more spaces or tabs.
fn inline_space<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    take_while(1.., is_inline_space).parse_next(input)
}

/// Skip any spaces or tabs.
fn opt_space(input: &mut Input<'_>) -> IResult<()> {
    take_while(0.., is_inline_space).void().parse_next(input)
}

/// Succeeds only when nothing but whitespace is left.
fn end_of_line(input: &mut Input<'_>) -> IResult<()> {
    opt_space(input)?;
    if input.is_empty() { Ok(()) } else { backtrack() }
}

/// Parse one word of an identifier.
///
/// A word starts with a letter, digit, `_`, `&` or `/` and continues with
/// those plus `.` and `-`. A `-` that begins `->` ends the word.
fn word<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    (
        one_of(is_word_start),
        repeat::<_, _, (), _, _>(
            0..,
            alt((
                take_while(1.., is_word_char).void(),
                terminated('-', not('>')).void(),
            )),
        ),
    )
        .take()
        .parse_next(input)
}

/// Parse an identifier: words separated by single runs of spaces.
///
/// Trailing whitespace is not consumed.
fn identifier<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    (word, repeat::<_, _, (), _, _>(0.., (inline_space, word)))
        .take()
        .parse_next(input)
}

/// Parse a double-quoted string, returning the text between the quotes.
fn quoted<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}

/// Parse the body of a property list up to, but not including, its `]`.
///
/// Quoted strings and nested bracket pairs are skipped as a unit.
fn bracket_body<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    repeat::<_, _, (), _, _>(
        0..,
        alt((
            quoted.void(),
            bracketed.void(),
            take_till(1.., ['"', '[', ']']).void(),
        )),
    )
    .take()
    .parse_next(input)
}

/// Parse a `[...]` property list, returning the text between the brackets.
fn bracketed<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    delimited('[', bracket_body, ']').parse_next(input)
}

/// Parse a declaration: `Name [props]`, `Name [props] {` or `Name {`.
///
/// Returns the name, the raw property text and whether a body was opened.
fn declaration<'src>(input: &mut Input<'src>) -> IResult<(&'src str, Option<&'src str>, bool)> {
    let (name, _, properties, _, brace) = (
        identifier,
        opt_space,
        opt(bracketed),
        opt_space,
        opt('{'),
    )
        .parse_next(input)?;
    end_of_line(input)?;

    let opens = brace.is_some();
    if properties.is_none() && !opens {
        return backtrack();
    }
    Ok((name, properties, opens))
}

/// Parse a connection arrow with its surrounding spaces.
fn arrow(input: &mut Input<'_>) -> IResult<EdgeKind> {
    delimited(
        opt_space,
        alt((
            literal("<->").value(EdgeKind::Bidirectional),
            literal("->").value(EdgeKind::Directed),
        )),
        opt_space,
    )
    .parse_next(input)
}

/// Parse `: "label"` or `: label text` after a connection.
///
/// An empty label yields `None`.
fn edge_label<'src>(input: &mut Input<'src>) -> IResult<Option<&'src str>> {
    preceded(
        (opt_space, ':', opt_space),
        alt((
            terminated(quoted, end_of_line),
            take_while(0.., |_c: char| true).map(str::trim_end),
        )),
    )
    .map(non_empty)
    .parse_next(input)
}

fn non_empty(text: &str) -> Option<&str> {
    Some(text).filter(|text| !text.is_empty())
}

type ConnectionChain<'src> = (&'src str, Vec<(EdgeKind, &'src str)>, Option<&'src str>);

/// Parse `A -> B`, `A <-> B`, or a chain `A -> B -> C`, with an optional
/// label after the last endpoint.
fn connection<'src>(input: &mut Input<'src>) -> IResult<ConnectionChain<'src>> {
    let first = identifier(input)?;
    let hops: Vec<(EdgeKind, &'src str)> = repeat(1.., (arrow, identifier)).parse_next(input)?;
    let label = opt(edge_label).parse_next(input)?.flatten();
    end_of_line(input)?;
    Ok((first, hops, label))
}

/// Parse `title: Text` or `title Text`.
fn title<'src>(input: &mut Input<'src>) -> IResult<&'src str> {
    preceded(
        (
            literal("title"),
            alt(((opt_space, ':').void(), inline_space.void())),
            opt_space,
        ),
        take_while(0.., |_c: char| true),
    )
    .map(title_text)
    .parse_next(input)
}

fn title_text(text: &str) -> &str {
    strip_quotes(text.trim_end())
}

/// Span of `part`, a subslice of `line`, in source coordinates.
fn span_within(line: &str, offset: usize, part: &str) -> Span {
    let start = part.as_ptr() as usize - line.as_ptr() as usize;
    Span::new(start..start + part.len()).offset(offset)
}

/// Classify one trimmed logical line that starts at byte `offset` of the
/// source.
///
/// # Examples
///
/// ```
/// use trellis_parser::{classify, LineKind};
///
/// match classify("Frontend [icon: monitor] {", 0) {
///     LineKind::ContainerOpen(decl) => assert_eq!(*decl.name, "Frontend"),
///     other => panic!("unexpected {other:?}"),
/// }
/// assert!(matches!(classify("}", 0), LineKind::ContainerClose));
/// ```
pub fn classify(line: &str, offset: usize) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Ignorable;
    }
    if line.starts_with("//") || line.starts_with('#') {
        return LineKind::Comment;
    }
    match line {
        "}" => return LineKind::ContainerClose,
        "{" => return LineKind::BlockOpen,
        _ => {}
    }

    let spanned = |part: &'_ str| span_within(line, offset, part);

    if let Ok((name, properties, opens)) = declaration(&mut &line[..]) {
        let declaration = Declaration {
            name: Spanned::new(name, spanned(name)),
            properties: properties.map(|text| Spanned::new(text, spanned(text))),
        };
        return if opens {
            LineKind::ContainerOpen(declaration)
        } else {
            LineKind::Leaf(declaration)
        };
    }

    if let Ok((first, hops, label)) = connection(&mut &line[..]) {
        let last = hops.len() - 1;
        let mut source = first;
        let mut tokens = Vec::with_capacity(hops.len());
        for (index, (kind, target)) in hops.into_iter().enumerate() {
            tokens.push(ConnectionToken {
                source: Spanned::new(source, spanned(source)),
                target: Spanned::new(target, spanned(target)),
                kind,
                label: if index == last { label } else { None },
            });
            source = target;
        }
        return LineKind::Connection(tokens);
    }

    if let Ok(text) = title(&mut &line[..]) {
        return if text.is_empty() {
            LineKind::Ignorable
        } else {
            LineKind::Title(text)
        };
    }

    diagnose(line, offset)
}

/// Byte index of the first `->` outside quotes and brackets.
fn find_arrow(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut in_quote = false;
    let mut depth = 0usize;
    for (index, &byte) in bytes.iter().enumerate() {
        match byte {
            b'"' => in_quote = !in_quote,
            _ if in_quote => {}
            b'[' => depth += 1,
            b']' => depth = depth.saturating_sub(1),
            b'-' if depth == 0 && bytes.get(index + 1) == Some(&b'>') => return Some(index),
            _ => {}
        }
    }
    None
}

/// Explain why a line that mentions brackets, braces or arrows was not a
/// declaration or connection.
fn diagnose(line: &str, offset: usize) -> LineKind<'_> {
    let line_span = Span::new(0..line.len()).offset(offset);

    if line.starts_with('[') || line.starts_with('{') {
        return LineKind::Malformed(
            Diagnostic::warning("declaration is missing a node name")
                .with_code(ErrorCode::W002)
                .with_label(line_span, "no name before this")
                .with_help("write the node name before `[` or `{`"),
        );
    }

    if let Some(arrow) = find_arrow(line) {
        // Point at the whole arrow, `<->` included.
        let start = if line[..arrow].ends_with('<') { arrow - 1 } else { arrow };
        return LineKind::Malformed(
            Diagnostic::warning("malformed connection")
                .with_code(ErrorCode::W008)
                .with_label(line_span, "could not read this connection")
                .with_secondary_label(Span::new(start..arrow + 2).offset(offset), "arrow here")
                .with_help("name a node on both sides of every arrow"),
        );
    }

    if let Some(bracket) = line.find(['[', ']']) {
        let span = Span::new(bracket..line.len()).offset(offset);
        return LineKind::Malformed(
            Diagnostic::warning("malformed property list")
                .with_code(ErrorCode::W001)
                .with_label(span, "could not read this list")
                .with_help("close the list with `]` and terminate every quoted value"),
        );
    }

    LineKind::Ignorable
}

/// Lazy iterator over the classified logical lines of a source text.
#[derive(Debug, Clone)]
pub struct Lexer<'src> {
    source: &'src str,
    cursor: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, cursor: 0 }
    }

    /// Byte index of the end of the physical line containing `from`.
    fn end_of_physical_line(&self, from: usize) -> usize {
        self.source[from..]
            .find('\n')
            .map_or(self.source.len(), |index| from + index)
    }

    /// Cut the next raw logical line, which may be blank.
    fn next_segment(&mut self) -> Option<Range<usize>> {
        let source = self.source;
        let bytes = source.as_bytes();
        if self.cursor >= bytes.len() {
            return None;
        }

        let start = self.cursor;
        let mut in_quote = false;
        let mut depth = 0usize;
        let mut arrow_seen = false;
        let mut in_label = false;
        let is_blank_before = |end: usize| source[start..end].trim().is_empty();

        for (index, &byte) in bytes.iter().enumerate().skip(start) {
            let (range, next) = match byte {
                b'\n' => (start..index, index + 1),
                b'"' => {
                    in_quote = !in_quote;
                    continue;
                }
                _ if in_quote => continue,
                b'[' => {
                    depth += 1;
                    continue;
                }
                b']' if depth > 0 => {
                    depth -= 1;
                    continue;
                }
                _ if depth > 0 => continue,
                b'-' if bytes.get(index + 1) == Some(&b'>') => {
                    arrow_seen = true;
                    continue;
                }
                b':' if arrow_seen && !in_label => {
                    let next = bytes[index + 1..]
                        .iter()
                        .find(|&&byte| !matches!(byte, b' ' | b'\t'));
                    in_label = next != Some(&b'"');
                    continue;
                }
                b'{' | b'}' | b';' if in_label => continue,
                b'{' => (start..index + 1, index + 1),
                b'}' if is_blank_before(index) => (index..index + 1, index + 1),
                b'}' => (start..index, index),
                b';' => (start..index, index + 1),
                b'#' if is_blank_before(index) => {
                    let end = self.end_of_physical_line(index);
                    (start..end, end)
                }
                b'/' if bytes.get(index + 1) == Some(&b'/')
                    && (index == start || bytes[index - 1].is_ascii_whitespace()) =>
                {
                    let end = self.end_of_physical_line(index);
                    if is_blank_before(index) {
                        (start..end, end)
                    } else {
                        (start..index, end)
                    }
                }
                _ => continue,
            };
            self.cursor = next;
            return Some(range);
        }

        self.cursor = bytes.len();
        Some(start..bytes.len())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = ClassifiedLine<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let range = self.next_segment()?;
            let raw = &self.source[range.clone()];
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            let offset = range.start + (raw.len() - raw.trim_start().len());
            let kind = classify(text, offset);
            log::trace!(line = text, kind:? = kind; "Classified line");
            return Some(ClassifiedLine {
                text,
                span: Span::new(offset..offset + text.len()),
                kind,
            });
        }
    }
}

/// Split `source` into classified logical lines.
///
/// The iterator is lazy; lines are cut and classified as they are pulled.
///
/// # Examples
///
/// ```
/// use trellis_parser::{tokenize, LineKind};
///
/// let kinds: Vec<_> = tokenize("Frontend [icon: monitor] { S3 [icon: aws-s3] }")
///     .map(|line| line.kind)
///     .collect();
///
/// assert_eq!(kinds.len(), 3);
/// assert!(matches!(kinds[0], LineKind::ContainerOpen(_)));
/// assert!(matches!(kinds[1], LineKind::Leaf(_)));
/// assert!(matches!(kinds[2], LineKind::ContainerClose));
/// ```
pub fn tokenize(source: &str) -> Lexer<'_> {
    Lexer::new(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<ClassifiedLine<'_>> {
        tokenize(source).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        tokenize(source).map(|line| line.text).collect()
    }

    fn expect_declaration(line: &str, expect_container: bool) -> Declaration<'_> {
        match classify(line, 0) {
            LineKind::ContainerOpen(decl) if expect_container => decl,
            LineKind::Leaf(decl) if !expect_container => decl,
            other => panic!("unexpected classification for {line:?}: {other:?}"),
        }
    }

    fn expect_connection(line: &str) -> Vec<ConnectionToken<'_>> {
        match classify(line, 0) {
            LineKind::Connection(tokens) => tokens,
            other => panic!("expected connection for {line:?}, got {other:?}"),
        }
    }

    fn expect_code(line: &str) -> ErrorCode {
        match classify(line, 0) {
            LineKind::Malformed(diag) => diag.code().expect("malformed lines carry a code"),
            other => panic!("expected malformed line for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_container_open() {
        let decl = expect_declaration("Frontend [icon: monitor] {", true);
        assert_eq!(*decl.name, "Frontend");
        assert_eq!(decl.properties.map(|p| *p), Some("icon: monitor"));

        let decl = expect_declaration("Frontend {", true);
        assert!(decl.properties.is_none());

        let decl = expect_declaration("Frontend[icon: monitor]{", true);
        assert_eq!(*decl.name, "Frontend");
    }

    #[test]
    fn test_leaf() {
        let decl = expect_declaration("S3 [icon: aws-s3]", false);
        assert_eq!(*decl.name, "S3");
        assert_eq!(decl.properties.map(|p| *p), Some("icon: aws-s3"));

        let decl = expect_declaration("Cache []", false);
        assert_eq!(decl.properties.map(|p| *p), Some(""));
    }

    #[test]
    fn test_bare_name_is_ignorable() {
        assert!(matches!(classify("Frontend", 0), LineKind::Ignorable));
        assert!(matches!(classify("some prose here", 0), LineKind::Ignorable));
    }

    #[test]
    fn test_multi_word_and_punctuated_names() {
        let decl = expect_declaration("S3   Web Hosting [icon: aws-s3]", false);
        assert_eq!(*decl.name, "S3   Web Hosting");

        let decl = expect_declaration("api-gw.v2 [icon: gateway]", false);
        assert_eq!(*decl.name, "api-gw.v2");

        let decl = expect_declaration("Auth & Users/Roles [icon: lock]", false);
        assert_eq!(*decl.name, "Auth & Users/Roles");

        let tokens = expect_connection("Auth & Users -> DB");
        assert_eq!(*tokens[0].source, "Auth & Users");
        assert_eq!(*tokens[0].target, "DB");
    }

    #[test]
    fn test_quotes_and_nested_brackets_in_properties() {
        let decl = expect_declaration(r#"A [label: "a ] b", tags: [x, y]]"#, false);
        assert_eq!(
            decl.properties.map(|p| *p),
            Some(r#"label: "a ] b", tags: [x, y]"#)
        );
    }

    #[test]
    fn test_connection_directed() {
        let tokens = expect_connection("A -> B");
        assert_eq!(tokens.len(), 1);
        assert_eq!(*tokens[0].source, "A");
        assert_eq!(*tokens[0].target, "B");
        assert_eq!(tokens[0].kind, EdgeKind::Directed);
        assert_eq!(tokens[0].label, None);
    }

    #[test]
    fn test_connection_without_spaces() {
        let tokens = expect_connection("api-gw->db");
        assert_eq!(*tokens[0].source, "api-gw");
        assert_eq!(*tokens[0].target, "db");

        let tokens = expect_connection("A<->B");
        assert_eq!(tokens[0].kind, EdgeKind::Bidirectional);
    }

    #[test]
    fn test_connection_labels() {
        let tokens = expect_connection(r#"A -> B: "go""#);
        assert_eq!(tokens[0].label, Some("go"));

        let tokens = expect_connection("Web App <-> API Gateway : sync orders ");
        assert_eq!(*tokens[0].source, "Web App");
        assert_eq!(*tokens[0].target, "API Gateway");
        assert_eq!(tokens[0].kind, EdgeKind::Bidirectional);
        assert_eq!(tokens[0].label, Some("sync orders"));

        let tokens = expect_connection(r#"A -> B: """#);
        assert_eq!(tokens[0].label, None);

        let tokens = expect_connection("A -> B:");
        assert_eq!(tokens[0].label, None);
    }

    #[test]
    fn test_connection_chain() {
        let tokens = expect_connection(r#"A -> B <-> C: "last""#);
        assert_eq!(tokens.len(), 2);
        assert_eq!((*tokens[0].source, *tokens[0].target), ("A", "B"));
        assert_eq!((*tokens[1].source, *tokens[1].target), ("B", "C"));
        assert_eq!(tokens[0].label, None);
        assert_eq!(tokens[1].kind, EdgeKind::Bidirectional);
        assert_eq!(tokens[1].label, Some("last"));
    }

    #[test]
    fn test_connection_spans() {
        let tokens = expect_connection("Alpha -> Beta");
        assert_eq!(tokens[0].source.span(), Span::new(0..5));
        assert_eq!(tokens[0].target.span(), Span::new(9..13));
        assert_eq!(tokens[0].span(), Span::new(0..13));
    }

    #[test]
    fn test_title() {
        assert!(matches!(classify("title: Trading Platform", 0), LineKind::Title("Trading Platform")));
        assert!(matches!(classify("title Trading Platform", 0), LineKind::Title("Trading Platform")));
        assert!(matches!(classify(r#"title: "Quoted""#, 0), LineKind::Title("Quoted")));
        assert!(matches!(classify("title:", 0), LineKind::Ignorable));
        // A declaration named `title` stays a declaration.
        expect_declaration("title [icon: text]", false);
    }

    #[test]
    fn test_comments() {
        assert!(matches!(classify("// a comment", 0), LineKind::Comment));
        assert!(matches!(classify("# a comment", 0), LineKind::Comment));
    }

    #[test]
    fn test_malformed_bracket_list() {
        assert_eq!(expect_code("A [icon: x"), ErrorCode::W001);
        assert_eq!(expect_code(r#"A [label: "open]"#), ErrorCode::W001);
        assert_eq!(expect_code("A ] x"), ErrorCode::W001);
        assert_eq!(expect_code("A [x] [y]"), ErrorCode::W001);
    }

    #[test]
    fn test_malformed_connection() {
        assert_eq!(expect_code("A -> "), ErrorCode::W008);
        assert_eq!(expect_code("-> B"), ErrorCode::W008);
        assert_eq!(expect_code("A -> B ->"), ErrorCode::W008);
        assert_eq!(expect_code("A <-> : \"label\""), ErrorCode::W008);
        assert_eq!(expect_code("A [x: 1] -> B"), ErrorCode::W008);
        // Arrows inside quotes or brackets are not connections.
        assert_eq!(expect_code(r#"A [label: "->""#), ErrorCode::W001);
        assert_eq!(expect_code("A [x -> y"), ErrorCode::W001);
    }

    #[test]
    fn test_malformed_connection_points_at_arrow() {
        match classify("A <->", 10) {
            LineKind::Malformed(diag) => {
                let spans: Vec<Span> = diag.labels().iter().map(|label| label.span()).collect();
                assert_eq!(spans, vec![Span::new(10..15), Span::new(12..15)]);
            }
            other => panic!("expected malformed line, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_identifier() {
        assert_eq!(expect_code("[icon: x]"), ErrorCode::W002);
        assert_eq!(expect_code("{ nothing"), ErrorCode::W002);
        assert!(matches!(classify("{", 0), LineKind::BlockOpen));
    }

    #[test]
    fn test_split_braces_on_one_line() {
        assert_eq!(
            texts("Frontend [icon: monitor] { S3 [icon: aws-s3] }"),
            vec!["Frontend [icon: monitor] {", "S3 [icon: aws-s3]", "}"]
        );
    }

    #[test]
    fn test_split_consecutive_closes() {
        assert_eq!(texts("  }}  }"), vec!["}", "}", "}"]);
    }

    #[test]
    fn test_split_semicolons() {
        assert_eq!(texts("A -> B; B -> C;"), vec!["A -> B", "B -> C"]);
    }

    #[test]
    fn test_split_respects_quotes_and_brackets() {
        assert_eq!(
            texts(r#"A [label: "x { y }; z"] -> nothing"#),
            vec![r#"A [label: "x { y }; z"] -> nothing"#]
        );
        assert_eq!(
            texts(r#"A -> B: "a; b""#),
            vec![r#"A -> B: "a; b""#]
        );
    }

    #[test]
    fn test_unquoted_label_is_not_split() {
        assert_eq!(
            texts("Box {\n  A -> B: uses {json}; twice }\n}"),
            vec!["Box {", "A -> B: uses {json}; twice }", "}"]
        );
        let tokens = expect_connection("A -> B: uses {json}");
        assert_eq!(tokens[0].label, Some("uses {json}"));
    }

    #[test]
    fn test_quoted_label_still_splits() {
        assert_eq!(
            texts(r#"A -> B: "x"; B -> C: "y" }"#),
            vec![r#"A -> B: "x""#, r#"B -> C: "y""#, "}"]
        );
    }

    #[test]
    fn test_comments_swallow_physical_line() {
        let source = "// Frontend { \nA [icon: x] // trailing { comment\n  # B { \nC -> D: see http://docs\n";
        assert_eq!(
            texts(source),
            vec![
                "// Frontend {",
                "A [icon: x]",
                "# B {",
                "C -> D: see http://docs"
            ]
        );
    }

    #[test]
    fn test_unclosed_bracket_stops_at_newline() {
        let all = lines("A [icon: x\nB [icon: y]");
        assert_eq!(all.len(), 2);
        assert!(matches!(all[0].kind, LineKind::Malformed(_)));
        assert!(matches!(all[1].kind, LineKind::Leaf(_)));
    }

    #[test]
    fn test_line_spans_are_absolute() {
        let source = "Frontend [icon: monitor] {\n  S3 [icon: aws-s3]\n}";
        let all = lines(source);
        assert_eq!(&source[all[1].span.to_range()], "S3 [icon: aws-s3]");
        match &all[1].kind {
            LineKind::Leaf(decl) => {
                assert_eq!(&source[decl.name.span().to_range()], "S3");
                let props = decl.properties.expect("leaf has properties");
                assert_eq!(&source[props.span().to_range()], "icon: aws-s3");
            }
            other => panic!("expected leaf, got {other:?}"),
        }
        assert_eq!(&source[all[2].span.to_range()], "}");
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(texts("A [x: 1]\r\nB [y: 2]\r\n"), vec!["A [x: 1]", "B [y: 2]"]);
    }

    #[test]
    fn test_empty_source() {
        assert!(lines("").is_empty());
        assert!(lines("\n\n   \n").is_empty());
    }
}
