//! Classified logical lines produced by the [`lexer`](super::lexer).

use trellis_core::graph::EdgeKind;

use crate::{
    error::Diagnostic,
    span::{Span, Spanned},
};

/// A node declaration: a name, an optional bracketed property list and,
/// for containers, a trailing `{`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'src> {
    /// The declared name as written.
    pub name: Spanned<&'src str>,
    /// Raw text between `[` and `]`, if a list was given.
    pub properties: Option<Spanned<&'src str>>,
}

/// One `source -> target` hop of a connection line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionToken<'src> {
    pub source: Spanned<&'src str>,
    pub target: Spanned<&'src str>,
    pub kind: EdgeKind,
    /// Label text with one layer of surrounding quotes removed.
    pub label: Option<&'src str>,
}

impl ConnectionToken<'_> {
    /// Span from the start of the source name to the end of the target name.
    pub fn span(&self) -> Span {
        self.source.span().union(self.target.span())
    }
}

/// What a logical line means.
#[derive(Debug, Clone)]
pub enum LineKind<'src> {
    /// `Name [props] {`
    ContainerOpen(Declaration<'src>),
    /// `Name [props]`
    Leaf(Declaration<'src>),
    /// A `{` on its own line, opening the body of the preceding declaration.
    BlockOpen,
    /// `}`
    ContainerClose,
    /// `A -> B`, `A <-> B: "label"`, or a chain `A -> B -> C`.
    Connection(Vec<ConnectionToken<'src>>),
    /// `title: Text`
    Title(&'src str),
    /// `// text` or `# text`
    Comment,
    /// A declaration or connection that could not be read.
    Malformed(Diagnostic),
    /// Anything else.
    Ignorable,
}

impl LineKind<'_> {
    /// Returns `true` for lines the builder skips without a trace: comments
    /// and unrecognised text. Malformed lines still report their diagnostic.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, LineKind::Comment | LineKind::Ignorable)
    }
}

/// A logical line with its position and classification.
#[derive(Debug, Clone)]
pub struct ClassifiedLine<'src> {
    /// Line text with surrounding whitespace removed.
    pub text: &'src str,
    pub span: Span,
    pub kind: LineKind<'src>,
}
