//! Graph builder.
//!
//! Consumes classified lines in source order. Declarations are turned into
//! nodes immediately, using an explicit stack of open containers to decide
//! each node's parent. Connections are only collected during that pass and
//! are resolved against the finished node table afterwards, so a connection
//! may name a node declared further down.

use trellis_core::{
    graph::{Edge, Graph, Node, NodeKind},
    identifier::{NodeId, normalize_name},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    properties::parse_properties,
    span::{Span, Spanned},
    tokens::{ClassifiedLine, ConnectionToken, Declaration, LineKind},
};

/// An open `{` waiting for its `}`.
#[derive(Debug, Clone)]
struct OpenContainer {
    /// `None` for a body that does not belong to a container, such as a
    /// stray `{` or a duplicate that was first declared as a leaf.
    id: Option<NodeId>,
    span: Span,
}

/// Stack of open containers with an underflow-guarded pop.
#[derive(Debug, Default)]
pub(crate) struct ContainerStack {
    entries: Vec<OpenContainer>,
}

impl ContainerStack {
    pub fn push(&mut self, id: Option<NodeId>, span: Span) {
        self.entries.push(OpenContainer { id, span });
    }

    /// Close the innermost body. Returns `None` when nothing is open.
    fn pop(&mut self) -> Option<OpenContainer> {
        self.entries.pop()
    }

    /// The innermost open container, skipping bodies without one.
    pub fn current_parent(&self) -> Option<&NodeId> {
        self.entries.iter().rev().find_map(|entry| entry.id.as_ref())
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return everything still open, outermost first.
    fn drain(&mut self) -> impl Iterator<Item = OpenContainer> + '_ {
        self.entries.drain(..)
    }
}

/// Builds a [`Graph`] from classified lines.
#[derive(Debug)]
pub(crate) struct Builder<'src> {
    graph: Graph,
    stack: ContainerStack,
    /// A leaf declaration held back by one line in case a lone `{` follows.
    pending_leaf: Option<(Declaration<'src>, Span)>,
    /// Connection hops waiting for endpoint resolution.
    connections: Vec<ConnectionToken<'src>>,
    diagnostics: DiagnosticCollector,
    opened: usize,
    closed: usize,
}

impl<'src> Builder<'src> {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            stack: ContainerStack::default(),
            pending_leaf: None,
            connections: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
            opened: 0,
            closed: 0,
        }
    }

    /// Process one classified line.
    pub fn process(&mut self, line: ClassifiedLine<'src>) {
        if let LineKind::BlockOpen = line.kind {
            match self.pending_leaf.take() {
                Some((declaration, span)) => {
                    self.open_container(&declaration, span.union(line.span));
                }
                None => {
                    self.diagnostics.emit(
                        Diagnostic::warning("`{` does not follow a node declaration")
                            .with_code(ErrorCode::W002)
                            .with_label(line.span, "no name before this")
                            .with_help("write the node name before `{`"),
                    );
                    self.stack.push(None, line.span);
                    self.opened += 1;
                }
            }
            return;
        }

        // Comments and blank-ish lines don't separate a declaration from its `{`.
        if line.kind.is_ignorable() {
            log::debug!(line = line.text; "Ignoring line");
            return;
        }
        self.flush_pending_leaf();

        match line.kind {
            LineKind::ContainerOpen(declaration) => self.open_container(&declaration, line.span),
            LineKind::Leaf(declaration) => self.pending_leaf = Some((declaration, line.span)),
            LineKind::ContainerClose => self.close_container(line.span),
            LineKind::Connection(tokens) => self.connections.extend(tokens),
            LineKind::Title(title) => self.graph.set_title(Some(title.to_string())),
            LineKind::Malformed(diagnostic) => self.diagnostics.emit(diagnostic),
            LineKind::BlockOpen | LineKind::Comment | LineKind::Ignorable => {}
        }
    }

    fn flush_pending_leaf(&mut self) {
        if let Some((declaration, span)) = self.pending_leaf.take() {
            self.declare(&declaration, NodeKind::Leaf, span);
        }
    }

    fn open_container(&mut self, declaration: &Declaration<'src>, span: Span) {
        let id = self.declare(declaration, NodeKind::Container, span);
        self.stack.push(id, span);
        self.opened += 1;
        log::trace!(depth = self.stack.depth(); "Opened container body");
    }

    fn close_container(&mut self, span: Span) {
        match self.stack.pop() {
            Some(_) => self.closed += 1,
            None => self.diagnostics.emit(
                Diagnostic::warning("unmatched `}`")
                    .with_code(ErrorCode::W003)
                    .with_label(span, "no open container")
                    .with_help("remove the extra brace"),
            ),
        }
    }

    /// Create the node for `declaration`, or merge into an earlier one.
    ///
    /// Returns the id to push when the declaration opens a body; `None` when
    /// the body cannot belong to this node.
    fn declare(
        &mut self,
        declaration: &Declaration<'src>,
        kind: NodeKind,
        span: Span,
    ) -> Option<NodeId> {
        let properties = declaration
            .properties
            .map(|text| parse_properties(text.inner()))
            .unwrap_or_default();
        let parent = self.stack.current_parent().cloned();
        let name = declaration.name.inner();
        let id = match &parent {
            Some(parent) => parent.create_nested(name),
            None => NodeId::new(name),
        };

        if let Some(existing) = self.graph.node_mut(&id) {
            let first_span = existing.span();
            let existing_kind = existing.kind();
            existing.merge_properties(properties);

            let (body_owner, help) = match (existing_kind, kind) {
                (NodeKind::Leaf, NodeKind::Container) => (
                    None,
                    "the first declaration is a leaf, so this body's nodes stay in the enclosing scope",
                ),
                _ => (
                    Some(id.clone()),
                    "properties are merged into the first declaration",
                ),
            };
            self.diagnostics.emit(
                Diagnostic::warning(format!("node `{id}` is declared more than once"))
                    .with_code(ErrorCode::W005)
                    .with_label(declaration.name.span(), "duplicate declaration")
                    .with_secondary_label(first_span, "first declared here")
                    .with_help(help),
            );
            return body_owner;
        }

        let node = Node::new(id.clone(), kind, parent, properties, span);
        if let Err(err) = self.graph.add_node(node) {
            // The parent always comes from the stack, which only holds declared ids.
            log::error!(err:% = err; "Failed to add node");
            return None;
        }
        log::trace!(id:% = id, kind:? = kind; "Declared node");
        Some(id)
    }

    /// Resolve an endpoint name to a declared node.
    ///
    /// An exact qualified id wins. Otherwise the name must be the local name
    /// of exactly one node.
    fn resolve(&self, name: &Spanned<&'src str>) -> Result<NodeId, Diagnostic> {
        let exact = NodeId::new(name.inner());
        if self.graph.node(&exact).is_some() {
            return Ok(exact);
        }

        let local = normalize_name(name.inner());
        let candidates: Vec<&Node> = self.graph.nodes_with_local_name(&local).collect();
        match candidates.as_slice() {
            [node] => Ok(node.id().clone()),
            [] => Err(Diagnostic::warning(format!(
                "connection endpoint `{local}` is not declared"
            ))
            .with_code(ErrorCode::W006)
            .with_label(name.span(), "unknown node")
            .with_help(format!("declare `{local}` or fix the spelling"))),
            many => {
                let choices = many
                    .iter()
                    .map(|node| format!("`{}`", node.id()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut diagnostic = Diagnostic::warning(format!(
                    "connection endpoint `{local}` matches several nodes"
                ))
                .with_code(ErrorCode::W007)
                .with_label(name.span(), "ambiguous name")
                .with_help(format!("use a qualified name: {choices}"));
                for node in many {
                    diagnostic = diagnostic.with_secondary_label(node.span(), "candidate");
                }
                Err(diagnostic)
            }
        }
    }

    fn resolve_connections(&mut self) {
        let connections = std::mem::take(&mut self.connections);
        for token in connections {
            let source = self.resolve(&token.source);
            let target = self.resolve(&token.target);
            match (source, target) {
                (Ok(source), Ok(target)) => {
                    let edge = Edge::new(
                        source,
                        target,
                        token.kind,
                        token.label.map(str::to_string),
                        token.span(),
                    );
                    if let Err(err) = self.graph.add_edge(edge) {
                        log::error!(err:% = err; "Failed to add edge");
                    }
                }
                (source, target) => {
                    for diagnostic in [source.err(), target.err()].into_iter().flatten() {
                        self.diagnostics.emit(diagnostic);
                    }
                }
            }
        }
    }

    /// Close everything still open, resolve connections and hand out the graph.
    pub fn finish(mut self) -> (Graph, Vec<Diagnostic>) {
        self.flush_pending_leaf();

        let unclosed: Vec<OpenContainer> = self.stack.drain().collect();
        for open in unclosed {
            let what = match &open.id {
                Some(id) => format!("container `{id}` is never closed"),
                None => "block is never closed".to_string(),
            };
            self.diagnostics.emit(
                Diagnostic::warning(what)
                    .with_code(ErrorCode::W004)
                    .with_label(open.span, "opened here")
                    .with_help("add a matching `}`"),
            );
        }
        debug_assert!(self.stack.is_empty());

        self.resolve_connections();

        log::debug!(
            nodes = self.graph.node_count(),
            edges = self.graph.edges().len(),
            opened = self.opened,
            closed = self.closed;
            "Graph built"
        );
        (self.graph, self.diagnostics.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn build(source: &str) -> (Graph, Vec<Diagnostic>, usize, usize) {
        let mut builder = Builder::new();
        for line in tokenize(source) {
            builder.process(line);
        }
        let (opened, closed) = (builder.opened, builder.closed);
        let (graph, diagnostics) = builder.finish();
        (graph, diagnostics, opened, closed)
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
        diagnostics.iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_container_stack_guarded_pop() {
        let mut stack = ContainerStack::default();
        assert!(stack.pop().is_none());

        stack.push(Some(NodeId::new("a")), Span::default());
        stack.push(None, Span::default());
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current_parent(), Some(&NodeId::new("a")));

        assert!(stack.pop().is_some());
        assert!(stack.pop().is_some());
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_nesting_assigns_parents() {
        let source = "Cloud [icon: aws] {\n  VPC {\n    DB [icon: rds]\n  }\n  Lambda [icon: fn]\n}\nClient [icon: user]";
        let (graph, diagnostics, opened, closed) = build(source);

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!((opened, closed), (2, 2));

        let db = graph.node(&NodeId::new("Cloud.VPC.DB")).expect("DB exists");
        assert_eq!(db.parent().map(NodeId::as_str), Some("Cloud.VPC"));
        assert_eq!(db.kind(), NodeKind::Leaf);

        let lambda = graph.node(&NodeId::new("Cloud.Lambda")).expect("Lambda exists");
        assert_eq!(lambda.parent().map(NodeId::as_str), Some("Cloud"));

        let client = graph.node(&NodeId::new("Client")).expect("Client exists");
        assert!(client.parent().is_none());
        assert_eq!(graph.node(&NodeId::new("Cloud.VPC")).map(Node::kind), Some(NodeKind::Container));
    }

    #[test]
    fn test_brace_on_next_line_opens_container() {
        let (graph, diagnostics, _, _) = build("Frontend [icon: monitor]\n// body\n{\n  S3 [icon: s3]\n}");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert!(graph.node(&NodeId::new("Frontend")).is_some_and(Node::is_container));
        assert!(graph.node(&NodeId::new("Frontend.S3")).is_some());
    }

    #[test]
    fn test_malformed_line_ends_pending_leaf() {
        let (graph, diagnostics, _, _) = build("Frontend [icon: monitor]\nFrontend ->\n{\n  S3 [icon: s3]\n}");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W008, ErrorCode::W002]);
        assert!(graph.node(&NodeId::new("Frontend")).is_some_and(|node| !node.is_container()));
        assert!(graph.node(&NodeId::new("S3")).is_some());
    }

    #[test]
    fn test_braces_in_unquoted_label_keep_nesting() {
        let (graph, diagnostics, opened, closed) =
            build("Box {\n A [x: 1]\n B [x: 1]\n A -> B: uses {json}\n C [x: 1]\n}");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!((opened, closed), (1, 1));
        assert!(graph.node(&NodeId::new("Box.C")).is_some());
        assert_eq!(graph.edges()[0].label(), Some("uses {json}"));
    }

    #[test]
    fn test_stray_open_brace_keeps_balance() {
        let (graph, diagnostics, _, _) = build("{\n  A [x: 1]\n}\nB [y: 2]");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W002]);
        assert!(graph.node(&NodeId::new("A")).is_some_and(|node| node.parent().is_none()));
        assert!(graph.node(&NodeId::new("B")).is_some());
    }

    #[test]
    fn test_unmatched_close() {
        let (graph, diagnostics, _, _) = build("A [x: 1]\n}\n}");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W003, ErrorCode::W003]);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_unclosed_containers() {
        let (graph, diagnostics, _, _) = build("Outer {\n Inner {\n  Leaf [a: b]");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W004, ErrorCode::W004]);
        assert!(graph.node(&NodeId::new("Outer.Inner.Leaf")).is_some());
    }

    #[test]
    fn test_duplicate_merges_into_first() {
        let (graph, diagnostics, _, _) = build("A [icon: x, color: red]\nB [icon: y]\nA [icon: z, label: Alpha]");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W005]);

        let a = graph.node(&NodeId::new("A")).expect("A exists");
        assert_eq!(a.property("icon"), Some("z"));
        assert_eq!(a.property("color"), Some("red"));
        assert_eq!(a.label(), "Alpha");
        assert_eq!(graph.node_index(&NodeId::new("A")), Some(0));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_duplicate_container_stays_balanced() {
        let (graph, diagnostics, opened, closed) =
            build("Box {\n  X [a: 1]\n}\nBox {\n  Y [a: 2]\n}\nZ [a: 3]");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W005]);
        assert_eq!((opened, closed), (2, 2));
        assert!(graph.node(&NodeId::new("Box.Y")).is_some());
        assert!(graph.node(&NodeId::new("Z")).is_some_and(|node| node.parent().is_none()));
    }

    #[test]
    fn test_leaf_redeclared_as_container() {
        let (graph, diagnostics, _, _) = build("Box [a: 1]\nBox {\n  Y [a: 2]\n}");
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W005]);
        assert_eq!(graph.node(&NodeId::new("Box")).map(Node::kind), Some(NodeKind::Leaf));
        assert!(graph.node(&NodeId::new("Y")).is_some_and(|node| node.parent().is_none()));
    }

    #[test]
    fn test_connections_resolve_after_declarations() {
        let (graph, diagnostics, _, _) = build("A -> B: \"later\"\nA [x: 1]\nB [x: 2]");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.edges()[0].label(), Some("later"));
    }

    #[test]
    fn test_local_name_resolution() {
        let source = "Frontend {\n S3 [icon: s3]\n}\nBackend {\n API [icon: api]\n}\nS3 -> API\nFrontend.S3 <-> Backend";
        let (graph, diagnostics, _, _) = build(source);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.edges()[0].source(), &NodeId::new("Frontend.S3"));
        assert_eq!(graph.edges()[0].target(), &NodeId::new("Backend.API"));
        assert_eq!(graph.edges()[1].target(), &NodeId::new("Backend"));
    }

    #[test]
    fn test_ambiguous_and_unresolved_endpoints() {
        let source = "A {\n DB [x: 1]\n}\nB {\n DB [x: 2]\n}\nDB -> A\nA -> Missing";
        let (graph, diagnostics, _, _) = build(source);
        assert_eq!(codes(&diagnostics), vec![ErrorCode::W007, ErrorCode::W006]);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_title_last_wins() {
        let (graph, _, _, _) = build("title: First\ntitle Second");
        assert_eq!(graph.title(), Some("Second"));
    }
}
