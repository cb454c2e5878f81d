//! The tree seam between a host grammar and the color scanner.
//!
//! A host parser exposes its output through [`SyntaxTree`]: every node has a
//! [`NodeKind`], a half-open byte span, and optionally an embedded sub-tree
//! (a second grammar mounted inside the node, e.g. the stylesheet written in a
//! `style="..."` attribute). Embedded trees use their own coordinate space,
//! starting at zero just past the attribute's opening quote.

use std::fmt;
use std::ops::Range;

/// The syntactic kinds the scanner cares about.
///
/// Everything else a grammar produces is reported as [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A `#...` hash literal in value position.
    ColorLiteral,
    /// A bare identifier in value position (`red`, `auto`, `inherit`).
    ValueName,
    /// A function call in value position, spanning name through `)`.
    CallExpression,
    /// A markup attribute value, quotes included.
    AttributeValue,
    /// Any other node.
    Other,
}

/// A borrowed view of one node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    kind: NodeKind,
    from: usize,
    to: usize,
    embedded: Option<&'a dyn SyntaxTree>,
}

impl<'a> SyntaxNode<'a> {
    pub fn new(kind: NodeKind, from: usize, to: usize) -> Self {
        Self {
            kind,
            from,
            to,
            embedded: None,
        }
    }

    /// Attaches an embedded sub-tree to this node.
    pub fn with_embedded(mut self, tree: &'a dyn SyntaxTree) -> Self {
        self.embedded = Some(tree);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn span(&self) -> Range<usize> {
        self.from..self.to
    }

    /// The sub-tree mounted on this node, if the host mounted one.
    pub fn embedded(&self) -> Option<&'a dyn SyntaxTree> {
        self.embedded
    }

    /// Whether this node's span overlaps `range`.
    ///
    /// Empty nodes count as overlapping when they sit inside the range.
    pub fn intersects(&self, range: &Range<usize>) -> bool {
        if self.from == self.to {
            return range.contains(&self.from);
        }
        self.from < range.end && self.to > range.start
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.kind)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("embedded", &self.embedded.is_some())
            .finish()
    }
}

/// A parsed tree of typed, spanned nodes.
pub trait SyntaxTree {
    /// The span covered by this tree in its own coordinates.
    fn extent(&self) -> Range<usize>;

    /// Every node intersecting `range`, in document order (parents before
    /// their children).
    fn nodes(&self, range: Range<usize>) -> Box<dyn Iterator<Item = SyntaxNode<'_>> + '_>;
}

/// Source text addressable by byte offset.
pub trait Document {
    /// The text in `range`, or `None` when the range is out of bounds or not on
    /// character boundaries.
    fn slice(&self, range: Range<usize>) -> Option<&str>;
}

impl Document for str {
    fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.get(range)
    }
}

impl Document for String {
    fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.get(range)
    }
}

/// Plain node storage shared by the concrete trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawNode {
    pub(crate) kind: NodeKind,
    pub(crate) from: usize,
    pub(crate) to: usize,
}

impl RawNode {
    pub(crate) fn shifted(self, offset: usize) -> Self {
        Self {
            kind: self.kind,
            from: self.from + offset,
            to: self.to + offset,
        }
    }

    pub(crate) fn view<'a>(&self) -> SyntaxNode<'a> {
        SyntaxNode::new(self.kind, self.from, self.to)
    }
}
