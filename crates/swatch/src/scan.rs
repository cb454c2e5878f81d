//! Walking a syntax tree for color tokens.
//!
//! The scanner visits every node intersecting the requested range, runs the
//! recognizers registered for the node's kind, and descends into embedded
//! trees mounted on attribute values. Embedded trees have their own
//! coordinate space, so every token found in one is rebased by
//! `attribute start + OPENING_DELIMITER_WIDTH` before it is returned.
//!
//! Only one level of embedding is supported. An embedded tree that itself
//! mounts a tree is reported as [`ScanError::NestedOverlay`].

use std::ops::Range;

use swatch_syntax::{Document, SyntaxTree};
use tracing::{debug, trace, warn};

use crate::error::ScanError;
use crate::options::ScanOptions;
use crate::recognize::Recognizer;
use crate::token::ColorToken;

/// Width of the quote that opens an attribute value. Embedded trees start
/// just past it.
pub const OPENING_DELIMITER_WIDTH: usize = 1;

/// Finds color tokens in syntax trees.
///
/// A scanner holds only its options; scans share no state and the same
/// input always yields the same tokens.
///
/// # Example
///
/// ```rust
/// use swatch::{Notation, Scanner};
/// use swatch_syntax::{StyleSheetTree, SyntaxTree};
///
/// let css = "a { color: #ABC; border-color: rgb(0 0 0 / .5) }";
/// let tree = StyleSheetTree::parse_stylesheet(css);
///
/// let tokens = Scanner::default().scan(&tree, tree.extent(), css)?;
/// assert_eq!(tokens.len(), 2);
/// assert_eq!(tokens[0].notation, Notation::Hex);
/// assert_eq!(&css[tokens[1].span()], "rgb(0 0 0 / .5)");
/// # Ok::<(), swatch::ScanError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scans the nodes of `tree` that intersect `range`.
    ///
    /// Tokens come back ordered by `source_from`, with absolute offsets into
    /// `document`.
    pub fn scan<D>(
        &self,
        tree: &dyn SyntaxTree,
        range: Range<usize>,
        document: &D,
    ) -> Result<Vec<ColorToken>, ScanError>
    where
        D: Document + ?Sized,
    {
        let mut tokens = self.scan_rebased(tree, range.clone(), 0, document)?;
        tokens.sort_by_key(|token| token.source_from);
        debug!(?range, tokens = tokens.len(), "scanned");
        Ok(tokens)
    }

    /// Scans a top-level tree whose coordinates start at `base` in `document`.
    ///
    /// Returned tokens carry absolute offsets (`base` already added), in
    /// visiting order.
    pub fn scan_rebased<D>(
        &self,
        tree: &dyn SyntaxTree,
        range: Range<usize>,
        base: usize,
        document: &D,
    ) -> Result<Vec<ColorToken>, ScanError>
    where
        D: Document + ?Sized,
    {
        let tokens = self.walk(tree, range, base, 0, document)?;
        Ok(tokens.into_iter().map(|token| token.rebased(base)).collect())
    }

    /// Collects tokens in `tree`'s own coordinates. `base` locates the tree
    /// in `document`.
    fn walk<D>(
        &self,
        tree: &dyn SyntaxTree,
        range: Range<usize>,
        base: usize,
        depth: usize,
        document: &D,
    ) -> Result<Vec<ColorToken>, ScanError>
    where
        D: Document + ?Sized,
    {
        let mut tokens = Vec::new();
        for node in tree.nodes(range.clone()) {
            if !node.intersects(&range) {
                continue;
            }
            let absolute = base + node.from()..base + node.to();

            for &recognizer in Recognizer::for_kind(node.kind()) {
                if let Some(embedded) = recognizer.overlay(&node) {
                    if depth > 0 {
                        warn!(at = ?absolute, "embedded tree inside an embedded tree");
                        return Err(ScanError::NestedOverlay { at: absolute });
                    }
                    let offset = node.from() + OPENING_DELIMITER_WIDTH;
                    trace!(offset = base + offset, "descending into embedded tree");
                    let inner =
                        self.walk(embedded, embedded.extent(), base + offset, depth + 1, document)?;
                    tokens.extend(inner.into_iter().map(|token| token.rebased(offset)));
                    continue;
                }

                if !recognizer
                    .notation()
                    .is_some_and(|notation| self.options.recognizes(notation))
                {
                    continue;
                }
                let Some(text) = document.slice(absolute.clone()) else {
                    continue;
                };
                if let Some(found) = recognizer.recognize(text, &self.options) {
                    trace!(span = ?absolute, notation = ?found.notation, color = %found.color, "color");
                    tokens.push(found.at(node.span()));
                    break;
                }
            }
        }
        Ok(tokens)
    }
}

/// Scans with default options. See [`Scanner::scan`].
pub fn scan<D>(
    tree: &dyn SyntaxTree,
    range: Range<usize>,
    document: &D,
) -> Result<Vec<ColorToken>, ScanError>
where
    D: Document + ?Sized,
{
    Scanner::default().scan(tree, range, document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Rgb;
    use crate::options::NotationSet;
    use crate::token::Notation;
    use swatch_syntax::{MarkupTree, NodeKind, StyleSheetTree, SyntaxNode};

    /// A hand-built tree for shapes the concrete parsers never produce.
    struct FixedTree {
        len: usize,
        nodes: Vec<(NodeKind, usize, usize)>,
        embedded: Option<(usize, Box<FixedTree>)>,
    }

    impl FixedTree {
        fn new(len: usize, nodes: Vec<(NodeKind, usize, usize)>) -> Self {
            Self {
                len,
                nodes,
                embedded: None,
            }
        }

        fn mount(mut self, index: usize, tree: FixedTree) -> Self {
            self.embedded = Some((index, Box::new(tree)));
            self
        }
    }

    impl SyntaxTree for FixedTree {
        fn extent(&self) -> Range<usize> {
            0..self.len
        }

        fn nodes(&self, range: Range<usize>) -> Box<dyn Iterator<Item = SyntaxNode<'_>> + '_> {
            Box::new(
                self.nodes
                    .iter()
                    .enumerate()
                    .map(move |(index, &(kind, from, to))| {
                        let node = SyntaxNode::new(kind, from, to);
                        match &self.embedded {
                            Some((at, tree)) if *at == index => node.with_embedded(tree.as_ref()),
                            _ => node,
                        }
                    })
                    .filter(move |node| node.intersects(&range)),
            )
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[test]
    fn finds_each_notation() {
        let css = "a { color: #f00; background: rgb(0, 255, 0); border-color: hsl(240, 100%, 50%); outline-color: white }";
        let tree = StyleSheetTree::parse_stylesheet(css);
        let tokens = scan(&tree, tree.extent(), css).unwrap();

        let found: Vec<_> = tokens.iter().map(|t| (t.notation, t.color)).collect();
        assert_eq!(
            found,
            vec![
                (Notation::Hex, Rgb(255, 0, 0)),
                (Notation::Rgb, Rgb(0, 255, 0)),
                (Notation::Hsl, Rgb(0, 0, 255)),
                (Notation::Named, Rgb(255, 255, 255)),
            ]
        );
        for token in &tokens {
            assert!(token.source_from < token.source_to);
        }
    }

    #[test]
    fn spans_cover_exactly_the_color_text() {
        let css = "p { color: rgb(255, 50%, 64, 0.5) }";
        let tree = StyleSheetTree::parse_stylesheet(css);
        let tokens = scan(&tree, tree.extent(), css).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(&css[tokens[0].span()], "rgb(255, 50%, 64, 0.5)");
        assert_eq!(tokens[0].alpha, ", 0.5");
    }

    #[test]
    fn non_colors_are_skipped() {
        let css = "p { display: block; transform: translate(1px, 2px); color: rgb(not, a, color) }";
        let tree = StyleSheetTree::parse_stylesheet(css);
        assert!(scan(&tree, tree.extent(), css).unwrap().is_empty());
    }

    #[test]
    fn range_limits_the_walk() {
        let css = "a { color: red }\nb { color: blue }";
        let tree = StyleSheetTree::parse_stylesheet(css);
        let second = css.find("b {").unwrap();
        let tokens = scan(&tree, second..css.len(), css).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(&css[tokens[0].span()], "blue");
    }

    #[test]
    fn notation_filter() {
        let css = "a { color: red; background: #00f }";
        let tree = StyleSheetTree::parse_stylesheet(css);
        let scanner = Scanner::new(ScanOptions::new().notations(NotationSet::only(Notation::Hex)));
        let tokens = scanner.scan(&tree, tree.extent(), css).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].notation, Notation::Hex);
    }

    #[test]
    fn out_of_document_nodes_are_skipped() {
        let tree = FixedTree::new(40, vec![(NodeKind::ValueName, 30, 40)]);
        assert!(scan(&tree, tree.extent(), "red").unwrap().is_empty());
    }

    // =========================================================================
    // Embedded trees
    // =========================================================================

    #[test]
    fn embedded_offsets_are_rebased() {
        let html = r#"<p style="color: #abcd">x</p>"#;
        let tree = MarkupTree::parse(html);
        let tokens = scan(&tree, tree.extent(), html).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(&html[tokens[0].span()], "#abcd");
        assert_eq!(tokens[0].alpha, "dd");
    }

    #[test]
    fn scan_rebased_matches_manual_offset() {
        let html = r#"<b style="color: red">"#;
        let inner = StyleSheetTree::parse_declarations("color: red");
        let base = html.find('"').unwrap() + OPENING_DELIMITER_WIDTH;
        let tokens = Scanner::default()
            .scan_rebased(&inner, inner.extent(), base, html)
            .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(&html[tokens[0].span()], "red");
    }

    #[test]
    fn embedded_and_base_offsets_compose() {
        // base 10, attribute at 3, quote width 1, keyword at 1 in the overlay
        let inner = FixedTree::new(6, vec![(NodeKind::ValueName, 1, 4)]);
        let outer = FixedTree::new(12, vec![(NodeKind::AttributeValue, 3, 12)]).mount(0, inner);
        let document = format!("{}red{}", "x".repeat(15), "x".repeat(5));

        let tokens = Scanner::default()
            .scan_rebased(&outer, outer.extent(), 10, &document)
            .unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span(), 15..18);
        assert_eq!(&document[tokens[0].span()], "red");
    }

    #[test]
    fn attribute_without_overlay_is_ignored() {
        let html = r#"<p title="red">red</p>"#;
        let tree = MarkupTree::parse(html);
        assert!(scan(&tree, tree.extent(), html).unwrap().is_empty());
    }

    #[test]
    fn nested_overlay_is_an_error() {
        let innermost = FixedTree::new(3, vec![(NodeKind::ValueName, 0, 3)]);
        let middle = FixedTree::new(10, vec![(NodeKind::AttributeValue, 2, 7)]).mount(0, innermost);
        let outer = FixedTree::new(20, vec![(NodeKind::AttributeValue, 4, 16)]).mount(0, middle);

        let document = "x".repeat(20);
        let err = scan(&outer, outer.extent(), &document).unwrap_err();
        assert_eq!(err, ScanError::NestedOverlay { at: 7..12 });
    }

    // =========================================================================
    // Determinism
    // =========================================================================

    #[test]
    fn scans_are_idempotent() {
        let html = r#"<style>a { color: teal }</style><i style="fill: hsl(0 100% 50%)"></i>"#;
        let tree = MarkupTree::parse(html);
        let first = scan(&tree, tree.extent(), html).unwrap();
        let second = scan(&tree, tree.extent(), html).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first[0].source_from < first[1].source_from);
    }
}
