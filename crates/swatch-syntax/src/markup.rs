//! Markup trees with embedded stylesheets.
//!
//! This is not an HTML parser. It tokenizes just enough markup to find the
//! places stylesheets live:
//!
//! - Quoted `style` attribute values become [`NodeKind::AttributeValue`] nodes
//!   carrying an embedded declaration-list [`StyleSheetTree`]. The embedded
//!   tree's coordinates start at zero just past the opening quote.
//! - `<style>` element contents are parsed as a stylesheet and mounted
//!   transparently: their nodes are reported directly, in document
//!   coordinates.
//! - Other attribute values become `AttributeValue` nodes without a sub-tree.
//! - Comments, doctypes, closing tags and `<script>` contents are skipped.
//!
//! Unquoted `style` values get no sub-tree: there is no opening delimiter to
//! rebase against.

use std::collections::VecDeque;
use std::ops::Range;

use tracing::trace;

use crate::stylesheet::StyleSheetTree;
use crate::tree::{NodeKind, RawNode, SyntaxNode, SyntaxTree};

/// A parsed markup document.
#[derive(Debug, Clone)]
pub struct MarkupTree {
    len: usize,
    nodes: Vec<MarkupNode>,
}

#[derive(Debug, Clone)]
struct MarkupNode {
    raw: RawNode,
    embedded: Option<StyleSheetTree>,
}

impl MarkupTree {
    /// Parses a markup document.
    pub fn parse(text: &str) -> Self {
        let mut nodes = Vec::new();
        for item in Tokenizer::new(text) {
            match item {
                Item::Attribute { name, value } => {
                    let embedded = (value.quoted && name.eq_ignore_ascii_case("style"))
                        .then(|| StyleSheetTree::parse_declarations(&text[value.inner()]));
                    if embedded.is_some() {
                        trace!(from = value.from, to = value.to, "mounted style attribute");
                    }
                    nodes.push(MarkupNode {
                        raw: RawNode {
                            kind: NodeKind::AttributeValue,
                            from: value.from,
                            to: value.to,
                        },
                        embedded,
                    });
                }
                Item::StyleContent(range) => {
                    let sheet = StyleSheetTree::parse_stylesheet(&text[range.clone()]);
                    trace!(from = range.start, nodes = sheet.node_count(), "mounted style element");
                    nodes.extend(sheet.shifted_nodes(range.start).map(|raw| MarkupNode {
                        raw,
                        embedded: None,
                    }));
                }
            }
        }
        Self {
            len: text.len(),
            nodes,
        }
    }
}

impl SyntaxTree for MarkupTree {
    fn extent(&self) -> Range<usize> {
        0..self.len
    }

    fn nodes(&self, range: Range<usize>) -> Box<dyn Iterator<Item = SyntaxNode<'_>> + '_> {
        Box::new(
            self.nodes
                .iter()
                .map(|node| {
                    let view = node.raw.view();
                    match &node.embedded {
                        Some(tree) => view.with_embedded(tree),
                        None => view,
                    }
                })
                .filter(move |node| node.intersects(&range)),
        )
    }
}

// ─── Tokenizer ──────────────────────────────────────────────────────────────

/// An attribute value span, quotes included when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ValueSpan {
    from: usize,
    to: usize,
    quoted: bool,
}

impl ValueSpan {
    /// The value text without its quotes.
    fn inner(&self) -> Range<usize> {
        if self.quoted {
            self.from + 1..self.to.saturating_sub(1).max(self.from + 1)
        } else {
            self.from..self.to
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item<'a> {
    Attribute { name: &'a str, value: ValueSpan },
    StyleContent(Range<usize>),
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    pending: VecDeque<Item<'a>>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    fn skip_past(&mut self, needle: &str) {
        self.pos = match self.input[self.pos..].find(needle) {
            Some(index) => self.pos + index + needle.len(),
            None => self.input.len(),
        };
    }

    /// Byte offset of the next case-insensitive `</name`, or the input end.
    fn find_close_tag(&self, name: &str) -> usize {
        let bytes = self.bytes();
        let needle_len = name.len() + 2;
        let mut index = self.pos;
        while index + needle_len <= bytes.len() {
            if bytes[index] == b'<'
                && bytes[index + 1] == b'/'
                && bytes[index + 2..index + needle_len].eq_ignore_ascii_case(name.as_bytes())
            {
                return index;
            }
            index += 1;
        }
        bytes.len()
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.bytes()[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, keep: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.pos < self.input.len() && keep(self.bytes()[self.pos]) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Reads a start tag whose `<` is at `self.pos`. Queues its attributes and
    /// any raw-text content that follows it.
    fn start_tag(&mut self) {
        self.pos += 1;
        let name = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b':');
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.bytes().get(self.pos) {
                None => return,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    self_closing = true;
                    continue;
                }
                Some(_) => {}
            }
            self_closing = false;

            let attribute = self.take_while(|b| {
                !b.is_ascii_whitespace() && b != b'=' && b != b'>' && b != b'/'
            });
            if attribute.is_empty() {
                // Stray byte such as a lone quote; step over it.
                self.pos += 1;
                continue;
            }
            self.skip_whitespace();
            if self.bytes().get(self.pos) != Some(&b'=') {
                continue;
            }
            self.pos += 1;
            self.skip_whitespace();
            if let Some(value) = self.attribute_value() {
                self.pending.push_back(Item::Attribute {
                    name: attribute,
                    value,
                });
            }
        }

        if self_closing {
            return;
        }
        if name.eq_ignore_ascii_case("style") {
            let start = self.pos;
            let end = self.find_close_tag("style");
            self.pending.push_back(Item::StyleContent(start..end));
            self.pos = end;
        } else if name.eq_ignore_ascii_case("script") {
            self.pos = self.find_close_tag("script");
        }
    }

    fn attribute_value(&mut self) -> Option<ValueSpan> {
        let from = self.pos;
        match self.bytes().get(self.pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let close = self.input[from + 1..].find(quote as char)?;
                self.pos = from + 1 + close + 1;
                Some(ValueSpan {
                    from,
                    to: self.pos,
                    quoted: true,
                })
            }
            Some(_) => {
                let value = self.take_while(|b| !b.is_ascii_whitespace() && b != b'>');
                (!value.is_empty()).then_some(ValueSpan {
                    from,
                    to: self.pos,
                    quoted: false,
                })
            }
            None => None,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some(item);
            }
            if self.pos >= self.input.len() {
                return None;
            }

            let remaining = &self.input[self.pos..];
            let Some(open) = remaining.find('<') else {
                self.pos = self.input.len();
                return None;
            };
            self.pos += open;

            let rest = &self.input[self.pos..];
            if rest.starts_with("<!--") {
                self.skip_past("-->");
            } else if rest.starts_with("</") || rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_past(">");
            } else if rest
                .as_bytes()
                .get(1)
                .is_some_and(|b| b.is_ascii_alphabetic())
            {
                self.start_tag();
            } else {
                self.pos += 1;
            }
        }
    }
}
