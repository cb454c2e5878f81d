//! Stylesheet trees built on the `cssparser` tokenizer.
//!
//! The tree is deliberately shallow: it records only the nodes a color scanner
//! needs (hash literals, identifiers and function calls in value position),
//! plus `Other` nodes for the declarations that contain them. Malformed input
//! never fails; the tokenizer recovers and the builder keeps walking.
//!
//! Value position is tracked the way CSS defines it:
//!
//! - In a rule list, everything before `{` is a selector or at-rule prelude.
//! - In a declaration list, tokens after `name:` up to `;` are a value.
//! - A `{` inside a declaration list opens a nested rule; anything recorded
//!   since the statement started was a selector and is discarded.
//! - Blocks after `@media`, `@supports`, `@layer`, `@container` and
//!   `@document` hold rules; every other block holds declarations.

use std::ops::Range;

use cssparser::{ParseError, Parser, ParserInput, Token};

use crate::tree::{NodeKind, RawNode, SyntaxNode, SyntaxTree};

/// At-rules whose block contains rules rather than declarations.
const GROUP_RULES: &[&str] = &["media", "supports", "layer", "container", "document"];

/// A parsed stylesheet (or bare declaration list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheetTree {
    len: usize,
    nodes: Vec<RawNode>,
}

impl StyleSheetTree {
    /// Parses a full stylesheet: rules, at-rules and nested blocks.
    pub fn parse_stylesheet(text: &str) -> Self {
        Self::build(text, Scope::Rules)
    }

    /// Parses a bare declaration list, as written in a `style` attribute.
    pub fn parse_declarations(text: &str) -> Self {
        Self::build(text, Scope::Declarations)
    }

    fn build(text: &str, scope: Scope) -> Self {
        let mut input = ParserInput::new(text);
        let mut parser = Parser::new(&mut input);
        let mut builder = Builder::default();
        let _ = builder.walk(&mut parser, scope);
        Self {
            len: text.len(),
            nodes: builder.nodes,
        }
    }

    /// Number of recorded nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The recorded nodes moved into another coordinate space.
    pub(crate) fn shifted_nodes(&self, offset: usize) -> impl Iterator<Item = RawNode> + '_ {
        self.nodes.iter().map(move |node| node.shifted(offset))
    }
}

impl SyntaxTree for StyleSheetTree {
    fn extent(&self) -> Range<usize> {
        0..self.len
    }

    fn nodes(&self, range: Range<usize>) -> Box<dyn Iterator<Item = SyntaxNode<'_>> + '_> {
        Box::new(
            self.nodes
                .iter()
                .map(RawNode::view)
                .filter(move |node| node.intersects(&range)),
        )
    }
}

/// What the tokens of the current block mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Top level or a group rule body: preludes followed by blocks.
    Rules,
    /// A declaration list: `name: value;` statements and nested rules.
    Declarations,
    /// Inside a function or parenthesis that is part of a value.
    Value,
    /// Inside a parenthesis or function that is not part of a value.
    Prelude,
}

#[derive(Default)]
struct Builder {
    nodes: Vec<RawNode>,
}

impl Builder {
    fn push(&mut self, kind: NodeKind, from: usize, to: usize) -> usize {
        self.nodes.push(RawNode { kind, from, to });
        self.nodes.len() - 1
    }

    fn walk<'i, 't>(
        &mut self,
        input: &mut Parser<'i, 't>,
        scope: Scope,
    ) -> Result<(), ParseError<'i, ()>> {
        let mut in_value = scope == Scope::Value;
        let mut group_rule = false;
        // Declaration statement bookkeeping: where it began and which node
        // index it started recording at.
        let mut statement_start: Option<usize> = None;
        let mut statement_nodes = self.nodes.len();
        let mut declaration: Option<usize> = None;

        loop {
            let from = input.position().byte_index();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };
            let to = input.position().byte_index();

            if scope == Scope::Declarations
                && statement_start.is_none()
                && !matches!(token, Token::WhiteSpace(_) | Token::Comment(_) | Token::Semicolon)
            {
                statement_start = Some(from);
                statement_nodes = self.nodes.len();
            }

            match token {
                Token::WhiteSpace(_) | Token::Comment(_) => {}
                Token::Hash(_) | Token::IDHash(_) if in_value => {
                    self.push(NodeKind::ColorLiteral, from, to);
                }
                Token::Ident(_) if in_value => {
                    self.push(NodeKind::ValueName, from, to);
                }
                Token::Function(_) => {
                    let call = in_value.then(|| self.push(NodeKind::CallExpression, from, from));
                    let inner = if in_value { Scope::Value } else { Scope::Prelude };
                    let _ = input.parse_nested_block(|nested| self.walk(nested, inner));
                    if let Some(index) = call {
                        self.nodes[index].to = input.position().byte_index();
                    }
                }
                Token::ParenthesisBlock | Token::SquareBracketBlock => {
                    let inner = if in_value { Scope::Value } else { Scope::Prelude };
                    let _ = input.parse_nested_block(|nested| self.walk(nested, inner));
                }
                Token::AtKeyword(ref name) if scope == Scope::Rules => {
                    group_rule = GROUP_RULES
                        .iter()
                        .any(|rule| name.eq_ignore_ascii_case(rule));
                }
                Token::CurlyBracketBlock => match scope {
                    Scope::Rules => {
                        let inner = if group_rule {
                            Scope::Rules
                        } else {
                            Scope::Declarations
                        };
                        group_rule = false;
                        let _ = input.parse_nested_block(|nested| self.walk(nested, inner));
                    }
                    Scope::Declarations => {
                        // `&:hover { ... }` looked like a declaration until now.
                        self.nodes.truncate(statement_nodes);
                        in_value = false;
                        declaration = None;
                        statement_start = None;
                        let _ = input
                            .parse_nested_block(|nested| self.walk(nested, Scope::Declarations));
                    }
                    Scope::Value | Scope::Prelude => {
                        let _ = input.parse_nested_block(|nested| self.walk(nested, scope));
                    }
                },
                Token::Colon if scope == Scope::Declarations && !in_value => {
                    in_value = true;
                    declaration =
                        statement_start.map(|start| self.push(NodeKind::Other, start, to));
                }
                Token::Semicolon if scope == Scope::Declarations => {
                    self.close_declaration(declaration.take(), from);
                    in_value = false;
                    statement_start = None;
                }
                Token::Semicolon if scope == Scope::Rules => {
                    group_rule = false;
                }
                _ => {}
            }
        }

        let end = input.position().byte_index();
        self.close_declaration(declaration, end);
        Ok(())
    }

    fn close_declaration(&mut self, declaration: Option<usize>, end: usize) {
        if let Some(index) = declaration {
            self.nodes[index].to = end;
        }
    }
}
