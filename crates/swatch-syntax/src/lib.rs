//! Spanned syntax trees for stylesheets and markup.
//!
//! This crate is the host-grammar side of `swatch`. It defines the
//! [`SyntaxTree`] seam the color scanner walks, and ships two trees that
//! implement it:
//!
//! - [`StyleSheetTree`]: CSS, tokenized with `cssparser`. Records hash
//!   literals, identifiers and function calls that sit in value position.
//! - [`MarkupTree`]: markup with `<style>` elements and `style="..."`
//!   attributes. Attribute stylesheets are exposed as embedded sub-trees with
//!   their own coordinate space.
//!
//! Any other grammar (a tree-sitter tree, an editor's incremental parse) can
//! be plugged in by implementing [`SyntaxTree`].
//!
//! # Example
//!
//! ```rust
//! use swatch_syntax::{MarkupTree, NodeKind, SyntaxTree};
//!
//! let html = r#"<p style="color: red">hello</p>"#;
//! let tree = MarkupTree::parse(html);
//!
//! let attribute = tree
//!     .nodes(tree.extent())
//!     .find(|node| node.kind() == NodeKind::AttributeValue)
//!     .unwrap();
//! let style = attribute.embedded().unwrap();
//!
//! // Embedded offsets are relative to the character after the opening quote.
//! let red = style
//!     .nodes(style.extent())
//!     .find(|node| node.kind() == NodeKind::ValueName)
//!     .unwrap();
//! let start = attribute.from() + 1 + red.from();
//! assert_eq!(&html[start..start + 3], "red");
//! ```

mod markup;
mod stylesheet;
mod tree;

pub use markup::MarkupTree;
pub use stylesheet::StyleSheetTree;
pub use tree::{Document, NodeKind, SyntaxNode, SyntaxTree};
