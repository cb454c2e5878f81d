//! # Swatch - color tokens in stylesheets and markup
//!
//! Swatch finds the colors written in a document and rewrites them in the
//! notation they were written in. It understands four notations:
//!
//! | Notation | Examples                                          |
//! |----------|---------------------------------------------------|
//! | Hex      | `#f00`, `#f008`, `#ff0000`, `#ff000080`           |
//! | Rgb      | `rgb(255, 0, 0)`, `rgba(100%, 0, 0, .5)`, `rgb(255 0 0 / 50%)` |
//! | Hsl      | `hsl(0, 100%, 50%)`, `hsla(0deg 100% 50% / .5)`   |
//! | Named    | `red`, `papayawhip`, any of the 147 CSS keywords  |
//!
//! The engine never parses CSS itself. It walks any tree implementing
//! [`swatch_syntax::SyntaxTree`], so it works with the bundled
//! [`StyleSheetTree`](swatch_syntax::StyleSheetTree) and
//! [`MarkupTree`](swatch_syntax::MarkupTree) or with a host editor's own
//! parse tree.
//!
//! ## Scanning
//!
//! ```rust
//! use swatch::{scan, Notation, Rgb};
//! use swatch_syntax::{MarkupTree, SyntaxTree};
//!
//! let html = r#"<p style="color: rgb(255, 50%, 64, 0.5)">hi</p>"#;
//! let tree = MarkupTree::parse(html);
//!
//! let tokens = scan(&tree, tree.extent(), html)?;
//! let token = &tokens[0];
//! assert_eq!(token.notation, Notation::Rgb);
//! assert_eq!(token.color, Rgb(255, 128, 64));
//! assert_eq!(&html[token.span()], "rgb(255, 50%, 64, 0.5)");
//! # Ok::<(), swatch::ScanError>(())
//! ```
//!
//! ## Rewriting
//!
//! A token renders a replacement color in its own notation. The host applies
//! the text at the token's span:
//!
//! ```rust
//! # use swatch::{scan, Rgb};
//! # use swatch_syntax::{StyleSheetTree, SyntaxTree};
//! let css = "a { color: hsl(0, 100%, 50%) }";
//! let tree = StyleSheetTree::parse_stylesheet(css);
//! let token = &scan(&tree, tree.extent(), css)?[0];
//!
//! let replacement = token.render(Rgb(0, 0, 255));
//! assert_eq!(token.apply(css, &replacement), "a { color: hsl(240, 100%, 50%) }");
//! # Ok::<(), swatch::ScanError>(())
//! ```
//!
//! ## Modules
//!
//! - [`codec`]: hex, RGB and HSL conversions
//! - [`named`]: the CSS keyword table
//! - [`recognize`]: per-notation recognizers and the node-kind dispatch table
//! - [`scan`](mod@scan): the tree walker
//! - [`writer`]: rendering and notation conversion

pub mod codec;
mod error;
pub mod named;
mod options;
pub mod recognize;
pub mod scan;
mod token;
pub mod writer;

pub use codec::{Hsl, Rgb};
pub use error::{ColorParseError, ScanError};
pub use options::{NotationSet, ScanOptions, SlashAlpha};
pub use scan::{scan, Scanner, OPENING_DELIMITER_WIDTH};
pub use token::{ColorToken, Notation};
pub use writer::{convert, render};
