//! Error types.
//!
//! Almost nothing in this crate fails: a node whose text is not a color is
//! simply not a token, and a color with no keyword is written as hex. The two
//! errors here cover a broken scanner invariant and explicit parsing of a
//! canonical color string.

use std::ops::Range;

use thiserror::Error;

/// Error returned by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// An embedded sub-tree contained another embedded sub-tree.
    ///
    /// Embedded trees are mounted one level deep; a second level means the
    /// host grammar and the scanner disagree about the tree shape.
    #[error("embedded syntax tree nested inside another embedded tree at {at:?}")]
    NestedOverlay {
        /// Absolute document span of the inner attribute value.
        at: Range<usize>,
    },
}

/// Error returned when a string is not a canonical `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("invalid hex color '{0}': expected #rrggbb")]
    InvalidHex(String),
}
