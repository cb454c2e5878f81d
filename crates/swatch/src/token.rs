//! Recognized color occurrences.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::codec::Rgb;

/// The textual form a color was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    Hex,
    /// `rgb(...)` or `rgba(...)`.
    Rgb,
    /// `hsl(...)` or `hsla(...)`.
    Hsl,
    /// A CSS color keyword.
    Named,
}

impl Notation {
    pub const ALL: [Notation; 4] = [Notation::Hex, Notation::Rgb, Notation::Hsl, Notation::Named];

    /// Whether this notation is written as a function call.
    pub fn is_functional(self) -> bool {
        matches!(self, Notation::Rgb | Notation::Hsl)
    }

    /// The function name used when a token does not carry its own.
    pub(crate) fn default_function(self) -> &'static str {
        match self {
            Notation::Hsl => "hsl",
            _ => "rgb",
        }
    }
}

/// One color occurrence found by a scan.
///
/// `source_from..source_to` covers exactly the recognized text: the whole
/// call expression, the hash literal or the keyword. Offsets are absolute
/// document byte offsets, even for colors found inside a `style="..."`
/// attribute.
///
/// Tokens are only valid for the document text they were scanned from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorToken {
    pub source_from: usize,
    pub source_to: usize,
    pub notation: Notation,
    /// The canonical color.
    pub color: Rgb,
    /// Alpha text as written: hex digits for [`Notation::Hex`], the separator
    /// and value (`, 0.5`, ` / 50%`) for the functional notations, empty when
    /// absent.
    pub alpha: String,
    /// The function name as written (`rgb`, `RGBA`, `hsla`), for functional
    /// notations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl ColorToken {
    pub fn span(&self) -> Range<usize> {
        self.source_from..self.source_to
    }

    /// Renders this token in its own notation with `color` in place of the
    /// recognized one.
    pub fn render(&self, color: Rgb) -> String {
        crate::writer::render(self, color)
    }

    /// Replaces this token's span in `document` with `replacement`.
    ///
    /// Returns the document unchanged when the span does not fit it.
    pub fn apply(&self, document: &str, replacement: &str) -> String {
        let (Some(head), Some(tail)) = (
            document.get(..self.source_from),
            document.get(self.source_to..),
        ) else {
            return document.to_string();
        };
        if self.source_from > self.source_to {
            return document.to_string();
        }

        let mut edited = String::with_capacity(head.len() + replacement.len() + tail.len());
        edited.push_str(head);
        edited.push_str(replacement);
        edited.push_str(tail);
        edited
    }

    pub(crate) fn rebased(mut self, offset: usize) -> Self {
        self.source_from += offset;
        self.source_to += offset;
        self
    }
}
