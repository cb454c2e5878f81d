//! Scan configuration.
//!
//! Options are set with a builder and are fixed for the life of a
//! [`Scanner`](crate::Scanner):
//!
//! ```rust
//! use swatch::{Notation, NotationSet, ScanOptions, SlashAlpha};
//!
//! let options = ScanOptions::new()
//!     .notations(NotationSet::only(Notation::Hex).with(Notation::Rgb))
//!     .slash_alpha(SlashAlpha::NormalizeToComma);
//! assert!(!options.recognizes(Notation::Named));
//! ```

use crate::token::Notation;

/// A set of [`Notation`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotationSet(u8);

impl NotationSet {
    pub const ALL: NotationSet = NotationSet(0b1111);
    pub const EMPTY: NotationSet = NotationSet(0);

    pub fn only(notation: Notation) -> Self {
        Self::EMPTY.with(notation)
    }

    pub fn with(self, notation: Notation) -> Self {
        NotationSet(self.0 | Self::bit(notation))
    }

    pub fn without(self, notation: Notation) -> Self {
        NotationSet(self.0 & !Self::bit(notation))
    }

    pub fn contains(self, notation: Notation) -> bool {
        self.0 & Self::bit(notation) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn bit(notation: Notation) -> u8 {
        match notation {
            Notation::Hex => 1,
            Notation::Rgb => 1 << 1,
            Notation::Hsl => 1 << 2,
            Notation::Named => 1 << 3,
        }
    }
}

impl Default for NotationSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<Notation> for NotationSet {
    fn from_iter<I: IntoIterator<Item = Notation>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, NotationSet::with)
    }
}

/// What to do with a `/`-introduced alpha in `rgb()`/`hsl()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SlashAlpha {
    /// Keep the fragment exactly as written (` / 0.5`). Rendered calls then
    /// separate components with spaces.
    #[default]
    Preserve,
    /// Rewrite the fragment to the comma form (`, 0.5`) when recognized.
    NormalizeToComma,
}

/// Options for a [`Scanner`](crate::Scanner).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    notations: NotationSet,
    slash_alpha: SlashAlpha,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts which notations are recognized.
    pub fn notations(mut self, notations: NotationSet) -> Self {
        self.notations = notations;
        self
    }

    pub fn slash_alpha(mut self, policy: SlashAlpha) -> Self {
        self.slash_alpha = policy;
        self
    }

    pub fn recognizes(&self, notation: Notation) -> bool {
        self.notations.contains(notation)
    }

    pub fn slash_alpha_policy(&self) -> SlashAlpha {
        self.slash_alpha
    }
}
