//! Per-notation recognizers and the node-kind dispatch table.
//!
//! A recognizer looks at the source text of one node and either produces a
//! [`Recognized`] color or declines. Declining is the normal outcome: most
//! identifiers are not color names and most calls are not color functions.
//!
//! Which recognizers run for a node is decided only by its [`NodeKind`]:
//!
//! | Node kind        | Recognizers                 |
//! |------------------|-----------------------------|
//! | `ColorLiteral`   | `Hex`                       |
//! | `ValueName`      | `Named`                     |
//! | `CallExpression` | `RgbCall`, `HslCall`        |
//! | `AttributeValue` | `AttributeOverlay`          |
//! | `Other`          | none                        |

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use swatch_syntax::{NodeKind, SyntaxNode, SyntaxTree};

use crate::codec::{self, Rgb};
use crate::named;
use crate::options::{ScanOptions, SlashAlpha};
use crate::token::{ColorToken, Notation};

static HEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]+$").unwrap());

static RGB_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<name>(?i:rgba?))\(\s*",
        r"(?P<r>[0-9]{1,3}%?)(?:\s*,\s*|\s+)",
        r"(?P<g>[0-9]{1,3}%?)(?:\s*,\s*|\s+)",
        r"(?P<b>[0-9]{1,3}%?)",
        r"(?P<alpha>\s*[,/]\s*(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)%?)?",
        r"\s*\)$",
    ))
    .unwrap()
});

static HSL_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<name>(?i:hsla?))\(\s*",
        r"(?P<h>[0-9]{1,3})(?i:deg)?(?:\s*,\s*|\s+)",
        r"(?P<s>[0-9]{1,3})%(?:\s*,\s*|\s+)",
        r"(?P<l>[0-9]{1,3})%",
        r"(?P<alpha>\s*[,/]\s*(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)%?)?",
        r"\s*\)$",
    ))
    .unwrap()
});

/// A color recognized in a node's text, before it is given a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognized {
    pub notation: Notation,
    pub color: Rgb,
    pub alpha: String,
    pub function: Option<String>,
}

impl Recognized {
    /// Attaches a source span.
    pub fn at(self, span: Range<usize>) -> ColorToken {
        ColorToken {
            source_from: span.start,
            source_to: span.end,
            notation: self.notation,
            color: self.color,
            alpha: self.alpha,
            function: self.function,
        }
    }
}

/// One entry of the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognizer {
    Hex,
    Named,
    RgbCall,
    HslCall,
    /// Not a text recognizer: answers whether an attribute value carries an
    /// embedded tree for the scanner to descend into.
    AttributeOverlay,
}

impl Recognizer {
    /// The recognizers that apply to a node kind, in the order they are tried.
    pub fn for_kind(kind: NodeKind) -> &'static [Recognizer] {
        match kind {
            NodeKind::ColorLiteral => &[Recognizer::Hex],
            NodeKind::ValueName => &[Recognizer::Named],
            NodeKind::CallExpression => &[Recognizer::RgbCall, Recognizer::HslCall],
            NodeKind::AttributeValue => &[Recognizer::AttributeOverlay],
            NodeKind::Other => &[],
        }
    }

    /// The notation this recognizer produces, if it produces tokens at all.
    pub fn notation(self) -> Option<Notation> {
        match self {
            Recognizer::Hex => Some(Notation::Hex),
            Recognizer::Named => Some(Notation::Named),
            Recognizer::RgbCall => Some(Notation::Rgb),
            Recognizer::HslCall => Some(Notation::Hsl),
            Recognizer::AttributeOverlay => None,
        }
    }

    /// Tries to read a color from `text`.
    pub fn recognize(self, text: &str, options: &ScanOptions) -> Option<Recognized> {
        match self {
            Recognizer::Hex => recognize_hex(text),
            Recognizer::Named => recognize_named(text),
            Recognizer::RgbCall => recognize_rgb(text, options.slash_alpha_policy()),
            Recognizer::HslCall => recognize_hsl(text, options.slash_alpha_policy()),
            Recognizer::AttributeOverlay => None,
        }
    }

    /// The embedded tree mounted on `node`, for [`Recognizer::AttributeOverlay`].
    pub fn overlay<'a>(self, node: &SyntaxNode<'a>) -> Option<&'a dyn SyntaxTree> {
        match self {
            Recognizer::AttributeOverlay => node.embedded(),
            _ => None,
        }
    }
}

/// Recognizes free-standing color text in any notation.
///
/// Used where there is no tree to say what kind of text this is.
pub fn recognize_text(text: &str, options: &ScanOptions) -> Option<Recognized> {
    let text = text.trim();
    let candidates: &[Recognizer] = if text.starts_with('#') {
        &[Recognizer::Hex]
    } else if text.ends_with(')') {
        &[Recognizer::RgbCall, Recognizer::HslCall]
    } else {
        &[Recognizer::Named]
    };
    candidates
        .iter()
        .filter(|recognizer| recognizer.notation().is_some_and(|n| options.recognizes(n)))
        .find_map(|recognizer| recognizer.recognize(text, options))
}

fn recognize_hex(text: &str) -> Option<Recognized> {
    if !HEX.is_match(text) {
        return None;
    }
    let (canonical, alpha) = codec::expand_hex(text);
    Some(Recognized {
        notation: Notation::Hex,
        color: Rgb::from_hex(&canonical)?,
        alpha,
        function: None,
    })
}

fn recognize_named(text: &str) -> Option<Recognized> {
    let color = named::lookup_rgb(&text.to_ascii_lowercase())?;
    Some(Recognized {
        notation: Notation::Named,
        color,
        alpha: String::new(),
        function: None,
    })
}

fn recognize_rgb(text: &str, slash: SlashAlpha) -> Option<Recognized> {
    let caps = RGB_CALL.captures(text)?;
    let color = Rgb(
        codec::rgb_component(&caps["r"])?,
        codec::rgb_component(&caps["g"])?,
        codec::rgb_component(&caps["b"])?,
    );
    Some(Recognized {
        notation: Notation::Rgb,
        color,
        alpha: alpha_fragment(&caps, slash),
        function: Some(caps["name"].to_string()),
    })
}

fn recognize_hsl(text: &str, slash: SlashAlpha) -> Option<Recognized> {
    let caps = HSL_CALL.captures(text)?;
    let hue: f64 = caps["h"].parse().ok()?;
    let saturation: f64 = caps["s"].parse().ok()?;
    let luminance: f64 = caps["l"].parse().ok()?;
    let color = codec::hsl_to_rgb(
        hue,
        (saturation / 100.0).min(1.0),
        (luminance / 100.0).min(1.0),
    );
    Some(Recognized {
        notation: Notation::Hsl,
        color,
        alpha: alpha_fragment(&caps, slash),
        function: Some(caps["name"].to_string()),
    })
}

fn alpha_fragment(caps: &Captures<'_>, slash: SlashAlpha) -> String {
    let Some(fragment) = caps.name("alpha").map(|m| m.as_str()) else {
        return String::new();
    };
    match (slash, fragment.trim_start().strip_prefix('/')) {
        (SlashAlpha::NormalizeToComma, Some(value)) => format!(", {}", value.trim()),
        _ => fragment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ScanOptions {
        ScanOptions::default()
    }

    // =========================================================================
    // Dispatch table
    // =========================================================================

    #[test]
    fn dispatch_by_kind() {
        assert_eq!(Recognizer::for_kind(NodeKind::ColorLiteral), &[Recognizer::Hex]);
        assert_eq!(Recognizer::for_kind(NodeKind::ValueName), &[Recognizer::Named]);
        assert_eq!(
            Recognizer::for_kind(NodeKind::CallExpression),
            &[Recognizer::RgbCall, Recognizer::HslCall]
        );
        assert_eq!(
            Recognizer::for_kind(NodeKind::AttributeValue),
            &[Recognizer::AttributeOverlay]
        );
        assert!(Recognizer::for_kind(NodeKind::Other).is_empty());
    }

    #[test]
    fn overlay_recognizer_never_reads_text() {
        assert_eq!(Recognizer::AttributeOverlay.recognize("#fff", &defaults()), None);
        assert_eq!(Recognizer::AttributeOverlay.notation(), None);
    }

    #[test]
    fn overlay_query_returns_none_without_mount() {
        let node = SyntaxNode::new(NodeKind::AttributeValue, 0, 5);
        assert!(Recognizer::AttributeOverlay.overlay(&node).is_none());
        assert!(Recognizer::Hex.overlay(&node).is_none());
    }

    // =========================================================================
    // Hex
    // =========================================================================

    #[test]
    fn hex_forms() {
        let short = Recognizer::Hex.recognize("#ABCD", &defaults()).unwrap();
        assert_eq!(short.color, Rgb(0xaa, 0xbb, 0xcc));
        assert_eq!(short.alpha, "dd");

        let long = Recognizer::Hex.recognize("#ff000080", &defaults()).unwrap();
        assert_eq!(long.color, Rgb(255, 0, 0));
        assert_eq!(long.alpha, "80");
        assert_eq!(long.notation, Notation::Hex);
    }

    #[test]
    fn hex_alpha_case_survives_render() {
        let found = Recognizer::Hex.recognize("#FF0000AA", &defaults()).unwrap();
        assert_eq!(found.alpha, "AA");
        let token = found.at(0..9);
        assert_eq!(token.render(token.color), "#ff0000AA");
    }

    #[test]
    fn hex_rejects_bad_shapes() {
        for text in ["#ab", "#abcde", "#ggg", "fff", "#", "#1234567890"] {
            assert_eq!(Recognizer::Hex.recognize(text, &defaults()), None, "{text}");
        }
    }

    // =========================================================================
    // Named
    // =========================================================================

    #[test]
    fn named_matches_keywords_in_any_case() {
        let red = Recognizer::Named.recognize("Red", &defaults()).unwrap();
        assert_eq!(red.color, Rgb(255, 0, 0));
        assert_eq!(red.notation, Notation::Named);
        assert_eq!(Recognizer::Named.recognize("auto", &defaults()), None);
    }

    // =========================================================================
    // rgb()
    // =========================================================================

    #[test]
    fn rgb_with_percent_and_alpha() {
        let found = Recognizer::RgbCall
            .recognize("rgb(255, 50%, 64, 0.5)", &defaults())
            .unwrap();
        assert_eq!(found.color, Rgb(255, 128, 64));
        assert_eq!(found.alpha, ", 0.5");
        assert_eq!(found.function.as_deref(), Some("rgb"));
    }

    #[test]
    fn rgb_space_separated_with_slash_alpha() {
        let found = Recognizer::RgbCall
            .recognize("rgba(1 2 3 / 50%)", &defaults())
            .unwrap();
        assert_eq!(found.color, Rgb(1, 2, 3));
        assert_eq!(found.alpha, " / 50%");
        assert_eq!(found.function.as_deref(), Some("rgba"));
    }

    #[test]
    fn rgb_slash_alpha_can_be_normalized() {
        let options = ScanOptions::new().slash_alpha(SlashAlpha::NormalizeToComma);
        let found = Recognizer::RgbCall
            .recognize("rgb(1 2 3/.25)", &options)
            .unwrap();
        assert_eq!(found.alpha, ", .25");
    }

    #[test]
    fn rgb_without_alpha() {
        let found = Recognizer::RgbCall
            .recognize("RGB( 0,0,255 )", &defaults())
            .unwrap();
        assert_eq!(found.color, Rgb(0, 0, 255));
        assert_eq!(found.alpha, "");
        assert_eq!(found.function.as_deref(), Some("RGB"));
    }

    #[test]
    fn rgb_malformed_is_skipped() {
        for text in [
            "rgb(not, a, color)",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4, 5)",
            "rgb(1, 2, 3",
            "rgb(1000, 0, 0)",
            "hsl(1, 2%, 3%)",
            "translate(1, 2, 3)",
        ] {
            assert_eq!(Recognizer::RgbCall.recognize(text, &defaults()), None, "{text}");
        }
    }

    // =========================================================================
    // hsl()
    // =========================================================================

    #[test]
    fn hsl_basic() {
        let found = Recognizer::HslCall
            .recognize("hsl(120, 100%, 50%)", &defaults())
            .unwrap();
        assert_eq!(found.color, Rgb(0, 255, 0));
        assert_eq!(found.notation, Notation::Hsl);
        assert_eq!(found.alpha, "");
    }

    #[test]
    fn hsl_with_deg_unit_and_alpha() {
        let found = Recognizer::HslCall
            .recognize("hsla(240deg 100% 50% / 0.3)", &defaults())
            .unwrap();
        assert_eq!(found.color, Rgb(0, 0, 255));
        assert_eq!(found.alpha, " / 0.3");
        assert_eq!(found.function.as_deref(), Some("hsla"));
    }

    #[test]
    fn hsl_requires_percentages() {
        assert_eq!(
            Recognizer::HslCall.recognize("hsl(120, 100, 50)", &defaults()),
            None
        );
        assert_eq!(
            Recognizer::HslCall.recognize("rgb(120, 100%, 50%)", &defaults()),
            None
        );
    }

    // =========================================================================
    // Free-standing text
    // =========================================================================

    #[test]
    fn recognize_text_picks_by_shape() {
        let options = defaults();
        let hex = recognize_text(" #fff ", &options).unwrap();
        assert_eq!(hex.notation, Notation::Hex);
        let hsl = recognize_text("hsl(0, 100%, 50%)", &options).unwrap();
        assert_eq!(hsl.notation, Notation::Hsl);
        let named = recognize_text("teal", &options).unwrap();
        assert_eq!(named.notation, Notation::Named);
        assert!(recognize_text("calc(1px)", &options).is_none());
    }

    #[test]
    fn recognize_text_respects_notation_filter() {
        let options = ScanOptions::new().notations(crate::NotationSet::only(Notation::Hex));
        assert!(recognize_text("red", &options).is_none());
        assert!(recognize_text("#f00", &options).is_some());
    }

    #[test]
    fn recognized_at_attaches_span() {
        let token = recognize_text("red", &defaults()).unwrap().at(4..7);
        assert_eq!(token.span(), 4..7);
        assert_eq!(token.color, Rgb(255, 0, 0));
    }
}
