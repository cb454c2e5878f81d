//! Rendering colors back into source text.
//!
//! [`render`] writes a new color in the notation a token was found in,
//! keeping its function name and alpha text. [`convert`] rewrites a color
//! string into a different notation.

use crate::codec::{rgb_to_hsl, Rgb};
use crate::named;
use crate::options::ScanOptions;
use crate::recognize::recognize_text;
use crate::token::{ColorToken, Notation};

/// Renders `color` in `token`'s notation, for replacement at `token.span()`.
///
/// A named token whose new color has no keyword falls back to `#rrggbb`.
pub fn render(token: &ColorToken, color: Rgb) -> String {
    match token.notation {
        Notation::Hex => format!("{}{}", color.to_hex(), token.alpha),
        Notation::Rgb => {
            let components = [
                color.0.to_string(),
                color.1.to_string(),
                color.2.to_string(),
            ];
            call(token, &components)
        }
        Notation::Hsl => {
            let hsl = rgb_to_hsl(color);
            let components = [
                hsl.hue.to_string(),
                format!("{}%", (hsl.saturation * 100.0).round()),
                format!("{}%", (hsl.luminance * 100.0).round()),
            ];
            call(token, &components)
        }
        Notation::Named => match named::reverse_lookup(&color.to_hex()) {
            Some(name) => name.to_string(),
            None => color.to_hex(),
        },
    }
}

fn call(token: &ColorToken, components: &[String]) -> String {
    let name = token
        .function
        .as_deref()
        .unwrap_or_else(|| token.notation.default_function());
    // The comma form is invalid CSS with a slash alpha.
    let separator = if is_slash_alpha(&token.alpha) { " " } else { ", " };
    format!("{}({}{})", name, components.join(separator), token.alpha)
}

fn is_slash_alpha(alpha: &str) -> bool {
    alpha.trim_start().starts_with('/')
}

/// Rewrites a color written in any notation into `notation`.
///
/// Alpha carries over: hex alpha digits become a `, 0.502`-style fraction
/// and back. A color with alpha asked for as a keyword is written as hex,
/// since keywords cannot carry alpha. Returns `None` when `text` is not a
/// color.
///
/// ```rust
/// use swatch::{convert, Notation};
///
/// assert_eq!(convert("#f00", Notation::Named).as_deref(), Some("red"));
/// assert_eq!(convert("red", Notation::Hsl).as_deref(), Some("hsl(0, 100%, 50%)"));
/// assert_eq!(convert("#ff000080", Notation::Rgb).as_deref(), Some("rgb(255, 0, 0, 0.502)"));
/// ```
pub fn convert(text: &str, notation: Notation) -> Option<String> {
    let found = recognize_text(text, &ScanOptions::default())?;
    let notation = match notation {
        Notation::Named if !found.alpha.is_empty() => Notation::Hex,
        other => other,
    };
    let alpha = translate_alpha(&found.alpha, found.notation, notation)?;
    let function = if found.notation == notation {
        found.function
    } else {
        None
    };

    let token = ColorToken {
        source_from: 0,
        source_to: text.len(),
        notation,
        color: found.color,
        alpha,
        function,
    };
    Some(render(&token, token.color))
}

/// Moves an alpha fragment between the hex form and the functional form.
fn translate_alpha(alpha: &str, from: Notation, to: Notation) -> Option<String> {
    if alpha.is_empty() || from == to || (from.is_functional() && to.is_functional()) {
        return Some(alpha.to_string());
    }
    match (from, to) {
        (Notation::Hex, _) => {
            let opacity = u8::from_str_radix(alpha, 16).ok()? as f64 / 255.0;
            Some(format!(", {}", format_fraction(opacity)))
        }
        (_, Notation::Hex) => {
            let opacity = functional_opacity(alpha)?;
            Some(format!("{:02x}", (opacity * 255.0).round() as u8))
        }
        _ => None,
    }
}

/// Reads `, 0.5`, ` / 50%` or `,.5` as an opacity in `0.0..=1.0`.
fn functional_opacity(alpha: &str) -> Option<f64> {
    let value = alpha.trim_start().strip_prefix(|c| c == ',' || c == '/')?.trim();
    let opacity = match value.strip_suffix('%') {
        Some(percent) => percent.parse::<f64>().ok()? / 100.0,
        None => value.parse::<f64>().ok()?,
    };
    Some(opacity.clamp(0.0, 1.0))
}

fn format_fraction(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() {
        "0".to_string()
    } else {
        text.to_string()
    }
}
