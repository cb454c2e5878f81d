//! Pure conversions between hex, RGB components and HSL components.
//!
//! Nothing here knows about trees or documents. The canonical color every
//! notation converts through is [`Rgb`], written as `#rrggbb`.
//!
//! # Example
//!
//! ```rust
//! use swatch::codec::{expand_hex, hsl_to_rgb, rgb_component_to_hex, rgb_to_hsl, Rgb};
//!
//! assert_eq!(expand_hex("#ABCD"), ("#aabbcc".to_string(), "dd".to_string()));
//! assert_eq!(rgb_component_to_hex("50%").as_deref(), Some("80"));
//! assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb(0, 255, 0));
//! assert_eq!(rgb_to_hsl(Rgb(255, 0, 0)).hue, 0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

// ─── Rgb ────────────────────────────────────────────────────────────────────

/// A canonical 24-bit color.
///
/// Serializes as its `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses a 7-character `#rrggbb` string (either case).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let pair = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
        Some(Rgb(pair(0)?, pair(2)?, pair(4)?))
    }

    /// Formats as `#rrggbb` with lowercase digits.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ─── Hex literals and RGB components ────────────────────────────────────────

/// Expands a hex literal to canonical `#rrggbb` plus its alpha digits.
///
/// | Input length | Form        | Result                          |
/// |--------------|-------------|---------------------------------|
/// | 4            | `#rgb`      | digits doubled, no alpha        |
/// | 5            | `#rgba`     | digits doubled, alpha `aa`      |
/// | 7            | `#rrggbb`   | as is, no alpha                 |
/// | 9            | `#rrggbbaa` | first six digits, alpha `aa`    |
///
/// The color is lowercase. Short-form alpha digits are doubled in lowercase;
/// the two alpha digits of `#rrggbbaa` are kept as written. Any other input
/// is returned unchanged with no alpha; callers decide whether that is a
/// color.
pub fn expand_hex(text: &str) -> (String, String) {
    if !text.is_ascii() || !text.starts_with('#') {
        return (text.to_string(), String::new());
    }
    let lower = text.to_ascii_lowercase();
    let digits = &lower[1..];
    match lower.len() {
        4 => (format!("#{}", double(digits)), String::new()),
        5 => (format!("#{}", double(&digits[..3])), double(&digits[3..])),
        7 => (lower, String::new()),
        9 => (lower[..7].to_string(), text[7..].to_string()),
        _ => (text.to_string(), String::new()),
    }
}

fn double(digits: &str) -> String {
    digits.chars().flat_map(|c| [c, c]).collect()
}

/// Converts one `rgb()` component to a channel value.
///
/// A trailing `%` means 0–100 scaled to 0–255; otherwise the number is a
/// channel value. Out-of-range values clamp. Returns `None` for text that is
/// not a number.
pub fn rgb_component(component: &str) -> Option<u8> {
    let component = component.trim();
    let value = match component.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().ok()? / 100.0 * 255.0,
        None => component.parse::<f64>().ok()?,
    };
    value.is_finite().then(|| value.round().clamp(0.0, 255.0) as u8)
}

/// Converts one `rgb()` component to exactly two lowercase hex digits.
pub fn rgb_component_to_hex(component: &str) -> Option<String> {
    rgb_component(component).map(|value| format!("{:02x}", value))
}

/// Splits a `#rrggbb` string into its channels.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    Rgb::from_hex(hex)
}

// ─── HSL ────────────────────────────────────────────────────────────────────

/// An HSL color: hue in whole degrees, saturation and luminance as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
    /// Saturation, `0.0..=1.0`.
    pub saturation: f64,
    /// Luminance, `0.0..=1.0`.
    pub luminance: f64,
}

impl Hsl {
    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self.hue as f64, self.saturation, self.luminance)
    }
}

/// Converts HSL to RGB.
///
/// Hue is in degrees and wraps (720° is 0°); saturation and luminance are
/// fractions.
pub fn hsl_to_rgb(hue: f64, saturation: f64, luminance: f64) -> Rgb {
    if saturation == 0.0 {
        let gray = to_channel(luminance);
        return Rgb(gray, gray, gray);
    }

    let temp1 = if luminance < 0.5 {
        luminance * (1.0 + saturation)
    } else {
        luminance + saturation - luminance * saturation
    };
    let temp2 = 2.0 * luminance - temp1;
    let hue = hue.rem_euclid(360.0) / 360.0;

    Rgb(
        to_channel(hue_to_channel(temp1, temp2, wrap_unit(hue + 1.0 / 3.0))),
        to_channel(hue_to_channel(temp1, temp2, hue)),
        to_channel(hue_to_channel(temp1, temp2, wrap_unit(hue - 1.0 / 3.0))),
    )
}

/// Formats an HSL color as canonical `#rrggbb`.
pub fn hsl_to_hex(hue: f64, saturation: f64, luminance: f64) -> String {
    hsl_to_rgb(hue, saturation, luminance).to_hex()
}

/// Converts RGB to HSL, rounding the hue to a whole degree in `0..360`.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let red = rgb.0 as f64 / 255.0;
    let green = rgb.1 as f64 / 255.0;
    let blue = rgb.2 as f64 / 255.0;
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let luminance = (max + min) / 2.0;

    // Achromatic: hue is meaningless and the formulas below divide by zero.
    if max == min {
        return Hsl {
            hue: 0,
            saturation: 0.0,
            luminance,
        };
    }

    let delta = max - min;
    let saturation = if luminance <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };

    let sector = if max == red {
        (green - blue) / delta
    } else if max == green {
        2.0 + (blue - red) / delta
    } else {
        4.0 + (red - green) / delta
    };

    let mut hue = (sector * 60.0).round();
    while hue < 0.0 {
        hue += 360.0;
    }

    Hsl {
        hue: hue as u16,
        saturation,
        luminance,
    }
}

fn to_channel(fraction: f64) -> u8 {
    (fraction * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Moves a hue fraction back into `[0, 1)`.
fn wrap_unit(hue: f64) -> f64 {
    if hue < 0.0 {
        hue + 1.0
    } else if hue >= 1.0 {
        hue - 1.0
    } else {
        hue
    }
}

fn hue_to_channel(temp1: f64, temp2: f64, hue: f64) -> f64 {
    if 6.0 * hue < 1.0 {
        temp2 + (temp1 - temp2) * 6.0 * hue
    } else if 2.0 * hue < 1.0 {
        temp1
    } else if 3.0 * hue < 2.0 {
        temp2 + (temp1 - temp2) * (2.0 / 3.0 - hue) * 6.0
    } else {
        temp2
    }
}
