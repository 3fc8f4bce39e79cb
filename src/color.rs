//! Color Conversion and Parsing
//!
//! This module provides the 8-bit RGB color type used throughout the picker,
//! HSV to RGB conversion for painting the gradient fields, and the
//! `rgb(r, g, b)` string form shared with the text input and the host page.

use std::fmt;
use std::str::FromStr;

/// An 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Render as a CSS color string, e.g. `rgb(255, 0, 0)`
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// RGBA bytes with full opacity
    #[inline]
    pub fn to_rgba(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Linear interpolation between two colors, rounding each channel
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rgb(s)
    }
}

/// Convert HSV to 8-bit RGB
///
/// # Arguments
/// * `h` - Hue in degrees. Values outside [0, 360) wrap around.
/// * `s` - Saturation (0.0-1.0)
/// * `v` - Value (0.0-1.0)
///
/// Each channel is quantized with `round(x * 255)`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let sector = (h / 60.0).floor();
    let f = h / 60.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb::new(quantize(r), quantize(g), quantize(b))
}

#[inline]
fn quantize(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Fully saturated color for a hue, i.e. `hsl(h, 100%, 50%)`
///
/// Used for the color stops of the hue slider.
#[inline]
pub fn hue_stop_color(hue: f64) -> Rgb {
    hsv_to_rgb(hue, 1.0, 1.0)
}

/// Why typed RGB text was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("expected rgb(r, g, b)")]
    InvalidFunc,
    #[error("component out of range")]
    OutOfRange,
}

/// Parse a color typed into the RGB input.
///
/// Only the exact form `rgb(R, G, B)` is accepted: one to three digits per
/// channel separated by a comma and a single space, with no surrounding
/// whitespace. Channels above 255 match the pattern but are rejected as
/// out of range.
pub fn parse_rgb(input: &str) -> Result<Rgb, ColorParseError> {
    use ColorParseError::*;

    if input.is_empty() {
        return Err(Empty);
    }

    let body = input
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(InvalidFunc)?;

    let parts: Vec<&str> = body.split(", ").collect();
    if parts.len() != 3 {
        return Err(InvalidFunc);
    }

    let is_channel = |digits: &&str| {
        (1..=3).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
    };
    if !parts.iter().all(is_channel) {
        return Err(InvalidFunc);
    }

    let mut channels = [0u8; 3];
    for (slot, digits) in channels.iter_mut().zip(&parts) {
        // at most three digits, always fits in u16
        let value: u16 = digits.parse().map_err(|_| InvalidFunc)?;
        *slot = u8::try_from(value).map_err(|_| OutOfRange)?;
    }

    Ok(Rgb::new(channels[0], channels[1], channels[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_and_secondary_hues() {
        let expected = [
            (0.0, Rgb::new(255, 0, 0)),
            (60.0, Rgb::new(255, 255, 0)),
            (120.0, Rgb::new(0, 255, 0)),
            (180.0, Rgb::new(0, 255, 255)),
            (240.0, Rgb::new(0, 0, 255)),
            (300.0, Rgb::new(255, 0, 255)),
        ];
        for (hue, rgb) in expected {
            assert_eq!(hsv_to_rgb(hue, 1.0, 1.0), rgb, "hue {}", hue);
        }
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), Rgb::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(-120.0, 1.0, 1.0), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_grey_and_black() {
        // No saturation gives grey at the value level
        assert_eq!(hsv_to_rgb(200.0, 0.0, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(hsv_to_rgb(200.0, 0.0, 1.0), Rgb::WHITE);

        // Zero value is black whatever the hue
        assert_eq!(hsv_to_rgb(42.0, 0.7, 0.0), Rgb::BLACK);
    }

    #[test]
    fn test_intermediate_hue_rounds() {
        // Halfway into sector 0: t = 0.5 -> 127.5 rounds up
        assert_eq!(hsv_to_rgb(30.0, 1.0, 1.0), Rgb::new(255, 128, 0));
    }

    #[test]
    fn test_css_string() {
        assert_eq!(Rgb::new(12, 0, 255).to_css(), "rgb(12, 0, 255)");
    }

    #[test]
    fn test_parse_accepts_exact_form() {
        assert_eq!(parse_rgb("rgb(255, 0, 0)"), Ok(Rgb::new(255, 0, 0)));
        assert_eq!(parse_rgb("rgb(1, 22, 033)"), Ok(Rgb::new(1, 22, 33)));
        assert_eq!("rgb(0, 128, 255)".parse::<Rgb>(), Ok(Rgb::new(0, 128, 255)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(parse_rgb(""), Err(ColorParseError::Empty));
        for input in [
            "rgb(255,0,0)",
            "rgb(255, 0)",
            "rgb(255, 0, 0, 0)",
            " rgb(255, 0, 0)",
            "rgb(255, 0, 0) ",
            "rgb(1000, 0, 0)",
            "rgb(, 0, 0)",
            "rgb(a, 0, 0)",
            "#ff0000",
        ] {
            assert_eq!(parse_rgb(input), Err(ColorParseError::InvalidFunc), "{:?}", input);
        }
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_eq!(parse_rgb("rgb(256, 0, 0)"), Err(ColorParseError::OutOfRange));
        assert_eq!(parse_rgb("rgb(0, 0, 999)"), Err(ColorParseError::OutOfRange));
    }

    #[test]
    fn test_parse_error_messages() {
        assert_eq!(ColorParseError::Empty.to_string(), "empty color string");
        assert_eq!(ColorParseError::InvalidFunc.to_string(), "expected rgb(r, g, b)");
        let err: &dyn std::error::Error = &ColorParseError::OutOfRange;
        assert_eq!(err.to_string(), "component out of range");
    }

    #[test]
    fn test_lerp() {
        let mid = Rgb::new(255, 0, 0).lerp(Rgb::new(255, 255, 0), 0.5);
        assert_eq!(mid, Rgb::new(255, 128, 0));
        assert_eq!(Rgb::BLACK.lerp(Rgb::WHITE, 2.0), Rgb::WHITE);
    }
}
