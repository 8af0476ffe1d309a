use crate::config::ColorSource;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba { rgb: self, alpha }
    }
}

/// Colour plus opacity, rendered as a CSS `rgba()` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f64,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.rgb.r, self.rgb.g, self.rgb.b, self.alpha
        )
    }
}

/// Parse `#rrggbb` (leading `#` optional, any case). Shorthand and named colours are rejected.
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Pick the particle colour once at start. `themed_value` is the page's
/// `--color-primary`, if it had one.
pub fn resolve_color(source: &ColorSource, themed_value: Option<&str>) -> Rgb {
    match source {
        ColorSource::Fixed { color } => *color,
        ColorSource::Themed { fallback } => themed_value
            .filter(|value| !value.trim().is_empty())
            .and_then(parse_hex_color)
            .unwrap_or(*fallback),
    }
}
