//! Hex color values as stored in documents.

use peniko::Color;
use peniko::color;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unrecognised color: {0}")]
pub struct ColorParseError(pub String);

/// RGBA8 color serialized as a CSS-style string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn red() -> Self {
        Self::rgb(255, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn gray() -> Self {
        Self::rgb(128, 128, 128)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Alpha as a fraction in [0, 1].
    pub fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// `#rrggbb` without the alpha channel.
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Accepts any CSS color (`#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()`,
/// named colors), as documents may carry whatever the canvas accepted.
impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = color::parse_color(s.trim()).map_err(|e| ColorParseError(format!("{s}: {e}")))?;
        Ok(parsed.to_alpha_color::<color::Srgb>().into())
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl From<Color> for HexColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("#ff0000".parse::<HexColor>().unwrap(), HexColor::red());
        assert_eq!("#FFF".parse::<HexColor>().unwrap(), HexColor::white());
        assert_eq!(
            "#4299e180".parse::<HexColor>().unwrap(),
            HexColor::new(0x42, 0x99, 0xe1, 0x80)
        );
        let preview: HexColor = "rgba(255, 0, 0, 0.5)".parse().unwrap();
        assert_eq!(preview.with_alpha(0), HexColor::red().with_alpha(0));
        assert!((127..=128).contains(&preview.a));
        assert_eq!("white".parse::<HexColor>().unwrap(), HexColor::white());
        assert_eq!("transparent".parse::<HexColor>().unwrap().a, 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12".parse::<HexColor>().is_err());
        assert!("#zzzzzz".parse::<HexColor>().is_err());
        assert!("chartreuse-ish".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(HexColor::rgb(0xf6, 0xad, 0x55).to_string(), "#f6ad55");
        assert_eq!(HexColor::new(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn test_hex_survives_document_roundtrip() {
        for hex in ["#ff0000", "#4299e1", "#01020304", "#fed7d7"] {
            let color: HexColor = serde_json::from_value(serde_json::json!(hex)).unwrap();
            assert_eq!(serde_json::to_value(color).unwrap(), serde_json::json!(hex));
        }
        assert_eq!(HexColor::from(Color::from_rgba8(10, 20, 30, 40)), HexColor::new(10, 20, 30, 40));
    }
}
