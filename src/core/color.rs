//! RGB-Farbe mit Hex-Serialisierung (`#rrggbb`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Fehler beim Parsen einer Hex-Farbe.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ungueltige Farbe '{0}' (erwartet #rrggbb)")]
pub struct ColorParseError(pub String);

/// RGB-Farbe (8 Bit pro Kanal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Erstellt eine Farbe aus RGB-Kanälen.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Komplementärfarbe (Kanal = 255 - Kanal). Involution.
    pub fn complement(self) -> Self {
        Self::rgb(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Hex-Darstellung `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|part| u8::from_str_radix(part, 16).ok())
                .ok_or_else(|| ColorParseError(s.to_string()))
        };
        match hex.len() {
            6 => Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            // Kurzform #rgb
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(ColorParseError(s.to_string())),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_and_short_form() {
        assert_eq!("#ff8000".parse::<Color>(), Ok(Color::rgb(255, 128, 0)));
        assert_eq!("#f80".parse::<Color>(), Ok(Color::rgb(255, 136, 0)));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn complement_is_involution() {
        let c = Color::rgb(10, 200, 99);
        assert_eq!(c.complement(), Color::rgb(245, 55, 156));
        assert_eq!(c.complement().complement(), c);
    }

    #[test]
    fn serde_uses_hex_string() {
        let json = serde_json::to_string(&Color::rgb(0, 255, 16)).expect("serialisierbar");
        assert_eq!(json, "\"#00ff10\"");
        let back: Color = serde_json::from_str(&json).expect("deserialisierbar");
        assert_eq!(back, Color::rgb(0, 255, 16));
    }
}
