//! RGB colours for the category series handed to a renderer.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Qualitative palette used when none is configured.
pub const DEFAULT_PALETTE: [HexColor; 8] = [
    HexColor(0x1b, 0x9e, 0x77),
    HexColor(0xd9, 0x5f, 0x02),
    HexColor(0x75, 0x70, 0xb3),
    HexColor(0xe7, 0x29, 0x8a),
    HexColor(0x66, 0xa6, 0x1e),
    HexColor(0xe6, 0xab, 0x02),
    HexColor(0xa6, 0x76, 0x1d),
    HexColor(0x66, 0x66, 0x66),
];

/// An RGB colour, written and parsed as `#rrggbb`.
///
/// # Examples
///
/// ```
/// use trailstats::HexColor;
///
/// let color: HexColor = "#1b9e77".parse().unwrap();
/// assert_eq!(color, HexColor(0x1b, 0x9e, 0x77));
/// assert_eq!(color.to_string(), "#1b9e77");
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(pub u8, pub u8, pub u8);

#[derive(Debug, Error, PartialEq)]
#[error("Invalid hex colour '{0}', expected #rrggbb")]
pub struct ParseHexColorError(String);

impl FromStr for HexColor {
    type Err = ParseHexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseHexColorError(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(HexColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
