use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{AvatarError, AvatarResult};

/// A validated sRGB color, always stored as lowercase `#rrggbb`.
///
/// Equality is therefore case-insensitive with respect to the text it was parsed from, and
/// `#abc` shorthand compares equal to `#aabbcc`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse `#rrggbb`, `#rgb` (with or without the leading `#`, any casing).
    pub fn parse(s: &str) -> AvatarResult<Self> {
        let rgb = parse_hex(s).map_err(AvatarError::validation)?;
        Ok(Self::from_rgb(rgb))
    }

    /// Build from raw channel bytes.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        Self(format!("#{r:02x}{g:02x}{b:02x}"))
    }

    /// Channel bytes `[r, g, b]`.
    pub fn rgb(&self) -> [u8; 3] {
        // Invariant: the inner string is always a normalized `#rrggbb`.
        let byte = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        [byte(1), byte(3), byte(5)]
    }

    /// Normalized `#rrggbb` text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = AvatarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_hex(&raw)
            .map(Self::from_rgb)
            .map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> Result<[u8; 3], String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color \"{s}\""));
    }

    match s.len() {
        6 => Ok([
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ]),
        3 => {
            let nibble = |i: usize| hex_byte(&s[i..i + 1]).map(|v| v * 17);
            Ok([nibble(0)?, nibble(1)?, nibble(2)?])
        }
        _ => Err("hex color must be #RRGGBB or #RGB (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
