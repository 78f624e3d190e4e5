use serde::Serialize;

use crate::{foundation::color::HexColor, palette::hsl::Hsl};

/// Hair color used when the user has not picked one.
pub const DEFAULT_HAIR_COLOR: &str = "#512e14";

/// Four tones derived from one user-chosen color.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ColorPalette {
    /// Main fill.
    pub base: HexColor,
    /// Lit areas.
    pub highlight: HexColor,
    /// Shaded areas.
    pub lowlight: HexColor,
    /// Outline tone.
    pub border: HexColor,
}

/// Designer-authored palettes: `(input, base, highlight, lowlight, border)`.
///
/// Black's base is lifted to `#1a1a1a` so its highlight stays visible.
static KNOWN_PALETTES: &[(&str, &str, &str, &str, &str)] = &[
    (DEFAULT_HAIR_COLOR, "#512e14", "#6e4423", "#3b200d", "#24130a"),
    ("#000000", "#1a1a1a", "#333333", "#000000", "#000000"),
    ("#d2691e", "#d2691e", "#e8894a", "#a9521a", "#6e3510"),
    ("#e6be6a", "#e6be6a", "#f3d896", "#c9a04e", "#8a6a2c"),
];

/// Lightness offsets (in percent) of the derived tones.
const HIGHLIGHT_SHIFT: i16 = 10;
const LOWLIGHT_SHIFT: i16 = -10;
const BORDER_SHIFT: i16 = -25;

/// Derive the palette for `color`.
///
/// Pure: the same input always yields the same palette. Known colors return their authored
/// palette; anything else is derived with HSL lightness shifts around the unchanged input.
pub fn derive_palette(color: &HexColor) -> ColorPalette {
    if let Some(known) = known_palette(color) {
        return known;
    }

    let hsl = Hsl::from_hex(color);
    ColorPalette {
        base: color.clone(),
        highlight: hsl.shift_lightness(HIGHLIGHT_SHIFT).to_hex(),
        lowlight: hsl.shift_lightness(LOWLIGHT_SHIFT).to_hex(),
        border: hsl.shift_lightness(BORDER_SHIFT).to_hex(),
    }
}

fn known_palette(color: &HexColor) -> Option<ColorPalette> {
    let &(_, base, highlight, lowlight, border) = KNOWN_PALETTES
        .iter()
        .find(|(input, ..)| *input == color.as_str())?;
    let tone = |s: &str| HexColor::parse(s).ok();
    Some(ColorPalette {
        base: tone(base)?,
        highlight: tone(highlight)?,
        lowlight: tone(lowlight)?,
        border: tone(border)?,
    })
}

/// [`DEFAULT_HAIR_COLOR`] as a parsed color.
pub fn default_hair_color() -> HexColor {
    HexColor::parse(DEFAULT_HAIR_COLOR).unwrap_or_else(|_| HexColor::from_rgb([0x51, 0x2e, 0x14]))
}

/// The palette used for hair when no color is chosen.
pub fn default_hair_palette() -> ColorPalette {
    derive_palette(&default_hair_color())
}

#[cfg(test)]
#[path = "../../tests/unit/palette/derive.rs"]
mod tests;
