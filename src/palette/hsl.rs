use crate::foundation::color::HexColor;

/// HSL color in whole degrees and whole percents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hsl {
    /// Hue in degrees, `0..360`.
    pub h: u16,
    /// Saturation in percent, `0..=100`.
    pub s: u8,
    /// Lightness in percent, `0..=100`.
    pub l: u8,
}

impl Hsl {
    /// Standard sRGB -> HSL, rounded to whole degrees/percents.
    pub fn from_hex(color: &HexColor) -> Self {
        let [r, g, b] = color.rgb().map(|c| f64::from(c) / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Self {
                h: 0,
                s: 0,
                l: percent(l),
            };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self {
            h: ((h * 60.0).round() as u16) % 360,
            s: percent(s),
            l: percent(l),
        }
    }

    /// Copy with lightness shifted by `delta` percent, clamped to `0..=100`.
    pub fn shift_lightness(self, delta: i16) -> Self {
        Self {
            l: (i16::from(self.l) + delta).clamp(0, 100) as u8,
            ..self
        }
    }

    /// Standard HSL -> sRGB, each channel rounded to the nearest byte.
    pub fn to_hex(self) -> HexColor {
        let h = f64::from(self.h) / 360.0;
        let s = f64::from(self.s) / 100.0;
        let l = f64::from(self.l) / 100.0;

        if s == 0.0 {
            let v = channel(l);
            return HexColor::from_rgb([v, v, v]);
        }

        fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                return p + (q - p) * 6.0 * t;
            }
            if t < 1.0 / 2.0 {
                return q;
            }
            if t < 2.0 / 3.0 {
                return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
            }
            p
        }

        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;

        HexColor::from_rgb([
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        ])
    }
}

fn percent(x: f64) -> u8 {
    (x * 100.0).round().clamp(0.0, 100.0) as u8
}

fn channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/palette/hsl.rs"]
mod tests;
