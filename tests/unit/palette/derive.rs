use super::*;

fn hex(s: &str) -> HexColor {
    HexColor::parse(s).unwrap()
}

fn palette(base: &str, highlight: &str, lowlight: &str, border: &str) -> ColorPalette {
    ColorPalette {
        base: hex(base),
        highlight: hex(highlight),
        lowlight: hex(lowlight),
        border: hex(border),
    }
}

#[test]
fn known_colors_return_authored_palettes() {
    assert_eq!(
        derive_palette(&hex("#000000")),
        palette("#1a1a1a", "#333333", "#000000", "#000000")
    );
    assert_eq!(
        derive_palette(&hex("#512E14")),
        palette("#512e14", "#6e4423", "#3b200d", "#24130a")
    );
    assert_eq!(
        derive_palette(&hex("#d2691e")),
        palette("#d2691e", "#e8894a", "#a9521a", "#6e3510")
    );
    assert_eq!(
        derive_palette(&hex("#E6BE6A")),
        palette("#e6be6a", "#f3d896", "#c9a04e", "#8a6a2c")
    );
}

#[test]
fn black_is_not_hsl_derived() {
    let p = derive_palette(&hex("#000"));
    // HSL derivation would keep the base at #000000 and lift the highlight to #1a1a1a.
    assert_eq!(p.base, hex("#1a1a1a"));
    assert_eq!(p.highlight, hex("#333333"));
}

#[test]
fn unknown_colors_use_lightness_shifts() {
    assert_eq!(
        derive_palette(&hex("#3953cd")),
        palette("#3953cd", "#6076d7", "#2a41a7", "#1b296a")
    );
    assert_eq!(
        derive_palette(&hex("#f3cfb0")),
        palette("#f3cfb0", "#faeadc", "#ecb483", "#e28c40")
    );
    assert_eq!(
        derive_palette(&hex("#ffffff")),
        palette("#ffffff", "#ffffff", "#e6e6e6", "#bfbfbf")
    );
}

#[test]
fn derivation_is_deterministic() {
    let a = derive_palette(&hex("#7a3fb2"));
    let b = derive_palette(&hex("#7a3fb2"));
    assert_eq!(a, b);
}

#[test]
fn default_hair_palette_is_brown() {
    assert_eq!(default_hair_palette().base, hex(DEFAULT_HAIR_COLOR));
}
