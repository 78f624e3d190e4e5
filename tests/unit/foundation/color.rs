use serde_json::json;

use super::*;

#[test]
fn parse_normalizes_case_and_shorthand() {
    assert_eq!(HexColor::parse("#F3CFB0").unwrap().as_str(), "#f3cfb0");
    assert_eq!(HexColor::parse("abc").unwrap().as_str(), "#aabbcc");
    assert_eq!(HexColor::parse(" #000 ").unwrap(), HexColor::from_rgb([0, 0, 0]));
}

#[test]
fn parse_rejects_garbage() {
    assert!(HexColor::parse("#12345").is_err());
    assert!(HexColor::parse("#gggggg").is_err());
    assert!(HexColor::parse("").is_err());
    assert!(HexColor::parse("#ééé").is_err());
}

#[test]
fn rgb_round_trips_channels() {
    let c = HexColor::parse("#512e14").unwrap();
    assert_eq!(c.rgb(), [0x51, 0x2e, 0x14]);
    assert_eq!(HexColor::from_rgb(c.rgb()), c);
}

#[test]
fn serde_uses_normalized_string() {
    let c: HexColor = serde_json::from_value(json!("#FFBA0A")).unwrap();
    assert_eq!(serde_json::to_value(&c).unwrap(), json!("#ffba0a"));
    assert!(serde_json::from_value::<HexColor>(json!("red")).is_err());
}
