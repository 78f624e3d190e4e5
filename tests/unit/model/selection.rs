use serde_json::json;

use super::*;

fn skin() -> HexColor {
    HexColor::parse("#f3cfb0").unwrap()
}

#[test]
fn deserializes_flat_selection() {
    let sel: PartSelection = serde_json::from_value(json!({
        "shape": 62,
        "shapeColor": "#F3CFB0",
        "hair": 72,
        "hairColor": "#000000",
        "eyewear": "round-glasses"
    }))
    .unwrap();

    assert_eq!(sel.shape, PartId::Number(62));
    assert_eq!(sel.shape_color, skin());
    assert_eq!(sel.hair, Some(PartId::Number(72)));
    assert_eq!(sel.eyewear, Some(PartId::Symbol("round-glasses".into())));
    assert!(sel.eyewear_color.is_none());
    assert!(sel.headwear.is_none());
}

#[test]
fn shape_color_is_required() {
    let res = serde_json::from_value::<PartSelection>(json!({ "shape": 1 }));
    assert!(res.is_err());
}

#[test]
fn populated_follows_z_order() {
    let sel = PartSelection::new(1u32, skin())
        .with(Category::Headwear, 3u32, None)
        .with(Category::Shoes, 4u32, None)
        .with(Category::Hair, 5u32, None);

    let order: Vec<Category> = sel.populated().map(|(c, _, _)| c).collect();
    assert_eq!(
        order,
        vec![
            Category::Shape,
            Category::Shoes,
            Category::Hair,
            Category::Headwear
        ]
    );
}

#[test]
fn clearing_a_part_clears_its_color() {
    let mut sel = PartSelection::new(1u32, skin());
    sel.set(
        Category::Uniform,
        Some(PartId::Number(2)),
        Some(HexColor::parse("#3953cd").unwrap()),
    )
    .unwrap();
    assert!(sel.color(Category::Uniform).is_some());

    sel.set(Category::Uniform, None, Some(HexColor::parse("#3953cd").unwrap()))
        .unwrap();
    assert!(sel.part(Category::Uniform).is_none());
    assert!(sel.color(Category::Uniform).is_none());
}

#[test]
fn shape_cannot_be_cleared() {
    let mut sel = PartSelection::new(1u32, skin());
    assert!(sel.set(Category::Shape, None, Some(skin())).is_err());
    assert!(sel.set(Category::Shape, Some(PartId::Number(2)), None).is_err());
    assert_eq!(sel.shape, PartId::Number(1));
}

#[test]
fn part_id_parse_and_validate() {
    assert_eq!(PartId::parse("07").unwrap(), PartId::Number(7));
    assert_eq!(
        PartId::parse("body-3").unwrap(),
        PartId::Symbol("body-3".into())
    );
    assert!(PartId::parse("../etc/passwd").is_err());
    assert!(PartId::parse("a\"b").is_err());
    assert!(PartId::parse("  ").is_err());
}

#[test]
fn category_keys_round_trip() {
    for c in Category::Z_ORDER {
        assert_eq!(Category::from_key(c.key()), Some(c));
    }
    assert_eq!(Category::from_key("facialHair"), Some(Category::FacialHair));
    assert_eq!(Category::from_key("hat"), None);
    assert_eq!(
        Category::FacialHair.recolor_policy(),
        RecolorPolicy::Substitute
    );
    assert_eq!(Category::Uniform.recolor_policy(), RecolorPolicy::RecolorAll);
}

#[test]
fn numeric_strings_deserialize_as_numbers() {
    let sel: PartSelection = serde_json::from_value(json!({
        "shape": "62",
        "shapeColor": "#f3cfb0",
        "hair": " 72 "
    }))
    .unwrap();
    assert_eq!(sel.shape, PartId::Number(62));
    assert_eq!(sel.hair, Some(PartId::Number(72)));
    assert_eq!(
        crate::catalog::sprites::symbol_id(Category::Shape, &sel.shape),
        "body-62"
    );

    assert!(serde_json::from_value::<PartId>(json!("../x")).is_err());
    assert!(serde_json::from_value::<PartId>(json!("")).is_err());
}
