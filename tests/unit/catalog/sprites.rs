use super::*;

#[test]
fn view_box_table_then_fallbacks() {
    assert_eq!(view_box("body-3"), "-10 0 240 390");
    assert_eq!(view_box("hair-2"), "0 0 320 280");
    assert_eq!(view_box("body-99"), DEFAULT_BODY_VIEW_BOX);
    assert_eq!(view_box("mystery"), DEFAULT_VIEW_BOX);
    assert_eq!(view_box(""), DEFAULT_VIEW_BOX);
}

#[test]
fn body_symbol_falls_back_to_default() {
    assert_eq!(body_symbol("body-1").display_width, 180);
    assert_eq!(body_symbol("body-42").view_box, DEFAULT_BODY_VIEW_BOX);
}

#[test]
fn category_tag_pads_numeric_suffix() {
    assert_eq!(category_tag("body-7", Category::Shape), "shape-07");
    assert_eq!(category_tag("hair-3", Category::Hair), "hair-03");
    assert_eq!(category_tag("hair-123", Category::Hair), "hair-123");
    assert_eq!(
        category_tag("facial-hair-4", Category::FacialHair),
        "facialHair-04"
    );
}

#[test]
fn category_tag_passes_through_unknown_patterns() {
    assert_eq!(category_tag("hair-3", Category::Shape), "hair-3");
    assert_eq!(category_tag("body-", Category::Shape), "body-");
    assert_eq!(category_tag("body-x1", Category::Shape), "body-x1");
}

#[test]
fn symbol_ids_follow_prefixes() {
    assert_eq!(symbol_id(Category::Shape, &PartId::Number(7)), "body-7");
    assert_eq!(
        symbol_id(Category::Eyewear, &PartId::Symbol("aviators".into())),
        "aviators"
    );
}
