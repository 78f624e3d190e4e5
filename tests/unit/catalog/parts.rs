use super::*;

#[test]
fn paths_follow_directory_convention() {
    assert_eq!(
        part_path(Category::Hair, &PartId::Number(72)),
        "hair/Hair 72.svg"
    );
    assert_eq!(
        part_path(Category::FacialHair, &PartId::Number(3)),
        "facial-hair/Facial Hair 3.svg"
    );
    assert_eq!(
        part_path(Category::Eyewear, &PartId::Symbol("aviators".into())),
        "eyewear/Eyewear aviators.svg"
    );
}

#[test]
fn standard_catalog_lists_every_category() {
    let cat = PartCatalog::standard();
    for c in Category::Z_ORDER {
        assert!(!cat.entries(c).is_empty(), "{c} has no entries");
    }
    assert!(!cat.is_empty());
}

#[test]
fn entry_lookup_matches_display_and_path() {
    let cat = PartCatalog::standard();
    let e = cat.entry(Category::Shape, &PartId::Number(62)).unwrap();
    assert_eq!(e.display_name, "Shape 62");
    assert_eq!(e.file_path, "shape/Shape 62.svg");
    assert!(cat.entry(Category::Shape, &PartId::Number(10_000)).is_none());
}

#[test]
fn standard_catalog_is_shared() {
    assert!(std::ptr::eq(PartCatalog::standard(), PartCatalog::standard()));
}
