use super::*;
use crate::assets::memory::MemoryAssetSource;

const SHEET: &str = r##"<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <style>.skin{fill:#f3cfb0}</style>
    <symbol id="body-1" viewBox="0 0 180 400"><path class="skin" d="M0 0h1"/></symbol>
    <symbol id="body-9"><rect width="2" height="2"/></symbol>
  </defs>
</svg>"##;

fn sheet() -> SvgDocument {
    SvgDocument::parse(SHEET).unwrap()
}

#[test]
fn extract_symbol_keeps_children_and_view_box() {
    let frag = extract_symbol(&sheet(), "body-1").unwrap();
    assert_eq!(frag.view_box, "0 0 180 400");
    assert_eq!(frag.inner_markup, r#"<path class="skin" d="M0 0h1"/>"#);
    assert_eq!(frag.document.view_box(), Some("0 0 180 400"));
}

#[test]
fn extracted_document_carries_sheet_styles() {
    let frag = extract_symbol(&sheet(), "body-1").unwrap();
    let markup = frag.document.to_markup();
    assert!(markup.contains("<style>.skin{fill:#f3cfb0}</style>"));
    assert!(markup.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg""#));
}

#[test]
fn missing_view_box_falls_back_to_table() {
    let frag = extract_symbol(&sheet(), "body-9").unwrap();
    assert_eq!(frag.view_box, crate::catalog::sprites::DEFAULT_BODY_VIEW_BOX);
}

#[test]
fn unknown_symbol_is_none() {
    assert!(extract_symbol(&sheet(), "hair-4").is_none());
}

#[test]
fn fetch_part_resolves_catalog_path() {
    let src = MemoryAssetSource::new().with_document(
        "hair/Hair 72.svg",
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 320 260"/>"#,
    );
    let doc = src.fetch_part(Category::Hair, &PartId::Number(72)).unwrap();
    assert_eq!(doc.view_box(), Some("0 0 320 260"));
    assert!(src.fetch_part(Category::Hair, &PartId::Number(73)).is_none());
}

#[test]
fn fetch_part_treats_invalid_markup_as_missing() {
    let src = MemoryAssetSource::new().with_document("shoes/Shoes 1.svg", "<svg><unclosed>");
    assert!(src.fetch_part(Category::Shoes, &PartId::Number(1)).is_none());
}

#[test]
fn fetch_symbol_fragment_reads_sheet() {
    let src = MemoryAssetSource::new().with_sprite_sheet(SHEET);
    assert!(src.fetch_symbol_fragment("body-1").is_some());
    assert!(src.fetch_symbol_fragment("body-2").is_none());
    assert!(MemoryAssetSource::new().fetch_symbol_fragment("body-1").is_none());
}

#[test]
fn symbol_paint_moves_onto_fragment_root() {
    let sheet = SvgDocument::parse(
        r##"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="shoes-1" viewBox="0 0 2 2" fill="#ffba0a"><rect width="2" height="2"/></symbol></svg>"##,
    )
    .unwrap();
    let frag = extract_symbol(&sheet, "shoes-1").unwrap();
    assert_eq!(frag.document.root.attr("fill"), Some("#ffba0a"));
    assert_eq!(frag.document.root.attr("id"), None);
}
