use super::*;

const UNIFORM: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 250 260">
  <defs><style>.cls-1{fill:#ffba0a;}.cls-2{fill:#000;}.cls-3{fill:none;stroke:#000}</style></defs>
  <path class="cls-1" d="M0 0h10v10z"/>
  <path class="cls-2" d="M1 1h10v10z"/>
  <path class="cls-3" d="M2 2h10v10z"/>
  <path fill="#000000" d="M3 3h1"/>
  <path fill="#ffba0a" d="M4 4h1"/>
  <path style="fill:#ffba0a;stroke-width:2" d="M5 5h1"/>
  <g><path d="M6 6h1"/></g>
</svg>"##;

const HAIR: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 320 260">
  <style>.h1{fill:#8B5A2B}.h2{fill:#a0703c}</style>
  <path class="h1" d="M0 0h1"/>
  <path class="h2" d="M1 1h1"/>
  <path fill="#a0703c" d="M2 2h1"/>
  <path fill="#000000" d="M3 3h1"/>
  <path fill="#6E4520" d="M4 4h1"/>
  <path style="fill:#8b5a2b" d="M5 5h1"/>
  <path fill="#FFFFFF" d="M6 6h1"/>
</svg>"##;

fn hex(s: &str) -> HexColor {
    HexColor::parse(s).unwrap()
}

fn doc(s: &str) -> SvgDocument {
    SvgDocument::parse(s).unwrap()
}

fn fills(content: &str) -> Vec<String> {
    let wrapped = format!(r#"<svg xmlns="http://www.w3.org/2000/svg">{content}</svg>"#);
    let d = SvgDocument::parse(&wrapped).unwrap();
    let mut out = Vec::new();
    d.root.walk(&mut |el| {
        if let Some(f) = el.attr("fill") {
            out.push(f.to_owned());
        }
    });
    out
}

#[test]
fn structural_fill_classification() {
    for f in ["none", "black", "BLACK", "#000", "#000000", "#000333", " #000123 "] {
        assert!(is_structural_fill(f), "{f} should be structural");
    }
    for f in ["#000334", "#000400", "#010101", "#111111", "#ffba0a", "red"] {
        assert!(!is_structural_fill(f), "{f} should be colorable");
    }
}

#[test]
fn recolor_all_replaces_every_colorable_region() {
    let out = recolor_all_regions(&doc(UNIFORM), Some(&hex("#3953cd")));

    assert_eq!(out.view_box, "0 0 250 260");
    assert!(!out.content.contains("#ffba0a"));
    assert!(!out.content.contains("<style"));
    assert!(!out.content.contains("class="));
    assert_eq!(
        fills(&out.content),
        vec!["#3953cd", "#000", "none", "#000000", "#3953cd", "#3953cd"]
    );
    // Non-fill inline declarations survive.
    assert!(out.content.contains("style=\"stroke-width:2\""));
}

#[test]
fn recolor_all_without_target_inlines_source_fills() {
    let out = recolor_all_regions(&doc(UNIFORM), None);

    assert!(!out.content.contains("<style"));
    assert_eq!(
        fills(&out.content),
        vec!["#ffba0a", "#000", "none", "#000000", "#ffba0a"]
    );
    // Inline style was not class-driven and stays as written.
    assert!(out.content.contains("style=\"fill:#ffba0a;stroke-width:2\""));
}

#[test]
fn recolor_all_leaves_unfilled_elements_alone() {
    let out = recolor_all_regions(&doc(UNIFORM), Some(&hex("#3953cd")));
    assert!(out.content.contains("<g><path d=\"M6 6h1\"/></g>"));
}

#[test]
fn recolor_all_without_styles_is_not_an_error() {
    let plain = r##"<svg xmlns="http://www.w3.org/2000/svg"><rect fill="#ffba0a"/></svg>"##;
    let out = recolor_all_regions(&doc(plain), Some(&hex("#123456")));
    assert_eq!(fills(&out.content), vec!["#123456"]);
    assert_eq!(out.view_box, DEFAULT_VIEW_BOX);
}

#[test]
fn substitute_hair_uses_palette_tones() {
    let palette = crate::palette::derive::derive_palette(&hex("#000000"));
    let out = substitute_known_fills(&doc(HAIR), &FillMap::hair(&palette));

    assert!(out.content.contains(".h1{fill:#1a1a1a}"));
    assert!(out.content.contains(".h2{fill:#333333}"));
    assert!(out.content.contains("style=\"fill:#1a1a1a\""));
    assert_eq!(
        fills(&out.content),
        // Facial shadow tone is not part of the hair map.
        vec!["#333333", "#000000", "#6E4520", "#FFFFFF"]
    );
}

#[test]
fn substitute_facial_hair_collapses_shadow_onto_base() {
    let palette = crate::palette::derive::derive_palette(&hex("#d2691e"));
    let out = substitute_known_fills(&doc(HAIR), &FillMap::facial_hair(&palette));
    assert_eq!(
        fills(&out.content),
        vec!["#e8894a", "#000000", "#d2691e", "#FFFFFF"]
    );
}

#[test]
fn substitute_leaves_unmapped_fills_byte_identical() {
    let out = substitute_known_fills(&doc(HAIR), &FillMap::default());
    let before = doc(HAIR);
    let mut expected = Vec::new();
    before.root.walk(&mut |el| {
        if let Some(f) = el.attr("fill") {
            expected.push(f.to_owned());
        }
    });
    assert_eq!(fills(&out.content), expected);
    assert!(out.content.contains(".h1{fill:#8B5A2B}"));
}

#[test]
fn fill_map_later_pairs_win() {
    let map = FillMap::new([
        (hex("#111111"), hex("#222222")),
        (hex("#111"), hex("#333333")),
    ]);
    assert_eq!(map.lookup("#111111"), Some(&hex("#333333")));
    assert_eq!(map.lookup("url(#g)"), None);
}

#[test]
fn root_paint_is_recolored_and_carried() {
    let d = doc(r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10" fill="#ffba0a"><path d="M0 0h1"/></svg>"##);

    let out = recolor_all_regions(&d, Some(&hex("#3953cd")));
    assert_eq!(out.content, r#"<path d="M0 0h1"/>"#);
    assert_eq!(out.root_paint, vec![("fill".to_owned(), "#3953cd".to_owned())]);
    assert_eq!(out.root_paint_attrs(), r##" fill="#3953cd""##);

    let kept = recolor_all_regions(&d, None);
    assert_eq!(kept.root_paint, vec![("fill".to_owned(), "#ffba0a".to_owned())]);
}

#[test]
fn root_class_fill_is_inlined_on_root_paint() {
    let d = doc(r##"<svg xmlns="http://www.w3.org/2000/svg" class="body"><style>.body{fill:#000}</style><path d="M0 0h1"/></svg>"##);
    let out = recolor_all_regions(&d, Some(&hex("#3953cd")));
    assert_eq!(out.root_paint, vec![("fill".to_owned(), "#000".to_owned())]);
    assert!(!out.content.contains("<style"));
}

#[test]
fn substitute_maps_root_fill() {
    let d = doc(r##"<svg xmlns="http://www.w3.org/2000/svg" fill="#8b5a2b" stroke-width="2"><path d="M0 0h1"/></svg>"##);
    let palette = crate::palette::derive::derive_palette(&hex("#000000"));
    let out = substitute_known_fills(&d, &FillMap::hair(&palette));
    assert_eq!(
        out.root_paint,
        vec![
            ("fill".to_owned(), "#1a1a1a".to_owned()),
            ("stroke-width".to_owned(), "2".to_owned()),
        ]
    );
}
