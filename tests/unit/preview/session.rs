use super::*;
use crate::assets::memory::MemoryAssetSource;

const SHEET: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"><defs>
  <style>.skin{fill:#e0ac69}</style>
  <symbol id="body-62" viewBox="0 0 200 400"><path class="skin" d="M0 0h10v10z"/></symbol>
  <symbol id="shoes-3" viewBox="0 0 200 80"><style>.sole{fill:#000}</style><rect fill="#ffba0a" width="200" height="80"/><rect class="sole" y="70" width="200" height="10"/></symbol>
</defs></svg>"##;

const HAIR: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 320 260"><path fill="#8b5a2b" d="M0 0h1"/></svg>"##;

const WAIT: Duration = Duration::from_secs(10);

fn hex(s: &str) -> HexColor {
    HexColor::parse(s).unwrap()
}

fn session() -> PreviewSession {
    let source = MemoryAssetSource::new()
        .with_sprite_sheet(SHEET)
        .with_document("hair/Hair 72.svg", HAIR);
    PreviewSession::with_tracker(
        Arc::new(source),
        ComposeOptions::default(),
        LoadStateTracker::new(Duration::ZERO),
    )
}

#[test]
fn loads_body_and_hair_progressively() {
    let mut s = session();
    s.select(PartSelection::new(62u32, hex("#f3cfb0")).with(Category::Hair, 72u32, None));
    assert!(s.is_loading(Instant::now()));

    assert!(s.wait_for_fetches(WAIT));
    assert!(!s.is_loading(Instant::now()));

    let layers = s.layers();
    let cats: Vec<_> = layers.iter().map(|l| l.category).collect();
    assert_eq!(cats, vec![Category::Shape, Category::Hair]);
    assert!(layers[0].markup.contains("#f3cfb0"));
    assert!(layers[0].markup.contains(r#"data-part="shape-62""#));
    assert!(layers[1].markup.contains("#512e14"));
}

#[test]
fn missing_hair_resolves_without_layer() {
    let mut s = session();
    s.select(PartSelection::new(62u32, hex("#f3cfb0")).with(Category::Hair, 9u32, None));
    assert!(s.wait_for_fetches(WAIT));
    assert!(!s.is_loading(Instant::now()));
    assert_eq!(s.layers().len(), 1);
}

#[test]
fn sprite_categories_reference_symbols_defined_in_the_preview() {
    let mut s = session();
    s.select(
        PartSelection::new(62u32, hex("#f3cfb0"))
            .with(Category::Shoes, 3u32, Some(hex("#3953cd"))),
    );
    assert!(s.wait_for_fetches(WAIT));
    assert!(!s.is_loading(Instant::now()));

    let markup = s.markup();
    assert!(markup.contains(r##"<use xlink:href="#shoes-3" width="400" height="400"/>"##));
    assert!(markup.contains(r#"<symbol id="shoes-3" viewBox="0 0 200 80">"#));
    assert!(markup.contains(r#"data-part="shoes-03""#));
    assert!(markup.contains("#3953cd"));
    assert!(!markup.contains("#ffba0a"));

    // Shoes span canvas x 100..300, y 360..400 once anchored.
    let blob = crate::raster::render::rasterize_markup(
        &markup,
        &crate::raster::render::RasterOptions::png(400),
    )
    .unwrap();
    let img = image::load_from_memory(&blob.bytes).unwrap().to_rgba8();
    let [r, g, b, a] = img.get_pixel(200, 365).0;
    assert_eq!(a, 255);
    assert!(r.abs_diff(0x39) <= 1 && g.abs_diff(0x53) <= 1 && b.abs_diff(0xcd) <= 1);
}

#[test]
fn sprite_missing_from_sheet_is_left_out() {
    let mut s = session();
    s.select(PartSelection::new(62u32, hex("#f3cfb0")).with(Category::Eyewear, 8u32, None));
    assert!(s.wait_for_fetches(WAIT));
    let cats: Vec<_> = s.layers().iter().map(|l| l.category).collect();
    assert_eq!(cats, vec![Category::Shape]);
    assert!(!s.markup().contains("<defs>"));
}

#[test]
fn sprites_wait_for_the_sheet() {
    let mut s = session();
    s.select(PartSelection::new(62u32, hex("#f3cfb0")).with(Category::Shoes, 3u32, None));
    assert!(s.layers().is_empty());
    assert!(s.wait_for_fetches(WAIT));
    assert_eq!(s.layers().len(), 2);
}

#[test]
fn unchanged_categories_are_not_refetched() {
    let mut s = session();
    let base = PartSelection::new(62u32, hex("#f3cfb0"));
    s.select(base.clone());
    assert!(s.wait_for_fetches(WAIT));

    s.select(base.with(Category::Hair, 72u32, Some(hex("#000000"))));
    assert_eq!(s.layers().len(), 1, "body layer kept while hair loads");
    assert!(s.wait_for_fetches(WAIT));
    assert_eq!(s.layers().len(), 2);
}

#[test]
fn superseded_fetch_is_dropped() {
    let mut s = session();
    let sel = PartSelection::new(62u32, hex("#f3cfb0"));
    s.select(sel.clone().with(Category::Hair, 72u32, None));
    s.select(sel);
    assert!(s.wait_for_fetches(WAIT));
    let cats: Vec<_> = s.layers().iter().map(|l| l.category).collect();
    assert_eq!(cats, vec![Category::Shape]);
    assert!(!s.is_loading(Instant::now()));
}

#[test]
fn detached_session_ignores_completions() {
    let mut s = session();
    s.select(PartSelection::new(62u32, hex("#f3cfb0")));
    s.detach();
    s.wait_for_fetches(WAIT);
    assert_eq!(s.pump(Instant::now()), 0);
    assert!(s.layers().is_empty());
    assert!(s.is_loading(Instant::now()));
}
