use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    time::{Duration, Instant},
};

use crate::{
    assets::source::{AssetSource, extract_symbol},
    catalog::sprites,
    compose::compositor::{ComposeOptions, canvas_document, layer_group, recolor_layer},
    foundation::color::HexColor,
    model::selection::{Category, PartId, PartSelection},
    preview::tracker::{LoadStateTracker, Ticket, TrackedSlot},
    recolor::{
        document::{SvgDocument, escape_attr},
        remap::recolor_all_regions,
    },
};

/// Categories fetched individually; everything else is a sprite-sheet reference.
const FETCHED: [Category; 3] = [Category::Shape, Category::Hair, Category::FacialHair];

/// One rendered preview layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewLayer {
    /// Category of the layer.
    pub category: Category,
    /// Anchored `<g>` markup.
    pub markup: String,
}

struct Completion {
    ticket: Ticket,
    category: Category,
    layer: Option<PreviewLayer>,
    /// The sprite sheet, when this completion fetched it.
    sheet: Option<Arc<SvgDocument>>,
}

/// Live preview driven by background fetches.
///
/// Fetches run on the rayon pool and report over a channel; nothing changes until
/// [`PreviewSession::pump`] applies them, so the owning view decides when state moves.
pub struct PreviewSession {
    source: Arc<dyn AssetSource>,
    opts: ComposeOptions,
    tracker: LoadStateTracker,
    selection: Option<PartSelection>,
    fetched: BTreeMap<Category, PreviewLayer>,
    sheet: Option<Arc<SvgDocument>>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    in_flight: usize,
}

impl PreviewSession {
    /// Session over `source` with default options and reveal delay.
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self::with_tracker(source, ComposeOptions::default(), LoadStateTracker::default())
    }

    /// Session with explicit compose options and tracker (e.g. a custom reveal delay).
    pub fn with_tracker(
        source: Arc<dyn AssetSource>,
        opts: ComposeOptions,
        tracker: LoadStateTracker,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            opts,
            tracker,
            selection: None,
            fetched: BTreeMap::new(),
            sheet: None,
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Apply a new selection. Only categories whose part or color changed are refetched.
    pub fn select(&mut self, selection: PartSelection) {
        if self.tracker.is_detached() {
            return;
        }

        for category in FETCHED {
            let next = (selection.part(category), selection.color(category));
            let prev = self
                .selection
                .as_ref()
                .map(|s| (s.part(category), s.color(category)));
            if prev == Some(next) {
                continue;
            }

            self.fetched.remove(&category);
            let slot = TrackedSlot::for_category(category);
            if let (Some(ticket), Some(part)) = (self.tracker.select(slot, next.0.is_some()), next.0)
            {
                self.spawn_fetch(ticket, category, part.clone(), next.1.cloned());
            }
        }

        let sprites_needed = selection
            .populated()
            .any(|(category, _, _)| category.is_simple_sprite());
        self.tracker.select(TrackedSlot::Sprites, sprites_needed);
        self.selection = Some(selection);
    }

    /// Apply every completion that has arrived. Returns how many changed the preview.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            applied += usize::from(self.apply(done, now));
        }
        applied
    }

    /// Block until every outstanding fetch reported or `timeout` passed, applying completions as
    /// they arrive. Returns whether nothing is left in flight.
    pub fn wait_for_fetches(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(done) => {
                    self.in_flight -= 1;
                    self.apply(done, Instant::now());
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    /// Stop applying completions; in-flight fetches finish and are discarded.
    pub fn detach(&mut self) {
        self.tracker.detach();
    }

    /// Whether the preview is still waiting on any part.
    pub fn is_loading(&self, now: Instant) -> bool {
        self.tracker.is_loading(now)
    }

    /// Underlying load state.
    pub fn tracker(&self) -> &LoadStateTracker {
        &self.tracker
    }

    /// Layers currently visible, back to front.
    ///
    /// Sprite-sheet categories appear as `<use>` references once the sheet arrived with the
    /// body; a symbol the sheet lacks leaves its layer out.
    pub fn layers(&self) -> Vec<PreviewLayer> {
        self.visible().into_iter().map(|(layer, _)| layer).collect()
    }

    /// The preview as one SVG document, with the referenced sprite symbols in its `<defs>`.
    pub fn markup(&self) -> String {
        let mut defs = String::new();
        let mut body = String::new();
        for (layer, symbol) in self.visible() {
            if let Some(symbol) = symbol {
                defs.push_str(&symbol);
            }
            body.push_str(&layer.markup);
        }
        if !defs.is_empty() {
            body.insert_str(0, &format!("<defs>{defs}</defs>"));
        }
        canvas_document(self.opts.canvas_size, &body)
    }

    /// Visible layers, each sprite reference paired with the `<symbol>` it points at.
    fn visible(&self) -> Vec<(PreviewLayer, Option<String>)> {
        let Some(selection) = &self.selection else {
            return Vec::new();
        };
        selection
            .populated()
            .filter_map(|(category, part, color)| {
                if category.is_simple_sprite() {
                    let sheet = self.sheet.as_deref()?;
                    let (layer, symbol) =
                        sprite_layer(sheet, category, part, color, self.opts.canvas_size)?;
                    Some((layer, Some(symbol)))
                } else {
                    self.fetched.get(&category).cloned().map(|l| (l, None))
                }
            })
            .collect()
    }

    fn spawn_fetch(
        &mut self,
        ticket: Ticket,
        category: Category,
        part: PartId,
        color: Option<HexColor>,
    ) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let opts = self.opts.clone();
        self.in_flight += 1;
        rayon::spawn(move || {
            let (layer, sheet) =
                fetch_layer(source.as_ref(), category, &part, color.as_ref(), &opts);
            // The session may be gone; a closed channel is the teardown signal.
            let _ = tx.send(Completion {
                ticket,
                category,
                layer,
                sheet,
            });
        });
    }

    fn apply(&mut self, done: Completion, now: Instant) -> bool {
        let found = done.layer.is_some();
        if !self.tracker.resolve(done.ticket, found, now) {
            return false;
        }
        if done.category == Category::Shape {
            self.sheet = done.sheet;
        }
        match done.layer {
            Some(layer) => {
                self.fetched.insert(done.category, layer);
            }
            None => {
                self.fetched.remove(&done.category);
            }
        }
        true
    }
}

/// Fetch one individually loaded layer. The body comes out of the sprite sheet, which is
/// handed back too so sprite references can resolve against it.
fn fetch_layer(
    source: &dyn AssetSource,
    category: Category,
    part: &PartId,
    color: Option<&HexColor>,
    opts: &ComposeOptions,
) -> (Option<PreviewLayer>, Option<Arc<SvgDocument>>) {
    let symbol = sprites::symbol_id(category, part);
    let tag = sprites::category_tag(&symbol, category);
    let n = opts.canvas_size;

    if category == Category::Shape {
        let Some(sheet) = source.fetch_sprite_sheet().map(Arc::new) else {
            return (None, None);
        };
        let Some(fragment) = extract_symbol(&sheet, &symbol) else {
            tracing::warn!(%symbol, "body symbol not found in sprite sheet");
            return (None, Some(sheet));
        };
        let recolored = recolor_all_regions(&fragment.document.scoped(category.key()), color);
        let geometry = sprites::body_symbol(&symbol);
        let x = (i64::from(n) - i64::from(geometry.display_width)) / 2;
        let inner = format!(
            r#"<svg x="{x}" width="{w}" height="{h}" viewBox="{vb}" overflow="visible"{paint}>{content}</svg>"#,
            w = geometry.display_width,
            h = geometry.display_height,
            vb = escape_attr(&recolored.view_box),
            paint = recolored.root_paint_attrs(),
            content = recolored.content,
        );
        let layer = PreviewLayer {
            category,
            markup: layer_group(category, &tag, &inner),
        };
        return (Some(layer), Some(sheet));
    }

    let layer = source.fetch_part(category, part).map(|doc| {
        let recolored = recolor_layer(
            category,
            &doc.scoped(category.key()),
            color,
            &opts.default_hair_color,
        );
        let inner = format!(
            r#"<svg width="{n}" height="{n}" viewBox="{vb}" overflow="visible"{paint}>{content}</svg>"#,
            vb = escape_attr(&recolored.view_box),
            paint = recolored.root_paint_attrs(),
            content = recolored.content,
        );
        PreviewLayer {
            category,
            markup: layer_group(category, &tag, &inner),
        }
    });
    (layer, None)
}

/// A sprite-sheet category as a `<use>` layer plus the recolored `<symbol>` it references.
fn sprite_layer(
    sheet: &SvgDocument,
    category: Category,
    part: &PartId,
    color: Option<&HexColor>,
    canvas_size: u32,
) -> Option<(PreviewLayer, String)> {
    let symbol = sprites::symbol_id(category, part);
    let fragment = extract_symbol(sheet, &symbol)?;
    let recolored = recolor_all_regions(&fragment.document.scoped(category.key()), color);
    let id = escape_attr(&symbol);

    let content = if recolored.root_paint.is_empty() {
        recolored.content.clone()
    } else {
        format!("<g{}>{}</g>", recolored.root_paint_attrs(), recolored.content)
    };
    let definition = format!(
        r#"<symbol id="{id}" viewBox="{vb}">{content}</symbol>"#,
        vb = escape_attr(&recolored.view_box),
    );

    let tag = sprites::category_tag(&symbol, category);
    let inner = format!(r##"<use xlink:href="#{id}" width="{canvas_size}" height="{canvas_size}"/>"##);
    let layer = PreviewLayer {
        category,
        markup: layer_group(category, &tag, &inner),
    };
    Some((layer, definition))
}

#[cfg(test)]
#[path = "../../tests/unit/preview/session.rs"]
mod tests;
