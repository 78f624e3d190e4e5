//! Race-free "is the preview fully loaded" state machine.
//!
//! Each tracked slot is `Unneeded`, `Pending` or `Ready`. Selecting a part issues a [`Ticket`];
//! only the most recent ticket for a slot can resolve it, so a slow fetch for a part the user
//! already changed away from cannot mark the new part as loaded. After [`LoadStateTracker::detach`]
//! every event is ignored.

use std::time::{Duration, Instant};

use crate::model::selection::Category;

/// Default delay between the body resolving and shared-sheet sprites counting as loaded.
pub const DEFAULT_SPRITE_REVEAL_DELAY: Duration = Duration::from_millis(150);

/// Load phase of one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoadPhase {
    /// Nothing selected; counts as loaded.
    Unneeded,
    /// A fetch is outstanding.
    Pending,
    /// The latest fetch resolved, found or not.
    Ready,
}

impl LoadPhase {
    /// `Unneeded` or `Ready`.
    pub fn is_settled(self) -> bool {
        !matches!(self, LoadPhase::Pending)
    }
}

/// Slots with independent load state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackedSlot {
    /// Body symbol from the sprite sheet.
    Body,
    /// Hair document.
    Hair,
    /// Facial hair document.
    FacialHair,
    /// Shared-sheet references (shoes, uniform, makeup, eyewear, headwear).
    Sprites,
}

impl TrackedSlot {
    /// Slot that tracks `category`.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Shape => TrackedSlot::Body,
            Category::Hair => TrackedSlot::Hair,
            Category::FacialHair => TrackedSlot::FacialHair,
            _ => TrackedSlot::Sprites,
        }
    }
}

/// Proof that a fetch was started for the current selection of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket {
    slot: TrackedSlot,
    generation: u64,
}

impl Ticket {
    /// Slot this ticket resolves.
    pub fn slot(self) -> TrackedSlot {
        self.slot
    }
}

#[derive(Clone, Copy, Debug)]
struct SlotState {
    phase: LoadPhase,
    generation: u64,
}

impl SlotState {
    const UNNEEDED: Self = Self {
        phase: LoadPhase::Unneeded,
        generation: 0,
    };
}

/// Per-slot load state with an `is_loading` projection.
#[derive(Clone, Debug)]
pub struct LoadStateTracker {
    body: SlotState,
    hair: SlotState,
    facial_hair: SlotState,
    sprites_needed: bool,
    body_ready_at: Option<Instant>,
    body_has_content: bool,
    reveal_delay: Duration,
    detached: bool,
}

impl Default for LoadStateTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SPRITE_REVEAL_DELAY)
    }
}

impl LoadStateTracker {
    /// Everything unneeded; sprites reveal `reveal_delay` after the body resolves.
    pub fn new(reveal_delay: Duration) -> Self {
        Self {
            body: SlotState::UNNEEDED,
            hair: SlotState::UNNEEDED,
            facial_hair: SlotState::UNNEEDED,
            sprites_needed: false,
            body_ready_at: None,
            body_has_content: false,
            reveal_delay,
            detached: false,
        }
    }

    /// Record a selection change for a fetched slot.
    ///
    /// Returns the ticket the eventual fetch must present, or `None` when the slot became
    /// unneeded or the tracker is detached. Any older ticket for the slot goes stale.
    pub fn select(&mut self, slot: TrackedSlot, selected: bool) -> Option<Ticket> {
        if self.detached {
            return None;
        }
        if slot == TrackedSlot::Sprites {
            self.sprites_needed = selected;
            return None;
        }
        if slot == TrackedSlot::Body {
            self.body_ready_at = None;
            self.body_has_content = false;
        }

        let state = self.slot_mut(slot)?;
        state.generation += 1;
        state.phase = if selected {
            LoadPhase::Pending
        } else {
            LoadPhase::Unneeded
        };
        let ticket = Ticket {
            slot,
            generation: state.generation,
        };
        tracing::debug!(?slot, selected, generation = ticket.generation, "selection changed");
        selected.then_some(ticket)
    }

    /// Apply a completed fetch. `found` is false for a not-found or unparsable part.
    ///
    /// Returns whether the completion was applied; stale tickets and post-detach completions
    /// are dropped.
    pub fn resolve(&mut self, ticket: Ticket, found: bool, now: Instant) -> bool {
        if self.detached {
            return false;
        }
        let Some(state) = self.slot_mut(ticket.slot) else {
            return false;
        };
        if state.generation != ticket.generation || state.phase != LoadPhase::Pending {
            tracing::debug!(slot = ?ticket.slot, "dropping stale completion");
            return false;
        }
        state.phase = LoadPhase::Ready;
        if ticket.slot == TrackedSlot::Body {
            self.body_ready_at = Some(now);
            self.body_has_content = found;
        }
        true
    }

    /// Stop accepting events; the owning view is gone.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Whether [`LoadStateTracker::detach`] was called.
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Phase of `slot` as of `now`.
    pub fn phase(&self, slot: TrackedSlot, now: Instant) -> LoadPhase {
        match slot {
            TrackedSlot::Body => self.body.phase,
            TrackedSlot::Hair => self.hair.phase,
            TrackedSlot::FacialHair => self.facial_hair.phase,
            TrackedSlot::Sprites => {
                if !self.sprites_needed {
                    LoadPhase::Unneeded
                } else if self
                    .body_ready_at
                    .is_some_and(|t| now.saturating_duration_since(t) >= self.reveal_delay)
                {
                    LoadPhase::Ready
                } else {
                    LoadPhase::Pending
                }
            }
        }
    }

    /// Whether the body resolved with a usable document.
    pub fn body_has_content(&self) -> bool {
        self.body_has_content
    }

    /// True until the body and every needed slot have resolved.
    ///
    /// The body always gates loading: an avatar with no resolved body is never shown as
    /// loaded, even if nothing else is selected.
    pub fn is_loading(&self, now: Instant) -> bool {
        let body_resolved = self.body.phase == LoadPhase::Ready;
        let all_settled = [
            TrackedSlot::Body,
            TrackedSlot::Hair,
            TrackedSlot::FacialHair,
            TrackedSlot::Sprites,
        ]
        .into_iter()
        .all(|s| self.phase(s, now).is_settled());
        !(body_resolved && all_settled)
    }

    fn slot_mut(&mut self, slot: TrackedSlot) -> Option<&mut SlotState> {
        match slot {
            TrackedSlot::Body => Some(&mut self.body),
            TrackedSlot::Hair => Some(&mut self.hair),
            TrackedSlot::FacialHair => Some(&mut self.facial_hair),
            TrackedSlot::Sprites => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/tracker.rs"]
mod tests;
