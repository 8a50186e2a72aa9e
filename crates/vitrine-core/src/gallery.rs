//! Gallery state machine for the item image modal.
//!
//! Tracks the active image index, drives forward/backward/jump transitions
//! with a transition lock, and maps swipe gestures and thumbnail clicks onto
//! the same three primitives. Purely synchronous; the renderer owns the
//! visual fade and calls [`GalleryState::finish`] (or `commit` then
//! `settle`) when it completes.

use std::collections::HashSet;

/// Minimum horizontal travel, in pixels, for a swipe to count.
pub const MIN_SWIPE_DISTANCE: f32 = 50.0;

/// Duration of each half of the cross-fade, in milliseconds. The renderer
/// fades the outgoing image for this long, swaps at [`GalleryState::commit`],
/// then fades the incoming image in for the same duration.
pub const FADE_HALF_MS: u64 = 150;

/// Estimated per-thumbnail width in the strip: 64 px thumbnail + 16 px gap.
pub const THUMBNAIL_STRIDE: f32 = 80.0;

/// Transition phase. At most one transition is in flight; new input is
/// rejected until [`GalleryState::settle`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning { from: usize, to: usize },
}

/// Per-modal gallery state over an ordered list of image URLs.
///
/// Invariant: the active index is always valid for the (non-empty) image
/// list. Empty lists never construct a state machine; [`GalleryState::new`]
/// returns `None` and the caller renders the static placeholder.
#[derive(Debug, Clone)]
pub struct GalleryState {
    images: Vec<String>,
    active: usize,
    phase: Phase,
    /// Indices whose image failed to load. Once marked, that index renders
    /// the placeholder permanently instead of retrying.
    broken: HashSet<usize>,
}

impl GalleryState {
    /// Builds a gallery over `images`, starting at index 0.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn new(images: Vec<String>) -> Option<Self> {
        Self::with_active(images, 0)
    }

    /// Builds a gallery starting at `index`, clamped into range.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn with_active(images: Vec<String>, index: usize) -> Option<Self> {
        if images.is_empty() {
            return None;
        }
        let active = index.min(images.len() - 1);
        Some(Self {
            images,
            active,
            phase: Phase::Idle,
            broken: HashSet::new(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn active_url(&self) -> &str {
        &self.images[self.active]
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// Advances to the next image, wrapping at the end.
    ///
    /// Returns `false` (and changes nothing) while a transition is in
    /// flight.
    pub fn next(&mut self) -> bool {
        let target = (self.active + 1) % self.images.len();
        self.begin(target)
    }

    /// Goes back one image, wrapping at the start.
    ///
    /// Returns `false` (and changes nothing) while a transition is in
    /// flight.
    pub fn prev(&mut self) -> bool {
        let target = (self.active + self.images.len() - 1) % self.images.len();
        self.begin(target)
    }

    /// Jumps to `target` (thumbnail click).
    ///
    /// No-op when `target` is the active index, out of bounds, or a
    /// transition is in flight.
    pub fn go_to(&mut self, target: usize) -> bool {
        if target >= self.images.len() || target == self.active {
            return false;
        }
        self.begin(target)
    }

    fn begin(&mut self, target: usize) -> bool {
        if self.is_transitioning() || target == self.active {
            return false;
        }
        self.phase = Phase::Transitioning {
            from: self.active,
            to: target,
        };
        true
    }

    /// Swaps the active index at the fade midpoint. The gallery stays
    /// locked until [`GalleryState::settle`]. No-op when idle.
    pub fn commit(&mut self) {
        if let Phase::Transitioning { to, .. } = self.phase {
            self.active = to;
        }
    }

    /// Unlocks the gallery after the incoming image has faded in.
    /// Also commits, so a bare `settle` never leaves a stale index.
    pub fn settle(&mut self) {
        self.commit();
        self.phase = Phase::Idle;
    }

    /// Commits and settles in one step, for consumers that do not render
    /// the intermediate fade state.
    pub fn finish(&mut self) {
        self.settle();
    }

    /// Maps a completed swipe to a transition. `delta_x` is the horizontal
    /// finger travel (end minus start): negative is a leftward swipe and
    /// advances, positive goes back. Travel under [`MIN_SWIPE_DISTANCE`]
    /// is ignored, as are swipes on single-image galleries.
    pub fn on_swipe_end(&mut self, delta_x: f32) -> bool {
        if self.images.len() <= 1 || delta_x.abs() < MIN_SWIPE_DISTANCE {
            return false;
        }
        if delta_x < 0.0 {
            self.next()
        } else {
            self.prev()
        }
    }

    /// Marks the image at `index` as failed. Out-of-range indices are
    /// ignored.
    pub fn mark_broken(&mut self, index: usize) {
        if index < self.images.len() {
            self.broken.insert(index);
        }
    }

    /// Indices currently marked broken, ascending. Rendered into the
    /// fragment links so the failure set survives transitions.
    #[must_use]
    pub fn broken_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.broken.iter().copied().collect();
        indices.sort_unstable();
        indices
    }

    /// Whether `index` renders the placeholder instead of its image.
    #[must_use]
    pub fn shows_placeholder(&self, index: usize) -> bool {
        self.broken.contains(&index)
            || self.images.get(index).is_none_or(|url| url.is_empty())
    }

    /// Horizontal scroll offset that centers the active thumbnail in a
    /// strip of `container_width` pixels, clamped to ≥ 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn thumbnail_scroll_offset(&self, container_width: f32) -> f32 {
        let position = self.active as f32 * THUMBNAIL_STRIDE;
        (position - container_width / 2.0 + THUMBNAIL_STRIDE / 2.0).max(0.0)
    }
}
