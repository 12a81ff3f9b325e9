//! Panorama viewer state for one project page
//!
//! [`TourViewer`] ties a [`PanoramaSet`] to the transition engine, tracks the
//! load state of every texture the two sphere slots need, and rebuilds the
//! hotspot overlay when a transition commits. The cross-fade clock only runs
//! while both slots have their textures; until then the frame reports
//! [`FrameStatus::Loading`] so the page keeps its placeholder up.

use crate::hotspot::HotspotOverlay;
use crate::transition::{CrossFade, TransitionEngine, TransitionRejected, TransitionState};
use crate::tour_types::{PanoramaData, TourData};

/// Ordered panoramas of one project. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanoramaSet {
    slug: String,
    entries: Vec<PanoramaData>,
}

impl PanoramaSet {
    pub fn new(slug: impl Into<String>, entries: Vec<PanoramaData>) -> Self {
        Self {
            slug: slug.into(),
            entries,
        }
    }

    pub fn from_tour(tour: TourData) -> Self {
        Self::new(tour.slug, tour.panoramas)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PanoramaData> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[PanoramaData] {
        &self.entries
    }
}

/// Load state of one panorama texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotRequested,
    Pending,
    Ready,
    Failed,
}

/// What the renderer should show for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStatus {
    /// No panoramas; nothing to draw
    Empty,
    /// A required texture is missing; keep the placeholder
    Loading,
    /// Current panorama shown alone
    Still { current: usize },
    /// Cross-fade in progress
    Fading {
        current: usize,
        next: usize,
        fade: CrossFade,
    },
    /// The transition completed during this frame
    Committed { current: usize },
}

#[derive(Debug, Clone, Default)]
pub struct TourViewer {
    set: PanoramaSet,
    engine: TransitionEngine,
    loads: Vec<LoadState>,
    overlay: HotspotOverlay,
}

impl TourViewer {
    pub fn new(set: PanoramaSet) -> Self {
        let mut viewer = Self::default();
        viewer.switch_set(set);
        viewer
    }

    /// Replace the active set (project switch). Resets to the first entry and
    /// cancels any in-flight transition.
    pub fn switch_set(&mut self, set: PanoramaSet) {
        tracing::info!(slug = set.slug(), panoramas = set.len(), "panorama set bound");
        self.engine.reset(set.len());
        self.loads = vec![LoadState::NotRequested; set.len()];
        self.set = set;
        self.rebuild_overlay();
    }

    pub fn set(&self) -> &PanoramaSet {
        &self.set
    }

    pub fn state(&self) -> TransitionState {
        self.engine.state()
    }

    pub fn overlay(&self) -> &HotspotOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut HotspotOverlay {
        &mut self.overlay
    }

    /// Label of the panorama on screen; `None` for an empty set
    pub fn label(&self) -> Option<&str> {
        self.set
            .get(self.engine.current())
            .map(|entry| entry.label.as_str())
    }

    /// Whether Prev/Next should be enabled
    pub fn can_navigate(&self) -> bool {
        self.set.len() >= 2
    }

    pub fn next(&mut self) -> Result<usize, TransitionRejected> {
        self.engine.advance().inspect_err(|e| {
            tracing::debug!(error = %e, "next rejected");
        })
    }

    pub fn prev(&mut self) -> Result<usize, TransitionRejected> {
        self.engine.retreat().inspect_err(|e| {
            tracing::debug!(error = %e, "prev rejected");
        })
    }

    /// Indices the sphere slots need right now
    fn slot_indices(&self) -> Vec<usize> {
        if self.set.is_empty() {
            return Vec::new();
        }
        let mut slots = vec![self.engine.current()];
        if self.engine.is_active() && self.engine.next() != self.engine.current() {
            slots.push(self.engine.next());
        }
        slots
    }

    /// Mark every texture the slots need but nobody has requested as pending
    /// and return them with their URLs, so the caller can start the fetches.
    pub fn take_load_requests(&mut self) -> Vec<(usize, String)> {
        let mut requests = Vec::new();
        for index in self.slot_indices() {
            if self.loads[index] != LoadState::NotRequested {
                continue;
            }
            if let Some(entry) = self.set.get(index) {
                self.loads[index] = LoadState::Pending;
                requests.push((index, entry.texture_url.clone()));
            }
        }
        requests
    }

    pub fn load_state(&self, index: usize) -> LoadState {
        self.loads.get(index).copied().unwrap_or_default()
    }

    pub fn texture_ready(&mut self, index: usize) {
        if let Some(state) = self.loads.get_mut(index) {
            *state = LoadState::Ready;
        }
    }

    /// Record a failed fetch or decode. The placeholder stays up and no retry
    /// is attempted.
    pub fn texture_failed(&mut self, index: usize, error: &str) {
        if let Some(state) = self.loads.get_mut(index) {
            tracing::error!(index, error, "panorama texture failed to load");
            *state = LoadState::Failed;
        }
    }

    /// Forget every loaded texture the slots no longer need and return
    /// their indices so the renderer can free them. A released panorama is
    /// requested again the next time a slot needs it.
    pub fn release_unused(&mut self) -> Vec<usize> {
        let keep = self.slot_indices();
        let mut released = Vec::new();
        for (index, state) in self.loads.iter_mut().enumerate() {
            if *state == LoadState::Ready && !keep.contains(&index) {
                *state = LoadState::NotRequested;
                released.push(index);
            }
        }
        released
    }

    fn slots_ready(&self) -> bool {
        self.slot_indices()
            .iter()
            .all(|&i| self.loads[i] == LoadState::Ready)
    }

    /// Advance the cross-fade by `dt_ms` and report what to draw
    pub fn frame(&mut self, dt_ms: f32) -> FrameStatus {
        if self.set.is_empty() {
            return FrameStatus::Empty;
        }
        if !self.slots_ready() {
            return FrameStatus::Loading;
        }

        if self.engine.is_active() {
            if let Some(current) = self.engine.tick(dt_ms) {
                tracing::debug!(current, "transition committed");
                self.rebuild_overlay();
                return FrameStatus::Committed { current };
            }
            return FrameStatus::Fading {
                current: self.engine.current(),
                next: self.engine.next(),
                fade: self.engine.cross_fade(),
            };
        }

        FrameStatus::Still {
            current: self.engine.current(),
        }
    }

    fn rebuild_overlay(&mut self) {
        self.overlay = self
            .set
            .get(self.engine.current())
            .map(|entry| HotspotOverlay::new(&entry.hotspots))
            .unwrap_or_default();
    }
}
