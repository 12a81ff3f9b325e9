//! Per-tile hover state machine
//!
//! A [`HoverController`] is either idle or hovered. Each frame it eases a
//! scalar progress toward the target (1 when hovered, 0 otherwise) and the
//! progress scales the hover-driven uniforms of the tile's material.

use crate::effects::EffectMaterial;

/// Smoothing rate per second
pub const HOVER_RATE: f32 = 3.0;

/// Progress snaps to the target once within this distance
pub const SNAP_THRESHOLD: f32 = 0.01;

/// Pointer coordinates are scaled by this before reaching the `mouse` uniform
pub const MOUSE_SCALE: f32 = 0.1;

/// Route prefix of the project detail pages
pub const PROJECT_ROUTE_PREFIX: &str = "/projects";

/// Cursor affordance to apply to the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    Pointer,
    Default,
}

impl CursorStyle {
    /// CSS `cursor` value
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorStyle::Pointer => "pointer",
            CursorStyle::Default => "default",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Idle,
    Hovered,
}

/// Hover state and smoothed progress of one tile
#[derive(Debug, Clone, Default)]
pub struct HoverController {
    state: HoverState,
    progress: f32,
    /// Last pointer position in tile-local coordinates
    pointer: [f32; 2],
}

impl HoverController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn is_hovered(&self) -> bool {
        self.state == HoverState::Hovered
    }

    /// Smoothed hover progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn pointer_enter(&mut self) -> CursorStyle {
        self.state = HoverState::Hovered;
        CursorStyle::Pointer
    }

    pub fn pointer_leave(&mut self) -> CursorStyle {
        self.state = HoverState::Idle;
        CursorStyle::Default
    }

    /// Record the pointer position; only forwarded to the shader while hovered
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if self.is_hovered() {
            self.pointer = [x, y];
        }
    }

    fn target(&self) -> f32 {
        match self.state {
            HoverState::Hovered => 1.0,
            HoverState::Idle => 0.0,
        }
    }

    /// Advance smoothing by `dt_secs` and return the new progress
    pub fn tick(&mut self, dt_secs: f32) -> f32 {
        let target = self.target();
        let t = (HOVER_RATE * dt_secs.max(0.0)).clamp(0.0, 1.0);
        let next = self.progress + (target - self.progress) * t;

        self.progress = if (target - next).abs() < SNAP_THRESHOLD {
            target
        } else {
            next.clamp(0.0, 1.0)
        };
        self.progress
    }

    /// Write the current progress, pointer and elapsed time into `material`
    pub fn apply(&self, material: &mut EffectMaterial, elapsed_secs: f32) {
        let uniforms = material.uniforms_mut();
        uniforms.set_time(elapsed_secs);
        uniforms.apply_hover(self.progress);
        if self.is_hovered() {
            uniforms.set_mouse([self.pointer[0] * MOUSE_SCALE, self.pointer[1] * MOUSE_SCALE]);
        }
    }
}

/// Navigation target for a selected tile with project path `path`
pub fn selection_path(path: &str) -> String {
    if path.starts_with('/') {
        format!("{PROJECT_ROUTE_PREFIX}{path}")
    } else {
        format!("{PROJECT_ROUTE_PREFIX}/{path}")
    }
}
