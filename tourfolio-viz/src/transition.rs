//! Cross-fade state machine for the panorama viewer
//!
//! The engine is `Idle` or `Transitioning`. A request issued while a
//! transition is in flight is rejected with [`TransitionRejected::InFlight`]
//! rather than overwriting the pending target. Completion is driven by
//! elapsed time only: once [`TRANSITION_DURATION_MS`] have been fed through
//! [`TransitionEngine::tick`], the pending index becomes current.

use thiserror::Error;

/// Length of one cross-fade
pub const TRANSITION_DURATION_MS: f32 = 1000.0;

/// Why an advance or retreat request was not started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionRejected {
    #[error("a transition is already in progress")]
    InFlight,

    #[error("the panorama set is empty")]
    EmptySet,

    #[error("the panorama set has a single entry")]
    SinglePanorama,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Transitioning { elapsed_ms: f32 },
}

/// Snapshot of the engine: `(current, next, active)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionState {
    pub current: usize,
    /// Index bound to the second texture slot. Only meaningful while `active`.
    pub next: usize,
    pub active: bool,
}

/// Opacities of the two sphere materials. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub current: f32,
    pub next: f32,
}

/// Index `index + offset` wrapped into `0..len`
pub fn wrap_index(index: usize, offset: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    ((index as isize + offset).rem_euclid(len)) as usize
}

#[derive(Debug, Clone)]
pub struct TransitionEngine {
    len: usize,
    current: usize,
    next: usize,
    phase: Phase,
}

impl TransitionEngine {
    /// Engine for a set of `len` panoramas, showing the first
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: 0,
            next: wrap_index(0, 1, len),
            phase: Phase::Idle,
        }
    }

    /// Rebind to a new set of `len` panoramas, cancelling any transition
    pub fn reset(&mut self, len: usize) {
        if self.is_active() {
            tracing::debug!("transition cancelled by reset");
        }
        *self = Self::new(len);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Index bound to the second slot
    pub fn next(&self) -> usize {
        self.next
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    pub fn state(&self) -> TransitionState {
        TransitionState {
            current: self.current,
            next: self.next,
            active: self.is_active(),
        }
    }

    /// Target index of the in-flight transition
    pub fn pending(&self) -> Option<usize> {
        self.is_active().then_some(self.next)
    }

    pub fn advance(&mut self) -> Result<usize, TransitionRejected> {
        self.begin(Direction::Forward)
    }

    pub fn retreat(&mut self) -> Result<usize, TransitionRejected> {
        self.begin(Direction::Backward)
    }

    /// Start a transition in `direction` and return the target index
    pub fn begin(&mut self, direction: Direction) -> Result<usize, TransitionRejected> {
        match self.len {
            0 => return Err(TransitionRejected::EmptySet),
            1 => return Err(TransitionRejected::SinglePanorama),
            _ => {}
        }
        if self.is_active() {
            return Err(TransitionRejected::InFlight);
        }

        let offset = match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };
        self.next = wrap_index(self.current, offset, self.len);
        self.phase = Phase::Transitioning { elapsed_ms: 0.0 };
        Ok(self.next)
    }

    /// Feed `dt_ms` of frame time. Returns the new current index when the
    /// transition completes during this tick.
    pub fn tick(&mut self, dt_ms: f32) -> Option<usize> {
        let Phase::Transitioning { elapsed_ms } = self.phase else {
            return None;
        };

        let elapsed_ms = elapsed_ms + dt_ms.max(0.0);
        if elapsed_ms >= TRANSITION_DURATION_MS {
            self.current = self.next;
            self.phase = Phase::Idle;
            Some(self.current)
        } else {
            self.phase = Phase::Transitioning { elapsed_ms };
            None
        }
    }

    /// Linear progress of the in-flight transition, 0 when idle
    pub fn progress(&self) -> f32 {
        match self.phase {
            Phase::Idle => 0.0,
            Phase::Transitioning { elapsed_ms } => (elapsed_ms / TRANSITION_DURATION_MS).clamp(0.0, 1.0),
        }
    }

    pub fn cross_fade(&self) -> CrossFade {
        let next = self.progress();
        CrossFade {
            current: 1.0 - next,
            next,
        }
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_engine_binds_first_two_slots() {
        let engine = TransitionEngine::new(5);
        assert_eq!(
            engine.state(),
            TransitionState {
                current: 0,
                next: 1,
                active: false
            }
        );
    }

    #[test]
    fn small_sets_wrap_next_slot() {
        assert_eq!(TransitionEngine::new(1).next(), 0);
        assert_eq!(TransitionEngine::new(0).next(), 0);
    }

    #[test]
    fn advance_commits_after_duration() {
        let mut engine = TransitionEngine::new(3);
        assert_eq!(engine.advance(), Ok(1));
        assert!(engine.is_active());
        assert_eq!(engine.pending(), Some(1));

        assert_eq!(engine.tick(400.0), None);
        assert_eq!(engine.current(), 0);
        assert_eq!(engine.tick(600.0), Some(1));
        assert_eq!(
            engine.state(),
            TransitionState {
                current: 1,
                next: 1,
                active: false
            }
        );
        assert_eq!(engine.pending(), None);
    }

    #[test]
    fn advance_wraps_past_last_entry() {
        let mut engine = TransitionEngine::new(3);
        for expected in [1, 2, 0] {
            assert_eq!(engine.advance(), Ok(expected));
            engine.tick(TRANSITION_DURATION_MS);
        }
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn retreat_wraps_to_last_entry() {
        let mut engine = TransitionEngine::new(4);
        assert_eq!(engine.retreat(), Ok(3));
        engine.tick(TRANSITION_DURATION_MS);
        assert_eq!(engine.current(), 3);
    }

    #[test]
    fn request_during_transition_is_rejected() {
        let mut engine = TransitionEngine::new(5);
        engine.advance().unwrap();
        engine.tick(500.0);

        assert_eq!(engine.advance(), Err(TransitionRejected::InFlight));
        assert_eq!(engine.retreat(), Err(TransitionRejected::InFlight));
        assert_eq!(engine.pending(), Some(1));

        // The rejected requests did not restart the clock
        assert_eq!(engine.tick(500.0), Some(1));
    }

    #[test]
    fn empty_and_singleton_sets_reject_without_panicking() {
        let mut empty = TransitionEngine::new(0);
        assert_eq!(empty.advance(), Err(TransitionRejected::EmptySet));
        assert_eq!(empty.retreat(), Err(TransitionRejected::EmptySet));
        assert_eq!(empty.tick(1000.0), None);

        let mut single = TransitionEngine::new(1);
        assert_eq!(single.advance(), Err(TransitionRejected::SinglePanorama));
        assert_eq!(single.retreat(), Err(TransitionRejected::SinglePanorama));
        assert_eq!(single.current(), 0);
        assert!(!single.is_active());
    }

    #[test]
    fn cross_fade_opacities_sum_to_one() {
        let mut engine = TransitionEngine::new(2);
        let idle = engine.cross_fade();
        assert_eq!((idle.current, idle.next), (1.0, 0.0));

        engine.advance().unwrap();
        for _ in 0..70 {
            let fade = engine.cross_fade();
            assert!((fade.current + fade.next - 1.0).abs() < 1e-6);
            assert!((0.0..=1.0).contains(&fade.next));
            engine.tick(16.0);
        }
        assert!(!engine.is_active());
    }

    #[test]
    fn cross_fade_is_linear() {
        let mut engine = TransitionEngine::new(2);
        engine.advance().unwrap();
        engine.tick(250.0);
        let fade = engine.cross_fade();
        assert!((fade.next - 0.25).abs() < 1e-6);
        assert!((fade.current - 0.75).abs() < 1e-6);
    }

    #[test]
    fn reset_cancels_in_flight_transition() {
        let mut engine = TransitionEngine::new(5);
        engine.advance().unwrap();
        engine.tick(300.0);

        engine.reset(2);
        assert_eq!(
            engine.state(),
            TransitionState {
                current: 0,
                next: 1,
                active: false
            }
        );
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn wrap_index_handles_both_directions() {
        assert_eq!(wrap_index(0, -1, 5), 4);
        assert_eq!(wrap_index(4, 1, 5), 0);
        assert_eq!(wrap_index(2, 0, 5), 2);
        assert_eq!(wrap_index(3, 1, 0), 0);
    }

    #[test]
    fn rejection_messages() {
        assert_eq!(
            TransitionRejected::InFlight.to_string(),
            "a transition is already in progress"
        );
    }
}
