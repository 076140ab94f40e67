//! Intent tracking between frames
//!
//! The host feeds key and pointer events as they arrive; once per frame the
//! simulation takes an [`IntentSnapshot`]. Pointer motion and trigger edges
//! accumulate until the next snapshot, held keys persist until released.

use crate::intents::{IntentSnapshot, Intents};
use crate::mapper::IntentMapper;

/// Accumulates device events into per-frame intent snapshots
pub struct IntentTracker {
    mapper: IntentMapper,
    held: Intents,
    pending_look: [f32; 2],
    trigger_pulled: bool,
}

impl Default for IntentTracker {
    fn default() -> Self {
        Self::new(IntentMapper::default())
    }
}

impl IntentTracker {
    pub fn new(mapper: IntentMapper) -> Self {
        Self {
            mapper,
            held: Intents::empty(),
            pending_look: [0.0, 0.0],
            trigger_pulled: false,
        }
    }

    pub fn mapper(&self) -> &IntentMapper {
        &self.mapper
    }

    /// Process a key press or release
    ///
    /// Returns true if the key is bound to an intent.
    pub fn process_key(&mut self, code: &str, pressed: bool) -> bool {
        match self.mapper.map_key(code) {
            Some(intent) => {
                self.held.set(intent, pressed);
                true
            }
            None => false,
        }
    }

    /// Process the primary pointer button
    ///
    /// A press while `active` (pointer locked, in play) holds fire and
    /// records a trigger edge. Presses outside active play are ignored so the
    /// click that locks the pointer does not shoot.
    pub fn process_pointer_button(&mut self, pressed: bool, active: bool) {
        if pressed {
            if active {
                self.held |= Intents::FIRE;
                self.trigger_pulled = true;
            }
        } else {
            self.held.remove(Intents::FIRE);
        }
    }

    /// Process relative pointer motion in pixels
    pub fn process_pointer_motion(&mut self, dx: f32, dy: f32) {
        self.pending_look[0] += dx;
        self.pending_look[1] += dy;
    }

    /// Drop every held intent (focus loss, pointer release)
    pub fn clear(&mut self) {
        self.held = Intents::empty();
        self.pending_look = [0.0, 0.0];
        self.trigger_pulled = false;
    }

    /// Currently held intents without consuming anything
    pub fn held(&self) -> Intents {
        self.held
    }

    /// Take this frame's snapshot
    ///
    /// Consumes accumulated pointer motion and the trigger edge; held intents
    /// carry over to the next frame.
    pub fn snapshot(&mut self) -> IntentSnapshot {
        let snapshot = IntentSnapshot {
            held: self.held,
            look_delta: self.pending_look,
            trigger_pulled: self.trigger_pulled,
        };
        self.pending_look = [0.0, 0.0];
        self.trigger_pulled = false;
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_and_release() {
        let mut tracker = IntentTracker::default();
        assert!(tracker.process_key("KeyW", true));
        assert!(tracker.held().forward());

        assert!(tracker.process_key("KeyW", false));
        assert!(!tracker.held().forward());
    }

    #[test]
    fn test_unbound_key_is_not_consumed() {
        let mut tracker = IntentTracker::default();
        assert!(!tracker.process_key("KeyP", true));
        assert!(tracker.held().is_empty());
    }

    #[test]
    fn test_held_keys_survive_snapshot() {
        let mut tracker = IntentTracker::default();
        tracker.process_key("KeyA", true);
        tracker.process_key("KeyD", true);

        let first = tracker.snapshot();
        let second = tracker.snapshot();
        assert_eq!(first.held, Intents::LEFT | Intents::RIGHT);
        assert_eq!(second.held, first.held);
    }

    #[test]
    fn test_look_delta_accumulates_then_drains() {
        let mut tracker = IntentTracker::default();
        tracker.process_pointer_motion(3.0, 1.0);
        tracker.process_pointer_motion(2.0, -4.0);

        let snap = tracker.snapshot();
        assert_eq!(snap.look_delta, [5.0, -3.0]);
        assert_eq!(tracker.snapshot().look_delta, [0.0, 0.0]);
    }

    #[test]
    fn test_trigger_edge_fires_once() {
        let mut tracker = IntentTracker::default();
        tracker.process_pointer_button(true, true);

        let first = tracker.snapshot();
        assert!(first.trigger_pulled);
        assert!(first.held.fire());

        // Button still down: fire stays held but no new edge
        let second = tracker.snapshot();
        assert!(!second.trigger_pulled);
        assert!(second.held.fire());

        tracker.process_pointer_button(false, true);
        assert!(!tracker.snapshot().held.fire());
    }

    #[test]
    fn test_trigger_ignored_outside_play() {
        let mut tracker = IntentTracker::default();
        tracker.process_pointer_button(true, false);
        let snap = tracker.snapshot();
        assert!(!snap.trigger_pulled);
        assert!(!snap.held.fire());
    }

    #[test]
    fn test_clear() {
        let mut tracker = IntentTracker::default();
        tracker.process_key("KeyW", true);
        tracker.process_pointer_motion(1.0, 1.0);
        tracker.process_pointer_button(true, true);
        tracker.clear();

        assert_eq!(tracker.snapshot(), IntentSnapshot::default());
    }
}
