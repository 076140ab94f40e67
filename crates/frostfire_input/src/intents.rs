//! Player intents
//!
//! An intent is what the player wants to do this frame, independent of the
//! device that produced it. The core never sees key codes or mouse buttons.

use bitflags::bitflags;

bitflags! {
    /// Held boolean intents for one frame
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Intents: u8 {
        /// Move along the camera's flattened forward axis
        const FORWARD = 1 << 0;
        /// Move against the camera's flattened forward axis
        const BACKWARD = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Fire the weapon (drives the fire animation state)
        const FIRE = 1 << 4;
        /// Reload the weapon
        const RELOAD = 1 << 5;
        /// Jump (only honoured while grounded)
        const JUMP = 1 << 6;
        /// Any of the four directional intents
        const MOVEMENT = Self::FORWARD.bits()
            | Self::BACKWARD.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits();
    }
}

impl Intents {
    pub fn forward(self) -> bool {
        self.contains(Self::FORWARD)
    }

    pub fn backward(self) -> bool {
        self.contains(Self::BACKWARD)
    }

    pub fn left(self) -> bool {
        self.contains(Self::LEFT)
    }

    pub fn right(self) -> bool {
        self.contains(Self::RIGHT)
    }

    pub fn fire(self) -> bool {
        self.contains(Self::FIRE)
    }

    pub fn reload(self) -> bool {
        self.contains(Self::RELOAD)
    }

    pub fn jump(self) -> bool {
        self.contains(Self::JUMP)
    }

    /// True when at least one directional intent is held
    pub fn is_moving(self) -> bool {
        self.intersects(Self::MOVEMENT)
    }
}

/// Everything the input collaborator hands the core for one frame
///
/// Produced once per input sample and read-only afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IntentSnapshot {
    /// Intents held during this frame
    pub held: Intents,
    /// Raw pointer motion since the previous snapshot, in pixels
    pub look_delta: [f32; 2],
    /// A trigger press happened since the previous snapshot
    ///
    /// This is the edge that casts a shot; `held` only says the button is down.
    pub trigger_pulled: bool,
}

impl IntentSnapshot {
    /// Snapshot with the given intents held and no pointer activity
    pub fn holding(held: Intents) -> Self {
        Self {
            held,
            ..Self::default()
        }
    }

    /// Builder: add pointer motion
    pub fn with_look(mut self, dx: f32, dy: f32) -> Self {
        self.look_delta = [dx, dy];
        self
    }

    /// Builder: mark a trigger press
    pub fn with_trigger(mut self) -> Self {
        self.trigger_pulled = true;
        self.held |= Intents::FIRE;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let intents = Intents::default();
        assert!(intents.is_empty());
        assert!(!intents.is_moving());
    }

    #[test]
    fn test_accessors() {
        let intents = Intents::FORWARD | Intents::FIRE;
        assert!(intents.forward());
        assert!(intents.fire());
        assert!(!intents.reload());
        assert!(!intents.backward());
        assert!(intents.is_moving());
    }

    #[test]
    fn test_movement_group() {
        assert!(Intents::MOVEMENT.contains(Intents::LEFT));
        assert!(!Intents::MOVEMENT.contains(Intents::JUMP));
        assert!(!(Intents::FIRE | Intents::RELOAD).is_moving());
    }

    #[test]
    fn test_snapshot_builders() {
        let snap = IntentSnapshot::holding(Intents::LEFT)
            .with_look(4.0, -2.0)
            .with_trigger();
        assert!(snap.held.left());
        assert!(snap.held.fire());
        assert!(snap.trigger_pulled);
        assert_eq!(snap.look_delta, [4.0, -2.0]);
    }
}
