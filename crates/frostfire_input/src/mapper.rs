//! Key-code mapping from host events to intents
//!
//! Hosts report keys as layout-independent code strings (`"KeyW"`,
//! `"Space"`, ...). The mapper turns them into [`Intents`] bits or into
//! host-level [`HostAction`]s that never reach the simulation.

use serde::{Serialize, Deserialize};

use crate::intents::Intents;

/// Actions handled by the host rather than the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    /// Leave active play and release the pointer (Escape)
    ReleasePointer,
    /// Show or hide the collision debug overlay
    ToggleDebugOverlay,
}

/// Key codes bound to each intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub reload: Vec<String>,
    pub jump: Vec<String>,
    pub debug_overlay: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        fn codes(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            forward: codes(&["KeyW"]),
            backward: codes(&["KeyS"]),
            left: codes(&["KeyA"]),
            right: codes(&["KeyD"]),
            reload: codes(&["KeyR"]),
            jump: codes(&["Space"]),
            debug_overlay: codes(&["F3"]),
        }
    }
}

/// Maps key codes to intents using a set of [`KeyBindings`]
#[derive(Debug, Clone, Default)]
pub struct IntentMapper {
    bindings: KeyBindings,
}

impl IntentMapper {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Map a key code to the intent it holds
    ///
    /// Fire is not bound to keys; it comes from the pointer button.
    pub fn map_key(&self, code: &str) -> Option<Intents> {
        let b = &self.bindings;
        let table = [
            (&b.forward, Intents::FORWARD),
            (&b.backward, Intents::BACKWARD),
            (&b.left, Intents::LEFT),
            (&b.right, Intents::RIGHT),
            (&b.reload, Intents::RELOAD),
            (&b.jump, Intents::JUMP),
        ];

        let mut mapped = Intents::empty();
        for (codes, intent) in table {
            if codes.iter().any(|c| c == code) {
                mapped |= intent;
            }
        }

        if mapped.is_empty() {
            None
        } else {
            Some(mapped)
        }
    }

    /// Map a key press to a host action
    ///
    /// Only presses produce actions, releases are ignored.
    pub fn map_host_action(&self, code: &str, pressed: bool) -> Option<HostAction> {
        if !pressed {
            return None;
        }
        if code == "Escape" {
            return Some(HostAction::ReleasePointer);
        }
        if self.bindings.debug_overlay.iter().any(|c| c == code) {
            return Some(HostAction::ToggleDebugOverlay);
        }
        None
    }
}
