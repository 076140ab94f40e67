//! Headless scripted demo
//!
//! Stands in for a windowed host: replays a fixed list of key and pointer
//! events through an [`IntentTracker`] and steps a [`Session`] once per
//! frame, the way an event loop would between redraws.

use frostfire_core::{Session, SessionError, TargetState};
use frostfire_input::{HostAction, IntentMapper, IntentTracker, KeyBindings};
use frostfire_math::Vec3;

/// One host event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemoEvent {
    /// Key code press or release
    Key(&'static str, bool),
    /// Primary pointer button press or release
    PointerButton(bool),
    /// Relative pointer motion in pixels
    PointerMotion(f32, f32),
    /// The host grabbed the pointer for active play
    CapturePointer,
}

/// An event delivered before the given frame is stepped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptStep {
    pub frame: u32,
    pub event: DemoEvent,
}

impl ScriptStep {
    pub fn new(frame: u32, event: DemoEvent) -> Self {
        Self { frame, event }
    }
}

/// Ten seconds of play at 60 frames per second
///
/// Walks forward, jumps and looks down. Once the target has caught up, backs
/// away so it trails in front of the view, then fires three times, reloads,
/// shows the debug overlay and releases the pointer.
pub fn default_script() -> Vec<ScriptStep> {
    use DemoEvent::*;

    vec![
        ScriptStep::new(0, CapturePointer),
        ScriptStep::new(60, Key("KeyW", true)),
        ScriptStep::new(150, Key("KeyW", false)),
        ScriptStep::new(160, Key("Space", true)),
        ScriptStep::new(161, Key("Space", false)),
        ScriptStep::new(200, PointerMotion(0.0, 120.0)),
        ScriptStep::new(240, Key("KeyS", true)),
        ScriptStep::new(300, Key("KeyS", false)),
        ScriptStep::new(300, PointerButton(true)),
        ScriptStep::new(301, PointerButton(false)),
        ScriptStep::new(360, PointerButton(true)),
        ScriptStep::new(361, PointerButton(false)),
        ScriptStep::new(420, PointerButton(true)),
        ScriptStep::new(421, PointerButton(false)),
        ScriptStep::new(480, Key("KeyR", true)),
        ScriptStep::new(481, Key("KeyR", false)),
        ScriptStep::new(540, Key("F3", true)),
        ScriptStep::new(541, Key("F3", false)),
        ScriptStep::new(590, Key("Escape", true)),
    ]
}

/// How the demo ended
#[derive(Debug, Clone, PartialEq)]
pub struct DemoSummary {
    pub frames: u64,
    pub elapsed: f32,
    pub score: u32,
    pub shots: u32,
    pub decals: usize,
    pub action_state: Option<String>,
    pub target_state: TargetState,
    pub eye_position: Vec3,
    pub on_floor: bool,
    pub active: bool,
    pub debug_overlay_visible: bool,
}

/// Drives a session from a script
pub struct DemoHost {
    session: Session,
    tracker: IntentTracker,
    script: Vec<ScriptStep>,
    next: usize,
    frame: u32,
    shots: u32,
}

impl DemoHost {
    pub fn new(session: Session, bindings: KeyBindings, mut script: Vec<ScriptStep>) -> Self {
        script.sort_by_key(|s| s.frame);
        Self {
            session,
            tracker: IntentTracker::new(IntentMapper::new(bindings)),
            script,
            next: 0,
            frame: 0,
            shots: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Deliver this frame's events and step the session once
    pub fn step(&mut self, dt: f32) -> Result<(), SessionError> {
        while let Some(step) = self.script.get(self.next).copied() {
            if step.frame > self.frame {
                break;
            }
            self.dispatch(step.event);
            self.next += 1;
        }

        let snapshot = self.tracker.snapshot();
        let report = self.session.step(dt, &snapshot)?;
        if let Some(shot) = report.shot {
            self.shots += 1;
            log::debug!(
                "Frame {}: shot {}",
                self.frame,
                if shot.scored() { "hit the target" } else { "missed" }
            );
        }

        self.frame += 1;
        Ok(())
    }

    /// Step `frames` frames of `dt` seconds
    pub fn run(&mut self, frames: u32, dt: f32) -> Result<DemoSummary, SessionError> {
        for _ in 0..frames {
            self.step(dt)?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> DemoSummary {
        let session = &self.session;
        DemoSummary {
            frames: session.frame_count(),
            elapsed: session.elapsed(),
            score: session.score(),
            shots: self.shots,
            decals: session.decals().count(),
            action_state: session.active_state().map(str::to_string),
            target_state: session.target().state(),
            eye_position: session.eye_position(),
            on_floor: session.controller().on_floor,
            active: session.is_active(),
            debug_overlay_visible: session.debug_overlay_visible(),
        }
    }

    fn dispatch(&mut self, event: DemoEvent) {
        match event {
            DemoEvent::Key(code, pressed) => {
                if let Some(action) = self.tracker.mapper().map_host_action(code, pressed) {
                    if action == HostAction::ReleasePointer {
                        self.tracker.clear();
                    }
                    self.session.handle_host_action(action);
                } else if !self.tracker.process_key(code, pressed) {
                    log::trace!("Unbound key {}", code);
                }
            }
            DemoEvent::PointerButton(pressed) => {
                self.tracker.process_pointer_button(pressed, self.session.is_active());
            }
            DemoEvent::PointerMotion(dx, dy) => self.tracker.process_pointer_motion(dx, dy),
            DemoEvent::CapturePointer => self.session.set_active(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frostfire_core::{Level, SessionConfig};

    fn host(script: Vec<ScriptStep>) -> DemoHost {
        let mut config = SessionConfig::default();
        config.target.seed = Some(1);
        let mut session = Session::new(config, &Level::arena()).unwrap();
        session.bind_default_clips();
        session.on_assets_loaded().unwrap();
        DemoHost::new(session, KeyBindings::default(), script)
    }

    #[test]
    fn test_default_script_is_ordered() {
        let script = default_script();
        assert!(script.windows(2).all(|w| w[0].frame <= w[1].frame));
        assert_eq!(script[0].event, DemoEvent::CapturePointer);
    }

    #[test]
    fn test_click_before_capture_does_not_shoot() {
        let mut host = host(vec![
            ScriptStep::new(0, DemoEvent::PointerButton(true)),
            ScriptStep::new(1, DemoEvent::PointerButton(false)),
        ]);
        host.run(5, 1.0 / 60.0).unwrap();
        assert_eq!(host.summary().shots, 0);
    }

    #[test]
    fn test_click_while_captured_shoots_once() {
        let mut host = host(vec![
            ScriptStep::new(0, DemoEvent::CapturePointer),
            ScriptStep::new(2, DemoEvent::PointerButton(true)),
            ScriptStep::new(8, DemoEvent::PointerButton(false)),
        ]);
        host.run(10, 1.0 / 60.0).unwrap();
        assert_eq!(host.summary().shots, 1);
    }

    #[test]
    fn test_escape_releases_and_clears() {
        let mut host = host(vec![
            ScriptStep::new(0, DemoEvent::CapturePointer),
            ScriptStep::new(0, DemoEvent::Key("KeyW", true)),
            ScriptStep::new(5, DemoEvent::Key("Escape", true)),
        ]);
        host.run(6, 1.0 / 60.0).unwrap();
        assert!(!host.summary().active);
        assert!(host.tracker.held().is_empty());
    }

    #[test]
    fn test_overlay_key_toggles() {
        let mut host = host(vec![ScriptStep::new(1, DemoEvent::Key("F3", true))]);
        host.run(3, 1.0 / 60.0).unwrap();
        assert!(host.summary().debug_overlay_visible);
    }
}
