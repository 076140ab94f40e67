//! Frame driver
//!
//! A `Session` owns everything one player needs: the action state machine,
//! its animation clips, the capsule controller, the camera, the target and
//! the level's collision octree. Hosts feed it one [`IntentSnapshot`] per
//! display refresh through [`Session::step`].

use frostfire_input::{HostAction, IntentSnapshot};
use frostfire_math::Vec3;
use frostfire_physics::{CharacterController, ControllerConfig, Octree};

use crate::animation::AnimationSet;
use crate::camera::{CameraConfig, FirstPersonCamera};
use crate::error::SessionError;
use crate::fsm::StateMachine;
use crate::level::Level;
use crate::states::{AnimationConfig, CharacterState, IDLE, REQUIRED_CLIPS};
use crate::target::{Decal, ShotOutcome, Target, TargetConfig};

/// Largest frame time fed to the simulation, in seconds
pub const DEFAULT_MAX_FRAME_DT: f32 = 0.05;

/// Everything needed to build a session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub max_frame_dt: f32,
    /// Controller integration steps per frame
    pub substeps: u32,
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub target: TargetConfig,
    /// Initial visibility of the collision debug overlay
    pub show_debug_overlay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
            substeps: 1,
            controller: ControllerConfig::default(),
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
            target: TargetConfig::default(),
            show_debug_overlay: false,
        }
    }
}

/// Clamp a raw frame time into `[0, max]`
///
/// Negative and non-finite deltas become zero.
pub fn clamp_frame_time(raw: f32, max: f32) -> f32 {
    if !raw.is_finite() || raw < 0.0 {
        return 0.0;
    }
    raw.min(max)
}

/// What happened during one [`Session::step`]
#[derive(Clone, Debug, Default)]
pub struct FrameReport {
    /// Simulated time after clamping
    pub dt: f32,
    /// Result of the shot, when the trigger was pulled during active play
    pub shot: Option<ShotOutcome>,
    pub on_floor: bool,
}

pub struct Session {
    config: SessionConfig,
    fsm: StateMachine<CharacterState>,
    animations: AnimationSet,
    controller: CharacterController,
    camera: FirstPersonCamera,
    target: Target,
    world: Octree,
    level_name: String,
    active: bool,
    debug_overlay_visible: bool,
    frames: u64,
    elapsed: f32,
}

impl Session {
    /// Build a session for `level`
    ///
    /// The capsule is moved so its start sits on the level spawn. The state
    /// machine stays inactive until [`Session::on_assets_loaded`].
    pub fn new(config: SessionConfig, level: &Level) -> Result<Self, SessionError> {
        let mut fsm = StateMachine::new();
        CharacterState::register(&mut fsm, &config.animation)?;

        let mut controller = CharacterController::new(config.controller.clone());
        let offset = level.spawn - controller.capsule.start;
        controller.capsule.translate(offset);

        let camera =
            FirstPersonCamera::new(config.camera.clone()).with_position(controller.eye_position());
        let target = Target::new(config.target.clone());
        let world = level.to_octree();

        log::info!(
            "Session started in '{}' ({} collision triangles)",
            level.name,
            world.triangle_count()
        );

        Ok(Self {
            debug_overlay_visible: config.show_debug_overlay,
            config,
            fsm,
            animations: AnimationSet::new(),
            controller,
            camera,
            target,
            world,
            level_name: level.name.clone(),
            active: false,
            frames: 0,
            elapsed: 0.0,
        })
    }

    /// Bind the character clips with the configured durations
    pub fn bind_default_clips(&mut self) {
        self.config.animation.bind_clips(&mut self.animations);
    }

    /// Activate the state machine once every character clip is bound
    ///
    /// Enters idle. Calling it again while active keeps the current state.
    pub fn on_assets_loaded(&mut self) -> Result<(), SessionError> {
        if let Some(missing) = REQUIRED_CLIPS.iter().find(|name| !self.animations.contains(name)) {
            return Err(SessionError::MissingClip(missing.to_string()));
        }

        if !self.fsm.is_active() {
            self.fsm.set_state(IDLE, &mut self.animations)?;
        }
        Ok(())
    }

    /// Advance one frame
    pub fn step(&mut self, raw_dt: f32, input: &IntentSnapshot) -> Result<FrameReport, SessionError> {
        // 1. Clamp frame time
        let dt = clamp_frame_time(raw_dt, self.config.max_frame_dt);

        // 2. Mouse look only counts while the pointer is held by the session
        if self.active {
            let [dx, dy] = input.look_delta;
            self.camera.look(dx, dy);
        }

        // 3. Character action state
        self.fsm.update(dt, &input.held, &mut self.animations)?;

        // 4. Movement and collision
        let substeps = self.config.substeps.max(1);
        let sub_dt = dt / substeps as f32;
        for _ in 0..substeps {
            let basis = self.camera.move_basis();
            self.controller.step(input.held, &basis, sub_dt, &self.world);
        }

        // 5. Camera follows the capsule top
        self.camera.position = self.controller.eye_position();

        // 6. Shot
        let shot = if input.trigger_pulled && self.active {
            Some(self.target.fire(&self.camera.center_ray(), &self.world))
        } else {
            None
        };

        // 7. Target relocation and seek
        let reach = self.camera.reach_point(self.target.config().reach_distance);
        self.target.update(dt, reach);

        // 8. Animation playback
        self.animations.advance(dt);

        self.frames += 1;
        self.elapsed += dt;

        Ok(FrameReport {
            dt,
            shot,
            on_floor: self.controller.on_floor,
        })
    }

    /// Apply a host-level key action
    pub fn handle_host_action(&mut self, action: HostAction) {
        match action {
            HostAction::ReleasePointer => self.set_active(false),
            HostAction::ToggleDebugOverlay => self.toggle_debug_overlay(),
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        self.controller.eye_position()
    }

    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut FirstPersonCamera {
        &mut self.camera
    }

    pub fn controller(&self) -> &CharacterController {
        &self.controller
    }

    /// Name of the current action state, `None` before assets load
    pub fn active_state(&self) -> Option<&str> {
        self.fsm.current_name()
    }

    pub fn state_machine(&self) -> &StateMachine<CharacterState> {
        &self.fsm
    }

    pub fn animations(&self) -> &AnimationSet {
        &self.animations
    }

    pub fn animations_mut(&mut self) -> &mut AnimationSet {
        &mut self.animations
    }

    pub fn score(&self) -> u32 {
        self.target.score()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn decals(&self) -> impl Iterator<Item = &Decal> + '_ {
        self.target.decals()
    }

    pub fn world(&self) -> &Octree {
        &self.world
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the host holds the pointer for active play
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::debug!("Session {}", if active { "active" } else { "paused" });
        }
        self.active = active;
    }

    pub fn debug_overlay_visible(&self) -> bool {
        self.debug_overlay_visible
    }

    pub fn toggle_debug_overlay(&mut self) {
        self.debug_overlay_visible = !self.debug_overlay_visible;
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Simulated seconds since the session started
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Solid;
    use crate::states::FIRE;
    use frostfire_input::Intents;

    fn flat_level() -> Level {
        Level::new("flat").with_solid(Solid::cuboid(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(30.0, 0.5, 30.0),
        ))
    }

    fn seeded_config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.target.seed = Some(7);
        config
    }

    fn ready_session() -> Session {
        let mut session = Session::new(seeded_config(), &flat_level()).unwrap();
        session.bind_default_clips();
        session.on_assets_loaded().unwrap();
        session
    }

    #[test]
    fn test_clamp_frame_time() {
        assert_eq!(clamp_frame_time(10.0, 0.05), 0.05);
        assert_eq!(clamp_frame_time(0.016, 0.05), 0.016);
        assert_eq!(clamp_frame_time(-1.0, 0.05), 0.0);
        assert_eq!(clamp_frame_time(f32::NAN, 0.05), 0.0);
        assert_eq!(clamp_frame_time(f32::INFINITY, 0.05), 0.0);
    }

    #[test]
    fn test_step_reports_clamped_dt() {
        let mut session = ready_session();
        let report = session.step(10.0, &IntentSnapshot::default()).unwrap();
        assert_eq!(report.dt, 0.05);
        assert!((session.elapsed() - 0.05).abs() < 0.0001);
        assert_eq!(session.frame_count(), 1);
    }

    #[test]
    fn test_spawn_at_level_spawn() {
        let level = flat_level().with_spawn(Vec3::new(5.0, 2.0, -3.0));
        let session = Session::new(seeded_config(), &level).unwrap();
        assert_eq!(session.controller().capsule.start, Vec3::new(5.0, 2.0, -3.0));
        assert_eq!(session.eye_position(), Vec3::new(5.0, 5.0, -3.0));
        assert_eq!(session.camera().position, session.eye_position());
    }

    #[test]
    fn test_fsm_inactive_until_assets_loaded() {
        let mut session = Session::new(seeded_config(), &flat_level()).unwrap();
        session
            .step(0.016, &IntentSnapshot::holding(Intents::FIRE))
            .unwrap();
        assert_eq!(session.active_state(), None);

        session.bind_default_clips();
        session.on_assets_loaded().unwrap();
        assert_eq!(session.active_state(), Some(IDLE));

        session
            .step(0.016, &IntentSnapshot::holding(Intents::FIRE))
            .unwrap();
        assert_eq!(session.active_state(), Some(FIRE));
    }

    #[test]
    fn test_missing_clip_is_error() {
        let mut session = Session::new(seeded_config(), &flat_level()).unwrap();
        session.animations_mut().bind(IDLE, 1.0);
        let result = session.on_assets_loaded();
        assert!(matches!(result, Err(SessionError::MissingClip(ref name)) if name == FIRE));
        assert_eq!(session.active_state(), None);
    }

    #[test]
    fn test_camera_follows_capsule() {
        let mut session = ready_session();
        for _ in 0..30 {
            session
                .step(1.0 / 60.0, &IntentSnapshot::holding(Intents::FORWARD))
                .unwrap();
        }
        assert_eq!(session.camera().position, session.eye_position());
        assert!(session.eye_position().z < 0.0);
    }

    #[test]
    fn test_look_needs_active_play() {
        let mut session = ready_session();
        let look = IntentSnapshot::default().with_look(100.0, 0.0);

        session.step(0.016, &look).unwrap();
        assert_eq!(session.camera().yaw(), 0.0);

        session.set_active(true);
        session.step(0.016, &look).unwrap();
        assert!((session.camera().yaw() + 0.2).abs() < 0.0001);
    }

    #[test]
    fn test_shot_ignored_while_inactive() {
        let mut session = ready_session();
        session.camera_mut().set_orientation(0.0, -0.35);

        let report = session
            .step(0.016, &IntentSnapshot::default().with_trigger())
            .unwrap();
        assert!(report.shot.is_none());
        assert_eq!(session.score(), 0);
        assert_eq!(session.decals().count(), 0);
    }

    #[test]
    fn test_shot_scores_and_leaves_decal() {
        let mut session = ready_session();
        session.set_active(true);
        // Aim at the target box below the horizon, 20 units ahead
        session.camera_mut().set_orientation(0.0, -0.35);

        let report = session
            .step(0.016, &IntentSnapshot::default().with_trigger())
            .unwrap();

        let shot = report.shot.unwrap();
        assert!(shot.scored());
        assert!(shot.world_hit.is_some());
        assert_eq!(session.score(), 1);
        assert_eq!(session.decals().count(), 1);
        // Relocation consumed the hit in the same frame
        assert!(!session.target().pending_hit());
    }

    #[test]
    fn test_host_actions() {
        let mut session = ready_session();
        session.set_active(true);

        session.handle_host_action(HostAction::ToggleDebugOverlay);
        assert!(session.debug_overlay_visible());
        session.handle_host_action(HostAction::ToggleDebugOverlay);
        assert!(!session.debug_overlay_visible());

        session.handle_host_action(HostAction::ReleasePointer);
        assert!(!session.is_active());
    }

    #[test]
    fn test_substeps_settle_on_floor() {
        let mut config = seeded_config();
        config.substeps = 4;
        let mut session = Session::new(config, &flat_level()).unwrap();

        let mut report = FrameReport::default();
        for _ in 0..120 {
            report = session.step(1.0 / 60.0, &IntentSnapshot::default()).unwrap();
        }
        assert!(report.on_floor);
        assert!((session.controller().capsule.start.y - 0.35).abs() < 0.01);
    }

    #[test]
    fn test_shot_from_inside_tagged_target_does_not_score() {
        use crate::target::TargetState;
        use std::f32::consts::{FRAC_PI_4, PI};

        let mut session = ready_session();
        session.camera_mut().set_orientation(FRAC_PI_4, 0.0);
        for _ in 0..600 {
            session.step(0.05, &IntentSnapshot::default()).unwrap();
        }
        assert_eq!(session.target().state(), TargetState::Tagged);
        // Off-axis yaw puts the eye inside the box hovering 3 units ahead
        assert!(session.target().bounds().contains(session.eye_position()));

        session.set_active(true);
        session.camera_mut().set_orientation(FRAC_PI_4 + PI, 0.0);
        let report = session
            .step(0.05, &IntentSnapshot::default().with_trigger())
            .unwrap();

        assert!(!report.shot.unwrap().scored());
        assert_eq!(session.score(), 0);
    }
}
