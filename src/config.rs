//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`FF_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use frostfire_core::{AnimationConfig, CameraConfig, SessionConfig, TargetConfig};
use frostfire_input::KeyBindings;
use frostfire_math::Vec3;
use frostfire_physics::{Capsule, ControllerConfig};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Frame driver and demo run
    #[serde(default)]
    pub session: SessionSection,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraSection,
    /// Key bindings
    #[serde(default)]
    pub input: KeyBindings,
    /// Character controller configuration
    #[serde(default)]
    pub physics: PhysicsSection,
    /// Action clip timing
    #[serde(default)]
    pub animation: AnimationSection,
    /// Target and decals
    #[serde(default)]
    pub target: TargetSection,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugSection,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`FF_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // FF_SESSION__SUBSTEPS=4 -> session.substeps = 4
        figment = figment.merge(Env::prefixed("FF_").split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    ///
    /// A NaN frame cap would disable the frame time clamp and a negative
    /// tag radius would let the target divide by a zero distance.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
            }
        }

        fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::invalid(field, format!("must not be negative, got {}", value)))
            }
        }

        positive("session.max_frame_dt", self.session.max_frame_dt)?;
        non_negative("session.demo_dt", self.session.demo_dt)?;
        if self.session.substeps == 0 {
            return Err(ConfigError::invalid("session.substeps", "must be at least 1".to_string()));
        }

        positive("camera.fov", self.camera.fov)?;
        non_negative("camera.pitch_limit", self.camera.pitch_limit)?;
        positive("physics.capsule_radius", self.physics.capsule_radius)?;
        non_negative("animation.cross_fade", self.animation.cross_fade)?;

        positive("target.half_extent", self.target.half_extent)?;
        non_negative("target.seek_speed", self.target.seek_speed)?;
        non_negative("target.tag_radius", self.target.tag_radius)?;
        if self.target.relocation_min > self.target.relocation_max {
            return Err(ConfigError::invalid(
                "target.relocation_min",
                format!(
                    "must not exceed relocation_max ({} > {})",
                    self.target.relocation_min, self.target.relocation_max
                ),
            ));
        }
        Ok(())
    }

    /// Everything a [`frostfire_core::Session`] needs, from every section
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            max_frame_dt: self.session.max_frame_dt,
            substeps: self.session.substeps,
            controller: self.physics.to_controller_config(),
            camera: self.camera.to_camera_config(),
            animation: self.animation.to_animation_config(),
            target: self.target.to_target_config(),
            show_debug_overlay: self.debug.show_overlay,
        }
    }
}

fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

/// Frame driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Longest frame time simulated in one step, in seconds
    pub max_frame_dt: f32,
    /// Controller integration steps per frame
    pub substeps: u32,
    /// Level file; the built-in arena is used when it is missing
    pub level_path: String,
    /// Frames simulated by the headless demo
    pub demo_frames: u32,
    /// Frame time fed to each demo step
    pub demo_dt: f32,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.05,
            substeps: 1,
            level_path: "levels/arena.ron".to_string(),
            demo_frames: 600,
            demo_dt: 1.0 / 60.0,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// Field of view in degrees
    pub fov: f32,
    /// Radians per pixel of pointer motion
    pub mouse_sensitivity: f32,
    /// Maximum pitch angle in radians
    pub pitch_limit: f32,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            fov: 70.0,
            mouse_sensitivity: 0.002,
            pitch_limit: 1.5,
        }
    }
}

impl CameraSection {
    pub fn to_camera_config(&self) -> CameraConfig {
        CameraConfig {
            fov: self.fov,
            mouse_sensitivity: self.mouse_sensitivity,
            pitch_limit: self.pitch_limit,
        }
    }
}

/// Character controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSection {
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Exponential velocity damping rate on the ground
    pub damping: f32,
    /// Damping multiplier while airborne
    pub air_damping_factor: f32,
    /// Acceleration from movement intents on the ground
    pub ground_acceleration: f32,
    /// Acceleration from movement intents in the air
    pub air_acceleration: f32,
    /// Upward velocity set by a jump
    pub jump_velocity: f32,
    /// Capsule bottom sphere centre [x, y, z] relative to the spawn
    pub capsule_start: [f32; 3],
    /// Capsule top sphere centre [x, y, z] relative to the spawn
    pub capsule_end: [f32; 3],
    pub capsule_radius: f32,
    /// Normalize diagonal movement instead of adding both axes
    pub normalize_diagonal: bool,
}

impl Default for PhysicsSection {
    fn default() -> Self {
        Self {
            gravity: 40.0,
            damping: 4.0,
            air_damping_factor: 0.1,
            ground_acceleration: 25.0,
            air_acceleration: 8.0,
            jump_velocity: 15.0,
            capsule_start: [0.0, 1.0, 0.0],
            capsule_end: [0.0, 4.0, 0.0],
            capsule_radius: 0.35,
            normalize_diagonal: false,
        }
    }
}

impl PhysicsSection {
    pub fn to_controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            gravity: self.gravity,
            damping: self.damping,
            air_damping_factor: self.air_damping_factor,
            ground_acceleration: self.ground_acceleration,
            air_acceleration: self.air_acceleration,
            jump_velocity: self.jump_velocity,
            capsule: Capsule::new(
                vec3(self.capsule_start),
                vec3(self.capsule_end),
                self.capsule_radius,
            ),
            normalize_diagonal: self.normalize_diagonal,
        }
    }
}

/// Action clip timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSection {
    /// Cross-fade between clips in seconds
    pub cross_fade: f32,
    pub idle_duration: f32,
    pub fire_duration: f32,
    pub reload_duration: f32,
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            cross_fade: 0.1,
            idle_duration: 2.0,
            fire_duration: 0.4,
            reload_duration: 1.8,
        }
    }
}

impl AnimationSection {
    pub fn to_animation_config(&self) -> AnimationConfig {
        AnimationConfig {
            cross_fade: self.cross_fade,
            idle_duration: self.idle_duration,
            fire_duration: self.fire_duration,
            reload_duration: self.reload_duration,
        }
    }
}

/// Target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSection {
    /// Starting centre [x, y, z]; relocation keeps its y and z
    pub spawn: [f32; 3],
    pub half_extent: f32,
    /// Distance of the seek point in front of the camera
    pub reach_distance: f32,
    /// Units per second
    pub seek_speed: f32,
    /// Closer than this to the seek point counts as tagged
    pub tag_radius: f32,
    /// Relocation x range, min inclusive, max exclusive
    pub relocation_min: i32,
    pub relocation_max: i32,
    /// Fixed RNG seed for repeatable runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Oldest decals are dropped past this count
    pub max_decals: usize,
    /// Decal lift along the surface normal
    pub decal_offset: f32,
}

impl Default for TargetSection {
    fn default() -> Self {
        Self {
            spawn: [0.0, -4.0, -20.0],
            half_extent: 3.0,
            reach_distance: 3.0,
            seek_speed: 4.0,
            tag_radius: 0.1,
            relocation_min: -100,
            relocation_max: 100,
            seed: None,
            max_decals: 64,
            decal_offset: 0.1,
        }
    }
}

impl TargetSection {
    pub fn to_target_config(&self) -> TargetConfig {
        TargetConfig {
            spawn: vec3(self.spawn),
            half_extent: self.half_extent,
            reach_distance: self.reach_distance,
            seek_speed: self.seek_speed,
            tag_radius: self.tag_radius,
            relocation_min: self.relocation_min,
            relocation_max: self.relocation_max,
            seed: self.seed,
            max_decals: self.max_decals,
            decal_offset: self.decal_offset,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSection {
    /// Show the collision debug overlay at startup
    pub show_overlay: bool,
    /// Log level (error, warn, info, debug, trace), used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for DebugSection {
    fn default() -> Self {
        Self {
            show_overlay: false,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(field: &str, reason: String) -> Self {
        ConfigError {
            message: format!("{} {}", field, reason),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
