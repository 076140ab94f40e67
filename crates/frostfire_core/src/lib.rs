//! Gameplay core for Frostfire
//!
//! This crate provides:
//!
//! - [`StateMachine`] - Named-state machine with enter/exit hooks
//! - [`CharacterState`] - Idle, fire and reload action states
//! - [`AnimationSet`] - Named clips over an [`AnimationMixer`]
//! - [`FirstPersonCamera`] - Yaw/pitch mouse-look camera
//! - [`Target`] - The seeking target box, scoring and impact decals
//! - [`Level`] - Serializable level geometry
//! - [`Session`] - The per-frame driver tying it all together

mod animation;
mod camera;
mod error;
mod fsm;
mod level;
mod session;
mod states;
mod target;

pub use animation::{ActionKey, AnimationBinding, AnimationMixer, AnimationSet, ClipAction};
pub use camera::{CameraConfig, FirstPersonCamera};
pub use error::{FsmError, LevelLoadError, LevelSaveError, SessionError};
pub use fsm::{State, StateMachine};
pub use level::{Level, Solid};
pub use session::{clamp_frame_time, FrameReport, Session, SessionConfig, DEFAULT_MAX_FRAME_DT};
pub use states::{AnimationConfig, CharacterState, OneShot, FIRE, IDLE, RELOAD, REQUIRED_CLIPS};
pub use target::{Decal, DecalKey, ShotOutcome, Target, TargetConfig, TargetState};

// Re-export the lower layers for convenient access through frostfire_core
pub use frostfire_input::{HostAction, IntentSnapshot, IntentTracker, Intents};
pub use frostfire_math::Vec3;
pub use frostfire_physics::{CharacterController, ControllerConfig, Octree, Ray, RayHit};
