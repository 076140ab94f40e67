//! Character action states
//!
//! The player's hands are always in exactly one of idle, fire or reload.
//! Each state picks its clip on entry; fire and reload run their clip once
//! and fall back to idle when it ends.

use frostfire_input::Intents;

use crate::animation::AnimationSet;
use crate::error::FsmError;
use crate::fsm::{State, StateMachine};

pub const IDLE: &str = "idle";
pub const FIRE: &str = "fire";
pub const RELOAD: &str = "reload";

/// Clip names every character state needs bound
pub const REQUIRED_CLIPS: [&str; 3] = [IDLE, FIRE, RELOAD];

/// Animation policy shared by the character states
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Cross-fade time between clips in seconds
    pub cross_fade: f32,
    /// Clip lengths used when the host binds clips by configuration
    pub idle_duration: f32,
    pub fire_duration: f32,
    pub reload_duration: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cross_fade: 0.1,
            idle_duration: 2.0,
            fire_duration: 0.4,
            reload_duration: 1.8,
        }
    }
}

impl AnimationConfig {
    /// Bind the three character clips with the configured durations
    pub fn bind_clips(&self, set: &mut AnimationSet) {
        set.bind(IDLE, self.idle_duration);
        set.bind(FIRE, self.fire_duration);
        set.bind(RELOAD, self.reload_duration);
    }
}

/// A clip that plays once and then hands back to idle
#[derive(Clone, Debug, PartialEq)]
pub struct OneShot {
    clip: &'static str,
    fade: f32,
    duration: f32,
    elapsed: f32,
}

impl OneShot {
    fn new(clip: &'static str, fade: f32) -> Self {
        Self {
            clip,
            fade,
            duration: 0.0,
            elapsed: 0.0,
        }
    }

    fn enter(&mut self, previous: Option<&str>, set: &mut AnimationSet) {
        self.duration = set.duration(self.clip);
        self.elapsed = 0.0;

        set.play(self.clip, false);
        if let Some(previous) = previous {
            set.cross_fade(previous, self.clip, self.fade);
        }
    }

    fn update(&mut self, dt: f32) -> Option<&'static str> {
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            Some(IDLE)
        } else {
            None
        }
    }

    /// Seconds left before the clip ends
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}

/// The character's action mode
#[derive(Clone, Debug, PartialEq)]
pub enum CharacterState {
    Idle { fade: f32 },
    Fire(OneShot),
    Reload(OneShot),
}

impl CharacterState {
    pub fn idle(fade: f32) -> Self {
        CharacterState::Idle { fade }
    }

    pub fn fire(fade: f32) -> Self {
        CharacterState::Fire(OneShot::new(FIRE, fade))
    }

    pub fn reload(fade: f32) -> Self {
        CharacterState::Reload(OneShot::new(RELOAD, fade))
    }

    /// Register idle, fire and reload on `fsm`
    pub fn register(fsm: &mut StateMachine<Self>, config: &AnimationConfig) -> Result<(), FsmError> {
        let fade = config.cross_fade;
        fsm.add_state(IDLE, move || Self::idle(fade))?;
        fsm.add_state(FIRE, move || Self::fire(fade))?;
        fsm.add_state(RELOAD, move || Self::reload(fade))?;
        Ok(())
    }
}

impl State for CharacterState {
    type Context = AnimationSet;
    type Input = Intents;

    fn name(&self) -> &'static str {
        match self {
            CharacterState::Idle { .. } => IDLE,
            CharacterState::Fire(_) => FIRE,
            CharacterState::Reload(_) => RELOAD,
        }
    }

    fn enter(&mut self, previous: Option<&str>, set: &mut AnimationSet) {
        match self {
            CharacterState::Idle { fade } => {
                set.play(IDLE, true);
                if let Some(previous) = previous.filter(|p| *p == FIRE || *p == RELOAD) {
                    set.cross_fade(previous, IDLE, *fade);
                }
            }
            CharacterState::Fire(shot) | CharacterState::Reload(shot) => shot.enter(previous, set),
        }
    }

    fn update(&mut self, dt: f32, intents: &Intents, _set: &mut AnimationSet) -> Option<&'static str> {
        match self {
            CharacterState::Idle { .. } => {
                if intents.fire() {
                    Some(FIRE)
                } else if intents.reload() {
                    Some(RELOAD)
                } else {
                    None
                }
            }
            // Intents are ignored until the clip ends
            CharacterState::Fire(shot) | CharacterState::Reload(shot) => shot.update(dt),
        }
    }
}
