//! Animation playback
//!
//! Clip decoding and skinning happen outside the core. Here a clip is just a
//! named duration; the mixer tracks playback time and blend weight for each
//! action so states can start, cross-fade and wait on clips.

use std::collections::HashMap;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a clip action in an [`AnimationMixer`]
    pub struct ActionKey;
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// Playback state of one clip
#[derive(Clone, Debug, PartialEq)]
pub struct ClipAction {
    /// Clip length in seconds
    pub duration: f32,
    /// Playback position in seconds
    pub time: f32,
    /// Blend weight in `[0, 1]`
    pub weight: f32,
    /// Playback speed multiplier
    pub time_scale: f32,
    /// Wrap around at the end instead of holding the last frame
    pub looping: bool,
    /// Whether `advance` moves this action
    pub playing: bool,
    fade: Option<Fade>,
}

impl ClipAction {
    fn new(duration: f32) -> Self {
        Self {
            duration,
            time: 0.0,
            weight: 0.0,
            time_scale: 1.0,
            looping: false,
            playing: false,
            fade: None,
        }
    }

    fn restart(&mut self, looping: bool) {
        self.time = 0.0;
        self.time_scale = 1.0;
        self.weight = 1.0;
        self.looping = looping;
        self.playing = true;
        self.fade = None;
    }

    /// A one-shot action that reached its last frame
    pub fn is_finished(&self) -> bool {
        !self.looping && self.time >= self.duration
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        self.time += dt * self.time_scale;
        if self.looping {
            if self.duration > 0.0 {
                self.time = self.time.rem_euclid(self.duration);
            }
        } else if self.time >= self.duration {
            // One-shots hold their last frame
            self.time = self.duration;
        }

        if let Some(mut fade) = self.fade {
            fade.elapsed += dt;
            let t = if fade.duration > 0.0 {
                (fade.elapsed / fade.duration).min(1.0)
            } else {
                1.0
            };
            self.weight = fade.from + (fade.to - fade.from) * t;

            if t >= 1.0 {
                self.fade = None;
                if fade.to <= 0.0 {
                    self.playing = false;
                }
            } else {
                self.fade = Some(fade);
            }
        }
    }
}

/// Owns every clip action and advances them together
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ActionKey, ClipAction>,
}

impl AnimationMixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a clip of the given duration; it starts stopped
    pub fn add_action(&mut self, duration: f32) -> ActionKey {
        self.actions.insert(ClipAction::new(duration.max(0.0)))
    }

    pub fn action(&self, key: ActionKey) -> Option<&ClipAction> {
        self.actions.get(key)
    }

    /// Start `key` from the beginning and hold its last frame when done
    pub fn play_once(&mut self, key: ActionKey) {
        if let Some(action) = self.actions.get_mut(key) {
            action.restart(false);
        }
    }

    /// Start `key` from the beginning and loop it
    pub fn play_looped(&mut self, key: ActionKey) {
        if let Some(action) = self.actions.get_mut(key) {
            action.restart(true);
        }
    }

    /// Blend from `from` to `to` over `duration` seconds
    ///
    /// `to` fades in from zero weight and `from` fades out, stopping once its
    /// weight reaches zero. `to` must already be playing.
    pub fn cross_fade_from(&mut self, from: ActionKey, to: ActionKey, duration: f32) {
        if from == to {
            return;
        }

        if let Some(outgoing) = self.actions.get_mut(from) {
            if outgoing.playing {
                outgoing.fade = Some(Fade {
                    from: outgoing.weight,
                    to: 0.0,
                    duration,
                    elapsed: 0.0,
                });
            }
        }

        if let Some(incoming) = self.actions.get_mut(to) {
            incoming.weight = 0.0;
            incoming.fade = Some(Fade {
                from: 0.0,
                to: 1.0,
                duration,
                elapsed: 0.0,
            });
        }
    }

    pub fn stop(&mut self, key: ActionKey) {
        if let Some(action) = self.actions.get_mut(key) {
            action.playing = false;
            action.weight = 0.0;
            action.fade = None;
        }
    }

    /// Advance all playing actions by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        for (_, action) in self.actions.iter_mut() {
            action.advance(dt);
        }
    }

    pub fn is_playing(&self, key: ActionKey) -> bool {
        self.actions.get(key).is_some_and(|a| a.playing)
    }

    pub fn is_finished(&self, key: ActionKey) -> bool {
        self.actions.get(key).is_some_and(ClipAction::is_finished)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A named clip bound into the mixer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationBinding {
    pub action: ActionKey,
    /// Clip length in seconds
    pub duration: f32,
}

/// The player's clips by name plus the mixer that plays them
///
/// Character states borrow this through the state machine context.
#[derive(Debug, Default)]
pub struct AnimationSet {
    bindings: HashMap<String, AnimationBinding>,
    mixer: AnimationMixer,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a clip name to a new action of the given duration
    ///
    /// Binding an existing name again replaces its duration and keeps the
    /// action handle.
    pub fn bind(&mut self, name: &str, duration: f32) -> ActionKey {
        if let Some(binding) = self.bindings.get_mut(name) {
            binding.duration = duration;
            if let Some(action) = self.mixer.actions.get_mut(binding.action) {
                action.duration = duration.max(0.0);
            }
            return binding.action;
        }

        let action = self.mixer.add_action(duration);
        self.bindings
            .insert(name.to_string(), AnimationBinding { action, duration });
        log::debug!("Bound animation clip '{}' ({:.2}s)", name, duration);
        action
    }

    pub fn get(&self, name: &str) -> Option<&AnimationBinding> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Clip length by name, zero for unbound clips
    pub fn duration(&self, name: &str) -> f32 {
        self.get(name).map_or(0.0, |b| b.duration)
    }

    pub fn mixer(&self) -> &AnimationMixer {
        &self.mixer
    }

    pub fn mixer_mut(&mut self) -> &mut AnimationMixer {
        &mut self.mixer
    }

    /// Start a clip by name, looping or once
    ///
    /// Returns false when the clip is not bound.
    pub fn play(&mut self, name: &str, looping: bool) -> bool {
        let Some(binding) = self.bindings.get(name) else {
            log::warn!("Animation clip '{}' is not bound", name);
            return false;
        };

        if looping {
            self.mixer.play_looped(binding.action);
        } else {
            self.mixer.play_once(binding.action);
        }
        true
    }

    /// Cross-fade from clip `from` into the already started clip `to`
    pub fn cross_fade(&mut self, from: &str, to: &str, duration: f32) {
        if let (Some(a), Some(b)) = (self.bindings.get(from), self.bindings.get(to)) {
            self.mixer.cross_fade_from(a.action, b.action, duration);
        }
    }

    /// Whether the named one-shot clip has played to its end
    pub fn is_finished(&self, name: &str) -> bool {
        self.get(name).is_some_and(|b| self.mixer.is_finished(b.action))
    }

    /// Blend weight of the named clip, zero when stopped or unbound
    pub fn weight(&self, name: &str) -> f32 {
        self.get(name)
            .and_then(|b| self.mixer.action(b.action))
            .filter(|a| a.playing)
            .map_or(0.0, |a| a.weight)
    }

    pub fn advance(&mut self, dt: f32) {
        self.mixer.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clips() -> AnimationSet {
        let mut set = AnimationSet::new();
        set.bind("idle", 2.0);
        set.bind("fire", 0.5);
        set.bind("reload", 1.5);
        set
    }

    #[test]
    fn test_bind_and_lookup() {
        let set = clips();
        assert!(set.contains("fire"));
        assert!(!set.contains("jump"));
        assert_eq!(set.duration("reload"), 1.5);
        assert_eq!(set.duration("jump"), 0.0);
        assert_eq!(set.mixer().len(), 3);
    }

    #[test]
    fn test_rebind_keeps_handle() {
        let mut set = clips();
        let before = set.get("fire").unwrap().action;
        let after = set.bind("fire", 0.8);
        assert_eq!(before, after);
        assert_eq!(set.duration("fire"), 0.8);
        assert_eq!(set.mixer().len(), 3);
    }

    #[test]
    fn test_play_once_finishes_and_holds() {
        let mut set = clips();
        assert!(set.play("fire", false));

        set.advance(0.3);
        assert!(!set.is_finished("fire"));

        set.advance(0.3);
        assert!(set.is_finished("fire"));
        let key = set.get("fire").unwrap().action;
        assert_eq!(set.mixer().action(key).unwrap().time, 0.5);
    }

    #[test]
    fn test_looped_clip_wraps() {
        let mut set = clips();
        set.play("idle", true);
        set.advance(2.5);

        let key = set.get("idle").unwrap().action;
        let action = set.mixer().action(key).unwrap();
        assert!((action.time - 0.5).abs() < 0.0001);
        assert!(!set.is_finished("idle"));
    }

    #[test]
    fn test_play_unbound_clip() {
        let mut set = clips();
        assert!(!set.play("jump", true));
    }

    #[test]
    fn test_cross_fade_weights() {
        let mut set = clips();
        set.play("idle", true);
        set.play("fire", false);
        set.cross_fade("idle", "fire", 0.1);

        assert_eq!(set.weight("fire"), 0.0);
        assert_eq!(set.weight("idle"), 1.0);

        set.advance(0.05);
        assert!((set.weight("fire") - 0.5).abs() < 0.0001);
        assert!((set.weight("idle") - 0.5).abs() < 0.0001);

        set.advance(0.06);
        assert!((set.weight("fire") - 1.0).abs() < 0.0001);
        assert_eq!(set.weight("idle"), 0.0);
        let idle = set.get("idle").unwrap().action;
        assert!(!set.mixer().is_playing(idle));
    }

    #[test]
    fn test_stop() {
        let mut mixer = AnimationMixer::new();
        let key = mixer.add_action(1.0);
        mixer.play_looped(key);
        assert!(mixer.is_playing(key));
        mixer.stop(key);
        assert!(!mixer.is_playing(key));
        assert!(!mixer.is_finished(key));
    }

    #[test]
    fn test_stale_key_is_ignored() {
        let mut mixer = AnimationMixer::new();
        let key = mixer.add_action(1.0);
        let mut other = AnimationMixer::new();
        other.play_once(key);
        assert!(!other.is_playing(key));
        assert!(other.is_empty());
    }
}
