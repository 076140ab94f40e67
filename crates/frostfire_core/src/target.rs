//! Enemy target and shot handling
//!
//! The target is a box that continually seeks a point just in front of the
//! player's camera. Shots are rays: each one is tested against the level
//! (leaving a decal) and against the target (scoring and relocating it).

use std::collections::VecDeque;

use frostfire_math::Vec3;
use frostfire_physics::{Aabb, Ray, RayCast, RayHit};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to an impact decal
    pub struct DecalKey;
}

/// Target tunables
#[derive(Clone, Debug, PartialEq)]
pub struct TargetConfig {
    /// Starting centre of the target box
    pub spawn: Vec3,
    /// Half the edge length of the target cube
    pub half_extent: f32,
    /// Distance in front of the camera the target seeks
    pub reach_distance: f32,
    /// Seek speed in units per second
    pub seek_speed: f32,
    /// Within this distance of the reach point the target counts as tagged
    pub tag_radius: f32,
    /// Relocation picks an integer x in `relocation_min..relocation_max`
    pub relocation_min: i32,
    pub relocation_max: i32,
    /// Fixed RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Oldest decals are dropped past this count; zero keeps none
    pub max_decals: usize,
    /// Decals sit this far off the surface along its normal
    pub decal_offset: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, -4.0, -20.0),
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

/// Whether the target is still closing in on the player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetState {
    Approaching,
    Tagged,
}

impl TargetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetState::Approaching => "approaching",
            TargetState::Tagged => "tagged",
        }
    }
}

impl std::fmt::Display for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A cosmetic impact mark
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decal {
    pub position: Vec3,
    /// Surface normal the decal faces along
    pub normal: Vec3,
}

/// What one shot hit
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShotOutcome {
    pub world_hit: Option<RayHit>,
    pub target_hit: Option<RayHit>,
    pub decal: Option<DecalKey>,
}

impl ShotOutcome {
    pub fn scored(&self) -> bool {
        self.target_hit.is_some()
    }
}

pub struct Target {
    position: Vec3,
    state: TargetState,
    score: u32,
    pending_hit: bool,
    config: TargetConfig,
    rng: ChaCha8Rng,
    decals: SlotMap<DecalKey, Decal>,
    decal_order: VecDeque<DecalKey>,
}

impl Default for Target {
    fn default() -> Self {
        Self::new(TargetConfig::default())
    }
}

impl Target {
    pub fn new(config: TargetConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            position: config.spawn,
            state: TargetState::Approaching,
            score: 0,
            pending_hit: false,
            config,
            rng,
            decals: SlotMap::with_key(),
            decal_order: VecDeque::new(),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn state(&self) -> TargetState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// A hit was scored and the target has not relocated yet
    pub fn pending_hit(&self) -> bool {
        self.pending_hit
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// World-space box of the target
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, Vec3::splat(self.config.half_extent))
    }

    /// Cast a shot
    ///
    /// The level and the target are queried independently: a level hit in
    /// front of the target does not block it.
    pub fn fire<W: RayCast + ?Sized>(&mut self, ray: &Ray, world: &W) -> ShotOutcome {
        let mut outcome = ShotOutcome::default();

        if let Some(hit) = world.intersect_ray(ray) {
            outcome.world_hit = Some(hit);
            outcome.decal = self.add_decal(hit);
        }

        if let Some(hit) = self.intersect_ray(ray) {
            outcome.target_hit = Some(hit);
            self.pending_hit = true;
            self.score += 1;
            log::info!("Target hit, score {}", self.score);
        }

        outcome
    }

    /// Relocate after a hit, then seek `reach`
    pub fn update(&mut self, dt: f32, reach: Vec3) {
        if self.pending_hit {
            self.relocate();
            self.pending_hit = false;
        }
        self.seek(dt, reach);
    }

    /// Move towards `reach` at the seek speed without overshooting
    pub fn seek(&mut self, dt: f32, reach: Vec3) {
        let offset = reach - self.position;
        let distance = offset.length();

        if distance > self.config.tag_radius.max(0.0) {
            let step = (self.config.seek_speed * dt).min(distance);
            self.position += offset * (step / distance);
            self.state = TargetState::Approaching;
        } else {
            self.state = TargetState::Tagged;
        }
    }

    /// Jump to a random x along the spawn line
    pub fn relocate(&mut self) {
        let (min, max) = (self.config.relocation_min, self.config.relocation_max);
        let x = if min < max { self.rng.gen_range(min..max) } else { min };
        self.position = Vec3::new(x as f32, self.config.spawn.y, self.config.spawn.z);
        log::debug!("Target relocated to {:?}", self.position);
    }

    /// Store a decal for `hit`, evicting the oldest at the cap
    ///
    /// A cap of zero keeps no decals.
    fn add_decal(&mut self, hit: RayHit) -> Option<DecalKey> {
        if self.config.max_decals == 0 {
            return None;
        }

        while self.decal_order.len() >= self.config.max_decals {
            match self.decal_order.pop_front() {
                Some(oldest) => {
                    self.decals.remove(oldest);
                }
                None => break,
            }
        }

        let key = self.decals.insert(Decal {
            position: hit.point + hit.normal * self.config.decal_offset,
            normal: hit.normal,
        });
        self.decal_order.push_back(key);
        Some(key)
    }

    pub fn decal(&self, key: DecalKey) -> Option<&Decal> {
        self.decals.get(key)
    }

    /// Decals from oldest to newest
    pub fn decals(&self) -> impl Iterator<Item = &Decal> + '_ {
        self.decal_order.iter().filter_map(|k| self.decals.get(*k))
    }

    pub fn decal_count(&self) -> usize {
        self.decals.len()
    }
}

/// Only the outside of the box is solid: a ray starting inside it never
/// hits, whichever way it points.
impl RayCast for Target {
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let bounds = self.bounds();
        if bounds.contains(ray.origin) {
            return None;
        }
        bounds.intersect_ray(ray)
    }
}
