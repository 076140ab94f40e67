//! First-person character controller
//!
//! Turns intents into velocity, integrates gravity and damping, and resolves
//! the player capsule against a [`CollisionMesh`].

use frostfire_input::Intents;
use frostfire_math::Vec3;

use crate::collision::{CollisionMesh, Contact};
use crate::shapes::Capsule;

/// Default bottom sphere centre of the player capsule
pub const DEFAULT_CAPSULE_START: Vec3 = Vec3::new(0.0, 1.0, 0.0);
/// Default top (eye) sphere centre of the player capsule
pub const DEFAULT_CAPSULE_END: Vec3 = Vec3::new(0.0, 4.0, 0.0);
/// Default player collision radius
pub const DEFAULT_CAPSULE_RADIUS: f32 = 0.35;

/// Tunables for [`CharacterController`]
#[derive(Clone, Debug, PartialEq)]
pub struct ControllerConfig {
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Exponential damping rate; velocity decays by `exp(-damping * dt)`
    pub damping: f32,
    /// Fraction of `damping` applied while airborne
    pub air_damping_factor: f32,
    /// Velocity gained per second of held movement on the ground
    pub ground_acceleration: f32,
    /// Velocity gained per second of held movement in the air
    pub air_acceleration: f32,
    /// Upward velocity set by a grounded jump
    pub jump_velocity: f32,
    /// Capsule at spawn
    pub capsule: Capsule,
    /// Scale diagonal movement to the same speed as a single direction
    pub normalize_diagonal: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gravity: 40.0,
            damping: 4.0,
            air_damping_factor: 0.1,
            ground_acceleration: 25.0,
            air_acceleration: 8.0,
            jump_velocity: 15.0,
            capsule: Capsule::new(DEFAULT_CAPSULE_START, DEFAULT_CAPSULE_END, DEFAULT_CAPSULE_RADIUS),
            normalize_diagonal: false,
        }
    }
}

/// Horizontal movement axes derived from the camera
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveBasis {
    /// Camera forward flattened to the horizontal plane
    pub forward: Vec3,
    /// `forward x up`, pointing to the player's right
    pub side: Vec3,
}

impl MoveBasis {
    /// Build a basis from any camera forward vector
    ///
    /// The vertical component is dropped before normalizing, so looking up or
    /// down does not change ground speed.
    pub fn from_forward(forward: Vec3) -> Self {
        let forward = forward.flattened().normalized();
        Self {
            forward,
            side: forward.cross(Vec3::Y),
        }
    }
}

/// Player capsule, velocity and ground state
#[derive(Clone, Debug)]
pub struct CharacterController {
    /// Collision capsule in world space
    pub capsule: Capsule,
    /// Current velocity
    pub velocity: Vec3,
    /// Whether the last resolve found an upward-facing contact
    pub on_floor: bool,
    config: ControllerConfig,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl CharacterController {
    /// Create a controller at the configured spawn capsule, at rest and airborne
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            capsule: config.capsule,
            velocity: Vec3::ZERO,
            on_floor: false,
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Camera position: the top sphere centre
    pub fn eye_position(&self) -> Vec3 {
        self.capsule.end
    }

    /// Accumulate velocity from held movement intents
    ///
    /// Each held direction adds `dt * acceleration` along its axis, with the
    /// ground or air acceleration chosen by the current floor state.
    pub fn apply_intents(&mut self, intents: Intents, basis: &MoveBasis, dt: f32) {
        let accel = if self.on_floor {
            self.config.ground_acceleration
        } else {
            self.config.air_acceleration
        };
        let speed = dt * accel;

        let mut wish = Vec3::ZERO;
        if intents.forward() {
            wish += basis.forward;
        }
        if intents.backward() {
            wish -= basis.forward;
        }
        if intents.left() {
            wish -= basis.side;
        }
        if intents.right() {
            wish += basis.side;
        }

        if self.config.normalize_diagonal {
            wish = wish.normalized();
        }

        self.velocity += wish * speed;
    }

    /// Jump if grounded
    ///
    /// Returns false and leaves the velocity alone while airborne.
    pub fn jump(&mut self) -> bool {
        if !self.on_floor {
            return false;
        }
        self.velocity.y = self.config.jump_velocity;
        true
    }

    /// Advance one integration step and resolve collisions
    ///
    /// Damping is exponential so a zero step changes nothing. Airborne
    /// steps apply gravity and a reduced damping.
    pub fn integrate<M: CollisionMesh + ?Sized>(&mut self, dt: f32, mesh: &M) -> Option<Contact> {
        let mut damping = (-self.config.damping * dt).exp() - 1.0;

        if !self.on_floor {
            self.velocity.y -= self.config.gravity * dt;
            damping *= self.config.air_damping_factor;
        }

        self.velocity += self.velocity * damping;
        self.capsule.translate(self.velocity * dt);

        self.resolve(mesh)
    }

    /// Apply intents, an optional jump and one integration step
    pub fn step<M: CollisionMesh + ?Sized>(
        &mut self,
        intents: Intents,
        basis: &MoveBasis,
        dt: f32,
        mesh: &M,
    ) -> Option<Contact> {
        self.apply_intents(intents, basis, dt);
        if intents.jump() {
            self.jump();
        }
        self.integrate(dt, mesh)
    }

    /// Push the capsule out of the mesh and update the floor state
    ///
    /// Upward-facing contacts ground the player. Any other contact removes
    /// the velocity component into the surface so the player slides.
    pub fn resolve<M: CollisionMesh + ?Sized>(&mut self, mesh: &M) -> Option<Contact> {
        self.on_floor = false;

        let contact = mesh.intersect_capsule(&self.capsule)?;
        self.on_floor = contact.normal.y > 0.0;

        if !self.on_floor {
            let into = contact.normal.dot(self.velocity);
            self.velocity -= contact.normal * into;
        }

        self.capsule.translate(contact.push());
        Some(contact)
    }
}
