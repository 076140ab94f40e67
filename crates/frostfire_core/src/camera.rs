//! First-person camera
//!
//! Yaw/pitch mouse look with the camera looking down -Z at zero rotation.
//! Yaw is applied after pitch, so the forward axis is
//! `(-sin yaw * cos pitch, sin pitch, -cos yaw * cos pitch)`.

use frostfire_math::Vec3;
use frostfire_physics::{MoveBasis, Ray};

/// Camera tunables
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Radians of rotation per pixel of pointer motion
    pub mouse_sensitivity: f32,
    /// Maximum pitch magnitude in radians
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 70.0,
            mouse_sensitivity: 1.0 / 500.0,
            pitch_limit: 1.5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FirstPersonCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    config: CameraConfig,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl FirstPersonCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            config,
        }
    }

    /// Builder: start at `position`
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Set yaw and pitch directly; pitch is clamped
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-self.config.pitch_limit, self.config.pitch_limit);
    }

    /// Apply pointer motion in pixels
    ///
    /// Moving right turns right, moving down looks down.
    pub fn look(&mut self, dx: f32, dy: f32) {
        let sensitivity = self.config.mouse_sensitivity;
        self.set_orientation(self.yaw - dx * sensitivity, self.pitch - dy * sensitivity);
    }

    /// Unit view direction including pitch
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Unit right direction (always horizontal)
    pub fn right(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(cy, 0.0, -sy)
    }

    /// Unit up direction of the view
    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Horizontal movement axes for the controller
    pub fn move_basis(&self) -> MoveBasis {
        MoveBasis::from_forward(self.forward())
    }

    /// Point `distance` units ahead along the full view direction
    pub fn reach_point(&self, distance: f32) -> Vec3 {
        self.position + self.forward() * distance
    }

    /// Ray through the centre of the view
    pub fn center_ray(&self) -> Ray {
        Ray::new(self.position, self.forward())
    }

    /// Ray through a point in normalized device coordinates
    ///
    /// `ndc_x` and `ndc_y` run from -1 to 1 across the view; `aspect` is
    /// width over height.
    pub fn ray_through(&self, ndc_x: f32, ndc_y: f32, aspect: f32) -> Ray {
        let half_height = (self.config.fov.to_radians() * 0.5).tan();
        let half_width = half_height * aspect;
        let direction =
            self.forward() + self.right() * (ndc_x * half_width) + self.up() * (ndc_y * half_height);
        Ray::new(self.position, direction)
    }
}
