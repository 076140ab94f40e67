//! Character physics for Frostfire
//!
//! This crate provides:
//! - Collision shapes (capsules, triangles, boxes, rays)
//! - Narrow-phase capsule and ray queries
//! - An octree collision mesh for static level geometry
//! - The first-person character controller

pub mod collision;
pub mod controller;
pub mod octree;
pub mod shapes;

// Re-export commonly used types
pub use collision::{
    capsule_vs_triangle, closest_points_between_segments, ray_vs_aabb, ray_vs_triangle, CollisionMesh,
    Contact, RayCast, RayHit,
};
pub use controller::{CharacterController, ControllerConfig, MoveBasis};
pub use octree::Octree;
pub use shapes::{Aabb, Capsule, Plane, Ray, Triangle};
