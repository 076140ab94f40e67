//! 3D Mathematics Library
//!
//! This crate provides the vector type shared by the Frostfire crates.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components (y is up)

mod vec3;

pub use vec3::Vec3;
