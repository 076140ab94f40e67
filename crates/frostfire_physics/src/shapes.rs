//! Collision shapes
//!
//! Lightweight primitives for the character capsule, world triangles and
//! the queries run against them.

use frostfire_math::Vec3;
use serde::{Serialize, Deserialize};

/// A capsule: the segment `start..end` swept by a sphere of `radius`
///
/// For the player, `start` is the bottom sphere centre and `end` the top
/// (eye) sphere centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    /// Create a new capsule from its two sphere centres and radius
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Midpoint of the axis
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Move both endpoints by `delta`
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// Copy of this capsule moved by `delta`
    pub fn translated(&self, delta: Vec3) -> Self {
        let mut moved = *self;
        moved.translate(delta);
        moved
    }

    /// Axis-aligned bounds including the radius
    pub fn bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(
            self.start.min_components(self.end) - r,
            self.start.max_components(self.end) + r,
        )
    }
}

/// An infinite plane: points `p` with `normal · p = distance`
///
/// Points with `normal · p > distance` are on the positive side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a point on it and a normal (normalized here)
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let n = normal.normalized();
        Self {
            normal: n,
            distance: n.dot(point),
        }
    }

    /// Signed distance from the plane to a point
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

/// A world triangle with counter-clockwise winding
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unit face normal; counter-clockwise vertices face the viewer
    pub fn normal(&self) -> Vec3 {
        (self.c - self.b).cross(self.a - self.b).normalized()
    }

    /// Plane containing the triangle
    pub fn plane(&self) -> Plane {
        Plane::from_point_normal(self.a, self.normal())
    }

    /// Twice the area is zero for degenerate triangles
    pub fn is_degenerate(&self) -> bool {
        (self.c - self.b).cross(self.a - self.b).length_squared() < 1e-12
    }

    /// Check whether a point on the triangle's plane lies inside it
    ///
    /// Uses barycentric coordinates; points on an edge count as inside.
    pub fn contains_point(&self, p: Vec3) -> bool {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = p - self.a;

        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom == 0.0 {
            return false;
        }

        let inv = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv;
        let v = (dot00 * dot12 - dot01 * dot02) * inv;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }

    /// The three edges as segment endpoint pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.a.min_components(self.b).min_components(self.c),
            self.a.max_components(self.b).max_components(self.c),
        )
    }
}

/// An axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (all components are minimums)
    pub min: Vec3,
    /// Maximum corner (all components are maximums)
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// An inverted box that any `union` will replace
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// True for boxes produced by [`Aabb::empty`] with nothing merged in
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min_components(other.min),
            max: self.max.max_components(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Overlap test (touching counts)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Conservative box/triangle overlap
    ///
    /// Checks the bounds of the triangle and the triangle's plane against
    /// the box. May report overlap for triangles that pass just outside a
    /// corner; the narrow phase rejects those.
    pub fn intersects_triangle(&self, triangle: &Triangle) -> bool {
        if !self.intersects(&triangle.bounds()) {
            return false;
        }
        if triangle.is_degenerate() {
            return true;
        }

        let plane = triangle.plane();
        let half = self.half_extents();
        let reach = half.x * plane.normal.x.abs()
            + half.y * plane.normal.y.abs()
            + half.z * plane.normal.z.abs();
        plane.signed_distance(self.center()).abs() <= reach
    }

    /// Grow into a cube around the same centre
    pub fn to_cube(&self) -> Self {
        let half = self.half_extents().max_element();
        Self::from_center_half_extents(self.center(), Vec3::splat(half))
    }
}

/// A half-line from `origin` along unit `direction`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalized(),
        }
    }

    /// Point at parameter `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
