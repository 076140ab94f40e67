//! Narrow-phase collision detection
//!
//! Capsule-vs-triangle for the character, ray-vs-triangle and ray-vs-box for
//! hit queries, and the two traits world meshes implement.

use frostfire_math::Vec3;

use crate::shapes::{Aabb, Capsule, Ray, Triangle};

/// Segments closer to parallel than this are handled as parallel
const PARALLEL_EPSILON: f32 = 1e-10;

/// Result of a capsule query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Unit direction that separates the capsule from the surface
    pub normal: Vec3,
    /// How far along `normal` the capsule must move to stop overlapping
    pub depth: f32,
}

impl Contact {
    pub fn new(normal: Vec3, depth: f32) -> Self {
        Self { normal, depth }
    }

    /// Check if this contact represents an actual collision
    pub fn is_colliding(&self) -> bool {
        self.depth > 0.0
    }

    /// Offset that resolves the contact
    pub fn push(&self) -> Vec3 {
        self.normal * self.depth
    }
}

/// Result of a ray query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at the hit, facing the ray origin
    pub normal: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

/// A static world that can push a capsule out of itself
pub trait CollisionMesh {
    /// Net separation for `capsule`, or `None` when nothing overlaps
    fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact>;
}

/// Anything a ray can hit
pub trait RayCast {
    /// Nearest hit along `ray`, or `None` on a miss
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit>;
}

/// Closest points between segments `a0..a1` and `b0..b1`
///
/// Returns `(on_a, on_b)`. Parallel segments pick whichever end of `a`
/// gives the more central point on `b`.
pub fn closest_points_between_segments(a0: Vec3, a1: Vec3, b0: Vec3, b1: Vec3) -> (Vec3, Vec3) {
    let r = a1 - a0;
    let s = b1 - b0;
    let w = b0 - a0;

    let a = r.dot(s);
    let b = r.dot(r);
    let c = s.dot(s);
    let d = s.dot(w);
    let e = r.dot(w);

    // Degenerate edge: treat it as a point
    if c == 0.0 {
        let t1 = if b == 0.0 { 0.0 } else { (e / b).clamp(0.0, 1.0) };
        return (a0 + r * t1, b0);
    }

    let divisor = b * c - a * a;
    let (t1, t2) = if divisor.abs() < PARALLEL_EPSILON {
        let d1 = -d / c;
        let d2 = (a - d) / c;
        if (d1 - 0.5).abs() < (d2 - 0.5).abs() {
            (0.0, d1)
        } else {
            (1.0, d2)
        }
    } else {
        let t1 = (d * a + e * c) / divisor;
        (t1, (t1 * a - d) / c)
    };

    let t1 = t1.clamp(0.0, 1.0);
    let t2 = t2.clamp(0.0, 1.0);
    (a0 + r * t1, b0 + s * t2)
}

/// Test a capsule against a single triangle
///
/// Returns the separating normal and penetration depth, or `None` when the
/// capsule is entirely on one side of the triangle's plane or misses the
/// triangle and all three of its edges.
pub fn capsule_vs_triangle(capsule: &Capsule, triangle: &Triangle) -> Option<Contact> {
    let plane = triangle.plane();
    let r = capsule.radius;

    let d1 = plane.signed_distance(capsule.start) - r;
    let d2 = plane.signed_distance(capsule.end) - r;

    if (d1 > 0.0 && d2 > 0.0) || (d1 < -r && d2 < -r) {
        return None;
    }

    // Where the axis crosses the plane, pulled back by the radius
    let sum = d1.abs() + d2.abs();
    let delta = if sum > 0.0 { (d1 / sum).abs() } else { 0.0 };
    let point = capsule.start.lerp(capsule.end, delta);

    if triangle.contains_point(point) {
        return Some(Contact::new(plane.normal, d1.min(d2).abs()));
    }

    let r2 = r * r;
    for (e0, e1) in triangle.edges() {
        let (on_axis, on_edge) = closest_points_between_segments(capsule.start, capsule.end, e0, e1);
        let dist2 = on_axis.distance_squared(on_edge);
        if dist2 < r2 {
            let dist = dist2.sqrt();
            return Some(Contact::new((on_axis - on_edge).normalized(), r - dist));
        }
    }

    None
}

/// Resolve a capsule against triangles one at a time
///
/// Each hit moves a scratch copy of the capsule out before the next
/// triangle is tested. The returned contact is the net displacement of the
/// copy. Shared by every [`CollisionMesh`] in this crate.
pub fn resolve_capsule<'a, I>(capsule: &Capsule, triangles: I) -> Option<Contact>
where
    I: IntoIterator<Item = &'a Triangle>,
{
    let mut scratch = *capsule;
    let mut hit = false;

    for triangle in triangles {
        if let Some(contact) = capsule_vs_triangle(&scratch, triangle) {
            hit = true;
            scratch.translate(contact.push());
        }
    }

    if !hit {
        return None;
    }

    let offset = scratch.center() - capsule.center();
    Some(Contact::new(offset.normalized(), offset.length()))
}

/// Ray against a triangle (Moller-Trumbore), both faces
///
/// The reported normal is flipped to face the ray origin.
pub fn ray_vs_triangle(ray: &Ray, triangle: &Triangle) -> Option<RayHit> {
    const EPSILON: f32 = 1e-7;

    let edge1 = triangle.b - triangle.a;
    let edge2 = triangle.c - triangle.a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let t_vec = ray.origin - triangle.a;
    let u = t_vec.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = t_vec.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(q) * inv_det;
    if t < 0.0 {
        return None;
    }

    let mut normal = triangle.normal();
    if normal.dot(ray.direction) > 0.0 {
        normal = -normal;
    }

    Some(RayHit {
        point: ray.at(t),
        normal,
        distance: t,
    })
}

/// Ray against an axis-aligned box (slab test)
///
/// A ray starting inside the box hits at distance zero with the normal
/// facing back along the ray.
pub fn ray_vs_aabb(ray: &Ray, aabb: &Aabb) -> Option<RayHit> {
    let origin = ray.origin.to_array();
    let dir = ray.direction.to_array();
    let min = aabb.min.to_array();
    let max = aabb.max.to_array();

    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut near_axis = 0;

    for axis in 0..3 {
        if dir[axis].abs() < f32::EPSILON {
            if origin[axis] < min[axis] || origin[axis] > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir[axis];
        let mut t0 = (min[axis] - origin[axis]) * inv;
        let mut t1 = (max[axis] - origin[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if t0 > t_near {
            t_near = t0;
            near_axis = axis;
        }
        t_far = t_far.min(t1);

        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }

    if t_near < 0.0 {
        return Some(RayHit {
            point: ray.origin,
            normal: -ray.direction,
            distance: 0.0,
        });
    }

    let mut normal = [0.0; 3];
    normal[near_axis] = -dir[near_axis].signum();

    Some(RayHit {
        point: ray.at(t_near),
        normal: Vec3::from(normal),
        distance: t_near,
    })
}

/// Brute-force mesh: every triangle is a candidate
impl CollisionMesh for [Triangle] {
    fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        resolve_capsule(capsule, self.iter())
    }
}

impl RayCast for [Triangle] {
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        self.iter()
            .filter_map(|t| ray_vs_triangle(ray, t))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

impl RayCast for Aabb {
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        ray_vs_aabb(ray, self)
    }
}
