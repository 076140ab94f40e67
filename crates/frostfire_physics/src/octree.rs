//! Octree collision mesh
//!
//! Static world triangles are partitioned into an octree so capsule and ray
//! queries only visit nearby geometry. A triangle overlapping several cells
//! is stored in each of them; queries deduplicate.

use frostfire_math::Vec3;

use crate::collision::{ray_vs_aabb, ray_vs_triangle, resolve_capsule, CollisionMesh, Contact, RayCast, RayHit};
use crate::shapes::{Aabb, Capsule, Ray, Triangle};

/// Nodes holding more triangles than this are split
pub const TRIANGLES_PER_LEAF: usize = 8;
/// Nodes at this depth are never split
pub const MAX_DEPTH: u32 = 16;

/// Padding added around the triangle bounds before building
const BOUNDS_PADDING: f32 = 0.01;

#[derive(Clone, Debug)]
struct Node {
    bounds: Aabb,
    /// Indices into `Octree::triangles`; only filled for leaves
    triangles: Vec<usize>,
    children: Vec<Node>,
}

impl Node {
    fn leaf(bounds: Aabb, triangles: Vec<usize>) -> Self {
        Self {
            bounds,
            triangles,
            children: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn split(&mut self, all: &[Triangle], depth: u32) {
        if self.triangles.len() <= TRIANGLES_PER_LEAF || depth >= MAX_DEPTH {
            return;
        }

        let half = self.bounds.half_extents();

        for octant in 0..8 {
            let offset = Vec3::new(
                if octant & 1 == 0 { 0.0 } else { half.x },
                if octant & 2 == 0 { 0.0 } else { half.y },
                if octant & 4 == 0 { 0.0 } else { half.z },
            );
            let min = self.bounds.min + offset;
            let child_bounds = Aabb::new(min, min + half);

            let contained: Vec<usize> = self
                .triangles
                .iter()
                .copied()
                .filter(|&i| child_bounds.intersects_triangle(&all[i]))
                .collect();

            // Empty cells are dropped
            if !contained.is_empty() {
                let mut child = Node::leaf(child_bounds, contained);
                child.split(all, depth + 1);
                self.children.push(child);
            }
        }

        self.triangles.clear();
    }

    fn collect_capsule_candidates(&self, query: &Aabb, seen: &mut [bool], out: &mut Vec<usize>) {
        if !self.bounds.intersects(query) {
            return;
        }

        if self.is_leaf() {
            for &i in &self.triangles {
                if !seen[i] {
                    seen[i] = true;
                    out.push(i);
                }
            }
            return;
        }

        for child in &self.children {
            child.collect_capsule_candidates(query, seen, out);
        }
    }

    fn nearest_ray_hit(&self, ray: &Ray, all: &[Triangle], best: &mut Option<RayHit>) {
        let Some(entry) = ray_vs_aabb(ray, &self.bounds) else {
            return;
        };
        if let Some(current) = best {
            if entry.distance > current.distance {
                return;
            }
        }

        if self.is_leaf() {
            for &i in &self.triangles {
                if let Some(hit) = ray_vs_triangle(ray, &all[i]) {
                    if best.map_or(true, |b| hit.distance < b.distance) {
                        *best = Some(hit);
                    }
                }
            }
            return;
        }

        for child in &self.children {
            child.nearest_ray_hit(ray, all, best);
        }
    }

    fn visit_leaves<'a>(&'a self, out: &mut Vec<&'a Aabb>) {
        if self.is_leaf() {
            out.push(&self.bounds);
        } else {
            for child in &self.children {
                child.visit_leaves(out);
            }
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    fn depth(&self) -> u32 {
        self.children.iter().map(|c| c.depth() + 1).max().unwrap_or(0)
    }
}

/// A static triangle mesh partitioned for capsule and ray queries
#[derive(Clone, Debug)]
pub struct Octree {
    triangles: Vec<Triangle>,
    root: Option<Node>,
}

impl Octree {
    /// Build an octree over `triangles`
    ///
    /// Degenerate triangles are dropped. An empty input gives a mesh that
    /// never reports contacts.
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let triangles: Vec<Triangle> = triangles
            .into_iter()
            .filter(|t| !t.is_degenerate())
            .collect();

        if triangles.is_empty() {
            log::warn!("Building collision octree with no triangles");
            return Self { triangles, root: None };
        }

        let bounds = triangles
            .iter()
            .fold(Aabb::empty(), |acc, t| acc.union(&t.bounds()));
        let padding = Vec3::splat(BOUNDS_PADDING);
        let bounds = Aabb::new(bounds.min - padding, bounds.max + padding).to_cube();

        let mut root = Node::leaf(bounds, (0..triangles.len()).collect());
        root.split(&triangles, 0);

        log::debug!(
            "Built collision octree: {} triangles, {} nodes, depth {}",
            triangles.len(),
            root.count(),
            root.depth()
        );

        Self {
            triangles,
            root: Some(root),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Cubic bounds of the whole tree
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.as_ref().map(|r| r.bounds)
    }

    pub fn node_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::count)
    }

    /// Number of levels below the root
    pub fn depth(&self) -> u32 {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Boxes of every leaf, for the debug overlay
    pub fn leaf_bounds(&self) -> Vec<&Aabb> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.visit_leaves(&mut out);
        }
        out
    }

    /// Unique triangle indices whose cells overlap `query`
    pub fn candidates(&self, query: &Aabb) -> Vec<usize> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            let mut seen = vec![false; self.triangles.len()];
            root.collect_capsule_candidates(query, &mut seen, &mut out);
        }
        out
    }
}

impl CollisionMesh for Octree {
    fn intersect_capsule(&self, capsule: &Capsule) -> Option<Contact> {
        let candidates = self.candidates(&capsule.bounds());
        resolve_capsule(capsule, candidates.iter().map(|&i| &self.triangles[i]))
    }
}

impl RayCast for Octree {
    fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let root = self.root.as_ref()?;
        let mut best = None;
        root.nearest_ray_hit(ray, &self.triangles, &mut best);
        best
    }
}
