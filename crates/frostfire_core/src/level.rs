//! Level geometry
//!
//! Levels are RON files listing solids (boxes, ramps, loose triangles) that
//! are triangulated into the octree the player collides with and shoots at.

use std::fs;
use std::io;
use std::path::Path;

use frostfire_math::Vec3;
use frostfire_physics::{Octree, Triangle};
use serde::{Serialize, Deserialize};

use crate::error::{LevelLoadError, LevelSaveError};

fn default_spawn() -> Vec3 {
    Vec3::new(0.0, 1.0, 0.0)
}

/// One piece of static level geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Solid {
    /// Axis-aligned box with outward-facing sides
    Box { center: Vec3, half_extents: Vec3 },
    /// Flat quad from `start` to `end` (centre lines), facing up
    Ramp { start: Vec3, end: Vec3, width: f32 },
    /// A single triangle, counter-clockwise seen from its front
    Triangle { a: Vec3, b: Vec3, c: Vec3 },
}

impl Solid {
    pub fn cuboid(center: Vec3, half_extents: Vec3) -> Self {
        Solid::Box { center, half_extents }
    }

    /// Append this solid's triangles to `out`
    pub fn triangulate(&self, out: &mut Vec<Triangle>) {
        match *self {
            Solid::Box { center, half_extents } => box_triangles(center, half_extents, out),
            Solid::Ramp { start, end, width } => {
                let along = end - start;
                let across = along.cross(Vec3::Y).normalized() * (width * 0.5);
                let mut tris = quad(start - across, start + across, end + across, end - across);
                for tri in &mut tris {
                    if tri.normal().y < 0.0 {
                        std::mem::swap(&mut tri.b, &mut tri.c);
                    }
                }
                out.extend(tris);
            }
            Solid::Triangle { a, b, c } => out.push(Triangle::new(a, b, c)),
        }
    }
}

fn quad(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> [Triangle; 2] {
    [Triangle::new(p0, p1, p2), Triangle::new(p0, p2, p3)]
}

fn box_triangles(center: Vec3, half: Vec3, out: &mut Vec<Triangle>) {
    let min = center - half;
    let max = center + half;
    let (x0, y0, z0) = (min.x, min.y, min.z);
    let (x1, y1, z1) = (max.x, max.y, max.z);
    let v = Vec3::new;

    // Each face counter-clockwise seen from outside
    out.extend(quad(v(x0, y1, z0), v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0))); // +Y
    out.extend(quad(v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1))); // -Y
    out.extend(quad(v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1), v(x1, y0, z1))); // +X
    out.extend(quad(v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0))); // -X
    out.extend(quad(v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1))); // +Z
    out.extend(quad(v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0), v(x1, y0, z0))); // -Z
}

/// A serializable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Level name (for display/debugging)
    pub name: String,
    /// Where the bottom of the player capsule starts
    #[serde(default = "default_spawn")]
    pub spawn: Vec3,
    /// Static geometry
    #[serde(default)]
    pub solids: Vec<Solid>,
}

impl Level {
    /// Create a new empty level
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spawn: default_spawn(),
            solids: Vec::new(),
        }
    }

    /// Builder: add a solid
    pub fn with_solid(mut self, solid: Solid) -> Self {
        self.solids.push(solid);
        self
    }

    /// Builder: set the spawn point
    pub fn with_spawn(mut self, spawn: Vec3) -> Self {
        self.spawn = spawn;
        self
    }

    /// The built-in frozen arena
    ///
    /// A walled floor with a few crates, a raised ledge and a ramp up to it.
    pub fn arena() -> Self {
        Level::new("Frozen Arena")
            // Floor, top face at y = 0
            .with_solid(Solid::cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(40.0, 0.5, 40.0)))
            // Perimeter walls
            .with_solid(Solid::cuboid(Vec3::new(0.0, 4.0, -40.5), Vec3::new(40.0, 4.0, 0.5)))
            .with_solid(Solid::cuboid(Vec3::new(0.0, 4.0, 40.5), Vec3::new(40.0, 4.0, 0.5)))
            .with_solid(Solid::cuboid(Vec3::new(-40.5, 4.0, 0.0), Vec3::new(0.5, 4.0, 40.0)))
            .with_solid(Solid::cuboid(Vec3::new(40.5, 4.0, 0.0), Vec3::new(0.5, 4.0, 40.0)))
            // Crates
            .with_solid(Solid::cuboid(Vec3::new(-8.0, 1.0, -6.0), Vec3::new(1.0, 1.0, 1.0)))
            .with_solid(Solid::cuboid(Vec3::new(9.0, 1.5, -12.0), Vec3::new(1.5, 1.5, 1.5)))
            .with_solid(Solid::cuboid(Vec3::new(-14.0, 0.75, 10.0), Vec3::new(2.0, 0.75, 2.0)))
            // Ledge along the back wall and the ramp up to it
            .with_solid(Solid::cuboid(Vec3::new(0.0, 1.5, -36.0), Vec3::new(12.0, 1.5, 4.0)))
            .with_solid(Solid::Ramp {
                start: Vec3::new(0.0, 0.0, -20.0),
                end: Vec3::new(0.0, 3.0, -32.0),
                width: 6.0,
            })
    }

    /// Load a level from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LevelLoadError> {
        let contents = fs::read_to_string(path)?;
        let level = ron::from_str(&contents)?;
        Ok(level)
    }

    /// Load a level, falling back to [`Level::arena`] when the file is missing
    ///
    /// Parse errors and other IO errors are still returned.
    pub fn load_or_arena<P: AsRef<Path>>(path: P) -> Result<Self, LevelLoadError> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(level) => {
                log::info!("Loaded level '{}' from {}", level.name, path.display());
                Ok(level)
            }
            Err(LevelLoadError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("Level file {} not found, using built-in arena", path.display());
                Ok(Self::arena())
            }
            Err(e) => Err(e),
        }
    }

    /// Save a level to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LevelSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// All solids as triangles
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut out = Vec::new();
        for solid in &self.solids {
            solid.triangulate(&mut out);
        }
        out
    }

    /// Build the collision octree for this level
    pub fn to_octree(&self) -> Octree {
        Octree::from_triangles(self.triangles())
    }
}
