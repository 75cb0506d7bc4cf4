//! Geometric primitives.
//!
//! Each shape implements `Spatial` directly; `Primitive` is the closed set the
//! scene tree stores, dispatched by `match`.

mod plane;
mod quad;
mod sphere;
mod triangle;

pub use plane::InfinitePlane;
pub use quad::Quad;
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::hit::{RaycastHit, Spatial};
use lantern_math::{Aabb, Interval, Mat4, Plane, PlaneSide, Ray};

/// A renderable shape.
#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere(Sphere),
    Plane(InfinitePlane),
    Triangle(Triangle),
    Quad(Quad),
}

impl Primitive {
    /// Apply a world transform to the geometry and its bounds.
    pub fn transform(&mut self, matrix: &Mat4) {
        match self {
            Primitive::Sphere(s) => s.transform(matrix),
            Primitive::Plane(p) => p.transform(matrix),
            Primitive::Triangle(t) => t.transform(matrix),
            Primitive::Quad(q) => q.transform(matrix),
        }
    }

    /// Zero-area shapes cannot be hit and are rejected by the scene.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Primitive::Triangle(t) => t.is_degenerate(),
            Primitive::Quad(q) => q.is_degenerate(),
            Primitive::Sphere(s) => s.radius() <= 0.0,
            Primitive::Plane(_) => false,
        }
    }
}

impl Spatial for Primitive {
    fn bounds(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounds(),
            Primitive::Plane(p) => p.bounds(),
            Primitive::Triangle(t) => t.bounds(),
            Primitive::Quad(q) => q.bounds(),
        }
    }

    fn side_of_plane(&self, plane: &Plane) -> PlaneSide {
        match self {
            Primitive::Sphere(s) => s.side_of_plane(plane),
            Primitive::Plane(p) => p.side_of_plane(plane),
            Primitive::Triangle(t) => t.side_of_plane(plane),
            Primitive::Quad(q) => q.side_of_plane(plane),
        }
    }

    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
        match self {
            Primitive::Sphere(s) => s.intersect_ray(ray, ray_t),
            Primitive::Plane(p) => p.intersect_ray(ray, ray_t),
            Primitive::Triangle(t) => t.intersect_ray(ray, ray_t),
            Primitive::Quad(q) => q.intersect_ray(ray, ray_t),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(s: Sphere) -> Self {
        Primitive::Sphere(s)
    }
}

impl From<InfinitePlane> for Primitive {
    fn from(p: InfinitePlane) -> Self {
        Primitive::Plane(p)
    }
}

impl From<Triangle> for Primitive {
    fn from(t: Triangle) -> Self {
        Primitive::Triangle(t)
    }
}

impl From<Quad> for Primitive {
    fn from(q: Quad) -> Self {
        Primitive::Quad(q)
    }
}
