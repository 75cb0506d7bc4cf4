//! Parallelogram made of two triangles.

use super::Triangle;
use crate::hit::{RaycastHit, Spatial};
use lantern_math::{Aabb, Interval, Mat4, Plane, PlaneSide, Ray, Vec2, Vec3};

/// A quad spanned by `corner`, `corner + u` and `corner + v`.
#[derive(Debug, Clone)]
pub struct Quad {
    halves: [Triangle; 2],
}

impl Quad {
    pub fn new(corner: Vec3, u: Vec3, v: Vec3) -> Self {
        Self {
            halves: [
                Triangle::new(corner, corner + u, corner + u + v),
                Triangle::new(corner, corner + u + v, corner + v),
            ],
        }
    }

    /// Axis-aligned rectangle at `offset` along `axis`, covering `min..max`
    /// in the two remaining axes (taken in cyclic order).
    pub fn axis_aligned(axis: usize, offset: f32, min: Vec2, max: Vec2) -> Self {
        let (a, b) = ((axis + 1) % 3, (axis + 2) % 3);
        let mut corner = Vec3::ZERO;
        corner[axis] = offset;
        corner[a] = min.x;
        corner[b] = min.y;

        let mut u = Vec3::ZERO;
        u[a] = max.x - min.x;
        let mut v = Vec3::ZERO;
        v[b] = max.y - min.y;

        Self::new(corner, u, v)
    }

    pub fn corners(&self) -> [Vec3; 4] {
        let [c0, c1, c2] = *self.halves[0].vertices();
        [c0, c1, c2, self.halves[1].vertices()[2]]
    }

    pub fn is_degenerate(&self) -> bool {
        self.halves.iter().all(Triangle::is_degenerate)
    }

    pub fn transform(&mut self, matrix: &Mat4) {
        for half in &mut self.halves {
            half.transform(matrix);
        }
    }
}

impl Spatial for Quad {
    fn bounds(&self) -> Aabb {
        self.halves[0].bounds().union(&self.halves[1].bounds())
    }

    fn side_of_plane(&self, plane: &Plane) -> PlaneSide {
        plane.classify_points(&self.corners())
    }

    fn intersect_ray(&self, ray: &Ray, ray_t: Interval) -> Option<RaycastHit> {
        let first = self.halves[0].intersect_ray(ray, ray_t);
        let second = self.halves[1].intersect_ray(ray, ray_t);
        RaycastHit::closest(first, second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_floor() {
        let floor = Quad::axis_aligned(1, 0.0, Vec2::splat(-1.0), Vec2::splat(1.0));
        let bounds = floor.bounds();

        assert!((bounds.min.x + 1.0).abs() < 1e-3 && (bounds.max.x - 1.0).abs() < 1e-3);
        assert!((bounds.min.z + 1.0).abs() < 1e-3 && (bounds.max.z - 1.0).abs() < 1e-3);
        assert!(bounds.extent().y < 1e-3);
    }

    #[test]
    fn test_quad_hits_both_halves() {
        let quad = Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y);
        let t = Interval::new(0.0, 10.0);

        for p in [Vec2::new(0.8, 0.1), Vec2::new(0.1, 0.8), Vec2::new(0.5, 0.5)] {
            let ray = Ray::new(Vec3::new(p.x, p.y, 2.0), -Vec3::Z);
            let hit = quad.intersect_ray(&ray, t).unwrap();
            assert!((hit.distance - 2.0).abs() < 1e-5);
        }

        let outside = Ray::new(Vec3::new(1.5, 0.5, 2.0), -Vec3::Z);
        assert!(quad.intersect_ray(&outside, t).is_none());
    }

    #[test]
    fn test_quad_side_of_plane() {
        let quad = Quad::new(Vec3::new(2.0, 0.0, 0.0), Vec3::X, Vec3::Y);

        assert_eq!(quad.side_of_plane(&Plane::axis_aligned(0, 1.0)), PlaneSide::Front);
        assert_eq!(quad.side_of_plane(&Plane::axis_aligned(0, 2.5)), PlaneSide::Spanning);
    }
}
