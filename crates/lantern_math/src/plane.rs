use crate::Vec3;

/// Which side of a plane a shape lies on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaneSide {
    Back,
    Spanning,
    Front,
}

impl PlaneSide {
    /// Signed representation: -1, 0 or +1.
    pub fn sign(self) -> i32 {
        match self {
            PlaneSide::Back => -1,
            PlaneSide::Spanning => 0,
            PlaneSide::Front => 1,
        }
    }

    /// Classify a signed interval `[lo, hi]` of distances to the plane.
    pub fn from_range(lo: f32, hi: f32) -> Self {
        if lo >= 0.0 {
            PlaneSide::Front
        } else if hi <= 0.0 {
            PlaneSide::Back
        } else {
            PlaneSide::Spanning
        }
    }
}

/// A plane `normal . p = distance`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Plane through `point` along the given axis, facing +axis.
    pub fn axis_aligned(axis: usize, point: f32) -> Self {
        let mut normal = Vec3::ZERO;
        normal[axis] = 1.0;
        Self::new(normal, point)
    }

    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self::new(normal, normal.dot(point))
    }

    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) - self.distance
    }

    /// Classify a set of points against the plane.
    pub fn classify_points(&self, points: &[Vec3]) -> PlaneSide {
        let (lo, hi) = points.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &p| {
                let d = self.signed_distance(p);
                (lo.min(d), hi.max(d))
            },
        );
        PlaneSide::from_range(lo, hi)
    }
}
