//! Scene lights.

use lantern_math::{Color, Vec3};

/// Distance falloff `1 / (constant + linear*d + quadratic*d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// No falloff.
    pub const NONE: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    /// Physically based inverse-square falloff.
    pub const INVERSE_SQUARE: Attenuation = Attenuation {
        constant: 0.0,
        linear: 0.0,
        quadratic: 1.0,
    };

    pub fn factor(&self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        if denom > 0.0 {
            1.0 / denom
        } else {
            0.0
        }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Attenuation::INVERSE_SQUARE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Point,
    /// Cone light; `inner`/`outer` are cosines of the cone half-angles.
    Spot {
        direction: Vec3,
        inner: f32,
        outer: f32,
    },
    /// Infinitely distant light shining along `direction`.
    Directional { direction: Vec3 },
}

/// Incident light at a shading point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit vector from the shading point toward the light
    pub direction: Vec3,
    /// Distance to the light; infinite for directional lights
    pub distance: f32,
    pub radiance: Color,
}

#[derive(Debug, Clone)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub attenuation: Attenuation,
    pub enabled: bool,
}

impl Light {
    pub fn point(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            position,
            color,
            intensity,
            attenuation: Attenuation::default(),
            enabled: true,
        }
    }

    pub fn spot(position: Vec3, direction: Vec3, inner_angle: f32, outer_angle: f32) -> Self {
        Self {
            kind: LightKind::Spot {
                direction: direction.normalize(),
                inner: inner_angle.to_radians().cos(),
                outer: outer_angle.to_radians().cos(),
            },
            position,
            color: Color::ONE,
            intensity: 1.0,
            attenuation: Attenuation::default(),
            enabled: true,
        }
    }

    pub fn directional(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize(),
            },
            position: Vec3::ZERO,
            color,
            intensity,
            attenuation: Attenuation::NONE,
            enabled: true,
        }
    }

    pub fn with_color(mut self, color: Color, intensity: f32) -> Self {
        self.color = color;
        self.intensity = intensity;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Light arriving at `point`, or `None` when disabled or outside a spot cone.
    pub fn illuminate(&self, point: Vec3) -> Option<LightSample> {
        if !self.enabled {
            return None;
        }
        let emitted = self.color * self.intensity;

        let sample = match self.kind {
            LightKind::Directional { direction } => LightSample {
                direction: -direction,
                distance: f32::INFINITY,
                radiance: emitted,
            },
            LightKind::Point => {
                let (direction, distance) = Self::toward(self.position, point)?;
                LightSample {
                    direction,
                    distance,
                    radiance: emitted * self.attenuation.factor(distance),
                }
            }
            LightKind::Spot {
                direction: axis,
                inner,
                outer,
            } => {
                let (direction, distance) = Self::toward(self.position, point)?;
                let cos_angle = (-direction).dot(axis);
                let cone = smoothstep(outer, inner, cos_angle);
                if cone <= 0.0 {
                    return None;
                }
                LightSample {
                    direction,
                    distance,
                    radiance: emitted * self.attenuation.factor(distance) * cone,
                }
            }
        };

        (sample.radiance.max_element() > 0.0).then_some(sample)
    }

    fn toward(position: Vec3, point: Vec3) -> Option<(Vec3, f32)> {
        let to_light = position - point;
        let distance = to_light.length();
        (distance > 0.0).then(|| (to_light / distance, distance))
    }
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x >= edge0 { 1.0 } else { 0.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
