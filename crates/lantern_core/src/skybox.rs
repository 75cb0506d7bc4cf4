//! Background radiance for rays that escape the scene.

use lantern_math::{Color, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Skybox {
    Solid(Color),
    /// Blend from `horizon` (looking down) to `zenith` (looking up).
    Gradient { horizon: Color, zenith: Color },
}

impl Skybox {
    pub fn sample(&self, direction: Vec3) -> Color {
        match *self {
            Skybox::Solid(color) => color,
            Skybox::Gradient { horizon, zenith } => {
                let unit_direction = direction.normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                horizon * (1.0 - a) + zenith * a
            }
        }
    }
}

impl Default for Skybox {
    /// White-to-blue sky.
    fn default() -> Self {
        Skybox::Gradient {
            horizon: Color::new(1.0, 1.0, 1.0),
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}
