//! Microfacet shadowing-masking terms.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, EnumVariantNames};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumVariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeometryTerm {
    /// `G = (n.l)(n.v)`
    Implicit,
    /// V-cavity model
    CookTorrance,
    /// Schlick's approximation of Smith with `k = roughness^2 / 2`
    SmithSchlick,
    /// Separable Smith for GGX with `alpha^2 = roughness^3`
    #[default]
    SmithGgx,
}

impl GeometryTerm {
    /// Evaluate `G` for already-clamped positive cosines.
    pub fn evaluate(self, n_dot_l: f32, n_dot_v: f32, n_dot_h: f32, v_dot_h: f32, roughness: f32) -> f32 {
        let g = match self {
            GeometryTerm::Implicit => n_dot_l * n_dot_v,
            GeometryTerm::CookTorrance => {
                if v_dot_h <= 0.0 {
                    return 0.0;
                }
                let masking = 2.0 * n_dot_h * n_dot_v / v_dot_h;
                let shadowing = 2.0 * n_dot_h * n_dot_l / v_dot_h;
                masking.min(shadowing).min(1.0)
            }
            GeometryTerm::SmithSchlick => {
                let k = roughness * roughness * 0.5;
                let g1 = |x: f32| x / (x * (1.0 - k) + k);
                g1(n_dot_l) * g1(n_dot_v)
            }
            GeometryTerm::SmithGgx => {
                let a2 = roughness * roughness * roughness;
                let g1 = |x: f32| 2.0 * x / (x + (a2 + (1.0 - a2) * x * x).sqrt());
                g1(n_dot_l) * g1(n_dot_v)
            }
        };
        g.clamp(0.0, 1.0)
    }
}
