//! In-memory textures.

use lantern_math::{Color, Vec2};

/// A texture with pixel data.
///
/// Stores pixels in linear RGBA float format, row-major, top row first.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 4]>,
    pub name: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, name: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            name: name.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self::new(1, 1, vec![[color.x, color.y, color.z, 1.0]], "<solid>")
    }

    /// Checkerboard with `cells` squares per side.
    pub fn checker(size: u32, cells: u32, a: Color, b: Color) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                let c = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                [c.x, c.y, c.z, 1.0]
            })
            .collect();
        Self::new(size, size, pixels, "<checker>")
    }

    /// Nearest-neighbour lookup with wrapping; `(0, 0)` is bottom-left.
    pub fn sample(&self, uv: Vec2) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::ZERO;
        }
        let u = uv.x.rem_euclid(1.0);
        let v = uv.y.rem_euclid(1.0);

        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        // Flip V for image coordinates
        let y = (((1.0 - v) * self.height as f32) as u32).min(self.height - 1);

        let [r, g, b, _] = self.get_pixel(x, y);
        Color::new(r, g, b)
    }

    /// Get pixel at integer coordinates.
    pub fn get_pixel(&self, x: u32, y: u32) -> [f32; 4] {
        let idx = (y * self.width + x) as usize;
        self.pixels
            .get(idx)
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }
}
