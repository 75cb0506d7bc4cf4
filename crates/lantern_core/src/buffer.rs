//! Frame buffer shared between render workers.
//!
//! Every channel is an `AtomicU32` holding `f32` bits, so tiles writing
//! disjoint pixels need no lock. Relaxed ordering is enough: frame
//! completion is synchronised through the job queue.

use crate::error::{SceneError, SceneResult};
use lantern_math::Vec4;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// RGBA colour plus depth, in linear space.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<AtomicU32>,
    depth: Vec<AtomicU32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> SceneResult<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidResolution { width, height });
        }
        let pixels = (width * height) as usize;

        Ok(Self {
            width,
            height,
            color: (0..pixels * 4).map(|_| AtomicU32::new(0.0f32.to_bits())).collect(),
            depth: (0..pixels)
                .map(|_| AtomicU32::new(f32::INFINITY.to_bits()))
                .collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y * self.width + x) as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Vec4 {
        let base = self.index(x, y) * 4;
        Vec4::new(
            load(&self.color[base]),
            load(&self.color[base + 1]),
            load(&self.color[base + 2]),
            load(&self.color[base + 3]),
        )
    }

    pub fn set_pixel(&self, x: u32, y: u32, value: Vec4) {
        let base = self.index(x, y) * 4;
        for (i, c) in value.to_array().into_iter().enumerate() {
            store(&self.color[base + i], c);
        }
    }

    pub fn get_depth(&self, x: u32, y: u32) -> f32 {
        load(&self.depth[self.index(x, y)])
    }

    pub fn set_depth(&self, x: u32, y: u32, depth: f32) {
        store(&self.depth[self.index(x, y)], depth);
    }

    /// Reset colour to `value` and depth to infinity.
    pub fn clear(&self, value: Vec4) {
        let channels = value.to_array();
        self.color
            .par_chunks(4)
            .for_each(|px| px.iter().zip(channels).for_each(|(a, c)| store(a, c)));
        self.depth
            .par_iter()
            .for_each(|d| store(d, f32::INFINITY));
    }

    /// Gamma-2 encoded 8-bit RGBA, row-major from the top row.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.color
            .par_chunks(4)
            .flat_map_iter(|px| {
                let [r, g, b, a] = [load(&px[0]), load(&px[1]), load(&px[2]), load(&px[3])];
                [encode(r), encode(g), encode(b), (255.0 * a.clamp(0.0, 1.0)) as u8]
            })
            .collect()
    }
}

#[inline]
fn load(cell: &AtomicU32) -> f32 {
    f32::from_bits(cell.load(Ordering::Relaxed))
}

#[inline]
fn store(cell: &AtomicU32, value: f32) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

/// Apply gamma correction (gamma = 2.0) and quantise.
#[inline]
fn encode(linear: f32) -> u8 {
    let gamma = if linear > 0.0 { linear.sqrt() } else { 0.0 };
    (255.0 * gamma.clamp(0.0, 1.0)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_resolution() {
        assert!(FrameBuffer::new(0, 10).is_err());
    }

    #[test]
    fn test_set_get_pixel() {
        let buffer = FrameBuffer::new(4, 3).unwrap();
        buffer.set_pixel(3, 2, Vec4::new(0.1, 0.2, 0.3, 1.0));

        assert_eq!(buffer.get_pixel(3, 2), Vec4::new(0.1, 0.2, 0.3, 1.0));
        assert_eq!(buffer.get_pixel(0, 0), Vec4::ZERO);
    }

    #[test]
    fn test_clear_resets_depth() {
        let buffer = FrameBuffer::new(2, 2).unwrap();
        buffer.set_pixel(1, 1, Vec4::ONE);
        buffer.set_depth(1, 1, 3.0);

        buffer.clear(Vec4::ZERO);
        assert_eq!(buffer.get_pixel(1, 1), Vec4::ZERO);
        assert!(buffer.get_depth(1, 1).is_infinite());
    }

    #[test]
    fn test_to_rgba8_gamma() {
        let buffer = FrameBuffer::new(2, 1).unwrap();
        buffer.set_pixel(0, 0, Vec4::new(0.25, 1.0, 4.0, 1.0));

        let bytes = buffer.to_rgba8();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[0..4], &[127, 255, 255, 255]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
    }
}
