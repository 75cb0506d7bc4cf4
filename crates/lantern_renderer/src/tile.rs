//! Tile decomposition of the frame buffer.
//!
//! Tiles are visited in a shuffled order so progressive refinement does not
//! show scan-line artifacts.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 16;

/// A rectangular region of the image rendered by one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// X coordinate of tile's top-left corner
    pub x: u32,
    /// Y coordinate of tile's top-left corner
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in render order
    pub index: usize,
}

impl Tile {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// The `i`th pixel in row-major order.
    pub fn pixel(&self, i: u32) -> (u32, u32) {
        (self.x + i % self.width, self.y + i / self.width)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Cover a `width` x `height` image with tiles, clipping the last row and column.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<Tile> {
    let tile_size = tile_size.max(1);
    let mut tiles = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let tw = tile_size.min(width - x);
            let th = tile_size.min(height - y);
            tiles.push(Tile::new(x, y, tw, th, tiles.len()));
            x += tile_size;
        }
        y += tile_size;
    }

    tiles
}

/// Deterministically permute tiles and renumber them in the new order.
pub fn shuffle_tiles(tiles: &mut [Tile], seed: u64) {
    let mut rng = Pcg32::seed_from_u64(seed);
    tiles.shuffle(&mut rng);
    for (i, tile) in tiles.iter_mut().enumerate() {
        tile.index = i;
    }
}
