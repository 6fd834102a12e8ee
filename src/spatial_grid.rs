//! Integer-lattice hash map keyed by Z-order (Morton) codes.
//!
//! Used to deduplicate isosurface vertices per grid cell, to store edge crossings
//! per grid edge, and to bucket vertex positions while welding. Iteration order is
//! unspecified, but it is deterministic for a given insertion sequence because the
//! hasher carries no random seed.

use hashbrown::HashMap;
use std::hash::{BuildHasherDefault, Hash, Hasher};

/// A cell (or lattice point) of an integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct GridKey(pub [i32; 3]);

impl GridKey {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        GridKey([x, y, z])
    }

    /// The key moved by `delta` along `axis`.
    #[inline]
    pub const fn offset(self, axis: usize, delta: i32) -> Self {
        let mut k = self.0;
        k[axis] += delta;
        GridKey(k)
    }

    #[inline]
    pub const fn morton(&self) -> u64 {
        morton3(self.0[0], self.0[1], self.0[2])
    }
}

impl From<[i32; 3]> for GridKey {
    fn from(k: [i32; 3]) -> Self {
        GridKey(k)
    }
}

impl Hash for GridKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.morton());
    }
}

/// Spread the low 21 bits of `x` so that two zero bits follow each input bit.
#[inline]
pub const fn expand_bits(x: u64) -> u64 {
    let mut x = x & 0x1f_ffff;
    x = (x | (x << 32)) & 0x001f_0000_0000_ffff;
    x = (x | (x << 16)) & 0x001f_0000_ff00_00ff;
    x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x << 2)) & 0x1249_2492_4924_9249;
    x
}

/// Interleave the low 21 bits of three coordinates (x in bit 0, y in bit 1, z in bit 2).
/// Negative coordinates contribute their two's-complement bits.
#[inline]
pub const fn morton3(x: i32, y: i32, z: i32) -> u64 {
    expand_bits(x as u32 as u64)
        | (expand_bits(y as u32 as u64) << 1)
        | (expand_bits(z as u32 as u64) << 2)
}

/// Hasher for [`GridKey`]: takes the Morton code written by `GridKey::hash` and
/// multiplies it so hashbrown's control bytes, which read the top bits, vary too.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZOrderHasher(u64);

impl Hasher for ZOrderHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0.wrapping_mul(0x9e37_79b9_7f4a_7c15)
    }

    #[inline]
    fn write_u64(&mut self, code: u64) {
        self.0 = self.0.rotate_left(21) ^ code;
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ b as u64;
        }
    }
}

pub type ZOrderBuildHasher = BuildHasherDefault<ZOrderHasher>;

/// Map from grid cells to values.
pub type SpatialGrid<V> = HashMap<GridKey, V, ZOrderBuildHasher>;
