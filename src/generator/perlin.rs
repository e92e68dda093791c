//! Seeded 3D gradient noise
//!
//! Classic improved Perlin noise, except the permutation table is shuffled
//! from a ChaCha8 stream so each seed yields an independent noise field.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// 3D Perlin noise source with a seed-dependent permutation table
#[derive(Clone)]
pub struct Perlin {
    // doubled so corner lookups never need wrapping
    perm: [u8; 512],
}

impl std::fmt::Debug for Perlin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Perlin").finish_non_exhaustive()
    }
}

impl Perlin {
    /// Build the permutation table for `seed`
    pub fn new(seed: u32) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        table.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    #[inline]
    fn hash(&self, x: usize, y: usize, z: usize) -> u8 {
        let a = self.perm[x] as usize + y;
        let b = self.perm[a] as usize + z;
        self.perm[b]
    }

    /// Sample raw noise at `pos`, roughly in [-1, 1]
    pub fn noise(&self, pos: Vec3) -> f32 {
        let floor = pos.floor();
        let x0 = (floor.x as i32 & 255) as usize;
        let y0 = (floor.y as i32 & 255) as usize;
        let z0 = (floor.z as i32 & 255) as usize;

        let f = pos - floor;
        let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));

        let corner = |dx: usize, dy: usize, dz: usize| {
            let h = self.hash(x0 + dx, y0 + dy, z0 + dz);
            gradient(h, f.x - dx as f32, f.y - dy as f32, f.z - dz as f32)
        };

        let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), u);
        let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), u);
        let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), u);
        let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), u);

        lerp(lerp(x00, x10, v), lerp(x01, x11, v), w)
    }

    /// Fractal Brownian motion: `octaves` layers of noise, normalized to ~[-1, 1]
    pub fn fbm(&self, pos: Vec3, octaves: usize, persistence: f32, lacunarity: f32) -> f32 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.noise(pos * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        if max_value > 0.0 {
            total / max_value
        } else {
            0.0
        }
    }
}

/// Dot product with one of the 12 cube-edge gradient directions
#[inline]
fn gradient(hash: u8, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// 6t⁵ - 15t⁴ + 10t³
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}
