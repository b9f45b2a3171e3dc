//! Improved gradient noise (Perlin 2002) with optional lattice periodicity.
//!
//! Output is signed and clamped to `[-1, 1]`; it is exactly zero on integer
//! lattice points. The fade curve `6t⁵ - 15t⁴ + 10t³` keeps the field C²
//! across cell boundaries.
//!
//! The hash is a fixed 256-entry permutation, so the lattice always repeats
//! every 256 cells. A [`Period`] narrows that to any smaller power of two by
//! masking lattice coordinates before hashing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::TexelError;

/// Ken Perlin's reference permutation.
const PERM: [u8; 256] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Per-axis lattice period for tiling noise.
///
/// Each component is a power of two in `[1, 256]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    x: u32,
    y: u32,
    z: u32,
}

impl Period {
    /// Largest period; equal to the permutation table size.
    pub const MAX: u32 = 256;

    /// Build a period, rejecting components that are not powers of two in `[1, 256]`.
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self, TexelError> {
        for v in [x, y, z] {
            if !v.is_power_of_two() || v > Self::MAX {
                return Err(TexelError::InvalidArgument(
                    "noise period must be a power of two in [1, 256]",
                ));
            }
        }
        Ok(Self { x, y, z })
    }

    /// Same period on all three axes.
    pub fn uniform(period: u32) -> Result<Self, TexelError> {
        Self::new(period, period, period)
    }

    /// Period components as `[x, y, z]`.
    pub fn get(self) -> [u32; 3] {
        [self.x, self.y, self.z]
    }

    /// Multiply every component by `factor`, saturating at [`Period::MAX`].
    /// `factor` must itself be a power of two for the result to stay valid.
    pub(crate) fn scaled(self, factor: u32) -> Self {
        let s = |v: u32| v.saturating_mul(factor).min(Self::MAX);
        Self { x: s(self.x), y: s(self.y), z: s(self.z) }
    }

    fn mask(self) -> [i32; 3] {
        [self.x as i32 - 1, self.y as i32 - 1, self.z as i32 - 1]
    }
}

/// Gradient noise at `p`, signed in `[-1, 1]`.
///
/// Deterministic: equal inputs give bit-identical outputs. With a period,
/// `noise(p + period) == noise(p)` up to float rounding of `p + period`.
pub fn noise(p: Vec3, period: Option<Period>) -> f32 {
    noise_seeded(p, period, 0)
}

/// [`noise`] with the hash offset by `seed`, giving an independent field.
pub fn noise_seeded(p: Vec3, period: Option<Period>, seed: u8) -> f32 {
    let [mx, my, mz] = period.map_or([255; 3], Period::mask);

    let cell = p.floor();
    let f = p - cell;
    let (x0, y0, z0) = (cell.x as i32, cell.y as i32, cell.z as i32);
    let (xa, xb) = (x0 & mx, x0.wrapping_add(1) & mx);
    let (ya, yb) = (y0 & my, y0.wrapping_add(1) & my);
    let (za, zb) = (z0 & mz, z0.wrapping_add(1) & mz);

    let (u, v, w) = (fade(f.x), fade(f.y), fade(f.z));

    let n000 = grad(hash(xa, ya, za, seed), f.x, f.y, f.z);
    let n100 = grad(hash(xb, ya, za, seed), f.x - 1.0, f.y, f.z);
    let n010 = grad(hash(xa, yb, za, seed), f.x, f.y - 1.0, f.z);
    let n110 = grad(hash(xb, yb, za, seed), f.x - 1.0, f.y - 1.0, f.z);
    let n001 = grad(hash(xa, ya, zb, seed), f.x, f.y, f.z - 1.0);
    let n101 = grad(hash(xb, ya, zb, seed), f.x - 1.0, f.y, f.z - 1.0);
    let n011 = grad(hash(xa, yb, zb, seed), f.x, f.y - 1.0, f.z - 1.0);
    let n111 = grad(hash(xb, yb, zb, seed), f.x - 1.0, f.y - 1.0, f.z - 1.0);

    let nx00 = lerp(n000, n100, u);
    let nx10 = lerp(n010, n110, u);
    let nx01 = lerp(n001, n101, u);
    let nx11 = lerp(n011, n111, u);
    let nxy0 = lerp(nx00, nx10, v);
    let nxy1 = lerp(nx01, nx11, v);

    lerp(nxy0, nxy1, w).clamp(-1.0, 1.0)
}

#[inline]
fn hash(x: i32, y: i32, z: i32, seed: u8) -> u8 {
    // Truncating casts keep the low 8 bits, i.e. the index modulo 256.
    let h = PERM[(x as u8).wrapping_add(seed) as usize];
    let h = PERM[h.wrapping_add(y as u8) as usize];
    PERM[h.wrapping_add(z as u8) as usize]
}

/// Dot product with one of the 12 cube-edge gradients.
#[inline]
fn grad(hash: u8, x: f32, y: f32, z: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 != 0 { -u } else { u }) + (if h & 2 != 0 { -v } else { v })
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = Vec3> {
        (0..24).flat_map(|i| {
            (0..24).map(move |j| Vec3::new(i as f32 * 0.173 - 2.0, j as f32 * 0.291 - 3.0, 0.37))
        })
    }

    #[test]
    fn test_noise_is_deterministic() {
        for p in grid() {
            assert_eq!(noise(p, None).to_bits(), noise(p, None).to_bits());
        }
    }

    #[test]
    fn test_noise_range_is_signed_unit() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for p in grid() {
            let n = noise(p, None);
            assert!((-1.0..=1.0).contains(&n), "noise({p}) = {n}");
            min = min.min(n);
            max = max.max(n);
        }
        assert!(min < 0.0 && max > 0.0, "range [{min}, {max}] is not signed");
    }

    #[test]
    fn test_noise_vanishes_on_lattice() {
        for (x, y, z) in [(0, 0, 0), (3, -2, 7), (-5, 11, 1)] {
            let p = Vec3::new(x as f32, y as f32, z as f32);
            assert_eq!(noise(p, None), 0.0);
        }
    }

    #[test]
    fn test_periodic_noise_tiles() {
        let period = Period::new(4, 8, 2).unwrap();
        for p in grid() {
            // Quarter-step offsets keep p + period exactly representable.
            let p = (p * 4.0).round() / 4.0 + Vec3::splat(0.125);
            let base = noise(p, Some(period));
            let shifted_x = noise(p + Vec3::new(4.0, 0.0, 0.0), Some(period));
            let shifted_y = noise(p + Vec3::new(0.0, 8.0, 0.0), Some(period));
            let shifted_z = noise(p + Vec3::new(0.0, 0.0, 2.0), Some(period));
            assert_eq!(base, shifted_x, "x period at {p}");
            assert_eq!(base, shifted_y, "y period at {p}");
            assert_eq!(base, shifted_z, "z period at {p}");
        }
    }

    #[test]
    fn test_unwrapped_lattice_repeats_at_table_size() {
        let p = Vec3::new(1.25, 2.5, 0.75);
        assert_eq!(noise(p, None), noise(p + Vec3::new(256.0, 0.0, 0.0), None));
    }

    #[test]
    fn test_noise_is_continuous() {
        for p in grid() {
            let a = noise(p, None);
            let b = noise(p + Vec3::splat(1e-3), None);
            assert!((a - b).abs() < 1e-2, "jump at {p}: {a} vs {b}");
        }
    }

    #[test]
    fn test_seed_changes_field() {
        let differs = grid().any(|p| noise_seeded(p, None, 0) != noise_seeded(p, None, 1));
        assert!(differs);
    }

    #[test]
    fn test_period_validation() {
        assert!(Period::new(3, 4, 4).is_err());
        assert!(Period::new(0, 4, 4).is_err());
        assert!(Period::new(512, 4, 4).is_err());
        assert_eq!(Period::uniform(16).unwrap().get(), [16, 16, 16]);
    }

    #[test]
    fn test_period_scaling_saturates() {
        let p = Period::new(64, 128, 1).unwrap().scaled(4);
        assert_eq!(p.get(), [256, 256, 4]);
    }
}
