//! Gradient noise primitive underlying the terrain heightfield
//!
//! Classic 2D gradient noise: a shuffled 256-entry permutation table mirrored
//! to 512 entries, quintic fade of the fractional coordinates, hashed corner
//! gradients combined by bilinear interpolation. The permutation is shuffled
//! once at construction from the run RNG, so samples are deterministic for the
//! lifetime of a terrain instance but differ between runs.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A fixed-permutation gradient noise field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseField {
    perm: Vec<u8>,
}

impl NoiseField {
    /// Build a noise field with a permutation shuffled from `rng`
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut p: [u8; 256] = std::array::from_fn(|i| i as u8);
        for i in 0..256 {
            let r = rng.random_range(i..256);
            p.swap(i, r);
        }
        // Mirror to 512 entries so index arithmetic never wraps
        let mut perm = Vec::with_capacity(512);
        for i in 0..512 {
            perm.push(p[i & 255]);
        }
        Self { perm }
    }

    /// Sample coherent noise at `(x, y)`, roughly in `[-1, 1]`
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let xi = (x.floor() as i32 & 255) as usize;
        let yi = (y.floor() as i32 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        let a = self.perm[xi] as usize + yi;
        let aa = self.perm[a] as usize;
        let ab = self.perm[a + 1] as usize;
        let b = self.perm[xi + 1] as usize + yi;
        let ba = self.perm[b] as usize;
        let bb = self.perm[b + 1] as usize;

        let x1 = lerp(
            u,
            grad(self.perm[aa], xf, yf),
            grad(self.perm[ba], xf - 1.0, yf),
        );
        let x2 = lerp(
            u,
            grad(self.perm[ab], xf, yf - 1.0),
            grad(self.perm[bb], xf - 1.0, yf - 1.0),
        );
        lerp(v, x1, x2)
    }
}

/// Quintic smoothing curve t^3(t(6t-15)+10)
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f32, a: f32, b: f32) -> f32 {
    a + t * (b - a)
}

/// Hash the lattice corner into one of the unit gradient dot products
#[inline]
fn grad(hash: u8, x: f32, y: f32) -> f32 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_deterministic_for_fixed_permutation() {
        let mut rng = Pcg32::seed_from_u64(42);
        let noise = NoiseField::new(&mut rng);
        for i in 0..200 {
            let x = i as f32 * 0.37;
            assert_eq!(noise.sample(x, 0.0), noise.sample(x, 0.0));
        }
    }

    #[test]
    fn test_bounded_output() {
        let mut rng = Pcg32::seed_from_u64(7);
        let noise = NoiseField::new(&mut rng);
        for i in 0..1000 {
            let v = noise.sample(i as f32 * 0.13, i as f32 * 0.07);
            assert!(v.abs() <= 1.5, "sample out of range: {v}");
        }
    }

    #[test]
    fn test_smooth_over_small_steps() {
        let mut rng = Pcg32::seed_from_u64(99);
        let noise = NoiseField::new(&mut rng);
        for i in 0..500 {
            let x = i as f32 * 0.01;
            let dv = (noise.sample(x + 0.001, 0.0) - noise.sample(x, 0.0)).abs();
            assert!(dv < 0.02, "discontinuity at x={x}: {dv}");
        }
    }

    #[test]
    fn test_different_permutations_differ() {
        let mut rng1 = Pcg32::seed_from_u64(1);
        let mut rng2 = Pcg32::seed_from_u64(2);
        let n1 = NoiseField::new(&mut rng1);
        let n2 = NoiseField::new(&mut rng2);
        let differs = (0..100).any(|i| {
            let x = 10.0 + i as f32 * 0.61;
            (n1.sample(x, 0.0) - n2.sample(x, 0.0)).abs() > 1e-6
        });
        assert!(differs);
    }
}
