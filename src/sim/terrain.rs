//! Procedural terrain heightfield with pits and guaranteed-flat rest zones
//!
//! `height(x)` is a pure function of `x` and the current hole set: a
//! low-frequency flatness mask forces periodic flat traversal zones, two
//! octaves of gradient noise shape the hills in between, and registered holes
//! override everything with an unreachable depth.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::noise::NoiseField;
use crate::consts::{HOLE_MARGIN, PIT_DEPTH};

/// Base hill amplitude in world units
const AMPLITUDE: f32 = 280.0;
/// Base noise frequency
const FREQUENCY: f32 = 0.0003;
/// Octave falloff
const OCTAVES: u32 = 2;
/// Flatness mask frequency (low-frequency sine of world x)
const FLAT_MASK_FREQ: f32 = 0.0004;
/// Mask value above which terrain is forced flat
const FLAT_THRESHOLD: f32 = 0.88;
/// Mask value where blending toward flat begins
const BLEND_START: f32 = 0.75;
/// Half-window for the slope central difference
const SLOPE_DELTA: f32 = 15.0;

/// A pit interval carved out of the terrain
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hole {
    pub start: f32,
    pub width: f32,
}

impl Hole {
    #[inline]
    pub fn contains(&self, x: f32) -> bool {
        x >= self.start && x < self.start + self.width
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.width
    }
}

/// World-x to ground-height mapping shared by every grounded body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainField {
    noise: NoiseField,
    /// Ground level of flat rest zones; hills are carved upward from here
    pub rest_height: f32,
    holes: Vec<Hole>,
}

impl TerrainField {
    pub fn new(rest_height: f32, rng: &mut impl Rng) -> Self {
        Self {
            noise: NoiseField::new(rng),
            rest_height,
            holes: Vec::new(),
        }
    }

    /// Ground height at world `x` (screen-down coordinates: larger is lower)
    ///
    /// Inside a hole this returns `rest_height + PIT_DEPTH`, signaling
    /// "no ground here" to anything standing on it.
    pub fn height(&self, x: f32) -> f32 {
        if self.holes.iter().any(|h| h.contains(x)) {
            return self.rest_height + PIT_DEPTH;
        }

        let flat_mask = ((x * FLAT_MASK_FREQ).sin() + 1.0) / 2.0;
        if flat_mask > FLAT_THRESHOLD {
            return self.rest_height;
        }

        let mut amplitude = AMPLITUDE;
        let mut frequency = FREQUENCY;
        let mut y = 0.0;
        for _ in 0..OCTAVES {
            y += self.noise.sample(x * frequency, 0.0) * amplitude;
            amplitude *= 0.3;
            frequency *= 2.5;
        }

        // Blend toward the rest height as the mask approaches the flat
        // threshold; reaches exactly 1 at the threshold so the flat/hilly
        // boundary stays continuous.
        let blend = ((flat_mask - BLEND_START) / (FLAT_THRESHOLD - BLEND_START)).clamp(0.0, 1.0);
        (self.rest_height - y) * (1.0 - blend) + self.rest_height * blend
    }

    /// Local ground slope at `x` as an angle, via central difference
    pub fn slope(&self, x: f32) -> f32 {
        let y1 = self.height(x - SLOPE_DELTA);
        let y2 = self.height(x + SLOPE_DELTA);
        (y2 - y1).atan2(SLOPE_DELTA * 2.0)
    }

    /// Carve a permanent pit starting at `x`
    pub fn add_hole(&mut self, x: f32, width: f32) {
        self.holes.push(Hole { start: x, width });
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    /// Whether a ground reading indicates open space rather than floor
    #[inline]
    pub fn is_pit(&self, ground_y: f32) -> bool {
        ground_y > self.rest_height + HOLE_MARGIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::FRAC_PI_2;

    fn terrain() -> TerrainField {
        let mut rng = Pcg32::seed_from_u64(1234);
        TerrainField::new(620.0, &mut rng)
    }

    #[test]
    fn test_height_is_deterministic() {
        let t = terrain();
        for i in 0..500 {
            let x = i as f32 * 7.3;
            assert_eq!(t.height(x), t.height(x));
        }
    }

    #[test]
    fn test_flat_zone_returns_rest_height() {
        let t = terrain();
        // sin(x * FLAT_MASK_FREQ) == 1 at x = (pi/2) / freq, mask == 1 there
        let x = FRAC_PI_2 / FLAT_MASK_FREQ;
        assert_eq!(t.height(x), t.rest_height);
    }

    #[test]
    fn test_hole_overrides_height() {
        let mut t = terrain();
        // Carve the hole inside a flat rest zone so the surrounding ground
        // is exactly the rest height
        t.add_hole(3900.0, 120.0);
        assert_eq!(t.height(3950.0), t.rest_height + PIT_DEPTH);
        assert!(t.is_pit(t.height(3950.0)));
        // Just outside the interval the ground is back
        assert_eq!(t.height(3850.0), t.rest_height);
        assert_eq!(t.height(4100.0), t.rest_height);
    }

    #[test]
    fn test_holes_are_permanent_and_order_independent() {
        let mut t = terrain();
        t.add_hole(3000.0, 80.0);
        t.add_hole(500.0, 60.0);
        assert!(t.is_pit(t.height(3040.0)));
        assert!(t.is_pit(t.height(530.0)));
        assert_eq!(t.holes().len(), 2);
    }

    #[test]
    fn test_continuous_across_flat_zone_boundary() {
        let t = terrain();
        // The flat mask crosses the threshold near asin(0.76)/freq
        let boundary = (0.76_f32).asin() / FLAT_MASK_FREQ;
        let mut x = boundary - 40.0;
        while x < boundary + 40.0 {
            let dv = (t.height(x + 0.5) - t.height(x)).abs();
            assert!(dv < 3.0, "step of {dv} at x={x}");
            x += 0.5;
        }
    }

    #[test]
    fn test_slope_points_uphill_to_downhill() {
        let t = terrain();
        // On a flat zone the slope is ~0
        let x = FRAC_PI_2 / FLAT_MASK_FREQ;
        assert!(t.slope(x).abs() < 0.05);
    }

    proptest! {
        #[test]
        fn prop_height_continuous_away_from_holes(x in 0.0_f32..100_000.0) {
            let t = terrain();
            let dv = (t.height(x + 1.0) - t.height(x)).abs();
            // Two octaves at these frequencies move a few units per world
            // unit at most
            prop_assert!(dv < 5.0, "jump of {} at x={}", dv, x);
        }

        #[test]
        fn prop_height_total_over_wild_inputs(x in -1.0e6_f32..1.0e6) {
            let t = terrain();
            let h = t.height(x);
            prop_assert!(h.is_finite());
        }
    }
}
