use std::f32::consts::TAU;

use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ValueRange;

/// Uniform sampling over the configured ranges.
///
/// Owned by the simulation world and handed down by `&mut` so every random
/// draw in a run comes from one generator.
pub struct RandomSampler {
    rng: StdRng,
}

impl RandomSampler {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self { rng: StdRng::from_entropy() },
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Uniform in `[min, max]`. Panics on an inverted range, which a validated config never holds.
    pub fn real(&mut self, range: ValueRange<f32>) -> f32 {
        if range.min == range.max {
            return range.min;
        }
        self.rng.gen_range(range.min..=range.max)
    }

    pub fn int(&mut self, range: ValueRange<u32>) -> u32 {
        self.rng.gen_range(range.min..=range.max)
    }

    /// Uniform index in `0..len`; `len` must be non-zero.
    pub fn index(&mut self, len: u32) -> u32 {
        self.rng.gen_range(0..len)
    }

    /// Single scalar offset in `[-max, max]`.
    pub fn jitter(&mut self, max: f32) -> f32 {
        if max <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(-max..=max)
    }

    /// Opaque color with every RGB channel drawn from `channel`.
    pub fn color(&mut self, channel: ValueRange<f32>) -> Vec4 {
        let r = self.real(channel);
        let g = self.real(channel);
        let b = self.real(channel);
        Vec4::new(r, g, b, 1.0)
    }

    /// One of `segments` equally spaced directions on the unit circle in the xy plane.
    pub fn arc_direction(&mut self, segments: u32) -> Vec3 {
        let step = TAU / segments as f32;
        let theta = self.index(segments) as f32 * step;
        Vec3::new(theta.cos(), theta.sin(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = RandomSampler::seeded(42);
        let mut b = RandomSampler::seeded(42);
        for _ in 0..32 {
            assert_eq!(a.real(ValueRange::new(0.0, 1.0)), b.real(ValueRange::new(0.0, 1.0)));
            assert_eq!(a.int(ValueRange::new(30, 49)), b.int(ValueRange::new(30, 49)));
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = RandomSampler::seeded(1);
        let reals = ValueRange::new(-20.0, 20.0);
        let ints = ValueRange::new(30, 49);
        for _ in 0..1000 {
            assert!(reals.contains(rng.real(reals)));
            assert!(ints.contains(rng.int(ints)));
            assert!(rng.jitter(5.0).abs() <= 5.0);
            assert!(rng.index(50) < 50);
        }
    }

    #[test]
    fn degenerate_ranges_return_the_bound() {
        let mut rng = RandomSampler::seeded(3);
        assert_eq!(rng.real(ValueRange::new(0.1, 0.1)), 0.1);
        assert_eq!(rng.int(ValueRange::new(7, 7)), 7);
        assert_eq!(rng.jitter(0.0), 0.0);
    }

    #[test]
    #[should_panic]
    fn inverted_range_is_not_clamped() {
        let mut rng = RandomSampler::seeded(4);
        rng.real(ValueRange::new(200.0, 20.0));
    }

    #[test]
    fn colors_are_opaque_and_bright() {
        let mut rng = RandomSampler::seeded(9);
        let channel = ValueRange::new(0.25, 1.0);
        for _ in 0..100 {
            let color = rng.color(channel);
            assert_eq!(color.w, 1.0);
            assert!(channel.contains(color.x) && channel.contains(color.y) && channel.contains(color.z));
        }
    }

    #[test]
    fn arc_directions_are_unit_and_planar() {
        let mut rng = RandomSampler::seeded(5);
        for _ in 0..100 {
            let dir = rng.arc_direction(50);
            assert!((dir.length() - 1.0).abs() < 1e-5);
            assert_eq!(dir.z, 0.0);
        }
    }
}
