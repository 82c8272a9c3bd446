//! Random sampling helpers tolerant of degenerate tuning ranges.

use rand::Rng;

/// Uniform sample from `[low, high)`; collapses to `low` on an empty range.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}

/// Uniform sample from a `[low, high]` tuning pair.
pub(crate) fn uniform_pair<R: Rng + ?Sized>(rng: &mut R, range: [f32; 2]) -> f32 {
    uniform(rng, range[0], range[1])
}

/// Clamps without panicking when `low > high`, preferring `low`.
pub(crate) fn clamp_soft(value: f32, low: f32, high: f32) -> f32 {
    value.min(high).max(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn empty_ranges_collapse_to_lower_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(uniform(&mut rng, 2.0, 2.0), 2.0);
        assert_eq!(uniform(&mut rng, 5.0, 1.0), 5.0);
        let sample = uniform_pair(&mut rng, [-1.0, 1.0]);
        assert!((-1.0..1.0).contains(&sample));
    }

    #[test]
    fn inverted_clamp_prefers_lower_bound() {
        assert_eq!(clamp_soft(10.0, 0.0, 5.0), 5.0);
        assert_eq!(clamp_soft(-3.0, 0.0, 5.0), 0.0);
        assert_eq!(clamp_soft(3.0, 8.0, 5.0), 8.0);
    }
}
