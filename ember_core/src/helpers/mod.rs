use std::ops::{Add, Mul, Sub};

use rand::Rng;

mod changed_set;
mod stopwatch;

pub use changed_set::ChangedSet;
pub use stopwatch::Stopwatch;

/// Linear interpolation, for scalars and ultraviolet vectors alike.
pub fn lerp<T>(start: T, end: T, t: f32) -> T
where
    T: Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T> + Copy,
{
    start + (end - start) * t
}

/// Uniform sample between two bounds, in either order. `gen_range` panics
/// on an inverted range, and spawn bounds come from user-editable config.
pub fn uniform_between(rng: &mut impl Rng, a: f32, b: f32) -> f32 {
    if a == b {
        return a;
    }

    let (low, high) = if a < b { (a, b) } else { (b, a) };
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    #[test]
    fn lerp_hits_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);

        let mid = lerp(Vec3::zero(), Vec3::new(1.0, 2.0, 3.0), 0.5);
        assert_eq!(mid, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn uniform_between_tolerates_inverted_bounds() {
        let mut rng = rand::thread_rng();

        for _ in 0..100 {
            let sample = uniform_between(&mut rng, 5.0, -5.0);
            assert!((-5.0..=5.0).contains(&sample));
        }

        assert_eq!(uniform_between(&mut rng, 3.0, 3.0), 3.0);
    }
}
