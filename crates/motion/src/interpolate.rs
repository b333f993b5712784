use glam::Vec2;

/// Moves `start` toward `end` by the fraction `t`.
///
/// Written as `start * (1 - t) + end * t` rather than `start + (end - start) * t`
/// so that `t == 1.0` lands exactly on `end`.
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start * (1.0 - t) + end * t
}

/// Applies [`lerp`] independently to each axis.
///
/// `factor` is expected in `(0, 1]`. The result always lies on the segment
/// between `current` and `target`; chaining calls frame after frame is the
/// caller's job.
pub fn advance(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    Vec2::new(
        lerp(current.x, target.x, factor),
        lerp(current.y, target.y, factor),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_without_overshoot() {
        let target = Vec2::new(640.0, -120.0);
        let mut current = Vec2::ZERO;
        let mut steps = 0;
        while current.distance(target) > 0.01 {
            let next = advance(current, target, 0.1);
            assert!(next.x <= target.x && next.x >= current.x);
            assert!(next.y >= target.y && next.y <= current.y);
            current = next;
            steps += 1;
            assert!(steps < 1_000, "failed to converge");
        }
    }

    #[test]
    fn at_rest_is_a_fixed_point() {
        let point = Vec2::new(12.5, 300.0);
        for factor in [0.01, 0.1, 0.5, 1.0] {
            assert_eq!(advance(point, point, factor), point);
        }
    }

    #[test]
    fn full_factor_snaps_to_target() {
        let target = Vec2::new(3.0, 4.0);
        assert_eq!(advance(Vec2::new(-7.0, 9.0), target, 1.0), target);
    }

    #[test]
    fn scalar_lerp_matches_canonical_step() {
        assert!((lerp(0.0, 1.0, 0.1) - 0.1).abs() < 1e-6);
        assert!((lerp(0.1, 1.0, 0.1) - 0.19).abs() < 1e-6);
        assert!((lerp(1.0, 0.0, 0.1) - 0.9).abs() < 1e-6);
    }
}
