//! Platform Motion Model
//!
//! A moving platform oscillates horizontally around its starting center:
//! each tick it advances by `speed * direction * dt`, and when a step
//! would leave `[start - range, start + range]` it is clamped onto the
//! bound and the direction flips. `delta_x` is the displacement actually
//! applied this tick (post-clamp), which is what riders get carried by.

use super::level::PlatformSpec;

/// Horizontal oscillation state of one platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformMotion {
    start_x: f32,
    range: f32,
    speed: f32,
    /// +1.0 or -1.0
    direction: f32,
    center_x: f32,
    delta_x: f32,
    active: bool,
}

impl PlatformMotion {
    /// Active platform starting at `start_x`, initially moving right.
    pub fn new(start_x: f32, range: f32, speed: f32) -> Self {
        Self {
            start_x,
            range,
            speed,
            direction: 1.0,
            center_x: start_x,
            delta_x: 0.0,
            active: true,
        }
    }

    /// Stationary platform. Always reports `delta_x == 0`.
    pub fn inactive(start_x: f32) -> Self {
        Self {
            active: false,
            ..Self::new(start_x, 0.0, 0.0)
        }
    }

    pub fn from_spec(spec: &PlatformSpec) -> Self {
        if spec.active {
            Self::new(spec.center_x, spec.range, spec.speed)
        } else {
            Self::inactive(spec.center_x)
        }
    }

    /// Advance one tick and return the applied displacement.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if !self.active {
            self.delta_x = 0.0;
            return 0.0;
        }

        let (min_x, max_x) = self.bounds();
        let previous = self.center_x;
        let mut next = previous + self.speed * self.direction * dt;

        // Clamp first, then flip, so repeated clamping can't drift past a bound.
        if next > max_x {
            next = max_x;
            self.direction = -1.0;
        } else if next < min_x {
            next = min_x;
            self.direction = 1.0;
        }

        self.center_x = next;
        self.delta_x = next - previous;
        self.delta_x
    }

    /// `(start - range, start + range)`
    pub fn bounds(&self) -> (f32, f32) {
        (self.start_x - self.range, self.start_x + self.range)
    }

    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    /// Displacement applied by the most recent `advance`.
    pub fn delta_x(&self) -> f32 {
        self.delta_x
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_bound_then_flips_on_overshoot() {
        let mut motion = PlatformMotion::new(500.0, 200.0, 100.0);

        assert_eq!(motion.advance(1.0), 100.0);
        assert_eq!(motion.advance(1.0), 100.0);
        assert_eq!(motion.center_x(), 700.0);
        // Landing exactly on the bound does not flip yet
        assert_eq!(motion.direction(), 1.0);

        // The next step would overshoot: clamp with zero displacement, then flip
        assert_eq!(motion.advance(1.0), 0.0);
        assert_eq!(motion.center_x(), 700.0);
        assert_eq!(motion.direction(), -1.0);

        assert_eq!(motion.advance(1.0), -100.0);
        assert_eq!(motion.center_x(), 600.0);
    }

    #[test]
    fn test_delta_is_post_clamp() {
        let mut motion = PlatformMotion::new(0.0, 50.0, 40.0);
        motion.advance(1.0); // 40
        let delta = motion.advance(1.0); // would be 80, clamps to 50
        assert_eq!(motion.center_x(), 50.0);
        assert_eq!(delta, 10.0);
        assert_eq!(motion.direction(), -1.0);
    }

    #[test]
    fn test_unclamped_delta_matches_speed() {
        let mut motion = PlatformMotion::new(300.0, 250.0, 64.0);
        let dt = 1.0 / 60.0;
        let delta = motion.advance(dt);
        assert!((delta - 64.0 * dt).abs() < 1e-5);
    }

    #[test]
    fn test_center_stays_in_bounds() {
        let mut motion = PlatformMotion::new(420.0, 173.0, 97.0);
        let (min_x, max_x) = motion.bounds();
        for i in 0..5000 {
            // Uneven frame times, including very long ones
            let dt = if i % 97 == 0 { 3.5 } else { 0.016 + (i % 7) as f32 * 0.003 };
            let before = motion.center_x();
            let delta = motion.advance(dt);
            assert!(motion.center_x() >= min_x && motion.center_x() <= max_x);
            assert!((motion.center_x() - before - delta).abs() < 1e-3);
        }
    }

    #[test]
    fn test_lower_bound_flips_back() {
        let mut motion = PlatformMotion::new(100.0, 30.0, 50.0);
        motion.advance(1.0); // clamps at 130, flips
        motion.advance(1.0); // 80
        let delta = motion.advance(1.0); // would be 30, clamps at 70
        assert_eq!(motion.center_x(), 70.0);
        assert_eq!(delta, -10.0);
        assert_eq!(motion.direction(), 1.0);
    }

    #[test]
    fn test_inactive_platform_does_not_move() {
        let mut motion = PlatformMotion::inactive(250.0);
        assert_eq!(motion.advance(1.0), 0.0);
        assert_eq!(motion.center_x(), 250.0);
        assert_eq!(motion.delta_x(), 0.0);
        assert!(!motion.is_active());
    }
}
