//! Aim: turning a target point into a launch velocity
//!
//! The aim vector runs from the ball's rest spot to the target, y flipped so
//! "up" is positive. Its length is capped at the level's max power and then
//! scaled down by [`AIM_DIVISOR`] into per-tick velocity.
//!
//! The angle only resolves the quadrant through the sign of `dx`. With
//! `dx == 0` the angle is always π/2, so a straight-down aim longer than
//! max power is clamped to straight up. Short straight-down aims keep their
//! raw (downward) vector.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::DVec2;

use crate::consts::*;

/// Velocity plus the preview line for drawing the aim arrow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimPreview {
    pub velocity: DVec2,
    /// Aim angle (radians, counter-clockwise from +x, y up)
    pub theta: f64,
    /// Arrow start: ball centre
    pub from: DVec2,
    /// Arrow tip, clamped to max power
    pub to: DVec2,
}

/// Relative aim vector (y up) and its angle, clamped to `max_power`
fn clamped_aim(origin: DVec2, target: DVec2, max_power: f64) -> (f64, f64, f64) {
    let dx = target.x - origin.x;
    let dy = origin.y - target.y;

    let theta = if dx > 0.0 {
        (dy / dx).atan()
    } else if dx < 0.0 {
        PI + (dy / dx).atan()
    } else {
        FRAC_PI_2
    };

    let hyp = (dx * dx + dy * dy).sqrt();
    if hyp > max_power {
        (max_power * theta.cos(), max_power * theta.sin(), theta)
    } else {
        (dx, dy, theta)
    }
}

/// Launch velocity for a shot from `origin` (ball's left/bottom edges)
/// toward `target`
pub fn compute_velocity(origin: DVec2, target: DVec2, max_power: f64) -> DVec2 {
    let (dx, dy, _) = clamped_aim(origin, target, max_power);
    DVec2::new(dx / AIM_DIVISOR, -dy / AIM_DIVISOR)
}

/// Same as [`compute_velocity`], plus what the aim arrow should look like
pub fn aim_preview(origin: DVec2, target: DVec2, max_power: f64) -> AimPreview {
    let (dx, dy, theta) = clamped_aim(origin, target, max_power);
    AimPreview {
        velocity: DVec2::new(dx / AIM_DIVISOR, -dy / AIM_DIVISOR),
        theta,
        from: DVec2::new(origin.x + BALL_RADIUS, origin.y - BALL_RADIUS),
        to: DVec2::new(origin.x + dx, origin.y - dy),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ORIGIN: DVec2 = DVec2::new(5.0, 720.0);

    #[test]
    fn test_short_aim_is_not_clamped() {
        let v = compute_velocity(ORIGIN, DVec2::new(105.0, 620.0), 280.0);
        assert!((v.x - 2.5).abs() < 1e-12);
        assert!((v.y - (-2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_long_aim_is_clamped_to_max_power() {
        let v = compute_velocity(ORIGIN, DVec2::new(1005.0, 720.0), 280.0);
        assert!((v.x - 7.0).abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);

        let v = compute_velocity(ORIGIN, DVec2::new(605.0, 120.0), 280.0);
        assert!((v.length() - 7.0).abs() < 1e-9);
        assert!((v.x - (-v.y)).abs() < 1e-9);
    }

    #[test]
    fn test_backward_aim() {
        let v = compute_velocity(DVec2::new(500.0, 720.0), DVec2::new(0.0, 220.0), 280.0);
        assert!(v.x < 0.0 && v.y < 0.0);
        assert!((v.length() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_up() {
        let v = compute_velocity(ORIGIN, DVec2::new(5.0, 0.0), 280.0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - (-7.0)).abs() < 1e-12);
    }

    #[test]
    fn test_straight_down_flips_when_clamped() {
        // Short: raw vector kept, points down
        let v = compute_velocity(DVec2::new(500.0, 300.0), DVec2::new(500.0, 400.0), 280.0);
        assert_eq!(v, DVec2::new(0.0, 2.5));

        // Long: clamped along θ = π/2, points up
        let v = compute_velocity(DVec2::new(500.0, 100.0), DVec2::new(500.0, 700.0), 280.0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.y - (-7.0)).abs() < 1e-12);
    }

    #[test]
    fn test_below_horizon_keeps_direction() {
        let v = compute_velocity(DVec2::new(500.0, 300.0), DVec2::new(900.0, 700.0), 280.0);
        assert!(v.x > 0.0 && v.y > 0.0);
        let v = compute_velocity(DVec2::new(500.0, 300.0), DVec2::new(100.0, 700.0), 280.0);
        assert!(v.x < 0.0 && v.y > 0.0);
    }

    #[test]
    fn test_zero_length_aim() {
        assert_eq!(compute_velocity(ORIGIN, ORIGIN, 280.0), DVec2::ZERO);
    }

    #[test]
    fn test_preview_line() {
        let p = aim_preview(ORIGIN, DVec2::new(1005.0, 720.0), 280.0);
        assert_eq!(p.from, DVec2::new(20.0, 705.0));
        assert!((p.to.x - 285.0).abs() < 1e-9);
        assert!((p.to.y - 720.0).abs() < 1e-9);
        assert_eq!(p.theta, 0.0);

        let short = aim_preview(ORIGIN, DVec2::new(105.0, 620.0), 280.0);
        assert_eq!(short.to, DVec2::new(105.0, 620.0));
        assert_eq!(short.velocity, compute_velocity(ORIGIN, DVec2::new(105.0, 620.0), 280.0));
    }

    proptest! {
        #[test]
        fn prop_velocity_never_exceeds_cap(
            ox in 0.0f64..1366.0,
            oy in 0.0f64..768.0,
            tx in -500.0f64..2000.0,
            ty in -500.0f64..1500.0,
            max_power in 100.0f64..800.0,
        ) {
            let v = compute_velocity(DVec2::new(ox, oy), DVec2::new(tx, ty), max_power);
            prop_assert!(v.length() <= max_power / AIM_DIVISOR + 1e-9);
        }

        #[test]
        fn prop_direction_matches_atan2_off_axis(
            tx in -500.0f64..2000.0,
            ty in -500.0f64..1500.0,
        ) {
            let origin = DVec2::new(700.0, 400.0);
            let dx = tx - origin.x;
            let dy = origin.y - ty;
            prop_assume!(dx.abs() > 1e-6);
            let v = compute_velocity(origin, DVec2::new(tx, ty), 280.0);
            prop_assume!(v.length() > 1e-9);
            let expected = dy.atan2(dx);
            let actual = (-v.y).atan2(v.x);
            let diff = (expected - actual).rem_euclid(std::f64::consts::TAU);
            prop_assert!(diff < 1e-9 || diff > std::f64::consts::TAU - 1e-9);
        }
    }
}
