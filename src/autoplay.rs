//! Attract mode: a seeded auto-aimer
//!
//! Picks aim points toward the hole with random angle and power. Same seed,
//! same shots.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::LevelGeometry;

/// Auto-aimer state
#[derive(Debug, Clone)]
pub struct AutoAimer {
    rng: Pcg32,
}

impl AutoAimer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Next aim point for a ball resting at `origin` (left, bottom)
    pub fn next_target(&mut self, origin: DVec2, geometry: &LevelGeometry, max_power: f64) -> DVec2 {
        let hole_x = (geometry.hole.left.0 + geometry.hole.left.1) / 2.0;
        let distance = hole_x - origin.x;
        let direction = if distance >= 0.0 { 1.0 } else { -1.0 };

        // Closer to the hole means a softer shot
        let base = (distance.abs() / 900.0).clamp(0.15, 1.0);
        let power = (base * self.rng.random_range(0.7..1.3)).min(1.0) * max_power;
        let theta = self.rng.random_range(20.0f64..70.0).to_radians();

        DVec2::new(
            origin.x + direction * power * theta.cos(),
            origin.y - power * theta.sin(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LevelId, compute_velocity};

    #[test]
    fn test_same_seed_same_targets() {
        let geometry = LevelGeometry::for_level(LevelId::One);
        let origin = DVec2::new(5.0, 720.0);
        let mut a = AutoAimer::new(42);
        let mut b = AutoAimer::new(42);
        for _ in 0..20 {
            assert_eq!(
                a.next_target(origin, &geometry, 280.0),
                b.next_target(origin, &geometry, 280.0)
            );
        }
    }

    #[test]
    fn test_aims_up_and_toward_hole() {
        let geometry = LevelGeometry::for_level(LevelId::Two);
        let mut aimer = AutoAimer::new(7);
        for _ in 0..50 {
            let target = aimer.next_target(DVec2::new(100.0, 720.0), &geometry, 350.0);
            let v = compute_velocity(DVec2::new(100.0, 720.0), target, 350.0);
            assert!(v.x > 0.0 && v.y < 0.0);

            let target = aimer.next_target(DVec2::new(1300.0, 720.0), &geometry, 350.0);
            let v = compute_velocity(DVec2::new(1300.0, 720.0), target, 350.0);
            assert!(v.x < 0.0 && v.y < 0.0);
        }
    }
}
