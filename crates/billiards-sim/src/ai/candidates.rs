use glam::{Vec2, Vec3};

use crate::ai::rng::Rng;
use crate::api::config::SearchConfig;
use crate::api::types::Shot;
use crate::sim::outcome::BallView;

/// Produces shots for the search to try.
///
/// `targets` is never empty when the search asks for a candidate.
pub trait CandidateSource {
    fn next_candidate(&mut self, cue: Vec3, targets: &[BallView]) -> Shot;
}

/// Random aim at a random target, with random power and spin.
pub struct RandomCandidates {
    rng: Rng,
    config: SearchConfig,
}

impl RandomCandidates {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            rng: Rng::new(config.seed),
            config: config.clone(),
        }
    }
}

impl CandidateSource for RandomCandidates {
    fn next_candidate(&mut self, cue: Vec3, targets: &[BallView]) -> Shot {
        let c = &self.config;
        let base_angle = match targets.len() {
            0 => 0.0,
            n => {
                let target = targets[self.rng.next_int(n as u32) as usize].position;
                let line = Vec2::new(target.x - cue.x, target.z - cue.z);
                line.y.atan2(line.x)
            }
        };
        let angle = base_angle + self.rng.range(-c.aim_jitter, c.aim_jitter);
        let power = self.rng.range(c.min_power, c.max_power);
        let offset = Vec2::new(
            self.rng.range(-c.max_spin_offset, c.max_spin_offset),
            self.rng.range(-c.max_spin_offset, c.max_spin_offset),
        );

        let direction = Vec3::new(angle.cos(), 0.0, angle.sin());
        let mut shot = Shot::new(direction * power).with_strike_offset(offset);

        if power < c.jump_power_ceiling && self.rng.chance(c.jump_chance) {
            // Cue raised: a downward component under the jump.
            shot.force.y = -power * 0.3;
            shot = shot.with_jump(self.rng.range(c.min_jump_speed, c.max_jump_speed));
        }
        shot
    }
}
