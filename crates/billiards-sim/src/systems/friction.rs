//! Per-step felt friction, spin bleed-off and swerve.
//!
//! The physics engine handles contact response; this model adds the effects
//! a rigid-body solver does not: rolling resistance, a hard stop for slow
//! balls, damping of spin, and the sideways pull of vertical spin.

use glam::{Vec2, Vec3};

use crate::api::config::SimConfig;

/// Motion state of one ball, read from and written back to the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallMotion {
    pub linvel: Vec3,
    pub angvel: Vec3,
    /// Height of the ball center above the bed surface plane.
    pub height: f32,
}

impl BallMotion {
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.linvel.x, self.linvel.z).length()
    }
}

/// True when the ball center is within tolerance of resting on the bed.
pub fn is_on_table(height: f32, config: &SimConfig) -> bool {
    (height - config.ball_radius).abs() <= config.on_table_epsilon
}

/// Stopped: horizontal speed at or below the stop speed and no spin axis
/// above the stop spin.
pub fn is_stopped(motion: &BallMotion, config: &SimConfig) -> bool {
    motion.horizontal_speed() <= config.stop_speed
        && motion.angvel.abs().max_element() <= config.stop_spin
}

/// Apply one step of the model to `motion`. Returns the resulting
/// horizontal speed.
pub fn apply(motion: &mut BallMotion, config: &SimConfig) -> f32 {
    let dt = config.dt;
    let on_table = is_on_table(motion.height, config);

    motion.linvel.y *= config.air_damping;

    let horizontal = Vec2::new(motion.linvel.x, motion.linvel.z);
    let speed = horizontal.length();
    let mut next = horizontal;

    if on_table && speed > config.min_rolling_speed {
        let dir = horizontal / speed;

        // Never let friction reverse the direction of travel.
        let decel = (config.rolling_friction / config.ball_mass * dt).min(speed);
        next -= dir * decel;

        let spin = motion.angvel.y;
        if spin.abs() > config.swerve_min_spin {
            // Left of travel, seen from above with Y up.
            let left = Vec2::new(dir.y, -dir.x);
            next += left * (spin * config.swerve_factor / config.ball_mass * dt);
        }
    }

    motion.linvel.x = next.x;
    motion.linvel.z = next.y;

    if on_table {
        let damping = if speed < config.slow_speed {
            config.spin_damping_slow
        } else {
            config.spin_damping_fast
        };
        motion.angvel *= damping;
        for axis in 0..3 {
            if motion.angvel[axis].abs() < config.stop_spin {
                motion.angvel[axis] = 0.0;
            }
        }
    }

    let mut speed = motion.horizontal_speed();
    if speed < config.stop_speed {
        motion.linvel.x = 0.0;
        motion.linvel.z = 0.0;
        if on_table {
            motion.linvel.y = 0.0;
        }
        speed = 0.0;
    }
    speed
}
