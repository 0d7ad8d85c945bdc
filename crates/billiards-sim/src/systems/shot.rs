//! Turns a `Shot` into the cue ball's initial linear and angular velocity.

use glam::{Vec2, Vec3};

use crate::api::types::Shot;

/// Velocities produced by a strike, to be added to the cue ball's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeResponse {
    pub linvel: Vec3,
    pub angvel: Vec3,
}

/// Horizontal unit direction of a shot. Falls back to +X for a shot with
/// no horizontal component.
pub fn shot_direction(shot: &Shot) -> Vec3 {
    Vec3::new(shot.force.x, 0.0, shot.force.z)
        .try_normalize()
        .unwrap_or(Vec3::X)
}

/// Contact point of the cue tip relative to the ball center.
///
/// The offset is clamped to the ball's silhouette; the remaining depth puts
/// the point on the back of the ball, facing the cue.
pub fn strike_point(shot: &Shot, radius: f32) -> Vec3 {
    let dir = shot_direction(shot);
    let right = Vec3::new(-dir.z, 0.0, dir.x);
    let offset = shot.strike_offset.clamp_length_max(1.0);
    let depth = (1.0 - offset.length_squared()).max(0.0).sqrt();
    (right * offset.x + Vec3::Y * offset.y - dir * depth) * radius
}

/// Impulse response of a solid sphere struck at an offset, followed by the
/// forward-roll correction and the jump override.
pub fn strike(shot: &Shot, radius: f32, mass: f32) -> StrikeResponse {
    let impulse = shot.force;
    let mut linvel = impulse / mass;

    let inertia = 0.4 * mass * radius * radius;
    let r = strike_point(shot, radius);
    let mut angvel = r.cross(impulse) / inertia;

    // Start the ball rolling instead of sliding: the horizontal velocity
    // turned 90° about Y, over the radius.
    let rolling = Vec2::new(linvel.x, linvel.z) / radius;
    angvel += Vec3::new(rolling.y, 0.0, -rolling.x);

    if let Some(jump) = shot.jump_speed {
        if jump > 0.0 {
            linvel.y = jump;
        }
    }

    StrikeResponse { linvel, angvel }
}
