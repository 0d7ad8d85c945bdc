use glam::Vec3;

use crate::api::types::{BallColor, BallId, ColorCounts};

/// The first ball the cue ball touched during a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstContact {
    pub ball: BallId,
    pub color: BallColor,
    /// Speed of the contacted ball in the step the contact was seen.
    pub speed: f32,
}

/// Snapshot of a ball still in play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub id: BallId,
    pub color: BallColor,
    pub position: Vec3,
}

/// Where a non-cue ball started the run and where it is now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallMovement {
    pub id: BallId,
    pub color: BallColor,
    pub start: Vec3,
    pub end: Vec3,
}

/// Everything the rule evaluator reads from a finished run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShotOutcome {
    pub potted: ColorCounts,
    pub left_table: ColorCounts,
    pub first_contact: Option<FirstContact>,
    /// False when the run was seeded without a cue ball.
    pub has_cue_ball: bool,
    /// Non-cue balls still on the table, in seed order.
    pub movements: Vec<BallMovement>,
}

impl ShotOutcome {
    pub fn first_contact_color(&self) -> Option<BallColor> {
        self.first_contact.map(|c| c.color)
    }

    /// Cue ball potted or off the table.
    pub fn cue_ball_lost(&self) -> bool {
        self.potted.white > 0 || self.left_table.white > 0
    }
}
