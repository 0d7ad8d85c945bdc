use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identifier for a ball, assigned by whoever seeds the simulation.
/// The simulation never hands out references into the scene layer, only ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(pub u32);

/// Ball color tag. `White` is the cue ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallColor {
    Red,
    Blue,
    Black,
    White,
}

impl BallColor {
    pub const ALL: [BallColor; 4] = [
        BallColor::Red,
        BallColor::Blue,
        BallColor::Black,
        BallColor::White,
    ];

    pub fn is_cue(self) -> bool {
        self == BallColor::White
    }

    /// The other group color for red/blue. Black and white have no opponent.
    pub fn opponent(self) -> Option<BallColor> {
        match self {
            BallColor::Red => Some(BallColor::Blue),
            BallColor::Blue => Some(BallColor::Red),
            BallColor::Black | BallColor::White => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BallColor::Red => "red",
            BallColor::Blue => "blue",
            BallColor::Black => "black",
            BallColor::White => "white",
        }
    }
}

/// Per-color counters (potted, left table, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCounts {
    pub red: u32,
    pub blue: u32,
    pub black: u32,
    pub white: u32,
}

impl ColorCounts {
    pub fn get(&self, color: BallColor) -> u32 {
        match color {
            BallColor::Red => self.red,
            BallColor::Blue => self.blue,
            BallColor::Black => self.black,
            BallColor::White => self.white,
        }
    }

    pub fn increment(&mut self, color: BallColor) {
        match color {
            BallColor::Red => self.red += 1,
            BallColor::Blue => self.blue += 1,
            BallColor::Black => self.black += 1,
            BallColor::White => self.white += 1,
        }
    }

    /// Sum over all colors, cue ball included.
    pub fn total(&self) -> u32 {
        self.red + self.blue + self.black + self.white
    }

    /// Sum over the object balls only.
    pub fn object_balls(&self) -> u32 {
        self.red + self.blue + self.black
    }
}

/// Initial state of one ball, taken from the scene layer.
/// Velocity is always zero at the start of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSeed {
    pub id: BallId,
    pub color: BallColor,
    pub position: Vec3,
    pub orientation: Quat,
}

impl BallSeed {
    pub fn new(id: BallId, color: BallColor, position: Vec3) -> Self {
        Self {
            id,
            color,
            position,
            orientation: Quat::IDENTITY,
        }
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }
}

/// A requested strike on the cue ball.
///
/// `force` is the impulse delivered by the cue. `strike_offset` is where the
/// cue tip meets the ball, in ball radii: `x` is side (positive = right of the
/// shot line), `y` is height (positive = above center, i.e. topspin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub force: Vec3,
    pub strike_offset: Vec2,
    pub jump_speed: Option<f32>,
}

impl Shot {
    /// A plain center-ball strike.
    pub fn new(force: Vec3) -> Self {
        Self {
            force,
            strike_offset: Vec2::ZERO,
            jump_speed: None,
        }
    }

    pub fn with_strike_offset(mut self, offset: Vec2) -> Self {
        self.strike_offset = offset;
        self
    }

    pub fn with_jump(mut self, speed: f32) -> Self {
        self.jump_speed = Some(speed);
        self
    }

    /// Horizontal magnitude of the impulse.
    pub fn power(&self) -> f32 {
        Vec2::new(self.force.x, self.force.z).length()
    }
}

/// Read-only rules context of the player taking the shot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotContext {
    /// `None` while the table is open (colors not yet assigned).
    pub assigned: Option<BallColor>,
    pub can_pot_black: bool,
    pub is_break: bool,
}

impl ShotContext {
    /// Open-table break shot.
    pub fn break_shot() -> Self {
        Self {
            assigned: None,
            can_pot_black: false,
            is_break: true,
        }
    }

    /// Derive the black-ball permission from how many of the player's own
    /// balls are still on the table.
    pub fn for_player(assigned: Option<BallColor>, own_remaining: u32, is_break: bool) -> Self {
        let can_pot_black = match assigned {
            Some(BallColor::Black) => true,
            Some(_) => own_remaining == 0,
            None => false,
        };
        Self {
            assigned,
            can_pot_black,
            is_break,
        }
    }
}

/// A ball transition reported by `SimulationRun::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    Potted { ball: BallId, color: BallColor },
    LeftTable { ball: BallId, color: BallColor },
}

impl SimEvent {
    pub fn ball(&self) -> BallId {
        match *self {
            SimEvent::Potted { ball, .. } | SimEvent::LeftTable { ball, .. } => ball,
        }
    }

    pub fn color(&self) -> BallColor {
        match *self {
            SimEvent::Potted { color, .. } | SimEvent::LeftTable { color, .. } => color,
        }
    }
}

/// Scored outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    pub score: f32,
    pub potted: ColorCounts,
    pub left_table: ColorCounts,
    pub first_contact: Option<BallColor>,
    pub is_foul: bool,
}

impl ShotResult {
    /// Non-foul and at least one object ball down.
    pub fn is_clean_pot(&self) -> bool {
        !self.is_foul && self.potted.object_balls() > 0
    }
}
