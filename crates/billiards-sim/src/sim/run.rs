use glam::Vec3;

use crate::api::config::{ScoreWeights, SimConfig};
use crate::api::types::{
    BallColor, BallId, BallSeed, ColorCounts, Shot, ShotContext, ShotResult, SimEvent,
};
use crate::core::physics::{BodyDesc, ColliderDesc, PhysicsBody, PhysicsWorld};
use crate::core::table::{BodyRole, StaticTable};
use crate::rules;
use crate::sim::outcome::{BallMovement, BallView, FirstContact, ShotOutcome};
use crate::systems::{friction, shot};

/// What a collider's user tag says it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColliderTag {
    Ball(BallId),
    Static(BodyRole),
}

const BALL_TAG_BIT: u128 = 1 << 64;

impl ColliderTag {
    pub(crate) fn to_user_data(self) -> u128 {
        match self {
            ColliderTag::Ball(id) => BALL_TAG_BIT | id.0 as u128,
            ColliderTag::Static(role) => match role {
                BodyRole::Cushion => 1,
                BodyRole::Wood => 2,
                BodyRole::PocketBackstop => 3,
                BodyRole::PocketPlatform => 4,
                BodyRole::TableGround => 5,
            },
        }
    }

    pub(crate) fn from_user_data(data: u128) -> Option<Self> {
        if data & BALL_TAG_BIT != 0 {
            return Some(ColliderTag::Ball(BallId(data as u32)));
        }
        let role = match data {
            1 => BodyRole::Cushion,
            2 => BodyRole::Wood,
            3 => BodyRole::PocketBackstop,
            4 => BodyRole::PocketPlatform,
            5 => BodyRole::TableGround,
            _ => return None,
        };
        Some(ColliderTag::Static(role))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Complete,
}

/// A ball owned by one run.
struct Ball {
    id: BallId,
    color: BallColor,
    body: PhysicsBody,
    start: Vec3,
}

/// One shot's worth of simulation: its own physics world, the balls still in
/// play and the counters a rule evaluator needs.
///
/// Driven by `step()` until `is_complete()`; removal of a ball is permanent.
pub struct SimulationRun {
    config: SimConfig,
    world: PhysicsWorld,
    balls: Vec<Ball>,
    cue: Option<BallId>,
    potted: ColorCounts,
    left_table: ColorCounts,
    first_contact: Option<FirstContact>,
    steps: u32,
    state: RunState,
}

impl SimulationRun {
    /// Build a fresh world from the table template and the seeded balls.
    pub fn new(table: &StaticTable, seeds: &[BallSeed], config: &SimConfig) -> Self {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, config.gravity, 0.0));
        world.set_dt(config.dt);
        world.set_solver_iterations(config.early_solver_iterations);

        for collider in table.immovable_colliders() {
            world.insert_fixed_collider(
                ColliderTag::Static(collider.role).to_user_data(),
                collider.shape,
                collider.position,
                collider.rotation,
                config.material_for(collider.role),
            );
        }

        let material = config.ball_material();
        let shape = ColliderDesc::Ball {
            radius: config.ball_radius,
        };
        let balls: Vec<Ball> = seeds
            .iter()
            .map(|seed| {
                let desc = BodyDesc::dynamic(shape)
                    .with_position(seed.position)
                    .with_rotation(seed.orientation)
                    .with_ccd(true)
                    .with_can_sleep(false);
                let body =
                    world.create_body(ColliderTag::Ball(seed.id).to_user_data(), &desc, material);
                Ball {
                    id: seed.id,
                    color: seed.color,
                    body,
                    start: seed.position,
                }
            })
            .collect();

        let cue = seeds.iter().find(|s| s.color.is_cue()).map(|s| s.id);
        if cue.is_none() {
            log::warn!("Simulation run seeded without a cue ball");
        }

        Self {
            config: config.clone(),
            world,
            balls,
            cue,
            potted: ColorCounts::default(),
            left_table: ColorCounts::default(),
            first_contact: None,
            steps: 0,
            state: RunState::Running,
        }
    }

    /// Strike the cue ball. Ignored once complete or when there is no cue
    /// ball in play.
    pub fn apply_shot(&mut self, shot: &Shot) {
        if self.is_complete() {
            return;
        }
        let Some(cue) = self.cue_ball() else {
            log::warn!("Shot ignored: no cue ball in play");
            return;
        };
        let body = cue.body;

        let response = shot::strike(shot, self.config.ball_radius, self.config.ball_mass);
        let mut linvel = self.world.velocity(&body) + response.linvel;
        if let Some(jump) = shot.jump_speed.filter(|&j| j > 0.0) {
            linvel.y = jump;
        }
        let angvel = self.world.angular_velocity(&body) + response.angvel;
        self.world.set_velocity(&body, linvel);
        self.world.set_angular_velocity(&body, angvel);
    }

    /// Advance one fixed timestep. Returns the balls potted or lost during it.
    pub fn step(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        if self.is_complete() {
            return events;
        }

        let iterations = if self.steps < self.config.early_steps {
            self.config.early_solver_iterations
        } else {
            self.config.solver_iterations
        };
        self.world.set_solver_iterations(iterations);
        self.world.step();

        if self.first_contact.is_none() {
            self.detect_first_contact();
        }

        let platform = ColliderTag::Static(BodyRole::PocketPlatform).to_user_data();
        let mut all_stopped = true;
        let mut index = 0;
        while index < self.balls.len() {
            let body = self.balls[index].body;
            if self.world.touching(&body).contains(&platform) {
                events.push(self.remove_ball(index, true));
                continue;
            }

            let (position, _) = self.world.body_position(&body);
            if position.y < self.config.min_height {
                events.push(self.remove_ball(index, false));
                continue;
            }

            let mut motion = friction::BallMotion {
                linvel: self.world.velocity(&body),
                angvel: self.world.angular_velocity(&body),
                height: position.y,
            };
            friction::apply(&mut motion, &self.config);
            self.world.set_velocity(&body, motion.linvel);
            self.world.set_angular_velocity(&body, motion.angvel);
            let falling = motion.linvel.y.abs() > self.config.stop_speed;
            if falling || !friction::is_stopped(&motion, &self.config) {
                all_stopped = false;
            }
            index += 1;
        }

        self.steps += 1;

        let settled = all_stopped && self.steps >= self.config.min_steps;
        if settled || self.steps >= self.config.max_steps {
            self.finish(&mut events);
        }
        events
    }

    /// Step until complete, collecting every event.
    pub fn run_to_completion(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        while !self.is_complete() {
            events.extend(self.step());
        }
        events
    }

    pub fn is_complete(&self) -> bool {
        self.state == RunState::Complete
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn step_count(&self) -> u32 {
        self.steps
    }

    pub fn potted(&self) -> ColorCounts {
        self.potted
    }

    pub fn left_table(&self) -> ColorCounts {
        self.left_table
    }

    pub fn first_contact(&self) -> Option<FirstContact> {
        self.first_contact
    }

    pub fn has_cue_ball(&self) -> bool {
        self.cue.is_some()
    }

    /// Balls still in play, in seed order.
    pub fn live_balls(&self) -> Vec<BallView> {
        self.balls
            .iter()
            .map(|ball| BallView {
                id: ball.id,
                color: ball.color,
                position: self.world.body_position(&ball.body).0,
            })
            .collect()
    }

    /// Terminal data for the rule evaluator. Meaningful once complete.
    pub fn outcome(&self) -> ShotOutcome {
        let movements = self
            .balls
            .iter()
            .filter(|ball| !ball.color.is_cue())
            .map(|ball| BallMovement {
                id: ball.id,
                color: ball.color,
                start: ball.start,
                end: self.world.body_position(&ball.body).0,
            })
            .collect();
        ShotOutcome {
            potted: self.potted,
            left_table: self.left_table,
            first_contact: self.first_contact,
            has_cue_ball: self.cue.is_some(),
            movements,
        }
    }

    /// Score this run with the rule evaluator.
    pub fn score(
        &self,
        table: &StaticTable,
        context: &ShotContext,
        weights: &ScoreWeights,
    ) -> ShotResult {
        rules::evaluate(&self.outcome(), context, weights, table.pockets())
    }

    fn cue_ball(&self) -> Option<&Ball> {
        let cue = self.cue?;
        self.balls.iter().find(|ball| ball.id == cue)
    }

    /// Record the first object ball the cue ball strikes, with its speed
    /// after the impulse. Contacts that are only predicted (no impulse yet)
    /// do not count. Simultaneous contacts resolve to the lowest id.
    fn detect_first_contact(&mut self) {
        let Some(cue) = self.cue_ball() else {
            return;
        };
        let contacted = self
            .world
            .impacting(&cue.body)
            .into_iter()
            .filter_map(|tag| match ColliderTag::from_user_data(tag) {
                Some(ColliderTag::Ball(id)) => Some(id),
                _ => None,
            })
            .filter_map(|id| self.balls.iter().find(|b| b.id == id && !b.color.is_cue()))
            .min_by_key(|ball| ball.id)
            .map(|ball| (ball.id, ball.color, ball.body));

        if let Some((ball, color, body)) = contacted {
            let speed = self.world.velocity(&body).length();
            log::trace!(
                "First contact: {} ball {:?} at speed {:.2} (step {})",
                color.as_str(),
                ball,
                speed,
                self.steps
            );
            self.first_contact = Some(FirstContact { ball, color, speed });
        }
    }

    fn remove_ball(&mut self, index: usize, potted: bool) -> SimEvent {
        let ball = self.balls.remove(index);
        self.world.remove_body(&ball.body);
        let (ball_id, color) = (ball.id, ball.color);
        if potted {
            self.potted.increment(color);
            log::debug!("Potted {} ball {:?} at step {}", color.as_str(), ball_id, self.steps);
            SimEvent::Potted { ball: ball_id, color }
        } else {
            self.left_table.increment(color);
            log::debug!("{} ball {:?} left the table at step {}", color.as_str(), ball_id, self.steps);
            SimEvent::LeftTable { ball: ball_id, color }
        }
    }

    /// Anything still resting above the bed (on a rail, in a jaw) at the end
    /// of the run is off the table.
    fn finish(&mut self, events: &mut Vec<SimEvent>) {
        let ceiling = self.config.ball_radius + self.config.resting_height_tolerance;
        let mut index = 0;
        while index < self.balls.len() {
            let (position, _) = self.world.body_position(&self.balls[index].body);
            if position.y > ceiling {
                events.push(self.remove_ball(index, false));
            } else {
                index += 1;
            }
        }
        self.state = RunState::Complete;
        log::debug!(
            "Run complete after {} steps: potted {:?}, left table {:?}",
            self.steps,
            self.potted,
            self.left_table
        );
    }
}
