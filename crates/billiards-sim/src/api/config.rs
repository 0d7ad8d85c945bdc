use serde::{Deserialize, Serialize};

use crate::core::physics::ColliderMaterial;
use crate::core::table::{BodyRole, TableDimensions};

/// Physics tuning for a simulation run.
///
/// Units are table units (the ball radius defaults to 0.5) and seconds.
/// Y is up; the playing bed surface sits at `y = 0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub dt: f32,
    /// Vertical gravity (negative = down).
    pub gravity: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_restitution: f32,
    pub ball_friction: f32,

    /// Solver iterations used for the first `early_steps` steps of a run.
    pub early_solver_iterations: usize,
    pub early_steps: u32,
    /// Solver iterations for every later step.
    pub solver_iterations: usize,
    /// A run never completes on "all stopped" before this many steps.
    pub min_steps: u32,
    /// Hard step budget.
    pub max_steps: u32,

    /// Multiplicative vertical velocity decay per step.
    pub air_damping: f32,
    /// Constant rolling-friction force opposing horizontal travel.
    pub rolling_friction: f32,
    /// Below this horizontal speed no rolling friction or swerve is applied.
    pub min_rolling_speed: f32,
    /// Horizontal speed at or below which a ball counts as stopped.
    pub stop_speed: f32,
    /// Angular speed (per axis) at or below which spin counts as stopped.
    pub stop_spin: f32,
    /// Spin decay per step while slower than `slow_speed`.
    pub spin_damping_slow: f32,
    /// Spin decay per step otherwise.
    pub spin_damping_fast: f32,
    pub slow_speed: f32,
    /// Minimum |vertical spin| for swerve to kick in.
    pub swerve_min_spin: f32,
    /// Lateral force per unit of vertical spin.
    pub swerve_factor: f32,
    /// Tolerance on ball height for "resting on the bed".
    pub on_table_epsilon: f32,
    /// A ball whose center drops below this height has left the table.
    pub min_height: f32,
    /// At completion, a ball higher than `ball_radius + this` is not on the bed.
    pub resting_height_tolerance: f32,

    pub cushion_material: ColliderMaterial,
    pub wood_material: ColliderMaterial,
    pub backstop_material: ColliderMaterial,
    pub platform_material: ColliderMaterial,
    pub ground_material: ColliderMaterial,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            gravity: -25.0,
            ball_radius: 0.5,
            ball_mass: 1.0,
            ball_restitution: 0.95,
            ball_friction: 0.2,
            early_solver_iterations: 30,
            early_steps: 6,
            solver_iterations: 10,
            min_steps: 30,
            max_steps: 1500,
            air_damping: 0.999,
            rolling_friction: 1.5,
            min_rolling_speed: 0.01,
            stop_speed: 0.05,
            stop_spin: 0.02,
            spin_damping_slow: 0.98,
            spin_damping_fast: 0.991,
            slow_speed: 0.5,
            swerve_min_spin: 1.0,
            swerve_factor: 0.04,
            on_table_epsilon: 0.02,
            min_height: -2.0,
            resting_height_tolerance: 0.1,
            cushion_material: ColliderMaterial {
                restitution: 0.8,
                friction: 0.2,
                density: 1.0,
            },
            wood_material: ColliderMaterial {
                restitution: 0.5,
                friction: 0.3,
                density: 1.0,
            },
            backstop_material: ColliderMaterial {
                restitution: 0.1,
                friction: 0.5,
                density: 1.0,
            },
            platform_material: ColliderMaterial {
                restitution: 0.0,
                friction: 0.9,
                density: 1.0,
            },
            ground_material: ColliderMaterial {
                restitution: 0.3,
                friction: 0.6,
                density: 1.0,
            },
        }
    }
}

impl SimConfig {
    /// Material for a static collider, by role.
    pub fn material_for(&self, role: BodyRole) -> ColliderMaterial {
        match role {
            BodyRole::Cushion => self.cushion_material,
            BodyRole::Wood => self.wood_material,
            BodyRole::PocketBackstop => self.backstop_material,
            BodyRole::PocketPlatform => self.platform_material,
            BodyRole::TableGround => self.ground_material,
        }
    }

    /// Collider material for balls, with the density that yields `ball_mass`.
    pub fn ball_material(&self) -> ColliderMaterial {
        let volume = 4.0 / 3.0 * std::f32::consts::PI * self.ball_radius.powi(3);
        ColliderMaterial {
            restitution: self.ball_restitution,
            friction: self.ball_friction,
            density: self.ball_mass / volume,
        }
    }
}

/// Score contributions used by the rule evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Score when the black goes down before it may legally be potted.
    pub black_early_loss: f32,
    /// Score when the run had no cue ball at all.
    pub missing_cue_score: f32,
    pub foul_penalty: f32,
    /// Added on top of `foul_penalty` when nothing was hit.
    pub miss_penalty: f32,
    pub own_pot: f32,
    pub opponent_pot: f32,
    /// Per red/blue ball while colors are unassigned.
    pub open_pot: f32,
    pub black_legal_bonus: f32,
    pub break_bonus: f32,
    /// First-contact ball speed needed for the break bonus.
    pub break_speed: f32,
    pub near_pocket_radius: f32,
    pub near_pocket_bonus: f32,
    pub near_pocket_penalty: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            black_early_loss: -1000.0,
            missing_cue_score: -10000.0,
            foul_penalty: -50.0,
            miss_penalty: -30.0,
            own_pot: 100.0,
            opponent_pot: -40.0,
            open_pot: 80.0,
            black_legal_bonus: 500.0,
            break_bonus: 20.0,
            break_speed: 15.0,
            near_pocket_radius: 2.5,
            near_pocket_bonus: 15.0,
            near_pocket_penalty: -10.0,
        }
    }
}

/// Budget and sampling ranges for the AI shot search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_candidates: u32,
    /// Candidates simulated per `run_batch` call.
    pub batch_size: u32,
    pub min_power: f32,
    pub max_power: f32,
    /// Maximum aim deviation in radians, either side of the target line.
    pub aim_jitter: f32,
    /// Maximum strike offset in ball radii, per axis.
    pub max_spin_offset: f32,
    pub jump_chance: f32,
    /// Jump shots are only tried below this power.
    pub jump_power_ceiling: f32,
    pub min_jump_speed: f32,
    pub max_jump_speed: f32,
    /// Power of the shot played when there is nothing to aim at.
    pub fallback_power: f32,
    /// Refinement runs only for best scores strictly inside this range.
    pub refine_min_score: f32,
    pub refine_max_score: f32,
    pub refine_power_scale: f32,
    pub refine_backspin: f32,
    pub refine_angle: f32,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_candidates: 120,
            batch_size: 8,
            min_power: 6.0,
            max_power: 30.0,
            aim_jitter: 0.08,
            max_spin_offset: 0.5,
            jump_chance: 0.15,
            jump_power_ceiling: 14.0,
            min_jump_speed: 4.0,
            max_jump_speed: 7.0,
            fallback_power: 4.0,
            refine_min_score: -60.0,
            refine_max_score: 60.0,
            refine_power_scale: 1.25,
            refine_backspin: -0.5,
            refine_angle: 0.05,
            seed: 0x5EED,
        }
    }
}

/// Top-level configuration, loadable from JSON. Missing sections and fields
/// fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub table: TableDimensions,
    pub physics: SimConfig,
    pub scoring: ScoreWeights,
    pub search: SearchConfig,
}

impl PoolConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = PoolConfig::from_json("{}").unwrap();
        assert!((config.physics.dt - 1.0 / 60.0).abs() < 1e-6);
        assert_eq!(config.physics.early_solver_iterations, 30);
        assert_eq!(config.physics.solver_iterations, 10);
        assert_eq!(config.search.max_candidates, 120);
        assert!((config.scoring.break_speed - 15.0).abs() < 1e-6);
    }

    #[test]
    fn partial_sections_override_only_named_fields() {
        let json = r#"{
            "physics": { "max_steps": 600, "cushion_material": { "restitution": 0.7, "friction": 0.1, "density": 1.0 } },
            "scoring": { "foul_penalty": -80.0 },
            "search": { "seed": 7 }
        }"#;
        let config = PoolConfig::from_json(json).unwrap();
        assert_eq!(config.physics.max_steps, 600);
        assert!((config.physics.cushion_material.restitution - 0.7).abs() < 1e-6);
        assert!((config.physics.air_damping - 0.999).abs() < 1e-6);
        assert!((config.scoring.foul_penalty + 80.0).abs() < 1e-6);
        assert!((config.scoring.own_pot - 100.0).abs() < 1e-6);
        assert_eq!(config.search.seed, 7);
    }

    #[test]
    fn ball_density_yields_configured_mass() {
        let physics = SimConfig::default();
        let material = physics.ball_material();
        let volume = 4.0 / 3.0 * std::f32::consts::PI * physics.ball_radius.powi(3);
        assert!((material.density * volume - physics.ball_mass).abs() < 1e-5);
        assert_eq!(
            physics.material_for(BodyRole::Cushion),
            physics.cushion_material
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PoolConfig::from_json("{ \"physics\": 3 }").is_err());
    }
}
