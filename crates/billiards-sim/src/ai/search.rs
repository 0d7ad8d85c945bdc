//! Monte Carlo shot search.
//!
//! Simulates candidate shots in batches, each in its own `SimulationRun`,
//! and stops at the first candidate that pots cleanly. The caller drives it
//! one `run_batch` at a time so it can yield between batches; dropping the
//! search cancels it.

use glam::{Quat, Vec2, Vec3};

use crate::ai::candidates::CandidateSource;
use crate::ai::rng::Rng;
use crate::api::config::{PoolConfig, ScoreWeights, SearchConfig, SimConfig};
use crate::api::types::{BallColor, BallSeed, Shot, ShotContext, ShotResult};
use crate::core::table::StaticTable;
use crate::sim::outcome::BallView;
use crate::sim::run::SimulationRun;

/// The shot the search settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub shot: Shot,
    pub result: ShotResult,
    pub candidates_evaluated: u32,
    /// Nothing to aim at (or no cue ball): the shot is a placeholder.
    pub guaranteed_foul: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    Pending,
    Done(Plan),
}

pub struct ShotSearch<'a, S: CandidateSource> {
    table: &'a StaticTable,
    seeds: Vec<BallSeed>,
    context: ShotContext,
    physics: SimConfig,
    weights: ScoreWeights,
    config: SearchConfig,
    source: S,
    rng: Rng,
    cue: Option<Vec3>,
    targets: Vec<BallView>,
    best: Option<(Shot, ShotResult)>,
    evaluated: u32,
    plan: Option<Plan>,
}

impl<'a, S: CandidateSource> ShotSearch<'a, S> {
    pub fn new(
        table: &'a StaticTable,
        seeds: &[BallSeed],
        context: ShotContext,
        config: &PoolConfig,
        source: S,
    ) -> Self {
        let cue = seeds.iter().find(|s| s.color.is_cue()).map(|s| s.position);
        let targets = aim_targets(seeds, &context);
        Self {
            table,
            seeds: seeds.to_vec(),
            context,
            physics: config.physics.clone(),
            weights: config.scoring.clone(),
            config: config.search.clone(),
            source,
            // Refinement draws from its own stream so it never shifts the
            // candidate sequence.
            rng: Rng::new(config.search.seed.rotate_left(32) ^ 0x9E37_79B9),
            cue,
            targets,
            best: None,
            evaluated: 0,
            plan: None,
        }
    }

    /// Simulate up to `batch_size` candidates.
    pub fn run_batch(&mut self) -> SearchStatus {
        if let Some(plan) = &self.plan {
            return SearchStatus::Done(plan.clone());
        }

        let Some(cue) = self.cue.filter(|_| !self.targets.is_empty()) else {
            log::info!("Nothing to aim at; playing the fallback shot");
            return self.finish_with_fallback(true);
        };

        for _ in 0..self.config.batch_size.max(1) {
            if self.evaluated >= self.config.max_candidates {
                break;
            }
            let shot = self.source.next_candidate(cue, &self.targets);
            let result = self.simulate(&shot);
            self.evaluated += 1;

            if result.is_clean_pot() {
                log::info!(
                    "Clean pot after {} candidates (score {:.1})",
                    self.evaluated,
                    result.score
                );
                return self.finish(Plan {
                    shot,
                    result,
                    candidates_evaluated: self.evaluated,
                    guaranteed_foul: false,
                });
            }
            self.consider(shot, result);
        }

        if self.evaluated < self.config.max_candidates {
            return SearchStatus::Pending;
        }

        self.refine();
        match self.best {
            Some((shot, result)) => {
                log::info!(
                    "Search budget spent after {} candidates (best score {:.1})",
                    self.evaluated,
                    result.score
                );
                self.finish(Plan {
                    shot,
                    result,
                    candidates_evaluated: self.evaluated,
                    guaranteed_foul: false,
                })
            }
            // Zero budget: nothing was tried, but the table is playable.
            None => self.finish_with_fallback(false),
        }
    }

    /// Run batches until done.
    pub fn run_to_end(&mut self) -> Plan {
        loop {
            if let SearchStatus::Done(plan) = self.run_batch() {
                return plan;
            }
        }
    }

    pub fn candidates_evaluated(&self) -> u32 {
        self.evaluated
    }

    fn simulate(&self, shot: &Shot) -> ShotResult {
        let mut run = SimulationRun::new(self.table, &self.seeds, &self.physics);
        run.apply_shot(shot);
        run.run_to_completion();
        run.score(self.table, &self.context, &self.weights)
    }

    fn consider(&mut self, shot: Shot, result: ShotResult) {
        let better = match &self.best {
            Some((_, best)) => result.score > best.score,
            None => true,
        };
        if better {
            log::debug!("New best candidate: score {:.1}", result.score);
            self.best = Some((shot, result));
        }
    }

    /// Nudge a best shot that pots nothing and scores middling: harder,
    /// with backspin, and a slightly different angle.
    fn refine(&mut self) {
        let Some((shot, result)) = self.best else {
            return;
        };
        let c = &self.config;
        let middling = result.score > c.refine_min_score && result.score < c.refine_max_score;
        if result.potted.object_balls() > 0 || !middling {
            return;
        }

        let harder = Shot {
            force: shot.force * c.refine_power_scale,
            ..shot
        };
        let backspin = Shot {
            strike_offset: Vec2::new(shot.strike_offset.x, c.refine_backspin),
            ..shot
        };
        let turn = Quat::from_rotation_y(self.rng.range(-c.refine_angle, c.refine_angle));
        let turned = Shot {
            force: turn * shot.force,
            ..shot
        };

        log::debug!("Refining best shot (score {:.1})", result.score);
        for variation in [harder, backspin, turned] {
            let result = self.simulate(&variation);
            self.evaluated += 1;
            self.consider(variation, result);
        }
    }

    fn finish_with_fallback(&mut self, guaranteed_foul: bool) -> SearchStatus {
        let shot = Shot::new(Vec3::X * self.config.fallback_power);
        let result = self.simulate(&shot);
        self.finish(Plan {
            shot,
            result,
            candidates_evaluated: self.evaluated,
            guaranteed_foul,
        })
    }

    fn finish(&mut self, plan: Plan) -> SearchStatus {
        self.plan = Some(plan.clone());
        SearchStatus::Done(plan)
    }
}

/// Object balls worth aiming at: the shooter's own group (plus a black they
/// may pot), or every red and blue on an open table. Falls back to any
/// object ball when none of those remain.
fn aim_targets(seeds: &[BallSeed], context: &ShotContext) -> Vec<BallView> {
    let object: Vec<BallView> = seeds
        .iter()
        .filter(|s| !s.color.is_cue())
        .map(|s| BallView {
            id: s.id,
            color: s.color,
            position: s.position,
        })
        .collect();

    let legal: Vec<BallView> = object
        .iter()
        .copied()
        .filter(|b| match context.assigned {
            Some(own) => b.color == own || (b.color == BallColor::Black && context.can_pot_black),
            None => b.color != BallColor::Black,
        })
        .collect();

    if legal.is_empty() {
        object
    } else {
        legal
    }
}
