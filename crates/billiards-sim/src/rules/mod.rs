//! Scoring of a finished shot under eight-ball style rules.
//!
//! Pure: reads a `ShotOutcome` and the shooter's `ShotContext`, never the
//! physics world.

use glam::{Vec2, Vec3};

use crate::api::config::ScoreWeights;
use crate::api::types::{BallColor, ShotContext, ShotResult};
use crate::core::table::Pocket;
use crate::sim::outcome::{BallMovement, ShotOutcome};

/// Score a finished shot.
pub fn evaluate(
    outcome: &ShotOutcome,
    context: &ShotContext,
    weights: &ScoreWeights,
    pockets: &[Pocket],
) -> ShotResult {
    let result = |score: f32, is_foul: bool| ShotResult {
        score,
        potted: outcome.potted,
        left_table: outcome.left_table,
        first_contact: outcome.first_contact_color(),
        is_foul,
    };

    if !outcome.has_cue_ball {
        return result(weights.missing_cue_score, true);
    }
    // Black down early ends the frame; nothing else matters.
    if outcome.potted.black > 0 && !context.can_pot_black {
        return result(weights.black_early_loss, true);
    }

    let foul = is_foul(outcome, context);
    let mut score = 0.0;
    if foul {
        score += weights.foul_penalty;
    }
    if outcome.first_contact.is_none() {
        score += weights.miss_penalty;
    }

    score += pot_score(outcome, context, weights);
    if outcome.potted.black > 0 {
        score += weights.black_legal_bonus;
    }

    if context.is_break && !foul {
        if let Some(contact) = outcome.first_contact {
            if contact.speed > weights.break_speed {
                score += weights.break_bonus;
            }
        }
    }

    if let Some(own) = context.assigned {
        score += near_pocket_score(&outcome.movements, own, weights, pockets);
    }

    result(score, foul)
}

/// Cue ball lost, any ball off the table, nothing hit, or an assigned player
/// hitting something other than their own group (or a black they may pot).
pub fn is_foul(outcome: &ShotOutcome, context: &ShotContext) -> bool {
    if outcome.cue_ball_lost() || outcome.left_table.total() > 0 {
        return true;
    }
    let Some(first) = outcome.first_contact_color() else {
        return true;
    };
    match context.assigned {
        Some(own) => {
            let legal_black = first == BallColor::Black && context.can_pot_black;
            first != own && !legal_black
        }
        None => false,
    }
}

fn pot_score(outcome: &ShotOutcome, context: &ShotContext, weights: &ScoreWeights) -> f32 {
    let potted = &outcome.potted;
    match context.assigned {
        Some(own) => {
            let mut score = potted.get(own) as f32 * weights.own_pot;
            if let Some(opponent) = own.opponent() {
                score += potted.get(opponent) as f32 * weights.opponent_pot;
            }
            score
        }
        None => (potted.red + potted.blue) as f32 * weights.open_pot,
    }
}

fn distance_to_nearest_pocket(position: Vec3, pockets: &[Pocket]) -> f32 {
    let at = Vec2::new(position.x, position.z);
    pockets
        .iter()
        .map(|p| at.distance(Vec2::new(p.mouth.x, p.mouth.z)))
        .fold(f32::INFINITY, f32::min)
}

/// Reward own-group balls nudged up to a pocket, penalise opponent balls.
fn near_pocket_score(
    movements: &[BallMovement],
    own: BallColor,
    weights: &ScoreWeights,
    pockets: &[Pocket],
) -> f32 {
    let radius = weights.near_pocket_radius;
    movements
        .iter()
        .filter(|m| {
            distance_to_nearest_pocket(m.start, pockets) >= radius
                && distance_to_nearest_pocket(m.end, pockets) < radius
        })
        .map(|m| {
            if m.color == own {
                weights.near_pocket_bonus
            } else if Some(m.color) == own.opponent() {
                weights.near_pocket_penalty
            } else {
                0.0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{BallId, ColorCounts};
    use crate::core::table::{StaticTable, TableDimensions};
    use crate::sim::outcome::FirstContact;

    fn pockets() -> Vec<Pocket> {
        StaticTable::build(&TableDimensions::default())
            .pockets()
            .to_vec()
    }

    fn contact(color: BallColor, speed: f32) -> Option<FirstContact> {
        Some(FirstContact {
            ball: BallId(1),
            color,
            speed,
        })
    }

    fn outcome(first_contact: Option<FirstContact>) -> ShotOutcome {
        ShotOutcome {
            first_contact,
            has_cue_ball: true,
            ..ShotOutcome::default()
        }
    }

    fn counts(red: u32, blue: u32, black: u32, white: u32) -> ColorCounts {
        ColorCounts {
            red,
            blue,
            black,
            white,
        }
    }

    fn score(outcome: &ShotOutcome, context: ShotContext) -> ShotResult {
        evaluate(outcome, &context, &ScoreWeights::default(), &pockets())
    }

    #[test]
    fn missing_cue_ball_is_a_heavy_foul() {
        let out = ShotOutcome::default();
        let result = score(&out, ShotContext::default());
        assert!(result.is_foul);
        assert_eq!(result.score, ScoreWeights::default().missing_cue_score);
    }

    #[test]
    fn early_black_short_circuits_everything() {
        let mut out = outcome(contact(BallColor::Red, 5.0));
        out.potted = counts(3, 0, 1, 1);
        let result = score(&out, ShotContext::for_player(Some(BallColor::Red), 2, false));
        assert!(result.is_foul);
        assert_eq!(result.score, ScoreWeights::default().black_early_loss);
        assert_eq!(result.potted.red, 3);
    }

    #[test]
    fn legal_black_earns_the_bonus() {
        let w = ScoreWeights::default();
        let mut out = outcome(contact(BallColor::Black, 5.0));
        out.potted = counts(0, 0, 1, 0);
        let result = score(&out, ShotContext::for_player(Some(BallColor::Red), 0, false));
        assert!(!result.is_foul);
        assert!((result.score - w.black_legal_bonus).abs() < 1e-4, "score {}", result.score);
    }

    #[test]
    fn clean_own_pot() {
        let w = ScoreWeights::default();
        let mut out = outcome(contact(BallColor::Blue, 5.0));
        out.potted = counts(0, 2, 0, 0);
        let result = score(&out, ShotContext::for_player(Some(BallColor::Blue), 5, false));
        assert!(!result.is_foul);
        assert!(result.is_clean_pot());
        assert!((result.score - 2.0 * w.own_pot).abs() < 1e-4);
    }

    #[test]
    fn opponent_pots_count_against() {
        let w = ScoreWeights::default();
        let mut out = outcome(contact(BallColor::Red, 5.0));
        out.potted = counts(1, 1, 0, 0);
        let result = score(&out, ShotContext::for_player(Some(BallColor::Red), 4, false));
        assert!((result.score - (w.own_pot + w.opponent_pot)).abs() < 1e-4);
    }

    #[test]
    fn open_table_pots_any_group() {
        let w = ScoreWeights::default();
        let mut out = outcome(contact(BallColor::Blue, 5.0));
        out.potted = counts(1, 1, 0, 0);
        let result = score(&out, ShotContext::default());
        assert!(!result.is_foul);
        assert!((result.score - 2.0 * w.open_pot).abs() < 1e-4);
    }

    #[test]
    fn no_contact_adds_miss_to_foul() {
        let w = ScoreWeights::default();
        let result = score(&outcome(None), ShotContext::default());
        assert!(result.is_foul);
        assert!((result.score - (w.foul_penalty + w.miss_penalty)).abs() < 1e-4);
    }

    #[test]
    fn wrong_group_first_is_a_foul() {
        let out = outcome(contact(BallColor::Blue, 5.0));
        let result = score(&out, ShotContext::for_player(Some(BallColor::Red), 3, false));
        assert!(result.is_foul);

        // Black first is only legal once the group is cleared.
        let out = outcome(contact(BallColor::Black, 5.0));
        assert!(score(&out, ShotContext::for_player(Some(BallColor::Red), 3, false)).is_foul);
        assert!(!score(&out, ShotContext::for_player(Some(BallColor::Red), 0, false)).is_foul);
    }

    #[test]
    fn scratch_and_lost_balls_are_fouls() {
        let mut scratch = outcome(contact(BallColor::Red, 5.0));
        scratch.potted = counts(1, 0, 0, 1);
        let result = score(&scratch, ShotContext::for_player(Some(BallColor::Red), 3, false));
        assert!(result.is_foul);
        assert!(!result.is_clean_pot());

        let mut jumped = outcome(contact(BallColor::Red, 5.0));
        jumped.left_table = counts(0, 1, 0, 0);
        assert!(score(&jumped, ShotContext::default()).is_foul);
    }

    #[test]
    fn hard_clean_break_earns_the_bonus() {
        let w = ScoreWeights::default();
        let hard = score(&outcome(contact(BallColor::Red, 20.0)), ShotContext::break_shot());
        let soft = score(&outcome(contact(BallColor::Red, 10.0)), ShotContext::break_shot());
        assert!((hard.score - w.break_bonus).abs() < 1e-4);
        assert_eq!(soft.score, 0.0);

        let mut fouled = outcome(contact(BallColor::Red, 20.0));
        fouled.potted = counts(0, 0, 0, 1);
        let result = score(&fouled, ShotContext::break_shot());
        assert!((result.score - w.foul_penalty).abs() < 1e-4);
    }

    #[test]
    fn balls_nudged_toward_pockets() {
        let w = ScoreWeights::default();
        let hw = TableDimensions::default().half_width;
        let mut out = outcome(contact(BallColor::Red, 5.0));
        out.movements = vec![
            // Own ball rolled up to the middle pocket.
            BallMovement {
                id: BallId(1),
                color: BallColor::Red,
                start: Vec3::new(0.0, 0.5, 0.0),
                end: Vec3::new(0.5, 0.5, hw - 1.0),
            },
            // Opponent ball likewise.
            BallMovement {
                id: BallId(2),
                color: BallColor::Blue,
                start: Vec3::new(5.0, 0.5, 0.0),
                end: Vec3::new(-0.5, 0.5, -hw + 1.0),
            },
            // Already near a pocket: no change.
            BallMovement {
                id: BallId(3),
                color: BallColor::Red,
                start: Vec3::new(0.0, 0.5, hw - 1.0),
                end: Vec3::new(0.0, 0.5, hw - 0.8),
            },
        ];
        let assigned = score(&out, ShotContext::for_player(Some(BallColor::Red), 5, false));
        let expected = w.near_pocket_bonus + w.near_pocket_penalty;
        assert!((assigned.score - expected).abs() < 1e-4, "score {}", assigned.score);

        let open = score(&out, ShotContext::default());
        assert_eq!(open.score, 0.0);
    }
}
