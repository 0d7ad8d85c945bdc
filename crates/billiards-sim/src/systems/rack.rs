//! Rack layout: 7 red, 7 blue and the black, plus the cue ball.

use glam::{Vec2, Vec3};

use crate::api::types::{BallColor, BallId, BallSeed};
use crate::core::table::TableDimensions;

/// Gap left between neighbouring racked balls so none start in contact.
const RACK_CLEARANCE: f32 = 0.01;

/// Triangle rack layout relative to the apex ball.
/// The apex points toward -X (the cue ball), rows spread toward +X.
///
/// ```text
///  R
///  B  R
///  R  K  B
///  B  R  B  R
///  R  B  R  B  B
/// ```
const LAYOUT: [(BallColor, usize, f32); 15] = [
    (BallColor::Red, 0, 0.0),
    (BallColor::Blue, 1, -0.5),
    (BallColor::Red, 1, 0.5),
    (BallColor::Red, 2, -1.0),
    (BallColor::Black, 2, 0.0),
    (BallColor::Blue, 2, 1.0),
    (BallColor::Blue, 3, -1.5),
    (BallColor::Red, 3, -0.5),
    (BallColor::Blue, 3, 0.5),
    (BallColor::Red, 3, 1.5),
    (BallColor::Red, 4, -2.0),
    (BallColor::Blue, 4, -1.0),
    (BallColor::Red, 4, 0.0),
    (BallColor::Blue, 4, 1.0),
    (BallColor::Blue, 4, 2.0),
];

/// Bed-plane (x, z) positions of the 15 racked balls, in `LAYOUT` order.
pub fn rack_positions(apex: Vec2, ball_radius: f32) -> [Vec2; 15] {
    let gap = ball_radius * 2.0 + RACK_CLEARANCE;
    let row_offset = gap * 0.866; // sqrt(3)/2 for an equilateral triangle

    let mut positions = [Vec2::ZERO; 15];
    for (slot, &(_, row, lateral)) in LAYOUT.iter().enumerate() {
        positions[slot] = Vec2::new(apex.x + row as f32 * row_offset, apex.y + lateral * gap);
    }
    positions
}

/// Cue ball (id 0) on the head spot and a full rack (ids 1..=15) on the
/// foot spot, all resting on the bed.
pub fn standard_rack(dims: &TableDimensions, ball_radius: f32) -> Vec<BallSeed> {
    let head = Vec2::new(-dims.half_length / 2.0, 0.0);
    let foot = Vec2::new(dims.half_length / 2.0, 0.0);

    let mut seeds = Vec::with_capacity(16);
    seeds.push(BallSeed::new(
        BallId(0),
        BallColor::White,
        Vec3::new(head.x, ball_radius, head.y),
    ));
    for (slot, pos) in rack_positions(foot, ball_radius).iter().enumerate() {
        seeds.push(BallSeed::new(
            BallId(slot as u32 + 1),
            LAYOUT[slot].0,
            Vec3::new(pos.x, ball_radius, pos.y),
        ));
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rack_has_seven_of_each_group_and_one_black() {
        let seeds = standard_rack(&TableDimensions::default(), 0.5);
        let count = |c| seeds.iter().filter(|s| s.color == c).count();
        assert_eq!(seeds.len(), 16);
        assert_eq!(count(BallColor::White), 1);
        assert_eq!(count(BallColor::Red), 7);
        assert_eq!(count(BallColor::Blue), 7);
        assert_eq!(count(BallColor::Black), 1);
    }

    #[test]
    fn racked_balls_do_not_overlap() {
        let r = 0.5;
        let positions = rack_positions(Vec2::new(10.0, 0.0), r);
        for i in 0..positions.len() {
            for j in (i + 1)..positions.len() {
                let d = positions[i].distance(positions[j]);
                assert!(d >= 2.0 * r, "balls {} and {} overlap: {}", i, j, d);
            }
        }
    }

    #[test]
    fn black_sits_in_the_middle_of_the_third_row() {
        let positions = rack_positions(Vec2::new(10.0, 0.0), 0.5);
        let black = LAYOUT.iter().position(|l| l.0 == BallColor::Black).unwrap();
        assert_eq!(LAYOUT[black].1, 2);
        assert!((positions[black].y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn everything_starts_on_the_bed() {
        let dims = TableDimensions::default();
        for seed in standard_rack(&dims, 0.5) {
            assert!(seed.position.x.abs() < dims.half_length);
            assert!(seed.position.z.abs() < dims.half_width);
            assert!((seed.position.y - 0.5).abs() < 1e-6);
        }
    }
}
