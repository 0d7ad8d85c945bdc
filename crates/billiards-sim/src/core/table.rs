//! Immovable table geometry: cushions, jaws, wood trim, pocket backstops,
//! pocket platforms and the playing bed.
//!
//! Coordinates are Y up. The bed surface is the plane `y = 0` and the play
//! area (inside the cushion faces) is `|x| <= half_length`, `|z| <= half_width`.

use std::f32::consts::FRAC_1_SQRT_2;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::physics::ColliderDesc;

/// Role of a static collider. Materials are assigned per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRole {
    Cushion,
    Wood,
    PocketBackstop,
    PocketPlatform,
    TableGround,
}

/// Named table constants. Every collider position is derived from these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDimensions {
    pub half_length: f32,
    pub half_width: f32,
    pub bed_thickness: f32,
    pub cushion_depth: f32,
    pub cushion_height: f32,
    pub wood_width: f32,
    /// Height of the wood trim; above `cushion_height`.
    pub wood_height: f32,
    /// Distance from a bed corner to where the cushions start.
    pub corner_gap: f32,
    /// Full width of the middle-pocket opening.
    pub side_gap: f32,
    /// Length of the 45° jaw at each cushion end.
    pub jaw_length: f32,
    pub jaw_thickness: f32,
    /// How far the pocket platform top sits below the bed surface.
    pub platform_drop: f32,
    pub platform_thickness: f32,
    /// How far a corner platform extends past the bed edges.
    pub corner_pocket_depth: f32,
    /// How far a middle platform extends past the bed edge.
    pub side_pocket_depth: f32,
    pub backstop_height: f32,
    pub backstop_thickness: f32,
    /// Lean of the backstops toward the pocket, in radians.
    pub backstop_tilt: f32,
}

impl Default for TableDimensions {
    fn default() -> Self {
        Self {
            half_length: 20.0,
            half_width: 10.0,
            bed_thickness: 1.0,
            cushion_depth: 0.6,
            cushion_height: 0.7,
            wood_width: 0.6,
            wood_height: 0.95,
            corner_gap: 1.6,
            side_gap: 2.2,
            jaw_length: 0.5,
            jaw_thickness: 0.1,
            platform_drop: 0.2,
            platform_thickness: 0.2,
            corner_pocket_depth: 2.0,
            side_pocket_depth: 1.7,
            backstop_height: 1.6,
            backstop_thickness: 0.2,
            backstop_tilt: 0.3,
        }
    }
}

/// One immovable collider of the template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticCollider {
    pub role: BodyRole,
    pub shape: ColliderDesc,
    pub position: Vec3,
    pub rotation: Quat,
    /// Always zero for table geometry; runs skip anything else.
    pub mass: f32,
}

impl StaticCollider {
    fn cuboid(role: BodyRole, half_extents: Vec3, position: Vec3, rotation: Quat) -> Self {
        Self {
            role,
            shape: ColliderDesc::Cuboid { half_extents },
            position,
            rotation,
            mass: 0.0,
        }
    }

    pub fn is_immovable(&self) -> bool {
        self.mass == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PocketKind {
    Corner,
    Middle,
}

/// A pocket: where its mouth meets the bed edge, and its platform center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub kind: PocketKind,
    pub mouth: Vec3,
    pub platform_center: Vec3,
}

/// Build-once table template. Never mutated after `build`; simulation runs
/// read it to populate their own worlds.
#[derive(Debug, Clone)]
pub struct StaticTable {
    dims: TableDimensions,
    colliders: Vec<StaticCollider>,
    pockets: Vec<Pocket>,
}

/// A straight cushion segment along one rail.
struct Segment {
    /// Face-line end points (on the bed edge), ordered along `along`.
    start: Vec2,
    end: Vec2,
    along: Vec2,
    /// Unit normal pointing away from the play area.
    outward: Vec2,
}

fn xz(v: Vec2, y: f32) -> Vec3 {
    Vec3::new(v.x, y, v.y)
}

/// Yaw that maps local +X onto the horizontal direction `dir`.
fn yaw_to(dir: Vec2) -> Quat {
    Quat::from_rotation_y((-dir.y).atan2(dir.x))
}

impl StaticTable {
    pub fn build(dims: &TableDimensions) -> Self {
        let mut table = Self {
            dims: dims.clone(),
            colliders: Vec::with_capacity(64),
            pockets: Vec::with_capacity(6),
        };
        let segments = table.cushion_segments();
        table.add_ground(&segments);
        table.add_cushions(&segments);
        table.add_pockets();
        log::debug!(
            "Static table built: {} colliders, {} pockets",
            table.colliders.len(),
            table.pockets.len()
        );
        table
    }

    pub fn dimensions(&self) -> &TableDimensions {
        &self.dims
    }

    pub fn colliders(&self) -> &[StaticCollider] {
        &self.colliders
    }

    /// Only the colliders a simulation run should copy.
    pub fn immovable_colliders(&self) -> impl Iterator<Item = &StaticCollider> {
        self.colliders.iter().filter(|c| c.is_immovable())
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    /// True when `(x, z)` lies on the playing bed inside the cushion faces.
    pub fn is_on_bed(&self, x: f32, z: f32) -> bool {
        x.abs() <= self.dims.half_length && z.abs() <= self.dims.half_width
    }

    fn push(&mut self, collider: StaticCollider) {
        self.colliders.push(collider);
    }

    /// Two end cushions and four side cushions split by the middle pockets.
    fn cushion_segments(&self) -> Vec<Segment> {
        let d = &self.dims;
        let (hl, hw) = (d.half_length, d.half_width);
        let mut segments = Vec::with_capacity(6);
        for sz in [-1.0f32, 1.0] {
            let outward = Vec2::new(0.0, sz);
            segments.push(Segment {
                start: Vec2::new(-hl + d.corner_gap, sz * hw),
                end: Vec2::new(-d.side_gap / 2.0, sz * hw),
                along: Vec2::X,
                outward,
            });
            segments.push(Segment {
                start: Vec2::new(d.side_gap / 2.0, sz * hw),
                end: Vec2::new(hl - d.corner_gap, sz * hw),
                along: Vec2::X,
                outward,
            });
        }
        for sx in [-1.0f32, 1.0] {
            segments.push(Segment {
                start: Vec2::new(sx * hl, -hw + d.corner_gap),
                end: Vec2::new(sx * hl, hw - d.corner_gap),
                along: Vec2::Y,
                outward: Vec2::new(sx, 0.0),
            });
        }
        segments
    }

    fn add_ground(&mut self, segments: &[Segment]) {
        let d = self.dims.clone();
        self.push(StaticCollider::cuboid(
            BodyRole::TableGround,
            Vec3::new(d.half_length, d.bed_thickness / 2.0, d.half_width),
            Vec3::new(0.0, -d.bed_thickness / 2.0, 0.0),
            Quat::IDENTITY,
        ));

        // Ledges under each cushion + wood strip, flush with the bed.
        let rail_depth = d.cushion_depth + d.wood_width;
        for seg in segments {
            let mid = (seg.start + seg.end) / 2.0 + seg.outward * (rail_depth / 2.0);
            let half_len = (seg.end - seg.start).length() / 2.0;
            self.push(StaticCollider::cuboid(
                BodyRole::TableGround,
                Vec3::new(half_len, d.bed_thickness / 2.0, rail_depth / 2.0),
                xz(mid, -d.bed_thickness / 2.0),
                yaw_to(seg.along),
            ));
        }
    }

    fn add_cushions(&mut self, segments: &[Segment]) {
        let d = self.dims.clone();
        for seg in segments {
            let half_len = (seg.end - seg.start).length() / 2.0;
            let mid = (seg.start + seg.end) / 2.0;
            let yaw = yaw_to(seg.along);

            self.push(StaticCollider::cuboid(
                BodyRole::Cushion,
                Vec3::new(half_len, d.cushion_height / 2.0, d.cushion_depth / 2.0),
                xz(mid + seg.outward * (d.cushion_depth / 2.0), d.cushion_height / 2.0),
                yaw,
            ));

            self.push(StaticCollider::cuboid(
                BodyRole::Wood,
                Vec3::new(half_len, d.wood_height / 2.0, d.wood_width / 2.0),
                xz(
                    mid + seg.outward * (d.cushion_depth + d.wood_width / 2.0),
                    d.wood_height / 2.0,
                ),
                yaw,
            ));

            // 45° jaws easing each cushion end into its pocket mouth.
            for (corner, toward_pocket) in [(seg.start, -seg.along), (seg.end, seg.along)] {
                let dir = (seg.outward + toward_pocket) * FRAC_1_SQRT_2;
                let center = corner + dir * (d.jaw_length / 2.0);
                self.push(StaticCollider::cuboid(
                    BodyRole::Cushion,
                    Vec3::new(d.jaw_length / 2.0, d.cushion_height / 2.0, d.jaw_thickness / 2.0),
                    xz(center, d.cushion_height / 2.0),
                    yaw_to(dir),
                ));
            }
        }
    }

    fn add_pockets(&mut self) {
        let d = self.dims.clone();
        let (hl, hw) = (d.half_length, d.half_width);
        let platform_y = -d.platform_drop - d.platform_thickness / 2.0;
        let backstop_y = d.backstop_height / 2.0 - d.platform_drop - d.platform_thickness;

        // Corner platforms reach back under the bed so a ball dropping off
        // either edge lands on them.
        let overlap = d.corner_gap / 2.0;
        let corner_half = (d.corner_pocket_depth + overlap) / 2.0;
        for sx in [-1.0f32, 1.0] {
            for sz in [-1.0f32, 1.0] {
                let offset = (d.corner_pocket_depth - overlap) / 2.0;
                let center = Vec2::new(sx * (hl + offset), sz * (hw + offset));
                self.push(StaticCollider::cuboid(
                    BodyRole::PocketPlatform,
                    Vec3::new(corner_half, d.platform_thickness / 2.0, corner_half),
                    xz(center, platform_y),
                    Quat::IDENTITY,
                ));

                // Two plates close the back of the corner, each leaning in.
                let far = Vec2::new(sx * (hl + d.corner_pocket_depth), sz * (hw + d.corner_pocket_depth));
                let back_x = Vec2::new(far.x + sx * d.backstop_thickness / 2.0, center.y);
                let back_z = Vec2::new(center.x, far.y + sz * d.backstop_thickness / 2.0);
                self.push_backstop(back_x, Vec2::new(-sx, 0.0), corner_half, backstop_y);
                self.push_backstop(back_z, Vec2::new(0.0, -sz), corner_half, backstop_y);

                self.pockets.push(Pocket {
                    kind: PocketKind::Corner,
                    mouth: Vec3::new(sx * hl, 0.0, sz * hw),
                    platform_center: xz(center, -d.platform_drop),
                });
            }
        }

        for sz in [-1.0f32, 1.0] {
            let depth = d.side_pocket_depth;
            let half_x = d.side_gap / 2.0 + d.jaw_thickness;
            let center = Vec2::new(0.0, sz * (hw + depth / 2.0));
            self.push(StaticCollider::cuboid(
                BodyRole::PocketPlatform,
                Vec3::new(half_x, d.platform_thickness / 2.0, depth / 2.0),
                xz(center, platform_y),
                Quat::IDENTITY,
            ));
            let back = Vec2::new(0.0, sz * (hw + depth + d.backstop_thickness / 2.0));
            self.push_backstop(back, Vec2::new(0.0, -sz), half_x + d.cushion_depth, backstop_y);

            self.pockets.push(Pocket {
                kind: PocketKind::Middle,
                mouth: Vec3::new(0.0, 0.0, sz * hw),
                platform_center: xz(center, -d.platform_drop),
            });
        }
    }

    /// A plate at `at` whose face points along `inward` (toward the pocket),
    /// leaning its top over the pocket by `backstop_tilt`.
    fn push_backstop(&mut self, at: Vec2, inward: Vec2, half_len: f32, y: f32) {
        let d = &self.dims;
        // Local +Z is the plate normal; yaw it onto `inward`, then lean.
        let yaw = Quat::from_rotation_y(inward.x.atan2(inward.y));
        let rotation = yaw * Quat::from_rotation_x(d.backstop_tilt);
        let collider = StaticCollider::cuboid(
            BodyRole::PocketBackstop,
            Vec3::new(half_len, d.backstop_height / 2.0, d.backstop_thickness / 2.0),
            xz(at, y),
            rotation,
        );
        self.push(collider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> StaticTable {
        StaticTable::build(&TableDimensions::default())
    }

    fn count(table: &StaticTable, role: BodyRole) -> usize {
        table.colliders().iter().filter(|c| c.role == role).count()
    }

    #[test]
    fn collider_inventory() {
        let t = table();
        // 6 cushion segments + 12 jaws
        assert_eq!(count(&t, BodyRole::Cushion), 18);
        assert_eq!(count(&t, BodyRole::Wood), 6);
        // 2 per corner + 1 per middle pocket
        assert_eq!(count(&t, BodyRole::PocketBackstop), 10);
        assert_eq!(count(&t, BodyRole::PocketPlatform), 6);
        // bed + one ledge per cushion segment
        assert_eq!(count(&t, BodyRole::TableGround), 7);
        assert_eq!(t.pockets().len(), 6);
        assert!(t.colliders().iter().all(|c| c.is_immovable()));
    }

    #[test]
    fn cushion_segments_meet_pocket_gaps() {
        let t = table();
        let d = t.dimensions();
        for seg in t.cushion_segments() {
            let len = (seg.end - seg.start).length();
            if seg.along == Vec2::X {
                let expected = d.half_length - d.corner_gap - d.side_gap / 2.0;
                assert!((len - expected).abs() < 1e-4, "side segment length {}", len);
                let inner = seg.start.x.abs().min(seg.end.x.abs());
                assert!((inner - d.side_gap / 2.0).abs() < 1e-4);
            } else {
                let expected = 2.0 * (d.half_width - d.corner_gap);
                assert!((len - expected).abs() < 1e-4, "end segment length {}", len);
            }
        }
    }

    #[test]
    fn jaws_start_at_cushion_face_ends_at_45_degrees() {
        let t = table();
        let d = t.dimensions();
        let ends: Vec<Vec2> = t
            .cushion_segments()
            .iter()
            .flat_map(|s| [s.start, s.end])
            .collect();
        let jaws: Vec<&StaticCollider> = t
            .colliders()
            .iter()
            .filter(|c| {
                c.role == BodyRole::Cushion
                    && matches!(c.shape, ColliderDesc::Cuboid { half_extents } if (half_extents.x - d.jaw_length / 2.0).abs() < 1e-6)
            })
            .collect();
        assert_eq!(jaws.len(), 12);
        for jaw in jaws {
            let axis = jaw.rotation * Vec3::X;
            let axis2 = Vec2::new(axis.x, axis.z);
            // 45° to both table axes
            assert!((axis2.x.abs() - FRAC_1_SQRT_2).abs() < 1e-4, "axis {:?}", axis2);
            assert!((axis2.y.abs() - FRAC_1_SQRT_2).abs() < 1e-4, "axis {:?}", axis2);
            let center = Vec2::new(jaw.position.x, jaw.position.z);
            let tip_a = center - axis2 * (d.jaw_length / 2.0);
            let tip_b = center + axis2 * (d.jaw_length / 2.0);
            let touches = ends
                .iter()
                .any(|e| e.distance(tip_a) < 1e-4 || e.distance(tip_b) < 1e-4);
            assert!(touches, "jaw at {:?} does not start at a cushion end", center);
        }
    }

    #[test]
    fn platforms_sit_below_the_bed() {
        let t = table();
        let d = t.dimensions();
        for c in t.colliders().iter().filter(|c| c.role == BodyRole::PocketPlatform) {
            let ColliderDesc::Cuboid { half_extents } = c.shape else {
                panic!("platform should be a cuboid");
            };
            let top = c.position.y + half_extents.y;
            assert!((top + d.platform_drop).abs() < 1e-5, "platform top {}", top);
        }
        for p in t.pockets() {
            assert!(p.platform_center.y < 0.0);
            assert!(!t.is_on_bed(p.platform_center.x, p.platform_center.z));
        }
    }

    #[test]
    fn wood_is_taller_than_cushions() {
        let t = table();
        let top = |role| {
            t.colliders()
                .iter()
                .filter(|c| c.role == role)
                .map(|c| match c.shape {
                    ColliderDesc::Cuboid { half_extents } => c.position.y + half_extents.y,
                    ColliderDesc::Ball { radius } => c.position.y + radius,
                })
                .fold(f32::MIN, f32::max)
        };
        assert!(top(BodyRole::Wood) > top(BodyRole::Cushion));
    }

    #[test]
    fn mouths_are_on_the_bed_edge() {
        let t = table();
        for p in t.pockets() {
            assert!(t.is_on_bed(p.mouth.x, p.mouth.z));
        }
        let corners = t.pockets().iter().filter(|p| p.kind == PocketKind::Corner).count();
        assert_eq!(corners, 4);
    }
}
