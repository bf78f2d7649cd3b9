//! Placement classification and cut geometry
//!
//! The decision core of the game: given where a dropped block landed relative
//! to the previous top block, decide whether the drop was perfect, survivable
//! with a cut, survivable with added lean, or fatal. Pure functions - no
//! engine, clock or entity dependencies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::footprint::{Debris, Footprint};
use crate::consts::DEBRIS_EPSILON;
use crate::tuning::{GameConfig, SlicingMode};

/// The classified result of one drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementOutcome {
    /// The very first block: accepted verbatim as the foundation, only its
    /// elevation corrected. Never perfect, never cut, regardless of offset.
    Foundation(Footprint),
    /// Landed within the grace zone: snapped to the previous center with no
    /// clipping. `combo` is the streak length after this placement.
    Perfect {
        footprint: Footprint,
        combo: u32,
        /// Combo reward fired: width/depth grew before committing
        grew: bool,
    },
    /// Imperfect in Cut mode: clipped to the overlapping rectangle, with up
    /// to two severed pieces for the visual collaborator
    Sliced {
        footprint: Footprint,
        debris: Vec<Debris>,
    },
    /// Imperfect in NoCut mode: accepted whole, tower leans a little more
    Leaning {
        footprint: Footprint,
        instability: Vec2,
    },
    /// Cut mode with zero overlap on some axis - the block is lost
    MissedCut,
    /// Accumulated lean crossed the collapse threshold (NoCut mode)
    Collapse { instability: Vec2 },
    /// Landed on an older block instead of the tower top
    MissOldBlock,
    /// Never landed before the drop timeout fired
    MissVoid,
}

impl PlacementOutcome {
    /// The committed footprint, if this outcome keeps the tower growing
    pub fn accepted_footprint(&self) -> Option<&Footprint> {
        match self {
            PlacementOutcome::Foundation(fp)
            | PlacementOutcome::Perfect { footprint: fp, .. }
            | PlacementOutcome::Sliced { footprint: fp, .. }
            | PlacementOutcome::Leaning { footprint: fp, .. } => Some(fp),
            _ => None,
        }
    }

    pub fn is_perfect(&self) -> bool {
        matches!(self, PlacementOutcome::Perfect { .. })
    }

    /// True for every outcome that ends the run
    pub fn ends_game(&self) -> bool {
        matches!(
            self,
            PlacementOutcome::MissedCut
                | PlacementOutcome::Collapse { .. }
                | PlacementOutcome::MissOldBlock
                | PlacementOutcome::MissVoid
        )
    }
}

/// Classify one landed block against the current tower top.
///
/// `previous` must be a real block (positive width and depth) - the state
/// machine ends the run before a degenerate footprint can become the top.
/// `combo` and `instability` are the counters *before* this placement; the
/// outcome carries their updated values where relevant.
pub fn classify(
    previous: &Footprint,
    landed: &Footprint,
    score: u32,
    combo: u32,
    instability: Vec2,
    cfg: &GameConfig,
) -> PlacementOutcome {
    debug_assert!(
        !previous.is_degenerate(),
        "degenerate previous footprint reached classify: {previous:?}"
    );

    // The foundation is always accepted where it fell
    if score == 0 {
        return PlacementOutcome::Foundation(landed.settled_on(previous));
    }

    let diff = landed.center - previous.center;
    let grace = previous.extent / 2.0 * cfg.perfect_threshold;

    // Boundary is inclusive: an offset exactly at the grace limit is perfect
    if diff.x.abs() <= grace.x && diff.y.abs() <= grace.y {
        return perfect_placement(previous, landed, combo, cfg);
    }

    match cfg.slicing {
        SlicingMode::Cut => cut_placement(previous, landed, diff),
        SlicingMode::NoCut => nocut_placement(previous, landed, diff, instability, cfg),
    }
}

/// Snap to the previous center, eliminating drift. In Cut mode the block also
/// inherits the previous extent (a sliced tower would otherwise regrow), and
/// every `combo_threshold`-th perfect grows it as a reward.
fn perfect_placement(
    previous: &Footprint,
    landed: &Footprint,
    combo: u32,
    cfg: &GameConfig,
) -> PlacementOutcome {
    let combo = combo + 1;

    let mut footprint = match cfg.slicing {
        SlicingMode::Cut => Footprint::new(
            previous.center,
            previous.extent,
            landed.height,
            previous.top_y(),
        ),
        SlicingMode::NoCut => landed.settled_on(previous).centered_over(previous),
    };

    // Growth is a reward, not a clipping operation, and only exists in Cut
    // mode where the tower can shrink
    let grew = cfg.slicing == SlicingMode::Cut && combo.is_multiple_of(cfg.combo_threshold);
    if grew {
        footprint = footprint.grown_by(cfg.scale_increase);
    }

    PlacementOutcome::Perfect {
        footprint,
        combo,
        grew,
    }
}

/// Clip the landed block to its 1-D overlap with the previous block on each
/// axis independently. No overlap on either axis loses the block.
fn cut_placement(previous: &Footprint, landed: &Footprint, diff: Vec2) -> PlacementOutcome {
    let new_extent = previous.extent - diff.abs();
    if new_extent.x <= 0.0 || new_extent.y <= 0.0 {
        return PlacementOutcome::MissedCut;
    }

    // The survivor sits midway between the previous edge and the landed edge,
    // not at the landed block's own center
    let footprint = Footprint::new(
        previous.center + diff / 2.0,
        new_extent,
        landed.height,
        previous.top_y(),
    );

    let debris = debris_for_cut(landed, &footprint, previous.center);

    PlacementOutcome::Sliced { footprint, debris }
}

/// Keep the full block and add its signed offset to the running instability.
/// The sum crossing `max_wobble` on either axis collapses the tower.
fn nocut_placement(
    previous: &Footprint,
    landed: &Footprint,
    diff: Vec2,
    instability: Vec2,
    cfg: &GameConfig,
) -> PlacementOutcome {
    let instability = instability + diff;
    if instability.x.abs() > cfg.max_wobble || instability.y.abs() > cfg.max_wobble {
        return PlacementOutcome::Collapse { instability };
    }

    // Rotation normalized to level; size and horizontal position unchanged
    PlacementOutcome::Leaning {
        footprint: landed.settled_on(previous),
        instability,
    }
}

/// The non-surviving remainder of a cut, split into up to two axis-aligned
/// pieces flush against the survivor on the side the block overhung.
///
/// The X piece spans the survivor's depth; the Z piece spans the survivor's
/// width, so the two never overlap at the corner.
pub fn debris_for_cut(original: &Footprint, survived: &Footprint, tower_center: Vec2) -> Vec<Debris> {
    let mut pieces = Vec::with_capacity(2);

    let overhang_x = original.width() - survived.width();
    if overhang_x > DEBRIS_EPSILON {
        let dir = (original.center.x - survived.center.x).signum();
        let center = Vec2::new(
            survived.center.x + (survived.width() / 2.0 + overhang_x / 2.0) * dir,
            survived.center.y,
        );
        pieces.push(make_debris(
            center,
            Vec2::new(overhang_x, survived.depth()),
            original,
            tower_center,
        ));
    }

    let overhang_z = original.depth() - survived.depth();
    if overhang_z > DEBRIS_EPSILON {
        let dir = (original.center.y - survived.center.y).signum();
        let center = Vec2::new(
            survived.center.x,
            survived.center.y + (survived.depth() / 2.0 + overhang_z / 2.0) * dir,
        );
        pieces.push(make_debris(
            center,
            Vec2::new(survived.width(), overhang_z),
            original,
            tower_center,
        ));
    }

    pieces
}

fn make_debris(center: Vec2, extent: Vec2, original: &Footprint, tower_center: Vec2) -> Debris {
    let fling_dir = (center - tower_center).normalize_or(Vec2::X);
    Debris {
        footprint: Footprint::new(center, extent, original.height, original.base_y),
        fling_dir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fp(x: f32, z: f32, w: f32, d: f32) -> Footprint {
        Footprint::new(Vec2::new(x, z), Vec2::new(w, d), 0.5, 0.0)
    }

    fn base() -> Footprint {
        fp(0.0, 0.0, 2.0, 2.0)
    }

    fn cfg() -> GameConfig {
        GameConfig::default()
    }

    fn nocut_cfg() -> GameConfig {
        GameConfig {
            slicing: SlicingMode::NoCut,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_first_block_always_accepted() {
        // Wildly off-center drop at score 0 is still the foundation
        let landed = fp(1.9, -1.7, 2.0, 2.0);
        let out = classify(&base(), &landed, 0, 0, Vec2::ZERO, &cfg());
        match out {
            PlacementOutcome::Foundation(f) => {
                assert_eq!(f.center, landed.center);
                assert_eq!(f.extent, landed.extent);
                assert!((f.base_y - base().top_y()).abs() < 1e-6);
            }
            other => panic!("expected Foundation, got {other:?}"),
        }
    }

    #[test]
    fn test_first_block_never_perfect() {
        // Even a dead-center drop at score 0 earns no combo
        let landed = fp(0.0, 0.0, 2.0, 2.0);
        let out = classify(&base(), &landed, 0, 3, Vec2::ZERO, &cfg());
        assert!(matches!(out, PlacementOutcome::Foundation(_)));
    }

    #[test]
    fn test_perfect_tolerance_boundary() {
        // previous 2x2, threshold 0.1 -> grace 0.1 per axis
        let inside = classify(&base(), &fp(0.099, 0.0, 2.0, 2.0), 1, 0, Vec2::ZERO, &cfg());
        assert!(inside.is_perfect());

        let outside = classify(&base(), &fp(0.101, 0.0, 2.0, 2.0), 1, 0, Vec2::ZERO, &cfg());
        assert!(!outside.is_perfect());

        // Exactly at the grace limit is inclusive
        let exact = classify(&base(), &fp(0.1, 0.0, 2.0, 2.0), 1, 0, Vec2::ZERO, &cfg());
        assert!(exact.is_perfect());
    }

    #[test]
    fn test_perfect_snaps_and_keeps_size() {
        let prev = fp(0.5, -0.5, 1.4, 1.2);
        let landed = fp(0.55, -0.52, 1.4, 1.2);
        let out = classify(&prev, &landed, 3, 0, Vec2::ZERO, &cfg());
        match out {
            PlacementOutcome::Perfect {
                footprint,
                combo,
                grew,
            } => {
                assert_eq!(footprint.center, prev.center);
                assert_eq!(footprint.extent, prev.extent);
                assert!((footprint.base_y - prev.top_y()).abs() < 1e-6);
                assert_eq!(combo, 1);
                assert!(!grew);
            }
            other => panic!("expected Perfect, got {other:?}"),
        }
    }

    #[test]
    fn test_cut_geometry() {
        // previous 2x2 at origin, landed 2x2 offset 0.5 on x
        let landed = fp(0.5, 0.0, 2.0, 2.0);
        let out = classify(&base(), &landed, 1, 0, Vec2::ZERO, &cfg());
        match out {
            PlacementOutcome::Sliced { footprint, debris } => {
                assert!((footprint.width() - 1.5).abs() < 1e-6);
                assert!((footprint.depth() - 2.0).abs() < 1e-6);
                assert!((footprint.center.x - 0.25).abs() < 1e-6);
                assert!((footprint.center.y - 0.0).abs() < 1e-6);
                // One severed piece, on the +x side
                assert_eq!(debris.len(), 1);
                let piece = &debris[0];
                assert!((piece.footprint.width() - 0.5).abs() < 1e-6);
                assert!((piece.footprint.depth() - 2.0).abs() < 1e-6);
                // Flush against the survivor: 0.25 + 0.75 + 0.25 = 1.25
                assert!((piece.footprint.center.x - 1.25).abs() < 1e-6);
                assert!(piece.fling_dir.x > 0.0);
            }
            other => panic!("expected Sliced, got {other:?}"),
        }
    }

    #[test]
    fn test_cut_both_axes_yields_two_debris() {
        let landed = fp(0.5, -0.4, 2.0, 2.0);
        let out = classify(&base(), &landed, 1, 0, Vec2::ZERO, &cfg());
        match out {
            PlacementOutcome::Sliced { footprint, debris } => {
                assert!((footprint.width() - 1.5).abs() < 1e-6);
                assert!((footprint.depth() - 1.6).abs() < 1e-6);
                assert_eq!(debris.len(), 2);
                // X piece keeps the survivor depth, Z piece the survivor width
                assert!((debris[0].footprint.depth() - footprint.depth()).abs() < 1e-6);
                assert!((debris[1].footprint.width() - footprint.width()).abs() < 1e-6);
                assert!(debris[1].fling_dir.y < 0.0);
            }
            other => panic!("expected Sliced, got {other:?}"),
        }
    }

    #[test]
    fn test_missed_cut_total_miss() {
        // Offset 2.5 on a width-2 previous: survivor width would be -0.5
        let out = classify(&base(), &fp(2.5, 0.0, 2.0, 2.0), 1, 0, Vec2::ZERO, &cfg());
        assert_eq!(out, PlacementOutcome::MissedCut);
    }

    #[test]
    fn test_missed_cut_zero_overlap_inclusive() {
        // Exactly zero overlap counts as a miss, not a degenerate block
        let out = classify(&base(), &fp(2.0, 0.0, 2.0, 2.0), 1, 0, Vec2::ZERO, &cfg());
        assert_eq!(out, PlacementOutcome::MissedCut);
    }

    #[test]
    fn test_combo_growth_every_fifth() {
        let c = cfg();
        let mut prev = base();
        for n in 1..=5u32 {
            let landed = Footprint::new(prev.center, prev.extent, 0.5, prev.top_y());
            let out = classify(&prev, &landed, n, n - 1, Vec2::ZERO, &c);
            match out {
                PlacementOutcome::Perfect {
                    footprint,
                    combo,
                    grew,
                } => {
                    assert_eq!(combo, n);
                    if n == 5 {
                        assert!(grew);
                        assert!((footprint.width() - (prev.width() + 0.1)).abs() < 1e-6);
                        assert!((footprint.depth() - (prev.depth() + 0.1)).abs() < 1e-6);
                    } else {
                        assert!(!grew);
                        assert_eq!(footprint.extent, prev.extent);
                    }
                    prev = footprint;
                }
                other => panic!("expected Perfect at streak {n}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_no_growth_in_nocut_mode() {
        let c = nocut_cfg();
        let prev = base();
        let landed = fp(0.0, 0.0, 2.0, 2.0);
        // Fifth consecutive perfect: would grow in Cut mode
        let out = classify(&prev, &landed, 5, 4, Vec2::ZERO, &c);
        match out {
            PlacementOutcome::Perfect {
                footprint, grew, ..
            } => {
                assert!(!grew);
                assert_eq!(footprint.extent, landed.extent);
            }
            other => panic!("expected Perfect, got {other:?}"),
        }
    }

    #[test]
    fn test_wobble_accumulates_and_collapses() {
        let c = nocut_cfg(); // max_wobble 2.0
        let mut instability = Vec2::ZERO;

        // Three drops at +0.7 x: sums 0.7, 1.4, 2.1 - collapse on the third
        for step in 1..=3 {
            let landed = fp(0.7, 0.0, 2.0, 2.0);
            let out = classify(&base(), &landed, step, 0, instability, &c);
            match (step, out) {
                (1 | 2, PlacementOutcome::Leaning { instability: i, .. }) => {
                    assert!((i.x - 0.7 * step as f32).abs() < 1e-5);
                    instability = i;
                }
                (3, PlacementOutcome::Collapse { instability: i }) => {
                    assert!(i.x > c.max_wobble);
                }
                (_, other) => panic!("unexpected outcome at step {step}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_wobble_opposite_signs_cancel() {
        let c = nocut_cfg();
        // +1.5 then -1.5: the signed sum returns to zero, no collapse
        let out1 = classify(&base(), &fp(1.5, 0.0, 2.0, 2.0), 1, 0, Vec2::ZERO, &c);
        let inst = match out1 {
            PlacementOutcome::Leaning { instability, .. } => instability,
            other => panic!("expected Leaning, got {other:?}"),
        };
        let out2 = classify(&base(), &fp(-1.5, 0.0, 2.0, 2.0), 2, 0, inst, &c);
        match out2 {
            PlacementOutcome::Leaning { instability, .. } => {
                assert!(instability.x.abs() < 1e-5);
            }
            other => panic!("expected Leaning, got {other:?}"),
        }
    }

    #[test]
    fn test_nocut_keeps_full_size() {
        let c = nocut_cfg();
        let landed = fp(0.6, 0.3, 2.0, 2.0);
        let out = classify(&base(), &landed, 1, 0, Vec2::ZERO, &c);
        match out {
            PlacementOutcome::Leaning { footprint, .. } => {
                assert_eq!(footprint.extent, landed.extent);
                assert_eq!(footprint.center, landed.center);
                assert!((footprint.base_y - base().top_y()).abs() < 1e-6);
            }
            other => panic!("expected Leaning, got {other:?}"),
        }
    }

    proptest! {
        /// A cut survivor always fits inside the previous extent, and every
        /// severed piece is a real block that clears the survivor
        #[test]
        fn prop_cut_survivor_fits(dx in -1.99f32..1.99, dz in -1.99f32..1.99) {
            let landed = fp(dx, dz, 2.0, 2.0);
            let out = classify(&base(), &landed, 1, 0, Vec2::ZERO, &cfg());
            if let PlacementOutcome::Sliced { footprint, debris } = out {
                prop_assert!(footprint.width() <= 2.0 + 1e-5);
                prop_assert!(footprint.depth() <= 2.0 + 1e-5);
                prop_assert!(footprint.width() > 0.0);
                prop_assert!(footprint.depth() > 0.0);
                for piece in &debris {
                    prop_assert!(!piece.footprint.is_degenerate());
                    // Disjoint from the survivor on at least one axis
                    let gap_x = (piece.footprint.center.x - footprint.center.x).abs()
                        - (piece.footprint.width() + footprint.width()) / 2.0;
                    let gap_z = (piece.footprint.center.y - footprint.center.y).abs()
                        - (piece.footprint.depth() + footprint.depth()) / 2.0;
                    prop_assert!(gap_x >= -1e-4 || gap_z >= -1e-4);
                }
            }
        }

        /// Any drop within the grace zone snaps exactly onto the previous
        /// center - perfect placements never accumulate drift
        #[test]
        fn prop_perfect_never_drifts(dx in -0.1f32..=0.1, dz in -0.1f32..=0.1) {
            let landed = fp(dx, dz, 2.0, 2.0);
            let out = classify(&base(), &landed, 1, 0, Vec2::ZERO, &cfg());
            prop_assert!(out.is_perfect());
            let fp = out.accepted_footprint().unwrap();
            prop_assert_eq!(fp.center, base().center);
        }
    }
}
