//! Axis-aligned block footprints
//!
//! A footprint is the rectangular extent of a block projected onto the
//! horizontal plane, plus its height and bottom elevation:
//! - center: (x, z) of the block's middle
//! - extent: (width along x, depth along z)
//! - height: y-extent
//! - base_y: bottom elevation
//!
//! Footprints are immutable value types; every successful placement produces
//! a new one and the tower is an ordered sequence of them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// The horizontal extent and elevation of a placed or falling block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    /// Center on the horizontal plane (x, z)
    pub center: Vec2,
    /// Width along x, depth along z
    pub extent: Vec2,
    /// Vertical extent
    pub height: f32,
    /// Bottom elevation
    pub base_y: f32,
}

impl Footprint {
    pub fn new(center: Vec2, extent: Vec2, height: f32, base_y: f32) -> Self {
        Self {
            center,
            extent,
            height,
            base_y,
        }
    }

    /// Top elevation (where the next block rests)
    #[inline]
    pub fn top_y(&self) -> f32 {
        self.base_y + self.height
    }

    /// Width along x
    #[inline]
    pub fn width(&self) -> f32 {
        self.extent.x
    }

    /// Depth along z
    #[inline]
    pub fn depth(&self) -> f32 {
        self.extent.y
    }

    /// A footprint with zero or negative area on either axis is not a block;
    /// it signals a total miss after clipping
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.extent.x <= 0.0 || self.extent.y <= 0.0
    }

    /// Same size and center, re-seated so the bottom rests on `support`'s top
    pub fn settled_on(&self, support: &Footprint) -> Self {
        Self {
            base_y: support.top_y(),
            ..*self
        }
    }

    /// Same size and elevation, centered over `other`
    pub fn centered_over(&self, other: &Footprint) -> Self {
        Self {
            center: other.center,
            ..*self
        }
    }

    /// Grow width and depth by `amount` each, keeping center and elevation
    pub fn grown_by(&self, amount: f32) -> Self {
        Self {
            extent: self.extent + Vec2::splat(amount),
            ..*self
        }
    }
}

/// A sliced-off remainder handed to the visual collaborator
///
/// Debris does not participate in the simulation; positions and sizes are
/// precomputed so the host can spawn rigid bodies or pooled meshes directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debris {
    /// Extent and position of the severed piece
    pub footprint: Footprint,
    /// Horizontal direction the piece flies, away from the tower center
    pub fling_dir: Vec2,
}

/// Min/max corners of the whole tower, for game-over camera framing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerBounds {
    pub min: glam::Vec3,
    pub max: glam::Vec3,
}

/// Bounds over a bottom-to-top run of footprints
///
/// Returns `None` for an empty tower (nothing to frame).
pub fn tower_bounds(tower: &[Footprint]) -> Option<TowerBounds> {
    let first = tower.first()?;
    let mut bounds = bounds_of(first);
    for fp in &tower[1..] {
        let b = bounds_of(fp);
        bounds.min = bounds.min.min(b.min);
        bounds.max = bounds.max.max(b.max);
    }
    Some(bounds)
}

fn bounds_of(fp: &Footprint) -> TowerBounds {
    let half = fp.extent / 2.0;
    TowerBounds {
        min: glam::Vec3::new(fp.center.x - half.x, fp.base_y, fp.center.y - half.y),
        max: glam::Vec3::new(fp.center.x + half.x, fp.top_y(), fp.center.y + half.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fp(x: f32, z: f32, w: f32, d: f32, h: f32, base_y: f32) -> Footprint {
        Footprint::new(Vec2::new(x, z), Vec2::new(w, d), h, base_y)
    }

    #[test]
    fn test_top_y() {
        let f = fp(0.0, 0.0, 2.0, 2.0, 0.5, 1.0);
        assert!((f.top_y() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_settled_on() {
        let base = fp(0.0, 0.0, 2.0, 2.0, 0.5, 0.0);
        let block = fp(0.3, -0.2, 2.0, 2.0, 0.5, 7.0);
        let seated = block.settled_on(&base);
        assert!((seated.base_y - 0.5).abs() < 1e-6);
        // Horizontal placement untouched
        assert_eq!(seated.center, block.center);
        assert_eq!(seated.extent, block.extent);
    }

    #[test]
    fn test_degenerate() {
        assert!(fp(0.0, 0.0, 0.0, 2.0, 0.5, 0.0).is_degenerate());
        assert!(fp(0.0, 0.0, 2.0, -0.1, 0.5, 0.0).is_degenerate());
        assert!(!fp(0.0, 0.0, 0.1, 0.1, 0.5, 0.0).is_degenerate());
    }

    #[test]
    fn test_tower_bounds_spans_all_blocks() {
        let tower = vec![
            fp(0.0, 0.0, 2.0, 2.0, 0.5, 0.0),
            fp(0.4, -0.3, 1.5, 1.5, 0.5, 0.5),
        ];
        let b = tower_bounds(&tower).unwrap();
        assert!((b.min.y - 0.0).abs() < 1e-6);
        assert!((b.max.y - 1.0).abs() < 1e-6);
        // Second block overhangs to +x: 0.4 + 0.75 = 1.15 > 1.0
        assert!((b.max.x - 1.15).abs() < 1e-6);
        assert!((b.min.x - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_tower_bounds_empty() {
        assert!(tower_bounds(&[]).is_none());
    }
}
