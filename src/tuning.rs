//! Data-driven game balance
//!
//! All recognized gameplay options live here. A config is validated once at
//! startup; the state machine assumes it is valid and never re-checks during
//! play. Invalid values are fatal - the host must refuse to start a game.

use anyhow::{Result, ensure};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Footprint;

/// Which mechanic handles an imperfect placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlicingMode {
    /// Clip the landed block to the overlapping rectangle; the rest flies off
    #[default]
    Cut,
    /// Keep the full block and accumulate instability toward a collapse
    NoCut,
}

/// Gameplay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub slicing: SlicingMode,
    /// Fraction of the previous half-extent tolerated as "perfect", in (0, 1]
    pub perfect_threshold: f32,
    /// Perfect streak length that triggers a size reward (Cut mode)
    pub combo_threshold: u32,
    /// Width/depth gained on each combo reward (Cut mode)
    pub scale_increase: f32,
    /// Max accumulated offset per axis before the tower collapses (NoCut mode)
    pub max_wobble: f32,
    /// Seconds a released block may fall before it counts as lost
    pub game_over_timeout: f32,
    /// Crane swing speed at score 0
    pub min_swing_speed: f32,
    /// Crane swing speed at `score_to_reach_max_speed` and beyond
    pub max_swing_speed: f32,
    pub score_to_reach_max_speed: u32,
    /// Base platform width/depth
    pub base_extent: Vec2,
    pub base_height: f32,
    /// Height of every dropped block
    pub block_height: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            slicing: SlicingMode::Cut,
            perfect_threshold: 0.1,
            combo_threshold: 5,
            scale_increase: 0.1,
            max_wobble: 2.0,
            game_over_timeout: 3.0,
            min_swing_speed: 1.5,
            max_swing_speed: 5.0,
            score_to_reach_max_speed: 30,
            base_extent: Vec2::new(BASE_WIDTH, BASE_DEPTH),
            base_height: BASE_HEIGHT,
            block_height: BLOCK_HEIGHT,
        }
    }
}

impl GameConfig {
    /// Check all options are in range. Fatal at startup, never during play.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.perfect_threshold > 0.0 && self.perfect_threshold <= 1.0,
            "perfect_threshold must be in (0, 1], got {}",
            self.perfect_threshold
        );
        ensure!(
            self.combo_threshold > 0,
            "combo_threshold must be positive"
        );
        ensure!(
            self.scale_increase >= 0.0,
            "scale_increase must be non-negative, got {}",
            self.scale_increase
        );
        ensure!(
            self.max_wobble > 0.0,
            "max_wobble must be positive, got {}",
            self.max_wobble
        );
        ensure!(
            self.game_over_timeout > 0.0,
            "game_over_timeout must be positive, got {}",
            self.game_over_timeout
        );
        ensure!(
            self.min_swing_speed > 0.0 && self.max_swing_speed >= self.min_swing_speed,
            "swing speeds must satisfy 0 < min <= max, got {}..{}",
            self.min_swing_speed,
            self.max_swing_speed
        );
        ensure!(
            self.base_extent.x > 0.0 && self.base_extent.y > 0.0,
            "base_extent must be positive on both axes"
        );
        ensure!(
            self.base_height > 0.0 && self.block_height > 0.0,
            "base_height and block_height must be positive"
        );
        Ok(())
    }

    /// Crane swing speed for the current score: ramps linearly from min to
    /// max, capped once the score reaches `score_to_reach_max_speed`
    pub fn swing_speed_for(&self, score: u32) -> f32 {
        if self.score_to_reach_max_speed == 0 {
            return self.max_swing_speed;
        }
        let t = (score as f32 / self.score_to_reach_max_speed as f32).min(1.0);
        self.min_swing_speed + (self.max_swing_speed - self.min_swing_speed) * t
    }

    /// The base platform footprint the tower is built on
    pub fn base_footprint(&self) -> Footprint {
        Footprint::new(Vec2::ZERO, self.base_extent, self.base_height, 0.0)
    }
}
