//! Crane Stack - a block-stacking arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement geometry, game state machine)
//! - `tuning`: Game balance configuration, validated at startup
//! - `settings`: User preferences with JSON file persistence
//! - `highscores`: Best-ever score with JSON file persistence
//!
//! The crate is engine-free: physics, rendering, audio, UI and camera live in
//! the host. The host feeds [`sim::TickInput`] into [`sim::tick`] once per
//! frame and drains [`sim::GameEvent`]s back out.

pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::{GameConfig, SlicingMode};

/// Game loop constants
pub mod consts {
    /// Fixed simulation tick rate (one logical tick per rendered frame)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;

    /// Default base platform dimensions
    pub const BASE_WIDTH: f32 = 2.0;
    pub const BASE_DEPTH: f32 = 2.0;
    pub const BASE_HEIGHT: f32 = 0.5;

    /// Default block height (y-extent of every dropped block)
    pub const BLOCK_HEIGHT: f32 = 0.5;

    /// Slack below which a cut remainder is too thin to spawn as debris
    pub const DEBRIS_EPSILON: f32 = 0.01;
}

/// Convert a duration in seconds to whole simulation ticks (rounded up, so a
/// positive timeout never collapses to zero ticks)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs * consts::TICK_HZ as f32).ceil() as u64
}
