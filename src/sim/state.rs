//! Game state and outbound collaborator events
//!
//! All session state lives here; mutation happens only inside [`super::tick`].
//! Collaborators (visuals, audio, camera, persistence) are reached through the
//! per-tick [`GameEvent`] outbox instead of global manager instances.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::footprint::{Debris, Footprint, TowerBounds};
use crate::tuning::GameConfig;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu; nothing simulated yet
    Starting,
    /// Active gameplay
    Playing,
    /// Game is paused; pending timers are frozen
    Paused,
    /// Run ended; terminal until an explicit restart
    GameOver,
}

/// Why the run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Landed on an older block instead of the tower top
    HitOldBlock,
    /// The drop timeout fired before any landing signal
    DroppedIntoVoid,
    /// Zero overlap with the top block in Cut mode
    MissedCut,
    /// Accumulated wobble crossed the threshold in NoCut mode
    TowerCollapsed,
}

/// Semantic audio cues; the host maps these to actual sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundId {
    PerfectLanding,
    ImperfectLanding,
    BlockGrow,
    GameOver,
}

/// Outbound directives for the excluded collaborators, drained by the host
/// after each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Attach a fresh block to the crane claw
    SpawnBlock {
        footprint: Footprint,
        color_seed: u32,
        swing_speed: f32,
    },
    /// A block was committed to the tower
    BlockPlaced { footprint: Footprint, perfect: bool },
    /// An imperfect Cut-mode placement survived; animate the severed pieces
    CutApplied {
        surviving: Footprint,
        debris: Vec<Debris>,
    },
    /// Combo reward fired: the top block grew
    ComboGrowth { combo: u32, footprint: Footprint },
    /// The tower fell over (NoCut mode)
    TowerCollapsed,
    Sound(SoundId),
    /// Keep the camera tracking the new tower top
    CameraFollow(Footprint),
    /// Zoom out to frame the finished tower
    CameraFrameTower(TowerBounds),
    /// The run ended. `new_high_score` asks the host to persist `high_score`.
    GameOver {
        reason: GameOverReason,
        score: u32,
        high_score: u32,
        new_high_score: bool,
    },
}

/// A released block awaiting its landing signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallingBlock {
    /// Tick at which the drop counts as lost to the void
    pub deadline_tick: u64,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed (block color sequence)
    pub seed: u64,
    pub phase: GamePhase,
    /// Placed footprints, bottom to top; `[0]` is the base platform
    pub tower: Vec<Footprint>,
    /// Accepted placements this run
    pub score: u32,
    /// Consecutive perfect placements; resets on any non-perfect accept
    pub combo: u32,
    /// Running signed offset sum per horizontal axis (NoCut mode)
    pub instability: Vec2,
    /// Best-ever score, loaded by the host at startup
    pub high_score: u32,
    /// Simulation tick counter; does not advance while paused
    pub time_ticks: u64,
    /// Footprint the block on the crane will have, if one is swinging
    pub swinging: Option<Footprint>,
    /// The released block, if one is falling
    pub falling: Option<FallingBlock>,
    /// Outbox for the host, drained each tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session in the main menu with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: GamePhase::Starting,
            tower: Vec::new(),
            score: 0,
            combo: 0,
            instability: Vec2::ZERO,
            high_score: 0,
            time_ticks: 0,
            swinging: None,
            falling: None,
            events: Vec::new(),
        }
    }

    /// The current tower top (the placement target)
    pub fn top_footprint(&self) -> Option<&Footprint> {
        self.tower.last()
    }

    /// Full reset for a fresh run: tower back to the base platform only,
    /// all counters cleared. The phase is set by the caller.
    pub(crate) fn reset_run(&mut self, cfg: &GameConfig) {
        self.tower.clear();
        self.tower.push(cfg.base_footprint());
        self.score = 0;
        self.combo = 0;
        self.instability = Vec2::ZERO;
        self.swinging = None;
        self.falling = None;
    }

    /// Deterministic per-block color seed, a function of run seed and score
    /// so that replays recolor identically
    pub fn color_seed(&self) -> u32 {
        let mixed = (self.score as u64)
            .wrapping_mul(2654435761)
            .wrapping_add(self.seed);
        Pcg32::seed_from_u64(mixed).random()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's events, leaving the outbox empty
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
