//! Per-frame state machine orchestration
//!
//! One logical tick per rendered frame, driven by the host's update loop.
//! All timers are tick-deadline pairs: pausing stops the tick counter, so a
//! pending drop timeout resumes with its remaining ticks intact.

use super::footprint::{Footprint, tower_bounds};
use super::placement::{PlacementOutcome, classify};
use super::state::{GameEvent, GameOverReason, GamePhase, GameState, SoundId};
use crate::secs_to_ticks;
use crate::tuning::{GameConfig, SlicingMode};

/// Host signals for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a run from the main menu
    pub start: bool,
    /// Player tapped: release the swinging block
    pub drop: bool,
    pub pause: bool,
    pub resume: bool,
    /// Leave the game-over screen and reset
    pub restart: bool,
    pub main_menu: bool,
    /// The physics collaborator's at-most-once landing report
    pub landing: Option<Landing>,
}

/// A falling block's state at the moment of first contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    /// The block's footprint when the collision fired
    pub footprint: Footprint,
    /// True if it hit the tower top; false means an older block was struck
    pub on_top_block: bool,
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput, cfg: &GameConfig) {
    match state.phase {
        GamePhase::Starting => {
            if input.start {
                start_run(state, cfg);
            }
            return;
        }
        GamePhase::Paused => {
            // Time is frozen; only a resume is honored
            if input.resume {
                state.phase = GamePhase::Playing;
                log::debug!("resumed at tick {}", state.time_ticks);
            }
            return;
        }
        GamePhase::GameOver => {
            if input.restart || input.main_menu {
                return_to_menu(state);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    if input.pause {
        state.phase = GamePhase::Paused;
        log::debug!("paused at tick {}", state.time_ticks);
        return;
    }

    state.time_ticks += 1;

    // Resolve the current falling block before any new spawn or drop decision
    let mut landed_this_tick = false;
    if let Some(landing) = &input.landing {
        // At most one landing is processed per falling block; a signal with
        // no block in flight is stale and ignored
        if state.falling.take().is_some() {
            landed_this_tick = true;
            resolve_landing(state, landing, cfg);
        }
    }

    // Drop timeout: the block never hit anything
    if let Some(falling) = &state.falling {
        if state.time_ticks >= falling.deadline_tick {
            state.falling = None;
            log::info!("drop timed out at tick {}", state.time_ticks);
            apply_outcome(state, PlacementOutcome::MissVoid, cfg);
        }
    }

    // Release on request. A block spawned by this tick's landing resolution
    // is not attached yet, so the same tap never drops two blocks.
    if input.drop && !landed_this_tick && state.phase == GamePhase::Playing {
        request_drop(state, cfg);
    }
}

/// Release the swinging block, if there is one. No-op otherwise.
fn request_drop(state: &mut GameState, cfg: &GameConfig) {
    if state.falling.is_some() {
        return;
    }
    let Some(_released) = state.swinging.take() else {
        return;
    };
    let deadline_tick = state.time_ticks + secs_to_ticks(cfg.game_over_timeout);
    state.falling = Some(super::state::FallingBlock { deadline_tick });
    log::debug!(
        "block released at tick {}, void deadline {}",
        state.time_ticks,
        deadline_tick
    );
}

/// Classify the landing and apply the outcome
fn resolve_landing(state: &mut GameState, landing: &Landing, cfg: &GameConfig) {
    if !landing.on_top_block {
        apply_outcome(state, PlacementOutcome::MissOldBlock, cfg);
        return;
    }

    let previous = match state.top_footprint() {
        Some(fp) => *fp,
        None => {
            debug_assert!(false, "landing while the tower has no top");
            return;
        }
    };

    let outcome = classify(
        &previous,
        &landing.footprint,
        state.score,
        state.combo,
        state.instability,
        cfg,
    );
    apply_outcome(state, outcome, cfg);
}

/// Mutate score/combo/instability per the outcome and either keep playing
/// (append + spawn next) or end the run. Runs atomically within the tick.
fn apply_outcome(state: &mut GameState, outcome: PlacementOutcome, cfg: &GameConfig) {
    match outcome {
        PlacementOutcome::Foundation(footprint) => {
            state.push_event(GameEvent::Sound(SoundId::ImperfectLanding));
            accept_placement(state, footprint, false, cfg);
        }
        PlacementOutcome::Perfect {
            footprint,
            combo,
            grew,
        } => {
            state.combo = combo;
            state.push_event(GameEvent::Sound(SoundId::PerfectLanding));
            if grew {
                state.push_event(GameEvent::Sound(SoundId::BlockGrow));
                state.push_event(GameEvent::ComboGrowth { combo, footprint });
            }
            accept_placement(state, footprint, true, cfg);
        }
        PlacementOutcome::Sliced { footprint, debris } => {
            state.combo = 0;
            state.push_event(GameEvent::Sound(SoundId::ImperfectLanding));
            state.push_event(GameEvent::CutApplied {
                surviving: footprint,
                debris,
            });
            accept_placement(state, footprint, false, cfg);
        }
        PlacementOutcome::Leaning {
            footprint,
            instability,
        } => {
            state.combo = 0;
            state.instability = instability;
            state.push_event(GameEvent::Sound(SoundId::ImperfectLanding));
            accept_placement(state, footprint, false, cfg);
        }
        PlacementOutcome::MissedCut => {
            set_game_over(state, GameOverReason::MissedCut);
        }
        PlacementOutcome::Collapse { instability } => {
            state.instability = instability;
            state.push_event(GameEvent::TowerCollapsed);
            set_game_over(state, GameOverReason::TowerCollapsed);
        }
        PlacementOutcome::MissOldBlock => {
            set_game_over(state, GameOverReason::HitOldBlock);
        }
        PlacementOutcome::MissVoid => {
            set_game_over(state, GameOverReason::DroppedIntoVoid);
        }
    }
}

/// Commit an accepted footprint and spawn the next block in the same tick
fn accept_placement(state: &mut GameState, footprint: Footprint, perfect: bool, cfg: &GameConfig) {
    state.tower.push(footprint);
    state.score += 1;
    state.push_event(GameEvent::BlockPlaced { footprint, perfect });
    state.push_event(GameEvent::CameraFollow(footprint));
    spawn_next_block(state, cfg);
}

/// Queue the next swinging block: sized per mode, seated above the new top
fn spawn_next_block(state: &mut GameState, cfg: &GameConfig) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let top = *state.top_footprint().expect("spawn with an empty tower");

    // Cut mode inherits the (possibly shrunken or grown) top extent; NoCut
    // always spawns the full-size block
    let extent = match cfg.slicing {
        SlicingMode::Cut if state.score > 0 => top.extent,
        _ => cfg.base_extent,
    };

    let footprint = Footprint::new(top.center, extent, cfg.block_height, top.top_y());
    state.swinging = Some(footprint);
    state.push_event(GameEvent::SpawnBlock {
        footprint,
        color_seed: state.color_seed(),
        swing_speed: cfg.swing_speed_for(state.score),
    });
}

/// Starting -> Playing: full reset, then the first block goes on the crane
fn start_run(state: &mut GameState, cfg: &GameConfig) {
    state.reset_run(cfg);
    state.phase = GamePhase::Playing;
    log::info!("game started (seed {})", state.seed);
    spawn_next_block(state, cfg);
}

/// GameOver -> Starting: discard the whole run, keep the high score
fn return_to_menu(state: &mut GameState) {
    state.phase = GamePhase::Starting;
    state.tower.clear();
    state.score = 0;
    state.combo = 0;
    state.instability = glam::Vec2::ZERO;
    state.swinging = None;
    state.falling = None;
    log::info!("returned to menu");
}

/// Enter GameOver exactly once: cancels the pending deadline, compares the
/// high score, and broadcasts a single GameOver event
fn set_game_over(state: &mut GameState, reason: GameOverReason) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.swinging = None;
    state.falling = None;
    state.combo = 0;

    let new_high_score = state.score > state.high_score;
    if new_high_score {
        state.high_score = state.score;
    }

    log::info!(
        "game over ({reason:?}), score {} best {}",
        state.score,
        state.high_score
    );

    state.push_event(GameEvent::Sound(SoundId::GameOver));
    if let Some(bounds) = tower_bounds(&state.tower) {
        state.push_event(GameEvent::CameraFrameTower(bounds));
    }
    state.push_event(GameEvent::GameOver {
        reason,
        score: state.score,
        high_score: state.high_score,
        new_high_score,
    });
}
