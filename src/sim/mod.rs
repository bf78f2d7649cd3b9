//! Deterministic stacking simulation
//!
//! - `footprint` - immutable block footprints, debris, tower bounds
//! - `placement` - landing classification: perfect, cut, lean, or miss
//! - `state` - full game state and the outbound event outbox
//! - `tick` - the per-frame state machine
//!
//! The host owns the loop: it calls [`tick`] once per frame with that frame's
//! input signals, then drains [`GameState::events`] and forwards each
//! [`GameEvent`] to the matching collaborator (visuals, audio, camera,
//! persistence). The simulation itself never touches a wall clock, a file, or
//! a renderer, which keeps runs replayable from a seed plus an input trace.

pub mod footprint;
pub mod placement;
pub mod state;
pub mod tick;

pub use footprint::{Debris, Footprint, TowerBounds, tower_bounds};
pub use placement::{PlacementOutcome, classify};
pub use state::{FallingBlock, GameEvent, GameOverReason, GamePhase, GameState, SoundId};
pub use tick::{Landing, TickInput, tick};
