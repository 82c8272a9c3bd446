#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boss behaviour for Reverie battles.
//!
//! A [`BossController`] owns one boss: its health, the [`DifficultySignal`]
//! derived from stress, deadline and phase, the drift movement of aerial
//! bosses and a closed set of attack states. Attack states read the player
//! snapshot, emit projectiles into a [`reverie_core::ProjectileSink`] and
//! request transitions, which the controller applies between ticks.
//!
//! Everything random is drawn from a seeded [`BattleRng`], so two
//! controllers built from the same seed and fed the same inputs produce
//! identical battles.

mod attacks;
mod controller;
pub mod difficulty;
pub mod intercept;
pub mod positioning;
mod sampling;
mod trail;
pub mod tuning;

pub use controller::{BossController, HazardReport};
pub use difficulty::{Backlog, DifficultySignal};
pub use positioning::{Footing, PositioningController};
pub use trail::{SegmentKind, TrailSegment};
pub use tuning::{BossTuning, TuningError};

/// Deterministic random stream shared by a boss's movement and attacks.
pub type BattleRng = rand_chacha::ChaCha8Rng;
