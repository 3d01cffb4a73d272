//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, consumed entirely while the level is generated
//! - Time arrives as a per-tick timestamp, never read from a clock
//! - Stable iteration order (entities by position, then lane)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod crossing;
pub mod event;
pub mod generator;
pub mod level;
pub mod pattern;
pub mod plan;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Reached, evaluate};
pub use crossing::{CrossingPath, CrossingResolver, CrossingResult, CrossingTick};
pub use event::{GameEvent, HudFrame, TickReport};
pub use generator::RowGenerator;
pub use level::LevelTarget;
pub use pattern::{PatternTable, RowPattern, SlotKind, Tier};
pub use plan::{CollectibleBudget, GeneratedLevel, LevelPlan, PlannedRow};
pub use score::{Outcome, OutcomeTier, ScoreBreakdown, compute_outcome};
pub use state::{
    Attempt, EntityKind, Lane, LaneShift, Phase, PhaseKind, RunnerState, SpawnedEntity, Stun,
    Supply,
};
pub use tick::{TickInput, tick};
