//! Events emitted during a simulation tick.
//! The host consumes these to drive visuals, audio and the HUD; the core
//! never calls out to collaborators itself. An empty list means nothing
//! happened.

use serde::{Deserialize, Serialize};

use super::crossing::CrossingResult;
use super::score::Outcome;
use super::state::{EntityKind, Lane, PhaseKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EntitySpawned {
        id: u32,
        kind: EntityKind,
        lane: Lane,
        position: f32,
    },
    EntityDespawned { id: u32 },
    Collected { id: u32, lane: Lane, held: u32 },
    HazardHit { id: u32, lane: Lane, held: u32 },
    StunEnded,
    LaneChanged { from: Lane, to: Lane },
    PhaseChanged { from: PhaseKind, to: PhaseKind },
    SegmentBuilt { index: u32, position: f32 },
    CrossingComplete { result: CrossingResult },
    Resolved { outcome: Outcome, unspent: u32 },
}

/// Per-tick HUD values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HudFrame {
    /// Collectibles currently carried
    pub held: u32,
    /// Collectibles picked up this attempt
    pub collected: u32,
    /// Whole units travelled
    pub distance: u32,
    pub phase: PhaseKind,
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    pub hud: HudFrame,
}
