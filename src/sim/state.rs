//! Attempt state and core simulation types
//!
//! Everything one level attempt owns lives here. A retry or the next level
//! builds a fresh `Attempt`; nothing carries over.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::crossing::CrossingResolver;
use super::event::GameEvent;
use super::level::LevelTarget;
use super::pattern::{PatternTable, SlotKind};
use super::plan::LevelPlan;
use super::score::Outcome;
use crate::consts::LANE_SWITCH_MS;
use crate::error::PlanError;
use crate::settings::Settings;

/// One of the three travel tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Lane> {
        Lane::ALL.get(index).copied()
    }

    /// Neighbouring lane in the given direction, if there is one
    pub fn shifted(self, shift: LaneShift) -> Option<Lane> {
        match shift {
            LaneShift::Left => self.index().checked_sub(1).and_then(Lane::from_index),
            LaneShift::Right => Lane::from_index(self.index() + 1),
        }
    }
}

/// Discrete lane-change intent from the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneShift {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Collectible,
    Hazard,
}

/// A collectible or hazard placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub id: u32,
    pub kind: EntityKind,
    pub lane: Lane,
    /// Distance from the start marker
    pub position: f32,
    /// Set once when collected or hit; never cleared
    pub consumed: bool,
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    pub lane: Lane,
    /// Distance from the start marker
    pub position: f32,
    /// Collectibles carried and not yet spent
    pub held: u32,
    /// When the current lane switch began
    pub lane_switch_started_ms: Option<f64>,
}

impl Default for RunnerState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunnerState {
    pub fn new() -> Self {
        Self {
            lane: Lane::Center,
            position: 0.0,
            held: 0,
            lane_switch_started_ms: None,
        }
    }

    /// True while a lane switch animation is still running
    pub fn is_switching(&self, now_ms: f64) -> bool {
        self.lane_switch_started_ms
            .is_some_and(|start| now_ms - start < LANE_SWITCH_MS)
    }

    /// Start a lane switch; returns the new lane if the switch was accepted
    pub fn switch_lane(&mut self, shift: LaneShift, now_ms: f64) -> Option<Lane> {
        if self.is_switching(now_ms) {
            return None;
        }
        let lane = self.lane.shifted(shift)?;
        self.lane = lane;
        self.lane_switch_started_ms = Some(now_ms);
        Some(lane)
    }

    /// Move to a lane regardless of input gating
    pub fn force_lane(&mut self, lane: Lane, now_ms: f64) -> bool {
        if self.lane == lane {
            return false;
        }
        self.lane = lane;
        self.lane_switch_started_ms = Some(now_ms);
        true
    }

    pub fn add_resource(&mut self) {
        self.held += 1;
    }

    /// Hazard penalty, floored at zero
    pub fn lose_resource(&mut self) {
        self.held = self.held.saturating_sub(1);
    }

    /// Spend one held resource on the bridge
    pub fn spend_resource(&mut self) {
        assert!(self.held > 0, "spent a resource the runner does not hold");
        self.held -= 1;
    }
}

/// Forward movement suspended after a hazard hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stun {
    pub until_ms: f64,
}

/// Phase of the attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    /// Running the course; may be stunned
    Collecting { stun: Option<Stun> },
    /// Walking to the water in the center lane
    Approaching,
    /// Building the bridge
    Crossing,
    /// Attempt over
    Resolved(Outcome),
}

/// Phase without its payload, for events and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    Collecting,
    Approaching,
    Crossing,
    Resolved,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Collecting { .. } => PhaseKind::Collecting,
            Phase::Approaching => PhaseKind::Approaching,
            Phase::Crossing => PhaseKind::Crossing,
            Phase::Resolved(_) => PhaseKind::Resolved,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Phase::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Totals of the generated plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub collectibles: u32,
    pub hazards: u32,
    pub rows: u32,
}

/// Complete state of one level attempt
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Seed the plan was generated from
    pub seed: u64,
    pub target: LevelTarget,
    pub settings: Settings,
    pub runner: RunnerState,
    pub phase: Phase,
    /// Live entities, ordered by position then lane
    pub entities: Vec<SpawnedEntity>,
    pub crossing: CrossingResolver,
    pub supply: Supply,
    /// Collectibles picked up this attempt
    pub collected: u32,
    pub hazards_hit: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events produced outside a tick, delivered with the next one
    pub(crate) pending: Vec<GameEvent>,
}

impl Attempt {
    /// Generate the level and place every entity
    pub fn new(
        target: LevelTarget,
        settings: Settings,
        table: &PatternTable,
        seed: u64,
    ) -> Result<Self, PlanError> {
        let plan = LevelPlan::new(target, &settings, table)?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = plan.generate(&mut rng);

        let mut entities = Vec::new();
        for row in &level.rows {
            for (lane, slot) in Lane::ALL.into_iter().zip(row.placed.slots()) {
                let kind = match slot {
                    SlotKind::Collectible => EntityKind::Collectible,
                    SlotKind::Hazard => EntityKind::Hazard,
                    SlotKind::Empty => continue,
                };
                entities.push(SpawnedEntity {
                    id: entities.len() as u32 + 1,
                    kind,
                    lane,
                    position: row.position,
                    consumed: false,
                });
            }
        }

        let pending = entities
            .iter()
            .map(|e| GameEvent::EntitySpawned {
                id: e.id,
                kind: e.kind,
                lane: e.lane,
                position: e.position,
            })
            .collect();

        log::info!(
            "Attempt on level {} (seed {}): {} entities, {} to cross",
            target.level,
            seed,
            entities.len(),
            target.required_amount
        );

        Ok(Self {
            seed,
            target,
            settings,
            runner: RunnerState::new(),
            phase: Phase::Collecting { stun: None },
            entities,
            crossing: CrossingResolver::new(&target),
            supply: Supply {
                collectibles: level.collectibles,
                hazards: level.hazards,
                rows: level.rows.len() as u32,
            },
            collected: 0,
            hazards_hit: 0,
            time_ticks: 0,
            pending,
        })
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.phase, Phase::Resolved(_))
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.phase.outcome()
    }

    /// Distance covered on land; walking the bridge does not count
    pub fn distance_travelled(&self) -> f32 {
        self.runner.position.min(self.target.crossing_start())
    }

    /// Live entities still to be reached
    pub fn live_entities(&self) -> impl Iterator<Item = &SpawnedEntity> {
        self.entities.iter().filter(|e| !e.consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_shifts_stay_in_bounds() {
        assert_eq!(Lane::Center.shifted(LaneShift::Left), Some(Lane::Left));
        assert_eq!(Lane::Center.shifted(LaneShift::Right), Some(Lane::Right));
        assert_eq!(Lane::Left.shifted(LaneShift::Left), None);
        assert_eq!(Lane::Right.shifted(LaneShift::Right), None);
        assert_eq!(Lane::from_index(3), None);
    }

    #[test]
    fn test_switch_gated_while_transitioning() {
        let mut runner = RunnerState::new();
        assert_eq!(runner.switch_lane(LaneShift::Left, 0.0), Some(Lane::Left));
        // Mid-transition intents are dropped
        assert_eq!(runner.switch_lane(LaneShift::Right, 100.0), None);
        assert_eq!(runner.lane, Lane::Left);
        assert_eq!(runner.switch_lane(LaneShift::Right, 150.0), Some(Lane::Center));
    }

    #[test]
    fn test_hazard_penalty_floors_at_zero() {
        let mut runner = RunnerState::new();
        runner.lose_resource();
        assert_eq!(runner.held, 0);
        runner.add_resource();
        runner.lose_resource();
        assert_eq!(runner.held, 0);
    }

    #[test]
    #[should_panic(expected = "does not hold")]
    fn test_spending_nothing_is_a_bug() {
        RunnerState::new().spend_resource();
    }

    #[test]
    fn test_attempt_places_plan_entities() {
        let table = PatternTable::default();
        let attempt =
            Attempt::new(LevelTarget::for_level(1), Settings::default(), &table, 9).unwrap();
        let yarn = attempt
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Collectible)
            .count() as u32;
        assert_eq!(yarn, attempt.supply.collectibles);
        assert!(yarn >= attempt.target.required_amount);
        assert_eq!(attempt.pending.len(), attempt.entities.len());
        assert!(matches!(attempt.phase, Phase::Collecting { stun: None }));
        assert_eq!(attempt.runner.lane, Lane::Center);
    }
}
