//! Per-frame simulation tick
//!
//! Advances an attempt through Collecting -> Approaching -> Crossing ->
//! Resolved. Time comes in as a timestamp sampled once per frame; all timing
//! checks are `elapsed >= threshold`, so a scripted clock replays exactly.

use super::collision;
use super::crossing::CrossingResult;
use super::event::{GameEvent, HudFrame, TickReport};
use super::score::compute_outcome;
use super::state::{Attempt, EntityKind, Lane, LaneShift, Phase, PhaseKind, Stun};
use crate::consts::*;

/// How far ahead the autopilot looks when picking a lane
const AUTOPILOT_LOOKAHEAD: f32 = 6.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lane change intent (only honored while collecting)
    pub steer: Option<LaneShift>,
    /// Demo mode - steer automatically toward yarn and away from hazards
    pub autopilot: bool,
}

/// Advance the attempt by one frame
pub fn tick(state: &mut Attempt, input: &TickInput, now_ms: f64) -> TickReport {
    let mut events = std::mem::take(&mut state.pending);

    let steer = if input.autopilot {
        autopilot_steer(state)
    } else {
        input.steer
    };

    match state.phase.kind() {
        PhaseKind::Collecting => tick_collecting(state, steer, now_ms, &mut events),
        PhaseKind::Approaching => tick_approaching(state, now_ms, &mut events),
        PhaseKind::Crossing => tick_crossing(state, now_ms, &mut events),
        PhaseKind::Resolved => {}
    }

    if !state.is_resolved() {
        state.time_ticks += 1;
    }

    TickReport {
        events,
        hud: hud_frame(state),
    }
}

fn tick_collecting(
    state: &mut Attempt,
    steer: Option<LaneShift>,
    now_ms: f64,
    events: &mut Vec<GameEvent>,
) {
    if let Some(shift) = steer {
        let from = state.runner.lane;
        if let Some(to) = state.runner.switch_lane(shift, now_ms) {
            events.push(GameEvent::LaneChanged { from, to });
        }
    }

    if let Phase::Collecting { stun: Some(stun) } = state.phase {
        if now_ms < stun.until_ms {
            // Stunned: no forward progress, no collisions
            return;
        }
        state.phase = Phase::Collecting { stun: None };
        events.push(GameEvent::StunEnded);
    }

    state.runner.position += FORWARD_SPEED * state.settings.speed_multiplier;

    let lane = state.runner.lane;
    let reached = collision::evaluate(lane, state.runner.position, &mut state.entities);
    for id in reached.collected {
        state.runner.add_resource();
        state.collected += 1;
        events.push(GameEvent::Collected {
            id,
            lane,
            held: state.runner.held,
        });
    }
    if !reached.hazards.is_empty() {
        for id in reached.hazards {
            state.runner.lose_resource();
            state.hazards_hit += 1;
            events.push(GameEvent::HazardHit {
                id,
                lane,
                held: state.runner.held,
            });
        }
        state.phase = Phase::Collecting {
            stun: Some(Stun {
                until_ms: now_ms + STUN_DURATION_MS,
            }),
        };
    }

    despawn(state, events);

    if state.runner.position >= state.target.traversable_distance {
        enter(state, Phase::Approaching, events);
    }
}

fn tick_approaching(state: &mut Attempt, now_ms: f64, events: &mut Vec<GameEvent>) {
    let from = state.runner.lane;
    if state.runner.force_lane(Lane::Center, now_ms) {
        events.push(GameEvent::LaneChanged {
            from,
            to: Lane::Center,
        });
    }

    state.runner.position += WATER_SPEED * state.settings.speed_multiplier;
    despawn(state, events);

    if state.runner.position >= state.target.crossing_start() {
        enter(state, Phase::Crossing, events);
    }
}

fn tick_crossing(state: &mut Attempt, now_ms: f64, events: &mut Vec<GameEvent>) {
    let step = WATER_SPEED * state.settings.speed_multiplier;
    let runner = &mut state.runner;
    match state.crossing.walk_limit() {
        // Stay on built path until the crossing settles
        Some(limit) if runner.position < limit => {
            runner.position = (runner.position + step).min(limit);
        }
        Some(_) => {}
        None => runner.position += step,
    }

    let was_complete = state.crossing.is_complete();
    let result = state.crossing.tick(&mut state.runner, now_ms);
    if result.path_extended {
        let path = state.crossing.path();
        events.push(GameEvent::SegmentBuilt {
            index: path.len() - 1,
            position: path.last_position(),
        });
    }

    let Some(crossing) = state.crossing.result() else {
        return;
    };
    if !was_complete {
        events.push(GameEvent::CrossingComplete { result: crossing });
    }

    let done = match crossing {
        CrossingResult::Exhausted => true,
        CrossingResult::Reached => state.runner.position >= state.target.far_shore(),
    };
    if done {
        resolve(state, events);
    }
}

fn resolve(state: &mut Attempt, events: &mut Vec<GameEvent>) {
    let outcome = compute_outcome(
        state.distance_travelled(),
        state.collected,
        state.crossing.path().len(),
        state.target.required_amount,
    );
    log::info!(
        "Level {} resolved: {:?}, score {} ({} collected, {} built, {} unspent)",
        state.target.level,
        outcome.tier,
        outcome.score,
        state.collected,
        outcome.breakdown.crossing,
        state.runner.held
    );
    enter(state, Phase::Resolved(outcome), events);
    events.push(GameEvent::Resolved {
        outcome,
        unspent: state.runner.held,
    });
}

fn enter(state: &mut Attempt, phase: Phase, events: &mut Vec<GameEvent>) {
    let from = state.phase.kind();
    let to = phase.kind();
    log::info!("Phase {:?} -> {:?} at {:.1}", from, to, state.runner.position);
    state.phase = phase;
    events.push(GameEvent::PhaseChanged { from, to });
}

/// Drop consumed entities and those left far behind
fn despawn(state: &mut Attempt, events: &mut Vec<GameEvent>) {
    let runner_pos = state.runner.position;
    state.entities.retain(|e| {
        let keep = !e.consumed && runner_pos - e.position <= DESPAWN_BEHIND_DISTANCE;
        if !keep {
            events.push(GameEvent::EntityDespawned { id: e.id });
        }
        keep
    });
}

fn hud_frame(state: &Attempt) -> HudFrame {
    HudFrame {
        held: state.runner.held,
        collected: state.collected,
        distance: state.distance_travelled().max(0.0).floor() as u32,
        phase: state.phase.kind(),
    }
}

/// Pick a lane change toward the best-looking lane just ahead
fn autopilot_steer(state: &Attempt) -> Option<LaneShift> {
    if !matches!(state.phase, Phase::Collecting { .. }) {
        return None;
    }

    let runner = &state.runner;
    let mut scores = [0i32; 3];
    for entity in state.live_entities() {
        let ahead = entity.position - runner.position;
        if !(0.0..=AUTOPILOT_LOOKAHEAD).contains(&ahead) {
            continue;
        }
        scores[entity.lane.index()] += match entity.kind {
            EntityKind::Collectible => 2,
            EntityKind::Hazard => -5,
        };
    }

    let current = runner.lane.index();
    let best = Lane::ALL
        .into_iter()
        .max_by_key(|lane| {
            let lane_distance = lane.index().abs_diff(current) as i32;
            (scores[lane.index()], -lane_distance)
        })?
        .index();

    match best.cmp(&current) {
        std::cmp::Ordering::Less => Some(LaneShift::Left),
        std::cmp::Ordering::Greater => Some(LaneShift::Right),
        std::cmp::Ordering::Equal => None,
    }
}
