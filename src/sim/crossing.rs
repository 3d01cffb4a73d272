//! Bridge building across the water
//!
//! Each eligible tick spends one held resource to lay one segment toward the
//! far shore. Completion latches: once the shore is reached or the runner
//! runs dry, the resolver does nothing further.

use serde::{Deserialize, Serialize};

use super::level::LevelTarget;
use super::state::RunnerState;
use crate::consts::{BRIDGE_BUILD_INTERVAL_MS, SEGMENT_LENGTH, WALK_BUFFER};

/// Segments laid so far, nearest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingPath {
    start: f32,
    far_shore: f32,
    segments: Vec<f32>,
}

impl CrossingPath {
    pub fn new(start: f32, far_shore: f32) -> Self {
        Self {
            start,
            far_shore,
            segments: Vec::new(),
        }
    }

    /// Segments built, which is the crossing distance in segment units
    pub fn len(&self) -> u32 {
        self.segments.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[f32] {
        &self.segments
    }

    /// Position of the most recent segment, or the water's edge
    pub fn last_position(&self) -> f32 {
        self.segments.last().copied().unwrap_or(self.start)
    }

    /// Where the next segment would go
    pub fn next_position(&self) -> f32 {
        self.start + self.segments.len() as f32 * SEGMENT_LENGTH
    }

    pub fn reaches_shore(&self) -> bool {
        self.next_position() >= self.far_shore
    }

    pub fn far_shore(&self) -> f32 {
        self.far_shore
    }

    fn extend(&mut self) -> f32 {
        let position = self.next_position();
        self.segments.push(position);
        position
    }
}

/// How the crossing ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossingResult {
    /// Path reached the far shore
    Reached,
    /// Runner ran out of resources first
    Exhausted,
}

/// What one resolver tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrossingTick {
    pub path_extended: bool,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingResolver {
    path: CrossingPath,
    last_extension_ms: Option<f64>,
    result: Option<CrossingResult>,
}

impl CrossingResolver {
    pub fn new(target: &LevelTarget) -> Self {
        Self {
            path: CrossingPath::new(target.crossing_start(), target.far_shore()),
            last_extension_ms: None,
            result: None,
        }
    }

    /// Spend at most one resource on one more segment
    pub fn tick(&mut self, runner: &mut RunnerState, now_ms: f64) -> CrossingTick {
        if self.result.is_some() {
            return CrossingTick {
                path_extended: false,
                complete: true,
            };
        }

        if let Some(last) = self.last_extension_ms {
            if now_ms - last < BRIDGE_BUILD_INTERVAL_MS {
                return CrossingTick::default();
            }
        }

        if runner.held == 0 {
            self.finish(CrossingResult::Exhausted);
            return CrossingTick {
                path_extended: false,
                complete: true,
            };
        }

        runner.spend_resource();
        let position = self.path.extend();
        self.last_extension_ms = Some(now_ms);
        log::debug!(
            "segment {} at {:.1}, {} held",
            self.path.len(),
            position,
            runner.held
        );

        if self.path.reaches_shore() {
            self.finish(CrossingResult::Reached);
        } else if runner.held == 0 {
            self.finish(CrossingResult::Exhausted);
        }

        CrossingTick {
            path_extended: true,
            complete: self.result.is_some(),
        }
    }

    fn finish(&mut self, result: CrossingResult) {
        log::info!(
            "Crossing complete: {:?} with {} segments",
            result,
            self.path.len()
        );
        self.result = Some(result);
    }

    pub fn path(&self) -> &CrossingPath {
        &self.path
    }

    pub fn result(&self) -> Option<CrossingResult> {
        self.result
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Furthest the runner may walk, or `None` once the crossing is settled
    pub fn walk_limit(&self) -> Option<f32> {
        if self.is_complete() {
            None
        } else {
            Some(self.path.last_position() + WALK_BUFFER)
        }
    }
}
