//! Per-level targets
//!
//! Derived once from the level number when an attempt starts.

use serde::{Deserialize, Serialize};

use super::pattern::Tier;
use crate::consts::{APPROACH_LENGTH, MAX_LEVEL_SCALING, SEGMENT_LENGTH};

/// Bridge segments needed on level 1
pub const BASE_REQUIRED: u32 = 10;
/// Extra segments needed per level
pub const REQUIRED_PER_LEVEL: u32 = 2;
/// Traversable distance on level 1
pub const BASE_DISTANCE: f32 = 100.0;
/// Extra distance per level
pub const DISTANCE_PER_LEVEL: f32 = 10.0;
/// Longest course any level gets
pub const MAX_DISTANCE: f32 = 300.0;
/// Percentage of the course that is easy rows
pub const EASY_END_PERCENT: f32 = 30.0;
/// Percentage of the course after which rows are hard
pub const MEDIUM_END_PERCENT: f32 = 60.0;
/// Difficulty bias added per level
pub const SCALING_PER_LEVEL: f32 = 0.02;

/// Constants for one level attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelTarget {
    pub level: u32,
    /// Bridge segments needed to reach the far shore
    pub required_amount: u32,
    /// Distance covered in the collecting phase
    pub traversable_distance: f32,
    /// Rows closer than this are easy
    pub easy_end: f32,
    /// Rows closer than this (and past `easy_end`) are medium
    pub medium_end: f32,
    /// Per-level weighting bias for the row generator
    pub level_scaling: f32,
}

impl LevelTarget {
    /// Progression formula; level 0 is treated as level 1
    pub fn for_level(level: u32) -> Self {
        let level = level.max(1);
        let steps = level - 1;
        let traversable_distance =
            (BASE_DISTANCE + steps as f32 * DISTANCE_PER_LEVEL).min(MAX_DISTANCE);
        Self {
            level,
            required_amount: BASE_REQUIRED + steps * REQUIRED_PER_LEVEL,
            traversable_distance,
            easy_end: traversable_distance * EASY_END_PERCENT / 100.0,
            medium_end: traversable_distance * MEDIUM_END_PERCENT / 100.0,
            level_scaling: (steps as f32 * SCALING_PER_LEVEL).min(MAX_LEVEL_SCALING),
        }
    }

    /// Tier of a row at the given distance from the start marker
    pub fn tier_at(&self, distance: f32) -> Tier {
        if distance < self.easy_end {
            Tier::Easy
        } else if distance < self.medium_end {
            Tier::Medium
        } else {
            Tier::Hard
        }
    }

    /// Where the water begins and the crossing phase starts
    pub fn crossing_start(&self) -> f32 {
        self.traversable_distance + APPROACH_LENGTH
    }

    /// Where the water ends
    pub fn far_shore(&self) -> f32 {
        self.crossing_start() + self.required_amount as f32 * SEGMENT_LENGTH
    }
}
