//! Final score and outcome

use serde::{Deserialize, Serialize};

use crate::consts::{COLLECTED_POINTS, CROSSING_POINTS, DISTANCE_POINTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeTier {
    Success,
    Failure,
}

/// Per-component score lines for the end screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub distance: u32,
    pub distance_points: u64,
    pub collected: u32,
    pub collected_points: u64,
    pub crossing: u32,
    pub crossing_points: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub score: u64,
    pub tier: OutcomeTier,
    /// Collectibles short of the requirement, for display
    pub shortfall: u32,
    pub required: u32,
    pub breakdown: ScoreBreakdown,
}

/// Score an attempt. Success iff the crossing covers the required amount.
pub fn compute_outcome(
    distance: f32,
    collected: u32,
    crossing_length: u32,
    required: u32,
) -> Outcome {
    // NaN and negative distances score nothing
    let distance = distance.max(0.0).floor() as u32;
    let breakdown = ScoreBreakdown {
        distance,
        distance_points: distance as u64 * DISTANCE_POINTS,
        collected,
        collected_points: collected as u64 * COLLECTED_POINTS,
        crossing: crossing_length,
        crossing_points: crossing_length as u64 * CROSSING_POINTS,
    };
    let tier = if crossing_length >= required {
        OutcomeTier::Success
    } else {
        OutcomeTier::Failure
    };

    Outcome {
        score: breakdown.distance_points + breakdown.collected_points + breakdown.crossing_points,
        tier,
        shortfall: required.saturating_sub(collected),
        required,
        breakdown,
    }
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.tier == OutcomeTier::Success
    }

    /// End screen title
    pub fn headline(&self, unspent: u32) -> &'static str {
        let half = self.required.div_ceil(2);
        match self.tier {
            OutcomeTier::Success if unspent >= half => "Amazing! Perfect Crossing!",
            OutcomeTier::Success => "Good Job!",
            OutcomeTier::Failure if self.breakdown.crossing >= half => "Not Bad!",
            OutcomeTier::Failure => "Collect More Yarn!",
        }
    }
}
