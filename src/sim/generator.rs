//! Row pattern selection
//!
//! Picks one pattern from a tier under the plan's soft constraints. Pure apart
//! from the random source handed in.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use super::pattern::{PatternTable, RowPattern, Tier};
use crate::consts::{MAX_LEVEL_SCALING, MIN_PATTERN_WEIGHT, ROW_COLLECTIBLE_CAP};

/// Draws row patterns from a validated table
#[derive(Debug, Clone, Copy)]
pub struct RowGenerator<'a> {
    table: &'a PatternTable,
}

impl<'a> RowGenerator<'a> {
    pub fn new(table: &'a PatternTable) -> Self {
        Self { table }
    }

    /// Select the next row pattern.
    ///
    /// Priority: a yarn shortfall restricts the draw to the richest patterns,
    /// then a reached hazard cap restricts it to hazard-free patterns, and
    /// otherwise the whole tier is drawn with level-scaled weights.
    pub fn select_pattern<R: Rng>(
        &self,
        tier: Tier,
        level_scaling: f32,
        needs_more_collectible: bool,
        at_hazard_cap: bool,
        rng: &mut R,
    ) -> RowPattern {
        let patterns = self.table.tier(tier);

        if needs_more_collectible {
            let richest = richest_patterns(patterns);
            if !richest.is_empty() {
                return pick_uniform(&richest, rng);
            }
        } else if at_hazard_cap {
            let safe: Vec<RowPattern> = patterns
                .iter()
                .copied()
                .filter(|p| p.hazard_count() == 0)
                .collect();
            if !safe.is_empty() {
                return pick_uniform(&safe, rng);
            }
        }

        pick_weighted(patterns, level_scaling, rng)
    }
}

/// Patterns at the per-row yarn cap, else with two or more, else the tier's best
fn richest_patterns(patterns: &[RowPattern]) -> Vec<RowPattern> {
    let with = |pred: &dyn Fn(usize) -> bool| -> Vec<RowPattern> {
        patterns
            .iter()
            .copied()
            .filter(|p| pred(p.collectible_count()))
            .collect()
    };

    let capped = with(&|n| n >= ROW_COLLECTIBLE_CAP);
    if !capped.is_empty() {
        return capped;
    }
    let pairs = with(&|n| n >= 2);
    if !pairs.is_empty() {
        return pairs;
    }
    let best = patterns
        .iter()
        .map(RowPattern::collectible_count)
        .max()
        .unwrap_or(0);
    with(&|n| n == best)
}

/// Selection weight for one pattern at the given level scaling
pub fn pattern_weight(pattern: &RowPattern, level_scaling: f32) -> f32 {
    let scaling = level_scaling.clamp(0.0, MAX_LEVEL_SCALING);
    let mut weight: f32 = 1.0;
    if pattern.collectible_count() >= 2 {
        weight *= 1.0 - scaling;
    }
    if pattern.hazard_count() >= 1 {
        weight *= 1.0 + scaling * 0.5;
    }
    weight.max(MIN_PATTERN_WEIGHT)
}

fn pick_weighted<R: Rng>(
    patterns: &[RowPattern],
    level_scaling: f32,
    rng: &mut R,
) -> RowPattern {
    let weights = patterns.iter().map(|p| pattern_weight(p, level_scaling));
    match WeightedIndex::new(weights) {
        Ok(dist) => patterns[dist.sample(rng)],
        Err(err) => {
            log::warn!("weighted pattern draw failed ({err}), drawing uniformly");
            pick_uniform(patterns, rng)
        }
    }
}

fn pick_uniform<R: Rng>(patterns: &[RowPattern], rng: &mut R) -> RowPattern {
    patterns[rng.random_range(0..patterns.len())]
}
