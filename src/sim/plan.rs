//! Level plan generation
//!
//! Walks the course from the start marker to just short of the water and
//! draws one row per step. The whole level is materialized up front so the
//! collectible supply is known before the runner sets off.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generator::RowGenerator;
use super::level::LevelTarget;
use super::pattern::{PatternTable, RowPattern, SlotKind, Tier};
use crate::consts::*;
use crate::error::PlanError;
use crate::settings::Settings;

/// One generated row
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedRow {
    /// Distance from the start marker
    pub position: f32,
    pub tier: Tier,
    /// Pattern as drawn from the table
    pub drawn: RowPattern,
    /// Pattern as placed, with hazards over the cap emptied
    pub placed: RowPattern,
}

/// Finished plan for one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub rows: Vec<PlannedRow>,
    pub collectibles: u32,
    pub hazards: u32,
    pub collectible_target: u32,
    pub hazard_cap: u32,
    pub row_spacing: f32,
}

/// Tracks whether the plan must favor yarn-rich rows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectibleBudget {
    pub target: u32,
    pub total_rows: usize,
}

impl CollectibleBudget {
    /// Past the escalation point with the target still unmet
    pub fn escalated(&self, placed: u32, row: usize) -> bool {
        placed < self.target
            && row as f32 >= self.total_rows as f32 * COLLECTIBLE_ESCALATION_PROGRESS
    }

    /// Whether row `row` should be drawn from the richest patterns.
    ///
    /// True when the running count lags the pro-rata pace, once escalated, or
    /// when the rows after this one could no longer make up the difference.
    pub fn needs_more(&self, placed: u32, row: usize, capacity_after: u32) -> bool {
        if placed >= self.target || self.total_rows == 0 {
            return false;
        }
        let pace = self.target as f32 * (row + 1) as f32 / self.total_rows as f32;
        (placed as f32) < pace
            || self.escalated(placed, row)
            || placed + capacity_after < self.target
    }
}

/// A validated, not yet generated plan
#[derive(Debug, Clone)]
pub struct LevelPlan<'a> {
    target: LevelTarget,
    table: &'a PatternTable,
    positions: Vec<f32>,
    tiers: Vec<Tier>,
    collectible_target: u32,
    hazard_cap: u32,
    row_spacing: f32,
}

impl<'a> LevelPlan<'a> {
    /// Size the course and check that the collectible target is reachable
    pub fn new(
        target: LevelTarget,
        settings: &Settings,
        table: &'a PatternTable,
    ) -> Result<Self, PlanError> {
        settings.validate()?;
        if target.required_amount == 0 {
            return Err(PlanError::NothingRequired);
        }

        let required = target.required_amount as f32;
        let collectible_target = (settings.yarn_density * required).round() as u32;
        let hazard_cap = (settings.obstacle_density * required).round() as u32;

        let end = target.traversable_distance - ROW_END_MARGIN;
        let span = end - ROW_START;
        if span <= 0.0 {
            return Err(PlanError::NoRows {
                distance: target.traversable_distance,
            });
        }

        let desired_rows = collectible_target as f32 / AVG_COLLECTIBLES_PER_ROW;
        let row_spacing = (span / desired_rows).clamp(MIN_ROW_SPACING, MAX_ROW_SPACING);

        let positions: Vec<f32> = (0..)
            .map(|i| ROW_START + i as f32 * row_spacing)
            .take_while(|&z| z < end)
            .collect();
        let tiers: Vec<Tier> = positions.iter().map(|&z| target.tier_at(z)).collect();

        let capacity: u32 = tiers
            .iter()
            .map(|&t| table.max_collectibles(t) as u32)
            .sum();
        if collectible_target > capacity {
            return Err(PlanError::UnreachableTarget {
                target: collectible_target,
                capacity,
            });
        }

        Ok(Self {
            target,
            table,
            positions,
            tiers,
            collectible_target,
            hazard_cap,
            row_spacing,
        })
    }

    pub fn collectible_target(&self) -> u32 {
        self.collectible_target
    }

    pub fn hazard_cap(&self) -> u32 {
        self.hazard_cap
    }

    pub fn row_count(&self) -> usize {
        self.positions.len()
    }

    /// Draw every row of the level. Consumes the plan.
    pub fn generate<R: Rng>(self, rng: &mut R) -> GeneratedLevel {
        let generator = RowGenerator::new(self.table);
        let budget = CollectibleBudget {
            target: self.collectible_target,
            total_rows: self.positions.len(),
        };

        let mut capacity_after: u32 = self
            .tiers
            .iter()
            .map(|&t| self.table.max_collectibles(t) as u32)
            .sum();
        let mut collectibles = 0u32;
        let mut hazards = 0u32;
        let mut escalation_logged = false;
        let mut rows = Vec::with_capacity(self.positions.len());

        for (row, (&position, &tier)) in self.positions.iter().zip(&self.tiers).enumerate() {
            capacity_after -= self.table.max_collectibles(tier) as u32;

            if !escalation_logged && budget.escalated(collectibles, row) {
                log::warn!(
                    "Level {}: {}/{} collectibles at row {}/{}, forcing yarn-rich rows",
                    self.target.level,
                    collectibles,
                    self.collectible_target,
                    row,
                    budget.total_rows
                );
                escalation_logged = true;
            }

            let needs_more = budget.needs_more(collectibles, row, capacity_after);
            let at_hazard_cap = hazards >= self.hazard_cap;
            let drawn = generator.select_pattern(
                tier,
                self.target.level_scaling,
                needs_more,
                at_hazard_cap,
                rng,
            );

            let mut placed = drawn;
            for slot in placed.0.iter_mut() {
                match *slot {
                    SlotKind::Collectible => collectibles += 1,
                    SlotKind::Hazard if hazards < self.hazard_cap => hazards += 1,
                    SlotKind::Hazard => *slot = SlotKind::Empty,
                    SlotKind::Empty => {}
                }
            }

            log::debug!(
                "row {} at {:.1} ({:?}): drew {} placed {}",
                row,
                position,
                tier,
                drawn.code(),
                placed.code()
            );

            rows.push(PlannedRow {
                position,
                tier,
                drawn,
                placed,
            });
        }

        log::info!(
            "Level {}: {} rows, {} collectibles (target {}), {} hazards (cap {})",
            self.target.level,
            rows.len(),
            collectibles,
            self.collectible_target,
            hazards,
            self.hazard_cap
        );

        GeneratedLevel {
            rows,
            collectibles,
            hazards,
            collectible_target: self.collectible_target,
            hazard_cap: self.hazard_cap,
            row_spacing: self.row_spacing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn generate(level: u32, settings: &Settings, seed: u64) -> GeneratedLevel {
        let table = PatternTable::default();
        let plan = LevelPlan::new(LevelTarget::for_level(level), settings, &table).unwrap();
        plan.generate(&mut Pcg32::seed_from_u64(seed))
    }

    #[test]
    fn test_level_one_scenario() {
        let settings = Settings {
            yarn_density: 1.5,
            obstacle_density: 2.0,
            ..Default::default()
        };
        let level = generate(1, &settings, 42);
        assert_eq!(level.collectible_target, 15);
        assert_eq!(level.hazard_cap, 20);
        assert!(level.collectibles >= 15);
        assert!(level.hazards <= 20);
        // Sparse target keeps the default spacing: rows at 10, 13, ..., 94
        assert_eq!(level.row_spacing, MAX_ROW_SPACING);
        assert_eq!(level.rows.len(), 29);
    }

    #[test]
    fn test_counts_match_placed_rows() {
        let level = generate(3, &Settings::default(), 5);
        let yarn: usize = level.rows.iter().map(|r| r.placed.collectible_count()).sum();
        let hazards: usize = level.rows.iter().map(|r| r.placed.hazard_count()).sum();
        assert_eq!(yarn as u32, level.collectibles);
        assert_eq!(hazards as u32, level.hazards);
    }

    #[test]
    fn test_same_seed_same_level() {
        let settings = Settings::default();
        assert_eq!(generate(4, &settings, 1234), generate(4, &settings, 1234));
    }

    #[test]
    fn test_dense_yarn_tightens_spacing() {
        let settings = Settings {
            yarn_density: 5.0,
            ..Default::default()
        };
        let level = generate(1, &settings, 8);
        assert!(level.row_spacing < MAX_ROW_SPACING);
        assert!(level.row_spacing >= MIN_ROW_SPACING);
        assert!(level.collectibles >= 50);
        for pair in level.rows.windows(2) {
            assert!(pair[1].position - pair[0].position >= MIN_ROW_SPACING - 1e-4);
        }
    }

    #[test]
    fn test_zero_obstacles_places_no_hazards() {
        let settings = Settings {
            obstacle_density: 0.0,
            ..Default::default()
        };
        let level = generate(6, &settings, 77);
        assert_eq!(level.hazard_cap, 0);
        assert_eq!(level.hazards, 0);
        // Hard rows with hazards still come from the table, emptied on placement
        for row in &level.rows {
            assert_eq!(row.placed.hazard_count(), 0);
        }
    }

    #[test]
    fn test_dropped_hazards_become_empty() {
        let settings = Settings {
            obstacle_density: 0.1,
            ..Default::default()
        };
        let level = generate(1, &settings, 3);
        assert_eq!(level.hazard_cap, 1);
        assert!(level.hazards <= 1);
        for row in &level.rows {
            for (drawn, placed) in row.drawn.slots().iter().zip(row.placed.slots()) {
                if drawn != placed {
                    assert_eq!(*drawn, SlotKind::Hazard);
                    assert_eq!(*placed, SlotKind::Empty);
                }
            }
        }
    }

    #[test]
    fn test_unreachable_target_rejected() {
        let table = PatternTable::default();
        let settings = Settings {
            yarn_density: 20.0,
            ..Default::default()
        };
        let err = LevelPlan::new(LevelTarget::for_level(1), &settings, &table).unwrap_err();
        assert!(matches!(
            err,
            PlanError::UnreachableTarget { target: 200, .. }
        ));
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let table = PatternTable::default();

        let mut short = LevelTarget::for_level(1);
        short.traversable_distance = 12.0;
        assert_eq!(
            LevelPlan::new(short, &Settings::default(), &table).unwrap_err(),
            PlanError::NoRows { distance: 12.0 }
        );

        let mut free = LevelTarget::for_level(1);
        free.required_amount = 0;
        assert_eq!(
            LevelPlan::new(free, &Settings::default(), &table).unwrap_err(),
            PlanError::NothingRequired
        );

        let settings = Settings {
            yarn_density: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            LevelPlan::new(LevelTarget::for_level(1), &settings, &table),
            Err(PlanError::Settings(_))
        ));
    }

    #[test]
    fn test_tight_supply_escalates_late_rows() {
        let table = PatternTable::default();
        let settings = Settings {
            yarn_density: 9.0,
            ..Default::default()
        };
        let plan = LevelPlan::new(LevelTarget::for_level(1), &settings, &table).unwrap();
        assert_eq!(plan.collectible_target(), 90);
        let rows = plan.row_count();
        let level = plan.generate(&mut Pcg32::seed_from_u64(17));

        assert_eq!(level.rows.len(), rows);
        assert!(level.collectibles >= level.collectible_target);

        let escalation_row = (rows as f32 * COLLECTIBLE_ESCALATION_PROGRESS).ceil() as usize;
        let mut placed = 0u32;
        for (i, row) in level.rows.iter().enumerate() {
            if i >= escalation_row && placed < level.collectible_target {
                assert_eq!(
                    row.drawn.collectible_count(),
                    table.max_collectibles(row.tier),
                    "row {} at {:.1}",
                    i,
                    row.position
                );
            }
            placed += row.placed.collectible_count() as u32;
        }
    }

    #[test]
    fn test_budget_pace() {
        let budget = CollectibleBudget {
            target: 10,
            total_rows: 10,
        };
        // Behind pace
        assert!(budget.needs_more(0, 0, 100));
        // Ahead of pace with plenty of rows left
        assert!(!budget.needs_more(5, 2, 100));
        // Target met
        assert!(!budget.needs_more(10, 9, 0));
    }

    #[test]
    fn test_budget_escalates_at_eighty_percent() {
        let budget = CollectibleBudget {
            target: 10,
            total_rows: 10,
        };
        // Row 7 (70%): pace is 8, nine placed, no escalation
        assert!(!budget.escalated(9, 7));
        assert!(!budget.needs_more(9, 7, 100));
        // Row 8 (80%): pace is 9, nine placed, escalation still forces yarn
        assert!(budget.escalated(9, 8));
        assert!(budget.needs_more(9, 8, 100));
    }

    #[test]
    fn test_budget_reserves_capacity() {
        let budget = CollectibleBudget {
            target: 10,
            total_rows: 100,
        };
        // Well ahead of pace, but the remaining rows can only supply 2 more
        assert!(budget.needs_more(7, 10, 2));
        assert!(!budget.needs_more(7, 10, 3));
    }
}
