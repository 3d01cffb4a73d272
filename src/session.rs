//! Session lifecycle
//!
//! A session carries the level counter and settings across attempts. Every
//! start, retry or next-level builds a brand new `Attempt`; abandoning one is
//! just dropping it.

use crate::error::{PlanError, SettingsError};
use crate::settings::Settings;
use crate::sim::{Attempt, LevelTarget, Outcome, PatternTable};

#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    table: PatternTable,
    level: u32,
    attempts: u32,
}

impl Session {
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        Self::with_table(settings, PatternTable::default())
    }

    /// Session using a custom (already validated) pattern table
    pub fn with_table(settings: Settings, table: PatternTable) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            level: settings.starting_level,
            settings,
            table,
            attempts: 0,
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace settings between attempts; restarts from the starting level
    pub fn apply_settings(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        log::info!("Settings applied: {:?}", settings);
        self.level = settings.starting_level;
        self.settings = settings;
        Ok(())
    }

    /// Build a fresh attempt at the current level
    pub fn start_attempt(&mut self, seed: u64) -> Result<Attempt, PlanError> {
        let target = LevelTarget::for_level(self.level);
        let attempt = Attempt::new(target, self.settings.clone(), &self.table, seed)?;
        self.attempts += 1;
        Ok(attempt)
    }

    /// Record a finished attempt; success unlocks the next level
    pub fn record(&mut self, outcome: &Outcome) -> u32 {
        if outcome.is_success() {
            self.level += 1;
            log::info!("Level cleared, advancing to level {}", self.level);
        }
        self.level
    }
}
