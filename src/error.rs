//! Error taxonomy
//!
//! The core is a closed simulation, so every error here is a configuration
//! problem detected before an attempt starts.

use thiserror::Error;

use crate::sim::Tier;

/// Session settings outside their documented ranges.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("settings are not valid JSON: {0}")]
    Parse(String),
}

/// Invalid pattern table data, rejected when the table is loaded.
#[derive(Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("{tier:?} tier has no patterns")]
    EmptyTier { tier: Tier },
    #[error("{tier:?} tier pattern #{index} blocks every lane")]
    AllHazardRow { tier: Tier, index: usize },
    #[error("pattern code {code:?} must be three of Y, T or X")]
    BadCode { code: String },
    #[error("pattern table is not valid JSON: {0}")]
    Parse(String),
}

/// A level plan that cannot be generated or cannot be won.
#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("required crossing amount must be positive")]
    NothingRequired,
    #[error("collectible target {target} exceeds the {capacity} the course can hold")]
    UnreachableTarget { target: u32, capacity: u32 },
    #[error("course of {distance:.1} units is too short to hold a row")]
    NoRows { distance: f32 },
}
