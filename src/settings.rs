//! Session settings
//!
//! Read once when an attempt starts and treated as immutable for its
//! duration. Only the level counter and these values survive between
//! attempts; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Player-tunable multipliers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Collectible target as a multiple of the required crossing amount
    pub yarn_density: f32,
    /// Hazard cap as a multiple of the required crossing amount
    pub obstacle_density: f32,
    /// Scales forward speed in every moving phase
    pub speed_multiplier: f32,
    /// Level the session starts on
    pub starting_level: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            yarn_density: 1.5,
            obstacle_density: 2.0,
            speed_multiplier: 1.0,
            starting_level: 1,
        }
    }
}

impl Settings {
    pub const YARN_DENSITY_RANGE: (f32, f32) = (1.0, 20.0);
    pub const OBSTACLE_DENSITY_RANGE: (f32, f32) = (0.0, 3.0);
    pub const SPEED_RANGE: (f32, f32) = (0.5, 3.0);
    pub const LEVEL_RANGE: (u32, u32) = (1, 20);

    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Like `from_json`, but a blank string means the defaults
    pub fn from_json_or_default(json: &str) -> Result<Self, SettingsError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::from_json(json)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        check_range("yarn_density", self.yarn_density, Self::YARN_DENSITY_RANGE)?;
        check_range(
            "obstacle_density",
            self.obstacle_density,
            Self::OBSTACLE_DENSITY_RANGE,
        )?;
        check_range("speed_multiplier", self.speed_multiplier, Self::SPEED_RANGE)?;
        let (min, max) = Self::LEVEL_RANGE;
        if !(min..=max).contains(&self.starting_level) {
            return Err(SettingsError::RangeViolation {
                field: "starting_level",
                min: min as f32,
                max: max as f32,
                value: self.starting_level as f32,
            });
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f32,
    (min, max): (f32, f32),
) -> Result<(), SettingsError> {
    // NaN fails the contains check too
    if !(min..=max).contains(&value) {
        return Err(SettingsError::RangeViolation {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let settings = Settings::from_json(r#"{ "yarn_density": 3.0 }"#).unwrap();
        assert_eq!(settings.yarn_density, 3.0);
        assert_eq!(settings.obstacle_density, 2.0);
        assert_eq!(settings.starting_level, 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let settings = Settings {
            obstacle_density: 3.5,
            ..Default::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::RangeViolation {
                field: "obstacle_density",
                min: 0.0,
                max: 3.0,
                value: 3.5,
            })
        );

        let settings = Settings {
            speed_multiplier: f32::NAN,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = Settings {
            starting_level: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(SettingsError::Parse(_))
        ));
        assert!(Settings::from_json(r#"{ "yarn_density": 0.5 }"#).is_err());
    }

    #[test]
    fn test_blank_json_means_defaults() {
        assert!(matches!(Settings::from_json(""), Err(SettingsError::Parse(_))));
        assert_eq!(Settings::from_json_or_default("").unwrap(), Settings::default());
        assert_eq!(Settings::from_json_or_default("  \n").unwrap(), Settings::default());

        let settings = Settings::from_json_or_default(r#"{ "starting_level": 3 }"#).unwrap();
        assert_eq!(settings.starting_level, 3);
        assert!(Settings::from_json_or_default(r#"{ "starting_level": 0 }"#).is_err());
    }
}
