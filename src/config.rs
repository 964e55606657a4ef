//! Viewer configuration.
//!
//! Every field has a default matching the interactive controls, so a config
//! file only needs the values it changes:
//!
//! ```json
//! { "radius": { "initial": 0.2 }, "show_h2": false }
//! ```

use crate::engine::{DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_DIMENSION};
use crate::error::ConfigError;
use crate::filtration::{FiltrationParameter, RadiusBounds};
use crate::view::{DimensionSelection, DisplayRange, PlotMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Radius slider: bounds, granularity and starting value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiusConfig {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: f64,
}

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            min: 0.01,
            max: 1.0,
            step: 0.01,
            initial: 0.05,
        }
    }
}

/// Autoplay schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Radius increment per tick
    pub step: f64,
    /// Time between ticks in milliseconds
    pub cadence_ms: u64,
}

impl AnimationConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            step: 0.05,
            cadence_ms: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub radius: RadiusConfig,
    pub autoplay: bool,
    pub show_h0: bool,
    pub show_h1: bool,
    pub show_h2: bool,
    /// Highest homology dimension computed
    pub max_dimension: usize,
    pub animation: AnimationConfig,
    /// Memoized diagram sets kept per session (0 disables)
    pub cache_capacity: usize,
    pub display_range: DisplayRange,
    pub plot_mode: PlotMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            radius: RadiusConfig::default(),
            autoplay: false,
            show_h0: true,
            show_h1: true,
            show_h2: true,
            max_dimension: DEFAULT_MAX_DIMENSION,
            animation: AnimationConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            display_range: DisplayRange::default(),
            plot_mode: PlotMode::default(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the interactive surface cannot represent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.radius;
        if !(r.min.is_finite() && r.max.is_finite()) || r.min <= 0.0 {
            return Err(ConfigError::invalid(format!(
                "radius bounds must be finite and positive, got [{}, {}]",
                r.min, r.max
            )));
        }
        if r.min >= r.max {
            return Err(ConfigError::invalid(format!(
                "radius.min ({}) must be below radius.max ({})",
                r.min, r.max
            )));
        }
        if !(r.step.is_finite() && r.step > 0.0) {
            return Err(ConfigError::invalid(format!(
                "radius.step must be positive, got {}",
                r.step
            )));
        }
        if !(self.animation.step.is_finite() && self.animation.step > 0.0) {
            return Err(ConfigError::invalid(format!(
                "animation.step must be positive, got {}",
                self.animation.step
            )));
        }
        if self.animation.cadence_ms == 0 {
            return Err(ConfigError::invalid("animation.cadence_ms must be at least 1"));
        }
        let d = &self.display_range;
        if !(d.min.is_finite() && d.max.is_finite()) || d.min >= d.max {
            return Err(ConfigError::invalid(format!(
                "display_range must be a finite, non-empty interval, got [{}, {}]",
                d.min, d.max
            )));
        }
        Ok(())
    }

    pub fn bounds(&self) -> RadiusBounds {
        RadiusBounds::new(self.radius.min, self.radius.max, self.radius.step)
    }

    /// Radius state seeded with the configured initial value (clamped)
    pub fn parameter(&self) -> FiltrationParameter {
        FiltrationParameter::new(self.bounds(), self.radius.initial)
    }

    pub fn selection(&self) -> DimensionSelection {
        DimensionSelection::from_flags(self.show_h0, self.show_h1, self.show_h2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controls() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.parameter().get(), 0.05);
        assert_eq!(config.bounds(), RadiusBounds::new(0.01, 1.0, 0.01));
        assert!(!config.autoplay);
        assert_eq!(config.selection(), DimensionSelection::all());
        assert_eq!(config.max_dimension, 2);
        assert_eq!(config.animation.cadence(), Duration::from_millis(400));
        assert_eq!(config.animation.step, 0.05);
    }

    #[test]
    fn test_partial_json() {
        let config = ViewerConfig::from_json(
            r#"{ "radius": { "initial": 0.2 }, "show_h2": false, "plot_mode": "birth_death" }"#,
        )
        .unwrap();
        assert_eq!(config.parameter().get(), 0.2);
        assert_eq!(config.radius.max, 1.0);
        assert_eq!(config.selection(), DimensionSelection::from_flags(true, true, false));
        assert_eq!(config.plot_mode, PlotMode::BirthDeath);
    }

    #[test]
    fn test_initial_out_of_range_is_clamped() {
        let config = ViewerConfig::from_json(r#"{ "radius": { "initial": 7.0 } }"#).unwrap();
        assert_eq!(config.parameter().get(), 1.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for json in [
            r#"{ "radius": { "min": 0.5, "max": 0.5 } }"#,
            r#"{ "radius": { "min": 0.0 } }"#,
            r#"{ "radius": { "step": 0.0 } }"#,
            r#"{ "animation": { "step": -0.05 } }"#,
            r#"{ "animation": { "cadence_ms": 0 } }"#,
            r#"{ "display_range": { "min": 1.0, "max": 0.0 } }"#,
        ] {
            assert!(
                matches!(ViewerConfig::from_json(json), Err(ConfigError::Invalid(_))),
                "accepted {}",
                json
            );
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            ViewerConfig::from_json("{ radius: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ViewerConfig::from_file("/nonexistent/viewer.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
