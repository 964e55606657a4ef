//! Bounded filtration radius.

use serde::{Deserialize, Serialize};

/// Tolerance when comparing a stepped radius against the upper bound
const STEP_EPS: f64 = 1e-9;

/// Inclusive radius bounds and slider granularity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RadiusBounds {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp into `[min, max]`. NaN maps to `min`, so the result is always
    /// in range and `clamp(clamp(x)) == clamp(x)`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            self.min
        } else {
            value.max(self.min).min(self.max)
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of slider positions between the bounds
    pub fn positions(&self) -> usize {
        ((self.max - self.min) / self.step).round() as usize + 1
    }

    /// Advance `value` by `increment`, wrapping back to `min` once the
    /// result would leave the range at the top.
    pub fn wrapping_advance(&self, value: f64, increment: f64) -> f64 {
        let next = value + increment;
        if next > self.max + STEP_EPS || next.is_nan() {
            self.min
        } else {
            self.clamp(next)
        }
    }
}

impl Default for RadiusBounds {
    fn default() -> Self {
        Self {
            min: 0.01,
            max: 1.0,
            step: 0.01,
        }
    }
}

/// The session's filtration radius.
///
/// Writes clamp silently; the stored value is always within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiltrationParameter {
    bounds: RadiusBounds,
    radius: f64,
}

impl FiltrationParameter {
    pub fn new(bounds: RadiusBounds, initial: f64) -> Self {
        Self {
            bounds,
            radius: bounds.clamp(initial),
        }
    }

    /// Current radius
    pub fn get(&self) -> f64 {
        self.radius
    }

    /// Store `value`, clamped into bounds. Returns the stored value.
    pub fn set(&mut self, value: f64) -> f64 {
        self.radius = self.bounds.clamp(value);
        self.radius
    }

    pub fn clamp(&self, value: f64) -> f64 {
        self.bounds.clamp(value)
    }

    pub fn bounds(&self) -> RadiusBounds {
        self.bounds
    }

    /// Cyclic advance used by autoplay. Returns the new radius.
    pub fn advance_wrapping(&mut self, increment: f64) -> f64 {
        self.radius = self.bounds.wrapping_advance(self.radius, increment);
        self.radius
    }
}

impl Default for FiltrationParameter {
    fn default() -> Self {
        Self::new(RadiusBounds::default(), 0.05)
    }
}
