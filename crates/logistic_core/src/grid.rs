use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const T_BEGIN: f64 = 0.0;
pub const T_END: f64 = 141.0;
pub const T_SAMPLES: usize = 15_000;

/// Evenly spaced sample times, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    #[serde(default = "TimeGrid::default_start")]
    pub start: f64,
    #[serde(default = "TimeGrid::default_end")]
    pub end: f64,
    #[serde(default = "TimeGrid::default_samples")]
    pub samples: usize,
}

impl TimeGrid {
    fn default_start() -> f64 {
        T_BEGIN
    }
    fn default_end() -> f64 {
        T_END
    }
    fn default_samples() -> usize {
        T_SAMPLES
    }

    pub fn new(start: f64, end: f64, samples: usize) -> Result<Self> {
        let grid = Self {
            start,
            end,
            samples,
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples == 0 {
            bail!("Time grid needs at least one sample.");
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            bail!("Time grid bounds must be finite.");
        }
        if self.end < self.start {
            bail!(
                "Time grid end ({}) precedes its start ({}).",
                self.end,
                self.start
            );
        }
        Ok(())
    }

    pub fn step(&self) -> f64 {
        if self.samples < 2 {
            0.0
        } else {
            (self.end - self.start) / (self.samples - 1) as f64
        }
    }

    pub fn points(&self) -> Vec<f64> {
        if self.samples == 0 {
            return Vec::new();
        }
        let step = self.step();
        let mut points: Vec<f64> = (0..self.samples)
            .map(|i| self.start + i as f64 * step)
            .collect();
        if self.samples > 1 {
            points[self.samples - 1] = self.end;
        }
        points
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start: T_BEGIN,
            end: T_END,
            samples: T_SAMPLES,
        }
    }
}
