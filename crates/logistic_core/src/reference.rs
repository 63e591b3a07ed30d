//! Observed yeast volumes from Gause, "Experimental Studies on the Struggle
//! for Existence", J. Exp. Biol. 9 (1932) 389-402.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Saccharomyces,
    Schizosaccharomyces,
}

impl Species {
    pub fn label(self) -> &'static str {
        match self {
            Species::Saccharomyces => "Saccharomyces",
            Species::Schizosaccharomyces => "Schizosaccharomyces",
        }
    }
}

/// One species' observations, aligned index for index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceSeries {
    pub species: Species,
    pub times: &'static [f64],
    pub counts: &'static [f64],
}

impl ReferenceSeries {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

const SAC_TIMES: [f64; 14] = [
    6.0, 7.5, 15.0, 16.0, 24.0, 24.0, 29.0, 31.5, 33.0, 40.0, 44.0, 48.0, 51.5, 53.0,
];
const SAC_COUNTS: [f64; 14] = [
    0.37, 1.63, 6.2, 8.87, 10.66, 10.97, 12.5, 12.6, 12.9, 13.27, 12.77, 12.87, 12.9, 12.7,
];

const SCH_TIMES: [f64; 10] = [15.0, 16.0, 29.0, 31.5, 48.0, 51.5, 72.0, 93.0, 117.0, 141.0];
const SCH_COUNTS: [f64; 10] = [1.27, 1.0, 1.7, 2.33, 2.73, 4.56, 4.87, 5.67, 5.8, 5.83];

pub const SACCHAROMYCES: ReferenceSeries = ReferenceSeries {
    species: Species::Saccharomyces,
    times: &SAC_TIMES,
    counts: &SAC_COUNTS,
};

pub const SCHIZOSACCHAROMYCES: ReferenceSeries = ReferenceSeries {
    species: Species::Schizosaccharomyces,
    times: &SCH_TIMES,
    counts: &SCH_COUNTS,
};

pub const ALL: [ReferenceSeries; 2] = [SACCHAROMYCES, SCHIZOSACCHAROMYCES];
