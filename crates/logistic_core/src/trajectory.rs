use crate::grid::TimeGrid;
use crate::model::LogisticGrowth;
use crate::params::ParamSet;
use crate::reference::Species;
use crate::solvers::{fill_grid, SolverSettings};
use anyhow::Result;
use serde::Serialize;
use tracing::warn;

pub const INITIAL_SAC: f64 = 0.4492;
pub const INITIAL_SCH: f64 = 0.4636;

/// Fitted populations for both species on a shared time base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub sac: Vec<f64>,
    pub sch: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn series(&self, species: Species) -> &[f64] {
        match species {
            Species::Saccharomyces => &self.sac,
            Species::Schizosaccharomyces => &self.sch,
        }
    }

    pub fn final_values(&self) -> Option<(f64, f64)> {
        Some((*self.sac.last()?, *self.sch.last()?))
    }
}

/// Integrates one species over the grid. If the integration breaks down,
/// the samples it reached are kept and the rest of the series is NaN.
fn integrate_species(
    species: Species,
    model: LogisticGrowth,
    initial: f64,
    times: &[f64],
    settings: &SolverSettings,
) -> Vec<f64> {
    let mut series = Vec::with_capacity(times.len());
    if let Err(err) = fill_grid(&model, &[initial], times, settings, &mut series) {
        warn!(
            species = species.label(),
            r = model.r,
            k = model.k,
            completed = series.len(),
            %err,
            "integration failed, remaining samples left undefined"
        );
        series.resize(times.len(), f64::NAN);
    }
    series
}

/// Integrates both species from `initial` over `grid`.
///
/// The species are integrated independently so a breakdown in one (for
/// example a zero carrying capacity) leaves the other intact. A zero
/// capacity fails at the first sample, so that series is NaN throughout.
pub fn simulate(
    params: &ParamSet,
    initial: [f64; 2],
    grid: &TimeGrid,
    settings: &SolverSettings,
) -> Result<Trajectory> {
    grid.validate()?;
    settings.validate()?;

    let times = grid.points();
    let sac = integrate_species(
        Species::Saccharomyces,
        LogisticGrowth::new(params.r_sac, params.k_sac),
        initial[0],
        &times,
        settings,
    );
    let sch = integrate_species(
        Species::Schizosaccharomyces,
        LogisticGrowth::new(params.r_sch, params.k_sch),
        initial[1],
        &times,
        settings,
    );

    Ok(Trajectory { times, sac, sch })
}
