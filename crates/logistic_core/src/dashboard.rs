use crate::chart::{assemble_figure, Figure};
use crate::grid::TimeGrid;
use crate::params::{ingest, RawParams};
use crate::solvers::SolverSettings;
use crate::trajectory::{simulate, Trajectory, INITIAL_SAC, INITIAL_SCH};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "DashboardConfig::default_initial_state")]
    pub initial_state: [f64; 2],
    #[serde(default)]
    pub grid: TimeGrid,
    #[serde(default)]
    pub solver: SolverSettings,
}

impl DashboardConfig {
    fn default_initial_state() -> [f64; 2] {
        [INITIAL_SAC, INITIAL_SCH]
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_state: Self::default_initial_state(),
            grid: TimeGrid::default(),
            solver: SolverSettings::default(),
        }
    }
}

/// Rebuilds the chart for one set of page inputs.
///
/// Never fails: bad inputs fall back to defaults, integration breakdowns
/// become undefined series, and an unusable configuration yields a chart
/// with observations only.
pub fn recompute(raw: &RawParams, config: &DashboardConfig) -> Figure {
    let params = ingest(raw);
    debug!(?params, "recomputing chart");

    let trajectory = simulate(&params, config.initial_state, &config.grid, &config.solver)
        .unwrap_or_else(|err| {
            warn!(%err, "invalid dashboard configuration, fitted curves omitted");
            Trajectory {
                times: Vec::new(),
                sac: Vec::new(),
                sch: Vec::new(),
            }
        });

    assemble_figure(&trajectory)
}

/// A configured dashboard; each call to `recompute` is independent.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn sample_times(&self) -> Vec<f64> {
        self.config.grid.points()
    }

    pub fn recompute(&self, raw: &RawParams) -> Figure {
        recompute(raw, &self.config)
    }
}
