//! Plotly-shaped figure description of the fitted curves and observations.
//!
//! Non-finite samples serialize to JSON `null`, which the renderer draws as a
//! gap in the line.

use crate::reference::{ReferenceSeries, Species, SACCHAROMYCES, SCHIZOSACCHAROMYCES};
use crate::trajectory::Trajectory;
use serde::{Deserialize, Serialize};

pub const CHART_TITLE: &str = "Crescimento Logístico";
pub const X_AXIS_TITLE: &str = "Tempo (anos)";
pub const Y_AXIS_TITLE: &str = "Número de indivíduos";
pub const Y_RANGE: [f64; 2] = [0.0, 16.0];

const MARKER_SIZE: f64 = 4.0;
const LINE_WIDTH: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Markers,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    Cross,
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    DashDot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
    pub symbol: MarkerSymbol,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub color: String,
    pub dash: LineDash,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub mode: Mode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            title: Title::new(CHART_TITLE),
            xaxis: Axis {
                title: Title::new(X_AXIS_TITLE),
                range: None,
            },
            yaxis: Axis {
                title: Title::new(Y_AXIS_TITLE),
                range: Some(Y_RANGE),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|trace| trace.name == name)
    }
}

fn color(species: Species) -> &'static str {
    match species {
        Species::Saccharomyces => "blue",
        Species::Schizosaccharomyces => "red",
    }
}

fn observed_trace(series: &ReferenceSeries) -> Trace {
    let symbol = match series.species {
        Species::Saccharomyces => MarkerSymbol::Cross,
        Species::Schizosaccharomyces => MarkerSymbol::Circle,
    };
    Trace {
        kind: "scatter".to_string(),
        name: series.species.label().to_string(),
        mode: Mode::Markers,
        x: series.times.to_vec(),
        y: series.counts.to_vec(),
        marker: Some(Marker {
            color: color(series.species).to_string(),
            symbol,
            size: MARKER_SIZE,
        }),
        line: None,
    }
}

fn fitted_trace(species: Species, times: &[f64], values: &[f64]) -> Trace {
    let dash = match species {
        Species::Saccharomyces => LineDash::DashDot,
        Species::Schizosaccharomyces => LineDash::Solid,
    };
    Trace {
        kind: "scatter".to_string(),
        name: format!("Ajuste {}", species.label()),
        mode: Mode::Lines,
        x: times.to_vec(),
        y: values.to_vec(),
        marker: None,
        line: Some(Line {
            color: color(species).to_string(),
            dash,
            width: LINE_WIDTH,
        }),
    }
}

/// Builds the four traces in display order: observed and fitted
/// Saccharomyces, then observed and fitted Schizosaccharomyces.
pub fn assemble_figure(trajectory: &Trajectory) -> Figure {
    let data = [SACCHAROMYCES, SCHIZOSACCHAROMYCES]
        .iter()
        .flat_map(|series| {
            [
                observed_trace(series),
                fitted_trace(
                    series.species,
                    &trajectory.times,
                    trajectory.series(series.species),
                ),
            ]
        })
        .collect();

    Figure {
        data,
        layout: Layout::default(),
    }
}
