use crate::error::IntegrationError;
use crate::traits::{DynamicalSystem, Scalar, Steppable};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

fn coeff<T: Scalar>(value: f64) -> T {
    T::from_f64(value).unwrap_or_else(T::nan)
}

/// Classic Runge-Kutta 4th Order Solver
pub struct RK4<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    tmp: Vec<T>,
}

impl<T: Scalar> RK4<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            tmp: vec![z; dim],
        }
    }
}

impl<T: Scalar> Steppable<T> for RK4<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let half: T = coeff(0.5);
        let sixth: T = coeff(1.0 / 6.0);
        let two: T = coeff(2.0);

        let t0 = *t;

        // k1 = f(t, y)
        system.apply(t0, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k1[i] * half;
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k2[i] * half;
        }
        system.apply(t0 + dt * half, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k4);

        for i in 0..state.len() {
            state[i] = state[i]
                + dt * sixth * (self.k1[i] + two * self.k2[i] + two * self.k3[i] + self.k4[i]);
        }

        *t = t0 + dt;
    }
}

// Tsitouras 5/4 tableau.
const C2: f64 = 0.161;
const C3: f64 = 0.327;
const C4: f64 = 0.9;
const C5: f64 = 0.9800255409045097;

const A21: f64 = 0.161;
const A31: f64 = -0.008480655492356989;
const A32: f64 = 0.335480655492357;
const A41: f64 = 2.897153057105493;
const A42: f64 = -6.359448489975075;
const A43: f64 = 4.3622954328695815;
const A51: f64 = 5.325864828439257;
const A52: f64 = -11.748883564062828;
const A53: f64 = 7.4955393428898365;
const A54: f64 = -0.09249506636175525;
const A61: f64 = 5.86145544294642;
const A62: f64 = -12.92096931784711;
const A63: f64 = 8.159367898576159;
const A64: f64 = -0.071584973281401;
const A65: f64 = -0.028269050394068383;

// 5th order weights (FSAL: row 7 of the tableau).
const B1: f64 = 0.09646076681806523;
const B2: f64 = 0.01;
const B3: f64 = 0.4798896504144996;
const B4: f64 = 1.379008574103742;
const B5: f64 = -3.290069515436081;
const B6: f64 = 2.324710524099774;

// Difference between the 5th and embedded 4th order weights.
const E1: f64 = -0.00178001105222577714;
const E2: f64 = -0.0008164344596567469;
const E3: f64 = 0.007880878010261995;
const E4: f64 = -0.1447110071732629;
const E5: f64 = 0.5823571654525552;
const E6: f64 = -0.45808210592918697;
const E7: f64 = 0.015151515151515152;

/// Tsitouras 5/4 Solver
pub struct Tsit5<T: Scalar> {
    k1: Vec<T>,
    k2: Vec<T>,
    k3: Vec<T>,
    k4: Vec<T>,
    k5: Vec<T>,
    k6: Vec<T>,
    k7: Vec<T>,
    tmp: Vec<T>,
    next: Vec<T>,
}

impl<T: Scalar> Tsit5<T> {
    pub fn new(dim: usize) -> Self {
        let z = T::zero();
        Self {
            k1: vec![z; dim],
            k2: vec![z; dim],
            k3: vec![z; dim],
            k4: vec![z; dim],
            k5: vec![z; dim],
            k6: vec![z; dim],
            k7: vec![z; dim],
            tmp: vec![z; dim],
            next: vec![z; dim],
        }
    }

    /// Evaluates the six stages and writes the 5th order solution into `self.next`.
    fn stages(&mut self, system: &impl DynamicalSystem<T>, t0: T, state: &[T], dt: T) {
        let n = state.len();

        system.apply(t0, state, &mut self.k1);

        for i in 0..n {
            self.tmp[i] = state[i] + dt * (coeff::<T>(A21) * self.k1[i]);
        }
        system.apply(t0 + coeff::<T>(C2) * dt, &self.tmp, &mut self.k2);

        for i in 0..n {
            self.tmp[i] =
                state[i] + dt * (coeff::<T>(A31) * self.k1[i] + coeff::<T>(A32) * self.k2[i]);
        }
        system.apply(t0 + coeff::<T>(C3) * dt, &self.tmp, &mut self.k3);

        for i in 0..n {
            self.tmp[i] = state[i]
                + dt * (coeff::<T>(A41) * self.k1[i]
                    + coeff::<T>(A42) * self.k2[i]
                    + coeff::<T>(A43) * self.k3[i]);
        }
        system.apply(t0 + coeff::<T>(C4) * dt, &self.tmp, &mut self.k4);

        for i in 0..n {
            self.tmp[i] = state[i]
                + dt * (coeff::<T>(A51) * self.k1[i]
                    + coeff::<T>(A52) * self.k2[i]
                    + coeff::<T>(A53) * self.k3[i]
                    + coeff::<T>(A54) * self.k4[i]);
        }
        system.apply(t0 + coeff::<T>(C5) * dt, &self.tmp, &mut self.k5);

        for i in 0..n {
            self.tmp[i] = state[i]
                + dt * (coeff::<T>(A61) * self.k1[i]
                    + coeff::<T>(A62) * self.k2[i]
                    + coeff::<T>(A63) * self.k3[i]
                    + coeff::<T>(A64) * self.k4[i]
                    + coeff::<T>(A65) * self.k5[i]);
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k6);

        for i in 0..n {
            self.next[i] = state[i]
                + dt * (coeff::<T>(B1) * self.k1[i]
                    + coeff::<T>(B2) * self.k2[i]
                    + coeff::<T>(B3) * self.k3[i]
                    + coeff::<T>(B4) * self.k4[i]
                    + coeff::<T>(B5) * self.k5[i]
                    + coeff::<T>(B6) * self.k6[i]);
        }
    }

    /// Proposes a step from `state` without committing it.
    ///
    /// Returns the 5th order solution and writes the local error estimate
    /// (difference to the embedded 4th order solution) into `err`.
    pub fn step_with_error(
        &mut self,
        system: &impl DynamicalSystem<T>,
        t0: T,
        state: &[T],
        dt: T,
        err: &mut [T],
    ) -> &[T] {
        self.stages(system, t0, state, dt);
        system.apply(t0 + dt, &self.next, &mut self.k7);

        for i in 0..state.len() {
            err[i] = dt
                * (coeff::<T>(E1) * self.k1[i]
                    + coeff::<T>(E2) * self.k2[i]
                    + coeff::<T>(E3) * self.k3[i]
                    + coeff::<T>(E4) * self.k4[i]
                    + coeff::<T>(E5) * self.k5[i]
                    + coeff::<T>(E6) * self.k6[i]
                    + coeff::<T>(E7) * self.k7[i]);
        }

        &self.next
    }
}

impl<T: Scalar> Steppable<T> for Tsit5<T> {
    fn step(&mut self, system: &impl DynamicalSystem<T>, t: &mut T, state: &mut [T], dt: T) {
        let t0 = *t;
        self.stages(system, t0, state, dt);
        state.copy_from_slice(&self.next);
        *t = t0 + dt;
    }
}

/// Integration scheme used to fill a time grid.
///
/// Both schemes are explicit. Very stiff inputs (rates of order 1e4 and up
/// over the default horizon) force steps near the stability limit, exhaust
/// `max_steps` and leave the rest of the series undefined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Error-controlled Tsitouras 5/4.
    #[default]
    Tsit5,
    /// Fixed substeps of classic RK4.
    Rk4,
}

impl FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "tsit5" => Ok(Method::Tsit5),
            "rk4" => Ok(Method::Rk4),
            _ => bail!("Unknown solver: {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    #[serde(default)]
    pub method: Method,
    #[serde(default = "SolverSettings::default_tolerance")]
    pub rtol: f64,
    #[serde(default = "SolverSettings::default_tolerance")]
    pub atol: f64,
    /// First trial step for Tsit5, largest substep for RK4.
    #[serde(default = "SolverSettings::default_initial_step")]
    pub initial_step: f64,
    #[serde(default = "SolverSettings::default_min_step")]
    pub min_step: f64,
    #[serde(default = "SolverSettings::default_max_steps")]
    pub max_steps: usize,
}

impl SolverSettings {
    fn default_tolerance() -> f64 {
        1.49012e-8
    }
    fn default_initial_step() -> f64 {
        0.01
    }
    fn default_min_step() -> f64 {
        1e-12
    }
    fn default_max_steps() -> usize {
        500_000
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            bail!("Tolerances must be positive.");
        }
        if !(self.initial_step > 0.0) || !self.initial_step.is_finite() {
            bail!("initial_step must be positive and finite.");
        }
        if !(self.min_step > 0.0) || self.min_step > self.initial_step {
            bail!("min_step must be positive and no larger than initial_step.");
        }
        if self.max_steps == 0 {
            bail!("max_steps must be at least 1.");
        }
        Ok(())
    }
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            method: Method::default(),
            rtol: Self::default_tolerance(),
            atol: Self::default_tolerance(),
            initial_step: Self::default_initial_step(),
            min_step: Self::default_min_step(),
            max_steps: Self::default_max_steps(),
        }
    }
}

/// States sampled on a time grid, stored row-major (one row per grid point).
#[derive(Debug, Clone, PartialEq)]
pub struct GridSolution {
    pub dim: usize,
    pub states: Vec<f64>,
}

impl GridSolution {
    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.states.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.states[index * self.dim..(index + 1) * self.dim]
    }

    /// Time series of a single state component.
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.states
            .iter()
            .skip(index)
            .step_by(self.dim.max(1))
            .copied()
            .collect()
    }
}

/// Integrates `system` from `y0` and samples the state at every point of `grid`.
///
/// The first row is `y0` itself at `grid[0]`. Steps are clipped so the
/// integrator lands exactly on each requested time.
pub fn integrate_on_grid<S>(
    system: &S,
    y0: &[f64],
    grid: &[f64],
    settings: &SolverSettings,
) -> std::result::Result<GridSolution, IntegrationError>
where
    S: DynamicalSystem<f64>,
{
    let mut states = Vec::with_capacity(grid.len() * y0.len());
    fill_grid(system, y0, grid, settings, &mut states)?;
    Ok(GridSolution {
        dim: system.dimension(),
        states,
    })
}

/// Like [`integrate_on_grid`], but appends each row to `states` as soon as it
/// is reached. On error `states` holds every row completed before the
/// breakdown; nothing is appended if the inputs are rejected up front.
pub fn fill_grid<S>(
    system: &S,
    y0: &[f64],
    grid: &[f64],
    settings: &SolverSettings,
    states: &mut Vec<f64>,
) -> std::result::Result<(), IntegrationError>
where
    S: DynamicalSystem<f64>,
{
    let dim = system.dimension();
    if y0.len() != dim {
        return Err(IntegrationError::DimensionMismatch {
            expected: dim,
            got: y0.len(),
        });
    }
    if grid.is_empty() || grid.windows(2).any(|w| !(w[1] >= w[0])) || !grid[0].is_finite() {
        return Err(IntegrationError::InvalidGrid);
    }

    let t0 = grid[0];
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(IntegrationError::NonFiniteState { t: t0 });
    }
    let mut probe = vec![0.0; dim];
    system.apply(t0, y0, &mut probe);
    if probe.iter().any(|v| !v.is_finite()) {
        return Err(IntegrationError::NonFiniteDerivative { t: t0 });
    }

    states.extend_from_slice(y0);

    match settings.method {
        Method::Tsit5 => adaptive_tsit5(system, y0, grid, settings, states),
        Method::Rk4 => substepped_rk4(system, y0, grid, settings, states),
    }
}

fn error_norm(current: &[f64], next: &[f64], err: &[f64], settings: &SolverSettings) -> f64 {
    let mut acc = 0.0;
    for i in 0..err.len() {
        let scale = settings.atol + settings.rtol * current[i].abs().max(next[i].abs());
        let ratio = err[i] / scale;
        acc += ratio * ratio;
    }
    (acc / err.len().max(1) as f64).sqrt()
}

fn adaptive_tsit5<S>(
    system: &S,
    y0: &[f64],
    grid: &[f64],
    settings: &SolverSettings,
    states: &mut Vec<f64>,
) -> std::result::Result<(), IntegrationError>
where
    S: DynamicalSystem<f64>,
{
    const SAFETY: f64 = 0.9;
    const MIN_FACTOR: f64 = 0.2;
    const MAX_FACTOR: f64 = 5.0;

    let dim = y0.len();
    let mut stepper = Tsit5::<f64>::new(dim);
    let mut err = vec![0.0; dim];
    let mut y = y0.to_vec();
    let mut t = grid[0];
    let mut h = settings.initial_step;
    let mut steps = 0usize;
    let mut rejected = 0usize;

    for &target in &grid[1..] {
        while t < target {
            steps += 1;
            if steps > settings.max_steps {
                return Err(IntegrationError::MaxStepsExceeded {
                    t,
                    max_steps: settings.max_steps,
                });
            }

            let remaining = target - t;
            let lands = h >= remaining;
            let dt = if lands { remaining } else { h };

            let next = stepper.step_with_error(system, t, &y, dt, &mut err);
            let finite = next.iter().all(|v| v.is_finite());
            let norm = if finite {
                error_norm(&y, next, &err, settings)
            } else {
                f64::NAN
            };

            if norm <= 1.0 {
                y.copy_from_slice(next);
                t = if lands { target } else { t + dt };
                let factor = if norm == 0.0 {
                    MAX_FACTOR
                } else {
                    (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                };
                let proposal = dt * factor;
                h = if lands { proposal.max(h) } else { proposal };
            } else {
                rejected += 1;
                let factor = if norm.is_nan() {
                    MIN_FACTOR
                } else {
                    (SAFETY * norm.powf(-0.2)).clamp(MIN_FACTOR, 1.0)
                };
                h = dt * factor;
                if h < settings.min_step {
                    return Err(IntegrationError::StepSizeUnderflow {
                        t,
                        min_step: settings.min_step,
                    });
                }
            }
        }
        states.extend_from_slice(&y);
    }

    debug!(steps, rejected, samples = grid.len(), "tsit5 integration finished");
    Ok(())
}

fn substepped_rk4<S>(
    system: &S,
    y0: &[f64],
    grid: &[f64],
    settings: &SolverSettings,
    states: &mut Vec<f64>,
) -> std::result::Result<(), IntegrationError>
where
    S: DynamicalSystem<f64>,
{
    let mut stepper = RK4::<f64>::new(y0.len());
    let mut y = y0.to_vec();
    let mut t = grid[0];
    let mut steps = 0usize;

    for &target in &grid[1..] {
        let span = target - t;
        if span > 0.0 {
            let substeps = (span / settings.initial_step).ceil().max(1.0) as usize;
            let dt = span / substeps as f64;
            for _ in 0..substeps {
                steps += 1;
                if steps > settings.max_steps {
                    return Err(IntegrationError::MaxStepsExceeded {
                        t,
                        max_steps: settings.max_steps,
                    });
                }
                stepper.step(system, &mut t, &mut y, dt);
            }
            t = target;
            if y.iter().any(|v| !v.is_finite()) {
                return Err(IntegrationError::NonFiniteState { t });
            }
        }
        states.extend_from_slice(&y);
    }

    debug!(steps, samples = grid.len(), "rk4 integration finished");
    Ok(())
}
