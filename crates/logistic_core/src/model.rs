//! Logistic growth vector fields.
//!
//! The two species grow independently; there is no interaction term.

use crate::params::ParamSet;
use crate::traits::{DynamicalSystem, Scalar};

/// dP/dt = r * (1 - P/K) * P
///
/// `k == 0` divides by zero and the result is not finite. Negative `r` or
/// `k` are evaluated as written.
pub fn logistic_rate<T: Scalar>(p: T, r: T, k: T) -> T {
    r * (T::one() - p / k) * p
}

/// Logistic growth of a single population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticGrowth {
    pub r: f64,
    pub k: f64,
}

impl LogisticGrowth {
    pub fn new(r: f64, k: f64) -> Self {
        Self { r, k }
    }
}

impl<T: Scalar> DynamicalSystem<T> for LogisticGrowth {
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, _t: T, x: &[T], out: &mut [T]) {
        let r = T::from_f64(self.r).unwrap_or_else(T::nan);
        let k = T::from_f64(self.k).unwrap_or_else(T::nan);
        out[0] = logistic_rate(x[0], r, k);
    }
}

/// Saccharomyces (index 0) and Schizosaccharomyces (index 1) side by side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoSpeciesLogistic {
    pub sac: LogisticGrowth,
    pub sch: LogisticGrowth,
}

impl TwoSpeciesLogistic {
    pub fn from_params(params: &ParamSet) -> Self {
        Self {
            sac: LogisticGrowth::new(params.r_sac, params.k_sac),
            sch: LogisticGrowth::new(params.r_sch, params.k_sch),
        }
    }

    pub fn derivatives(&self, state: [f64; 2]) -> [f64; 2] {
        [
            logistic_rate(state[0], self.sac.r, self.sac.k),
            logistic_rate(state[1], self.sch.r, self.sch.k),
        ]
    }
}

impl<T: Scalar> DynamicalSystem<T> for TwoSpeciesLogistic {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, t: T, x: &[T], out: &mut [T]) {
        self.sac.apply(t, &x[..1], &mut out[..1]);
        self.sch.apply(t, &x[1..2], &mut out[1..2]);
    }
}
