use thiserror::Error;

/// Ways a trajectory integration can break down.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("Initial state has dimension {got}, system expects {expected}.")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("Time grid must be non-empty and non-decreasing.")]
    InvalidGrid,
    #[error("Derivative is not finite at t = {t}.")]
    NonFiniteDerivative { t: f64 },
    #[error("State is not finite at t = {t}.")]
    NonFiniteState { t: f64 },
    #[error("Step size fell below {min_step} at t = {t}.")]
    StepSizeUnderflow { t: f64, min_step: f64 },
    #[error("Exceeded the step budget of {max_steps} at t = {t}.")]
    MaxStepsExceeded { t: f64, max_steps: usize },
}

/// Why a raw parameter value could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("no value supplied for {field}")]
    Missing { field: &'static str },
    #[error("value {raw:?} for {field} is not a number")]
    Unparseable { field: &'static str, raw: String },
}
